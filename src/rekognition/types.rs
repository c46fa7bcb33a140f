//! Typed requests and responses for the face operations.
//!
//! These are the crate's own shapes, independent of the SDK version. They
//! serialize with Rekognition's PascalCase field names so command output
//! reads like the service documentation. Every response field is defaulted;
//! the services decide what a missing value means.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Image payload. Serialized as base64.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Image {
    #[serde(serialize_with = "encode_blob", deserialize_with = "decode_blob")]
    pub bytes: Vec<u8>,
}

impl Image {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }
}

fn encode_blob<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&BASE64.encode(bytes))
}

fn decode_blob<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let encoded = String::deserialize(deserializer)?;
    BASE64.decode(encoded).map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QualityFilter {
    None,
    #[default]
    Auto,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FaceAttribute {
    Default,
    All,
}

// ============================================================================
// Face description
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoundingBox {
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub left: f32,
    #[serde(default)]
    pub top: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AgeRange {
    #[serde(default)]
    pub low: u32,
    #[serde(default)]
    pub high: u32,
}

/// Boolean attribute with the model's confidence (smile, eyeglasses, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Attribute {
    #[serde(default)]
    pub value: bool,
    #[serde(default)]
    pub confidence: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Gender {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub confidence: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Emotion {
    #[serde(default, rename = "Type")]
    pub emotion_type: String,
    #[serde(default)]
    pub confidence: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Landmark {
    #[serde(default, rename = "Type")]
    pub landmark_type: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Pose {
    #[serde(default)]
    pub roll: f32,
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageQuality {
    #[serde(default)]
    pub brightness: f32,
    #[serde(default)]
    pub sharpness: f32,
}

/// Everything the detector reports about one face.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FaceDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_range: Option<AgeRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smile: Option<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eyeglasses: Option<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunglasses: Option<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beard: Option<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mustache: Option<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eyes_open: Option<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mouth_open: Option<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_occluded: Option<Attribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emotions: Vec<Emotion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub landmarks: Vec<Landmark>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<Pose>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<ImageQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// A face stored in a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Face {
    #[serde(default)]
    pub face_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_faces_model_version: Option<String>,
}

// ============================================================================
// DetectFaces
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetectFacesRequest {
    pub image: Image,
    pub attributes: Vec<FaceAttribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetectFacesResponse {
    #[serde(default)]
    pub face_details: Vec<FaceDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation_correction: Option<String>,
}

// ============================================================================
// IndexFaces
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndexFacesRequest {
    pub collection_id: String,
    pub image: Image,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_image_id: Option<String>,
    pub detection_attributes: Vec<FaceAttribute>,
    pub max_faces: u32,
    pub quality_filter: QualityFilter,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FaceRecord {
    #[serde(default)]
    pub face: Face,
    #[serde(default)]
    pub face_detail: FaceDetail,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnindexedFace {
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub face_detail: FaceDetail,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndexFacesResponse {
    #[serde(default)]
    pub face_records: Vec<FaceRecord>,
    #[serde(default)]
    pub unindexed_faces: Vec<UnindexedFace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_model_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation_correction: Option<String>,
}

// ============================================================================
// AssociateFaces / DisassociateFaces
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssociateFacesRequest {
    pub collection_id: String,
    pub user_id: String,
    pub face_ids: Vec<String>,
    pub user_match_threshold: f32,
    pub client_request_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FaceReference {
    #[serde(default)]
    pub face_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnsuccessfulFaceOperation {
    #[serde(default)]
    pub face_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(default)]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssociateFacesResponse {
    #[serde(default)]
    pub associated_faces: Vec<FaceReference>,
    #[serde(default)]
    pub unsuccessful_face_associations: Vec<UnsuccessfulFaceOperation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisassociateFacesRequest {
    pub collection_id: String,
    pub user_id: String,
    pub face_ids: Vec<String>,
    pub client_request_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisassociateFacesResponse {
    #[serde(default)]
    pub disassociated_faces: Vec<FaceReference>,
    #[serde(default)]
    pub unsuccessful_face_disassociations: Vec<UnsuccessfulFaceOperation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_status: Option<String>,
}

// ============================================================================
// DeleteFaces
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteFacesRequest {
    pub collection_id: String,
    pub face_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteFacesResponse {
    #[serde(default)]
    pub deleted_faces: Vec<String>,
    #[serde(default)]
    pub unsuccessful_face_deletions: Vec<UnsuccessfulFaceOperation>,
}

// ============================================================================
// Collections and users
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateCollectionRequest {
    pub collection_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateCollectionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_model_version: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateUserRequest {
    pub collection_id: String,
    pub user_id: String,
    pub client_request_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateUserResponse {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteUserRequest {
    pub collection_id: String,
    pub user_id: String,
    pub client_request_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteUserResponse {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListUsersRequest {
    pub collection_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    #[serde(default)]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListUsersResponse {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListFacesRequest {
    pub collection_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListFacesResponse {
    #[serde(default)]
    pub faces: Vec<Face>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_model_version: Option<String>,
}

// ============================================================================
// SearchUsersByImage
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchUsersByImageRequest {
    pub collection_id: String,
    pub image: Image,
    pub max_users: u32,
    pub user_match_threshold: f32,
    pub quality_filter: QualityFilter,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserMatch {
    #[serde(default)]
    pub similarity: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchedFace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_detail: Option<FaceDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchUsersByImageResponse {
    #[serde(default)]
    pub user_matches: Vec<UserMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searched_face: Option<SearchedFace>,
    #[serde(default)]
    pub unsearched_faces: Vec<UnindexedFace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_model_version: Option<String>,
}

// ============================================================================
// CompareFaces
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompareFacesRequest {
    pub source_image: Image,
    pub target_image: Image,
    pub similarity_threshold: f32,
    pub quality_filter: QualityFilter,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComparedSourceImageFace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default)]
    pub confidence: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompareFacesMatch {
    #[serde(default)]
    pub similarity: f32,
    #[serde(default)]
    pub face: FaceDetail,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompareFacesResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_image_face: Option<ComparedSourceImageFace>,
    #[serde(default)]
    pub face_matches: Vec<CompareFacesMatch>,
    #[serde(default)]
    pub unmatched_faces: Vec<FaceDetail>,
}

// ============================================================================
// Face liveness
// ============================================================================

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LivenessOutputConfig {
    pub s3_bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_key_prefix: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LivenessSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_config: Option<LivenessOutputConfig>,
    pub audit_images_limit: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateFaceLivenessSessionRequest {
    pub settings: LivenessSettings,
    pub client_request_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateFaceLivenessSessionResponse {
    #[serde(default)]
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetFaceLivenessSessionResultsRequest {
    pub session_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LivenessStatus {
    #[default]
    Created,
    InProgress,
    Succeeded,
    Failed,
    Expired,
    /// A status this build does not know about.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct S3Object {
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Audit/reference frame. Inline bytes are kept base64-encoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuditImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_object: Option<S3Object>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetFaceLivenessSessionResultsResponse {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub status: LivenessStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_image: Option<AuditImage>,
    #[serde(default)]
    pub audit_images: Vec<AuditImage>,
}
