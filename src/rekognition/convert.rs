//! Mapping between the crate's face types and the AWS SDK's.

use aws_sdk_rekognition::operation::{
    associate_faces::AssociateFacesOutput, compare_faces::CompareFacesOutput,
    create_collection::CreateCollectionOutput,
    create_face_liveness_session::CreateFaceLivenessSessionOutput,
    delete_faces::DeleteFacesOutput, detect_faces::DetectFacesOutput,
    disassociate_faces::DisassociateFacesOutput,
    get_face_liveness_session_results::GetFaceLivenessSessionResultsOutput,
    index_faces::IndexFacesOutput, list_faces::ListFacesOutput, list_users::ListUsersOutput,
    search_users_by_image::SearchUsersByImageOutput,
};
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types as sdk;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use super::types::*;

pub(crate) fn image(image: &Image) -> sdk::Image {
    sdk::Image::builder()
        .bytes(Blob::new(image.bytes.clone()))
        .build()
}

pub(crate) fn attribute(attribute: FaceAttribute) -> sdk::Attribute {
    match attribute {
        FaceAttribute::Default => sdk::Attribute::Default,
        FaceAttribute::All => sdk::Attribute::All,
    }
}

pub(crate) fn quality_filter(filter: QualityFilter) -> sdk::QualityFilter {
    match filter {
        QualityFilter::None => sdk::QualityFilter::None,
        QualityFilter::Auto => sdk::QualityFilter::Auto,
        QualityFilter::Low => sdk::QualityFilter::Low,
        QualityFilter::Medium => sdk::QualityFilter::Medium,
        QualityFilter::High => sdk::QualityFilter::High,
    }
}

/// Counts are unsigned here and `i32` in the SDK.
pub(crate) fn count(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn flag(value: Option<bool>, confidence: Option<f32>) -> Attribute {
    Attribute {
        value: value.unwrap_or_default(),
        confidence: confidence.unwrap_or_default(),
    }
}

fn list<S, T: From<S>>(items: Option<Vec<S>>) -> Vec<T> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(T::from)
        .collect()
}

fn names<E: AsRef<str>>(items: Option<Vec<E>>) -> Vec<String> {
    items
        .unwrap_or_default()
        .iter()
        .map(|item| item.as_ref().to_string())
        .collect()
}

impl From<sdk::BoundingBox> for BoundingBox {
    fn from(b: sdk::BoundingBox) -> Self {
        Self {
            width: b.width.unwrap_or_default(),
            height: b.height.unwrap_or_default(),
            left: b.left.unwrap_or_default(),
            top: b.top.unwrap_or_default(),
        }
    }
}

impl From<sdk::Emotion> for Emotion {
    fn from(e: sdk::Emotion) -> Self {
        Self {
            emotion_type: e.r#type.map(|t| t.as_str().to_string()).unwrap_or_default(),
            confidence: e.confidence.unwrap_or_default(),
        }
    }
}

impl From<sdk::Landmark> for Landmark {
    fn from(l: sdk::Landmark) -> Self {
        Self {
            landmark_type: l.r#type.map(|t| t.as_str().to_string()).unwrap_or_default(),
            x: l.x.unwrap_or_default(),
            y: l.y.unwrap_or_default(),
        }
    }
}

impl From<sdk::Pose> for Pose {
    fn from(p: sdk::Pose) -> Self {
        Self {
            roll: p.roll.unwrap_or_default(),
            yaw: p.yaw.unwrap_or_default(),
            pitch: p.pitch.unwrap_or_default(),
        }
    }
}

impl From<sdk::ImageQuality> for ImageQuality {
    fn from(q: sdk::ImageQuality) -> Self {
        Self {
            brightness: q.brightness.unwrap_or_default(),
            sharpness: q.sharpness.unwrap_or_default(),
        }
    }
}

impl From<sdk::FaceDetail> for FaceDetail {
    fn from(d: sdk::FaceDetail) -> Self {
        Self {
            bounding_box: d.bounding_box.map(Into::into),
            age_range: d.age_range.map(|a| AgeRange {
                low: a.low.unwrap_or_default().max(0) as u32,
                high: a.high.unwrap_or_default().max(0) as u32,
            }),
            smile: d.smile.map(|a| flag(Some(a.value), a.confidence)),
            eyeglasses: d.eyeglasses.map(|a| flag(Some(a.value), a.confidence)),
            sunglasses: d.sunglasses.map(|a| flag(Some(a.value), a.confidence)),
            gender: d.gender.map(|g| Gender {
                value: g.value.map(|v| v.as_str().to_string()).unwrap_or_default(),
                confidence: g.confidence.unwrap_or_default(),
            }),
            beard: d.beard.map(|a| flag(Some(a.value), a.confidence)),
            mustache: d.mustache.map(|a| flag(Some(a.value), a.confidence)),
            eyes_open: d.eyes_open.map(|a| flag(Some(a.value), a.confidence)),
            mouth_open: d.mouth_open.map(|a| flag(Some(a.value), a.confidence)),
            face_occluded: d.face_occluded.map(|a| flag(Some(a.value), a.confidence)),
            emotions: list(d.emotions),
            landmarks: list(d.landmarks),
            pose: d.pose.map(Into::into),
            quality: d.quality.map(Into::into),
            confidence: d.confidence,
        }
    }
}

/// Faces found by CompareFaces carry a subset of the detail fields.
impl From<sdk::ComparedFace> for FaceDetail {
    fn from(f: sdk::ComparedFace) -> Self {
        Self {
            bounding_box: f.bounding_box.map(Into::into),
            smile: f.smile.map(|a| flag(Some(a.value), a.confidence)),
            emotions: list(f.emotions),
            landmarks: list(f.landmarks),
            pose: f.pose.map(Into::into),
            quality: f.quality.map(Into::into),
            confidence: f.confidence,
            ..Default::default()
        }
    }
}

impl From<sdk::Face> for Face {
    fn from(f: sdk::Face) -> Self {
        Self {
            face_id: f.face_id.unwrap_or_default(),
            bounding_box: f.bounding_box.map(Into::into),
            image_id: f.image_id,
            external_image_id: f.external_image_id,
            user_id: f.user_id,
            confidence: f.confidence,
            index_faces_model_version: f.index_faces_model_version,
        }
    }
}

impl From<sdk::FaceRecord> for FaceRecord {
    fn from(r: sdk::FaceRecord) -> Self {
        Self {
            face: r.face.map(Into::into).unwrap_or_default(),
            face_detail: r.face_detail.map(Into::into).unwrap_or_default(),
        }
    }
}

impl From<sdk::UnindexedFace> for UnindexedFace {
    fn from(u: sdk::UnindexedFace) -> Self {
        Self {
            reasons: names(u.reasons),
            face_detail: u.face_detail.map(Into::into).unwrap_or_default(),
        }
    }
}

impl From<sdk::UnsearchedFace> for UnindexedFace {
    fn from(u: sdk::UnsearchedFace) -> Self {
        Self {
            reasons: names(u.reasons),
            face_detail: u.face_details.map(Into::into).unwrap_or_default(),
        }
    }
}

impl From<sdk::AssociatedFace> for FaceReference {
    fn from(f: sdk::AssociatedFace) -> Self {
        Self {
            face_id: f.face_id.unwrap_or_default(),
        }
    }
}

impl From<sdk::DisassociatedFace> for FaceReference {
    fn from(f: sdk::DisassociatedFace) -> Self {
        Self {
            face_id: f.face_id.unwrap_or_default(),
        }
    }
}

impl From<sdk::UnsuccessfulFaceAssociation> for UnsuccessfulFaceOperation {
    fn from(u: sdk::UnsuccessfulFaceAssociation) -> Self {
        Self {
            face_id: u.face_id.unwrap_or_default(),
            user_id: u.user_id,
            confidence: u.confidence,
            reasons: names(u.reasons),
        }
    }
}

impl From<sdk::UnsuccessfulFaceDisassociation> for UnsuccessfulFaceOperation {
    fn from(u: sdk::UnsuccessfulFaceDisassociation) -> Self {
        Self {
            face_id: u.face_id.unwrap_or_default(),
            user_id: u.user_id,
            confidence: None,
            reasons: names(u.reasons),
        }
    }
}

impl From<sdk::UnsuccessfulFaceDeletion> for UnsuccessfulFaceOperation {
    fn from(u: sdk::UnsuccessfulFaceDeletion) -> Self {
        Self {
            face_id: u.face_id.unwrap_or_default(),
            user_id: u.user_id,
            confidence: None,
            reasons: names(u.reasons),
        }
    }
}

impl From<sdk::User> for User {
    fn from(u: sdk::User) -> Self {
        Self {
            user_id: u.user_id.unwrap_or_default(),
            user_status: u.user_status.map(|s| s.as_str().to_string()),
        }
    }
}

impl From<sdk::MatchedUser> for User {
    fn from(u: sdk::MatchedUser) -> Self {
        Self {
            user_id: u.user_id.unwrap_or_default(),
            user_status: u.user_status.map(|s| s.as_str().to_string()),
        }
    }
}

impl From<sdk::UserMatch> for UserMatch {
    fn from(m: sdk::UserMatch) -> Self {
        Self {
            similarity: m.similarity.unwrap_or_default(),
            user: m.user.map(Into::into),
        }
    }
}

impl From<sdk::CompareFacesMatch> for CompareFacesMatch {
    fn from(m: sdk::CompareFacesMatch) -> Self {
        Self {
            similarity: m.similarity.unwrap_or_default(),
            face: m.face.map(Into::into).unwrap_or_default(),
        }
    }
}

impl From<sdk::LivenessSessionStatus> for LivenessStatus {
    fn from(status: sdk::LivenessSessionStatus) -> Self {
        match status {
            sdk::LivenessSessionStatus::Created => LivenessStatus::Created,
            sdk::LivenessSessionStatus::InProgress => LivenessStatus::InProgress,
            sdk::LivenessSessionStatus::Succeeded => LivenessStatus::Succeeded,
            sdk::LivenessSessionStatus::Failed => LivenessStatus::Failed,
            sdk::LivenessSessionStatus::Expired => LivenessStatus::Expired,
            _ => LivenessStatus::Unknown,
        }
    }
}

impl From<sdk::AuditImage> for AuditImage {
    fn from(a: sdk::AuditImage) -> Self {
        Self {
            bytes: a.bytes.map(|blob| BASE64.encode(blob.into_inner())),
            s3_object: a.s3_object.map(|o| S3Object {
                bucket: o.bucket.unwrap_or_default(),
                name: o.name.unwrap_or_default(),
                version: o.version,
            }),
            bounding_box: a.bounding_box.map(Into::into),
        }
    }
}

// ============================================================================
// Operation outputs
// ============================================================================

impl From<DetectFacesOutput> for DetectFacesResponse {
    fn from(o: DetectFacesOutput) -> Self {
        Self {
            face_details: list(o.face_details),
            orientation_correction: o.orientation_correction.map(|c| c.as_str().to_string()),
        }
    }
}

impl From<IndexFacesOutput> for IndexFacesResponse {
    fn from(o: IndexFacesOutput) -> Self {
        Self {
            face_records: list(o.face_records),
            unindexed_faces: list(o.unindexed_faces),
            face_model_version: o.face_model_version,
            orientation_correction: o.orientation_correction.map(|c| c.as_str().to_string()),
        }
    }
}

impl From<AssociateFacesOutput> for AssociateFacesResponse {
    fn from(o: AssociateFacesOutput) -> Self {
        Self {
            associated_faces: list(o.associated_faces),
            unsuccessful_face_associations: list(o.unsuccessful_face_associations),
            user_status: o.user_status.map(|s| s.as_str().to_string()),
        }
    }
}

impl From<DisassociateFacesOutput> for DisassociateFacesResponse {
    fn from(o: DisassociateFacesOutput) -> Self {
        Self {
            disassociated_faces: list(o.disassociated_faces),
            unsuccessful_face_disassociations: list(o.unsuccessful_face_disassociations),
            user_status: o.user_status.map(|s| s.as_str().to_string()),
        }
    }
}

impl From<DeleteFacesOutput> for DeleteFacesResponse {
    fn from(o: DeleteFacesOutput) -> Self {
        Self {
            deleted_faces: o.deleted_faces.unwrap_or_default(),
            unsuccessful_face_deletions: list(o.unsuccessful_face_deletions),
        }
    }
}

impl From<CreateCollectionOutput> for CreateCollectionResponse {
    fn from(o: CreateCollectionOutput) -> Self {
        Self {
            status_code: o.status_code.and_then(|s| u16::try_from(s).ok()),
            collection_arn: o.collection_arn,
            face_model_version: o.face_model_version,
        }
    }
}

impl From<ListUsersOutput> for ListUsersResponse {
    fn from(o: ListUsersOutput) -> Self {
        Self {
            users: list(o.users),
            next_token: o.next_token,
        }
    }
}

impl From<ListFacesOutput> for ListFacesResponse {
    fn from(o: ListFacesOutput) -> Self {
        Self {
            faces: list(o.faces),
            next_token: o.next_token,
            face_model_version: o.face_model_version,
        }
    }
}

impl From<SearchUsersByImageOutput> for SearchUsersByImageResponse {
    fn from(o: SearchUsersByImageOutput) -> Self {
        Self {
            user_matches: list(o.user_matches),
            searched_face: o.searched_face.map(|s| SearchedFace {
                face_detail: s.face_detail.map(Into::into),
            }),
            unsearched_faces: list(o.unsearched_faces),
            face_model_version: o.face_model_version,
        }
    }
}

impl From<CompareFacesOutput> for CompareFacesResponse {
    fn from(o: CompareFacesOutput) -> Self {
        Self {
            source_image_face: o.source_image_face.map(|f| ComparedSourceImageFace {
                bounding_box: f.bounding_box.map(Into::into),
                confidence: f.confidence.unwrap_or_default(),
            }),
            face_matches: list(o.face_matches),
            unmatched_faces: list(o.unmatched_faces),
        }
    }
}

impl From<CreateFaceLivenessSessionOutput> for CreateFaceLivenessSessionResponse {
    fn from(o: CreateFaceLivenessSessionOutput) -> Self {
        Self {
            session_id: o.session_id,
        }
    }
}

impl From<GetFaceLivenessSessionResultsOutput> for GetFaceLivenessSessionResultsResponse {
    fn from(o: GetFaceLivenessSessionResultsOutput) -> Self {
        Self {
            session_id: o.session_id,
            status: o.status.into(),
            confidence: o.confidence,
            reference_image: o.reference_image.map(Into::into),
            audit_images: list(o.audit_images),
        }
    }
}
