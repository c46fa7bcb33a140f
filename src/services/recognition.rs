use serde::Serialize;
use std::sync::Arc;

use super::request_token;
use crate::config::LivenessConfig;
use crate::errors::FaceError;
use crate::file::ImageFile;
use crate::policy::FacePolicy;
use crate::rekognition::types::*;
use crate::rekognition::FaceApi;
use crate::subject::Subject;

const LIST_USERS_PAGE_SIZE: u32 = 500;
const LIST_FACES_PAGE_SIZE: u32 = 1000;
const DELETE_FACES_BATCH: usize = 4096;

/// Result of [`FaceRecognitionService::enroll_subject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollOutcome {
    Enrolled,
    AlreadyEnrolled,
}

/// A face accepted into the collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrolledFace {
    #[serde(flatten)]
    pub detail: FaceDetail,
    pub image_uuid: String,
    pub similarity_threshold: f32,
}

/// Enrollment, association, search and removal of faces in the
/// configured collection.
#[derive(Clone)]
pub struct FaceRecognitionService {
    api: Arc<dyn FaceApi>,
    policy: FacePolicy,
    liveness: LivenessConfig,
}

impl FaceRecognitionService {
    pub fn new(api: Arc<dyn FaceApi>, policy: FacePolicy) -> Self {
        Self {
            api,
            policy,
            liveness: LivenessConfig::default(),
        }
    }

    pub fn with_liveness(mut self, liveness: LivenessConfig) -> Self {
        self.liveness = liveness;
        self
    }

    pub fn create_collection(&self, collection_id: &str) -> Result<CreateCollectionResponse, FaceError> {
        let response = self.api.create_collection(&CreateCollectionRequest {
            collection_id: collection_id.to_string(),
        })?;

        tracing::info!(collection = %collection_id, arn = ?response.collection_arn, "Collection created");
        Ok(response)
    }

    pub fn enroll_subject(&self, subject: &dyn Subject) -> Result<EnrollOutcome, FaceError> {
        let user_id = subject.unique_id();
        let collection = self.policy.collection_id();

        let result = self.api.create_user(&CreateUserRequest {
            collection_id: collection.to_string(),
            user_id: user_id.to_string(),
            client_request_token: request_token(),
        });

        match result {
            Ok(_) => {
                tracing::info!(user = %user_id, "Subject enrolled");
                Ok(EnrollOutcome::Enrolled)
            }
            Err(e) if e.is_conflict() => {
                tracing::info!(user = %user_id, "Subject already enrolled");
                Ok(EnrollOutcome::AlreadyEnrolled)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Index the single face in `file` and, when `associate` is set, attach
    /// it to the subject. A face rejected after indexing is deleted again.
    pub fn add_face_image(
        &self,
        subject: &dyn Subject,
        file: &ImageFile,
        associate: bool,
    ) -> Result<EnrolledFace, FaceError> {
        let user_id = subject.unique_id();
        let collection = self.policy.collection_id();

        let response = self.api.index_faces(&IndexFacesRequest {
            collection_id: collection.to_string(),
            image: Image::from_bytes(file.bytes()),
            external_image_id: Some(file.external_image_id()),
            detection_attributes: vec![FaceAttribute::All],
            max_faces: 1,
            quality_filter: QualityFilter::Auto,
        })?;

        if response.face_records.len() > 1 {
            tracing::info!(image = %file.name(), faces = response.face_records.len(), "Multiple faces indexed");
            self.discard_faces(
                response
                    .face_records
                    .iter()
                    .map(|r| r.face.face_id.clone())
                    .collect(),
            );
            return Err(FaceError::MultipleFaceDetected);
        }

        let Some(record) = response.face_records.into_iter().next() else {
            tracing::info!(image = %file.name(), unindexed = response.unindexed_faces.len(), "No face indexed");
            return Err(FaceError::NoFaceWasDetected);
        };

        let face_id = record.face.face_id;
        let confidence = record.face.confidence.unwrap_or(0.0);

        if !self.policy.accepts(confidence) {
            tracing::info!(image = %file.name(), confidence, "Indexed face below threshold");
            self.discard_faces(vec![face_id]);
            return Err(FaceError::NoFaceWasDetected);
        }

        if associate {
            let associated = self
                .api
                .associate_faces(&AssociateFacesRequest {
                    collection_id: collection.to_string(),
                    user_id: user_id.to_string(),
                    face_ids: vec![face_id.clone()],
                    user_match_threshold: self.policy.min_percentage(),
                    client_request_token: request_token(),
                })
                .inspect_err(|_| self.discard_faces(vec![face_id.clone()]))?;

            match associated.associated_faces.len() {
                1 => {}
                0 => {
                    tracing::info!(
                        user = %user_id,
                        face = %face_id,
                        reasons = ?associated.unsuccessful_face_associations,
                        "Face not associated"
                    );
                    self.discard_faces(vec![face_id]);
                    return Err(FaceError::FaceDoesNotMatch);
                }
                count => {
                    tracing::info!(user = %user_id, count, "Multiple faces associated");
                    self.discard_faces(vec![face_id]);
                    return Err(FaceError::MultipleFaceDetected);
                }
            }
        }

        tracing::info!(user = %user_id, face = %face_id, associate, "Face image added");

        Ok(EnrolledFace {
            detail: record.face_detail,
            image_uuid: face_id,
            similarity_threshold: self.policy.min_percentage(),
        })
    }

    pub fn disenroll_subject(&self, subject: &dyn Subject) -> Result<DeleteUserResponse, FaceError> {
        let user_id = subject.unique_id();
        let collection = self.policy.collection_id();

        let response = self.api.delete_user(&DeleteUserRequest {
            collection_id: collection.to_string(),
            user_id: user_id.to_string(),
            client_request_token: request_token(),
        })?;

        tracing::info!(user = %user_id, "Subject disenrolled");
        Ok(response)
    }

    pub fn remove_face_image(&self, image_uuid: &str) -> Result<DeleteFacesResponse, FaceError> {
        let response = self.api.delete_faces(&DeleteFacesRequest {
            collection_id: self.policy.collection_id().to_string(),
            face_ids: vec![image_uuid.to_string()],
        })?;

        tracing::info!(face = %image_uuid, deleted = response.deleted_faces.len(), "Face image removed");
        Ok(response)
    }

    /// Detach a face from a subject, keeping it in the collection.
    pub fn remove_face_from_user(
        &self,
        subject_uuid: &str,
        image_uuid: &str,
    ) -> Result<DisassociateFacesResponse, FaceError> {
        let response = self.api.disassociate_faces(&DisassociateFacesRequest {
            collection_id: self.policy.collection_id().to_string(),
            user_id: subject_uuid.to_string(),
            face_ids: vec![image_uuid.to_string()],
            client_request_token: request_token(),
        })?;

        if !response
            .disassociated_faces
            .iter()
            .any(|f| f.face_id == image_uuid)
        {
            tracing::info!(
                user = %subject_uuid,
                face = %image_uuid,
                reasons = ?response.unsuccessful_face_disassociations,
                "Face not disassociated"
            );
            return Err(FaceError::FaceDoesNotMatch);
        }

        Ok(response)
    }

    /// Delete every face associated with the subject.
    pub fn remove_all_face_images(&self, subject: &dyn Subject) -> Result<DeleteFacesResponse, FaceError> {
        let faces = self.list_faces(Some(subject))?.faces;
        let face_ids: Vec<String> = faces.into_iter().map(|f| f.face_id).collect();

        let mut merged = DeleteFacesResponse::default();
        for batch in face_ids.chunks(DELETE_FACES_BATCH) {
            let response = self.api.delete_faces(&DeleteFacesRequest {
                collection_id: self.policy.collection_id().to_string(),
                face_ids: batch.to_vec(),
            })?;
            merged.deleted_faces.extend(response.deleted_faces);
            merged
                .unsuccessful_face_deletions
                .extend(response.unsuccessful_face_deletions);
        }

        tracing::info!(
            user = %subject.unique_id(),
            deleted = merged.deleted_faces.len(),
            "All face images removed"
        );
        Ok(merged)
    }

    /// All users in the collection, following pagination.
    pub fn list_users(&self) -> Result<ListUsersResponse, FaceError> {
        let mut all = ListUsersResponse::default();
        let mut next_token = None;

        loop {
            let page = self.api.list_users(&ListUsersRequest {
                collection_id: self.policy.collection_id().to_string(),
                max_results: Some(LIST_USERS_PAGE_SIZE),
                next_token: next_token.take(),
            })?;
            all.users.extend(page.users);

            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => break,
            }
        }

        Ok(all)
    }

    /// All faces in the collection, or only the subject's when given.
    pub fn list_faces(&self, subject: Option<&dyn Subject>) -> Result<ListFacesResponse, FaceError> {
        let mut all = ListFacesResponse::default();
        let mut next_token = None;

        loop {
            let page = self.api.list_faces(&ListFacesRequest {
                collection_id: self.policy.collection_id().to_string(),
                user_id: subject.map(|s| s.unique_id().to_string()),
                max_results: Some(LIST_FACES_PAGE_SIZE),
                next_token: next_token.take(),
            })?;
            all.faces.extend(page.faces);
            if page.face_model_version.is_some() {
                all.face_model_version = page.face_model_version;
            }

            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => break,
            }
        }

        Ok(all)
    }

    /// 1:N search that must land on `subject`.
    pub fn verify_face_image_against_a_subject(
        &self,
        subject: &dyn Subject,
        file: &ImageFile,
    ) -> Result<SearchUsersByImageResponse, FaceError> {
        let response = self.search_users(file, 1)?;

        let Some(top) = response.user_matches.first() else {
            tracing::info!(user = %subject.unique_id(), "No user matched");
            return Err(FaceError::FaceDoesNotMatch);
        };

        if !self.policy.accepts(top.similarity) {
            tracing::info!(user = %subject.unique_id(), similarity = top.similarity, "Match below threshold");
            return Err(FaceError::FaceDoesNotMatch);
        }

        let matched = top.user.as_ref().map(|u| u.user_id.as_str());
        if matched != Some(subject.unique_id()) {
            tracing::info!(user = %subject.unique_id(), matched = ?matched, "Matched a different user");
            return Err(FaceError::FaceDoesNotMatch);
        }

        Ok(response)
    }

    /// Identify the enrolled user shown in `file`.
    pub fn find_user_using_image(&self, file: &ImageFile) -> Result<String, FaceError> {
        let response = self.search_users(file, 3)?;

        let top = response
            .user_matches
            .into_iter()
            .next()
            .ok_or(FaceError::FaceHasNotBeenIndexed)?;

        if !self.policy.accepts(top.similarity) {
            tracing::info!(similarity = top.similarity, "Best match below threshold");
            return Err(FaceError::FaceHasNotBeenIndexed);
        }

        top.user
            .map(|u| u.user_id)
            .filter(|id| !id.is_empty())
            .ok_or(FaceError::FaceHasNotBeenIndexed)
    }

    /// Start a face liveness session and return its id.
    pub fn create_liveness_session(&self) -> Result<String, FaceError> {
        let output_config = self
            .liveness
            .output_bucket
            .as_ref()
            .map(|bucket| LivenessOutputConfig {
                s3_bucket: bucket.clone(),
                s3_key_prefix: self.liveness.output_key_prefix.clone(),
            });

        let response = self.api.create_face_liveness_session(&CreateFaceLivenessSessionRequest {
            settings: LivenessSettings {
                output_config,
                audit_images_limit: self.liveness.audit_images_limit,
            },
            client_request_token: request_token(),
        })?;

        tracing::info!(session = %response.session_id, "Liveness session created");
        Ok(response.session_id)
    }

    /// Results of a finished session; live only when it succeeded with
    /// enough confidence.
    pub fn check_liveness_session_result(
        &self,
        session_id: &str,
    ) -> Result<GetFaceLivenessSessionResultsResponse, FaceError> {
        let response = self
            .api
            .get_face_liveness_session_results(&GetFaceLivenessSessionResultsRequest {
                session_id: session_id.to_string(),
            })?;

        let live = response.status == LivenessStatus::Succeeded
            && response.confidence.is_some_and(|c| self.policy.accepts(c));

        if !live {
            tracing::info!(
                session = %session_id,
                status = ?response.status,
                confidence = ?response.confidence,
                "Liveness not confirmed"
            );
            return Err(FaceError::LivenessNotConfirmed {
                status: response.status,
                confidence: response.confidence,
            });
        }

        Ok(response)
    }

    fn search_users(&self, file: &ImageFile, max_users: u32) -> Result<SearchUsersByImageResponse, FaceError> {
        Ok(self.api.search_users_by_image(&SearchUsersByImageRequest {
            collection_id: self.policy.collection_id().to_string(),
            image: Image::from_bytes(file.bytes()),
            max_users,
            user_match_threshold: self.policy.min_percentage(),
            quality_filter: QualityFilter::Auto,
        })?)
    }

    /// Best-effort removal of faces indexed by a rejected request.
    fn discard_faces(&self, face_ids: Vec<String>) {
        let face_ids: Vec<String> = face_ids.into_iter().filter(|id| !id.is_empty()).collect();
        if face_ids.is_empty() {
            return;
        }

        let result = self.api.delete_faces(&DeleteFacesRequest {
            collection_id: self.policy.collection_id().to_string(),
            face_ids: face_ids.clone(),
        });

        match result {
            Ok(response) => tracing::debug!(deleted = ?response.deleted_faces, "Discarded rejected faces"),
            Err(e) => tracing::warn!(faces = ?face_ids, error = %e, "Failed to discard rejected faces"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::tests::png;
    use crate::rekognition::fake::{push, service_error, FakeFaceApi};
    use crate::subject::SubjectId;

    fn service(api: &Arc<FakeFaceApi>) -> FaceRecognitionService {
        FaceRecognitionService::new(api.clone(), FacePolicy::new(0.9, "staff").unwrap())
    }

    fn record(face_id: &str, confidence: f32) -> FaceRecord {
        FaceRecord {
            face: Face {
                face_id: face_id.to_string(),
                confidence: Some(confidence),
                ..Default::default()
            },
            face_detail: FaceDetail {
                confidence: Some(confidence),
                age_range: Some(AgeRange { low: 25, high: 35 }),
                ..Default::default()
            },
        }
    }

    fn indexed(records: Vec<FaceRecord>) -> IndexFacesResponse {
        IndexFacesResponse {
            face_records: records,
            ..Default::default()
        }
    }

    fn associated(face_ids: &[&str]) -> AssociateFacesResponse {
        AssociateFacesResponse {
            associated_faces: face_ids
                .iter()
                .map(|id| FaceReference {
                    face_id: id.to_string(),
                })
                .collect(),
            ..Default::default()
        }
    }

    fn user_match(user_id: &str, similarity: f32) -> UserMatch {
        UserMatch {
            similarity,
            user: Some(User {
                user_id: user_id.to_string(),
                user_status: Some("ACTIVE".to_string()),
            }),
        }
    }

    fn search(matches: Vec<UserMatch>) -> SearchUsersByImageResponse {
        SearchUsersByImageResponse {
            user_matches: matches,
            ..Default::default()
        }
    }

    #[test]
    fn test_create_collection_passes_response_through() {
        let api = Arc::new(FakeFaceApi::new());
        push(
            &api.create_collection,
            Ok(CreateCollectionResponse {
                status_code: Some(200),
                collection_arn: Some("aws:rekognition:us-east-1:1:collection/staff".to_string()),
                face_model_version: Some("7.0".to_string()),
            }),
        );

        let response = service(&api).create_collection("staff").unwrap();
        assert_eq!(response.status_code, Some(200));
        assert_eq!(api.request("CreateCollection", 0)["CollectionId"], "staff");
    }

    #[test]
    fn test_enroll_subject_outcomes() {
        let api = Arc::new(FakeFaceApi::new());
        push(&api.create_user, Ok(CreateUserResponse {}));
        push(&api.create_user, Err(service_error("CreateUser", "ConflictException")));
        push(&api.create_user, Err(service_error("CreateUser", "AccessDeniedException")));

        let service = service(&api);
        let subject = SubjectId::new("user-42");
        assert_eq!(service.enroll_subject(&subject).unwrap(), EnrollOutcome::Enrolled);
        assert_eq!(
            service.enroll_subject(&subject).unwrap(),
            EnrollOutcome::AlreadyEnrolled
        );
        assert!(matches!(
            service.enroll_subject(&subject),
            Err(FaceError::Remote(_))
        ));

        let request = api.request("CreateUser", 0);
        assert_eq!(request["UserId"], "user-42");
        assert_eq!(request["CollectionId"], "staff");
        let token = request["ClientRequestToken"].as_str().unwrap();
        assert_eq!(token.len(), 36);
        assert_ne!(api.request("CreateUser", 1)["ClientRequestToken"], token);
    }

    #[test]
    fn test_repeated_enroll_disenroll_cycles_use_fresh_tokens() {
        let api = Arc::new(FakeFaceApi::new());
        for _ in 0..2 {
            push(&api.create_user, Ok(CreateUserResponse {}));
            push(&api.delete_user, Ok(DeleteUserResponse {}));
        }

        let service = service(&api);
        let subject = SubjectId::new("user-42");
        for _ in 0..2 {
            assert_eq!(service.enroll_subject(&subject).unwrap(), EnrollOutcome::Enrolled);
            service.disenroll_subject(&subject).unwrap();
        }

        assert_ne!(
            api.request("CreateUser", 0)["ClientRequestToken"],
            api.request("CreateUser", 1)["ClientRequestToken"]
        );
        assert_ne!(
            api.request("DeleteUser", 0)["ClientRequestToken"],
            api.request("DeleteUser", 1)["ClientRequestToken"]
        );
    }

    #[test]
    fn test_reassociating_a_face_uses_a_fresh_token() {
        let api = Arc::new(FakeFaceApi::new());
        push(
            &api.disassociate_faces,
            Ok(DisassociateFacesResponse {
                disassociated_faces: vec![FaceReference {
                    face_id: "face-1".to_string(),
                }],
                ..Default::default()
            }),
        );
        for _ in 0..2 {
            push(&api.index_faces, Ok(indexed(vec![record("face-1", 99.0)])));
            push(&api.associate_faces, Ok(associated(&["face-1"])));
        }

        let service = service(&api);
        let subject = SubjectId::new("user-42");
        service.add_face_image(&subject, &png("a.png"), true).unwrap();
        service.remove_face_from_user("user-42", "face-1").unwrap();
        service.add_face_image(&subject, &png("a.png"), true).unwrap();

        assert_ne!(
            api.request("AssociateFaces", 0)["ClientRequestToken"],
            api.request("AssociateFaces", 1)["ClientRequestToken"]
        );
    }

    #[test]
    fn test_add_face_image_indexes_and_associates() {
        let api = Arc::new(FakeFaceApi::new());
        push(&api.index_faces, Ok(indexed(vec![record("face-1", 99.0)])));
        push(&api.associate_faces, Ok(associated(&["face-1"])));

        let enrolled = service(&api)
            .add_face_image(&SubjectId::new("user-42"), &png("id card.png"), true)
            .unwrap();

        assert_eq!(enrolled.image_uuid, "face-1");
        assert!((enrolled.similarity_threshold - 90.0).abs() < 0.001);
        assert_eq!(enrolled.detail.age_range, Some(AgeRange { low: 25, high: 35 }));
        assert_eq!(api.operations(), vec!["IndexFaces", "AssociateFaces"]);

        let index = api.request("IndexFaces", 0);
        assert_eq!(index["MaxFaces"], 1);
        assert_eq!(index["QualityFilter"], "AUTO");
        assert_eq!(index["DetectionAttributes"][0], "ALL");
        assert_eq!(index["ExternalImageId"], "id_card.png");

        let associate = api.request("AssociateFaces", 0);
        assert_eq!(associate["UserId"], "user-42");
        assert_eq!(associate["FaceIds"][0], "face-1");
        assert!((associate["UserMatchThreshold"].as_f64().unwrap() - 90.0).abs() < 0.001);

        let json = serde_json::to_value(&enrolled).unwrap();
        assert_eq!(json["image_uuid"], "face-1");
        assert_eq!(json["AgeRange"]["Low"], 25);
    }

    #[test]
    fn test_add_face_image_without_association() {
        let api = Arc::new(FakeFaceApi::new());
        push(&api.index_faces, Ok(indexed(vec![record("face-1", 99.0)])));

        let enrolled = service(&api)
            .add_face_image(&SubjectId::new("user-42"), &png("a.png"), false)
            .unwrap();

        assert_eq!(enrolled.image_uuid, "face-1");
        assert_eq!(api.operations(), vec!["IndexFaces"]);
    }

    #[test]
    fn test_multiple_indexed_faces_are_ambiguous_before_association() {
        let api = Arc::new(FakeFaceApi::new());
        push(
            &api.index_faces,
            Ok(indexed(vec![record("face-1", 99.0), record("face-2", 98.0)])),
        );
        push(&api.delete_faces, Ok(DeleteFacesResponse::default()));

        let err = service(&api)
            .add_face_image(&SubjectId::new("user-42"), &png("group.png"), true)
            .unwrap_err();

        assert!(matches!(err, FaceError::MultipleFaceDetected));
        assert!(!api.operations().contains(&"AssociateFaces"));
        assert_eq!(
            api.request("DeleteFaces", 0)["FaceIds"],
            serde_json::json!(["face-1", "face-2"])
        );
    }

    #[test]
    fn test_no_indexed_face() {
        let api = Arc::new(FakeFaceApi::new());
        push(&api.index_faces, Ok(indexed(Vec::new())));

        let err = service(&api)
            .add_face_image(&SubjectId::new("user-42"), &png("wall.png"), true)
            .unwrap_err();

        assert!(matches!(err, FaceError::NoFaceWasDetected));
        assert_eq!(api.operations(), vec!["IndexFaces"]);
    }

    #[test]
    fn test_low_confidence_face_is_never_associated() {
        let api = Arc::new(FakeFaceApi::new());
        push(&api.index_faces, Ok(indexed(vec![record("face-1", 70.0)])));
        push(&api.delete_faces, Ok(DeleteFacesResponse::default()));

        let err = service(&api)
            .add_face_image(&SubjectId::new("user-42"), &png("dark.png"), true)
            .unwrap_err();

        assert!(matches!(err, FaceError::NoFaceWasDetected));
        assert_eq!(api.operations(), vec!["IndexFaces", "DeleteFaces"]);
    }

    #[test]
    fn test_association_count_is_checked() {
        let api = Arc::new(FakeFaceApi::new());
        push(&api.index_faces, Ok(indexed(vec![record("face-1", 99.0)])));
        push(&api.associate_faces, Ok(associated(&[])));
        push(&api.delete_faces, Ok(DeleteFacesResponse::default()));
        push(&api.index_faces, Ok(indexed(vec![record("face-2", 99.0)])));
        push(&api.associate_faces, Ok(associated(&["face-2", "face-3"])));
        push(&api.delete_faces, Ok(DeleteFacesResponse::default()));

        let service = service(&api);
        let subject = SubjectId::new("user-42");

        assert!(matches!(
            service.add_face_image(&subject, &png("a.png"), true),
            Err(FaceError::FaceDoesNotMatch)
        ));
        assert!(matches!(
            service.add_face_image(&subject, &png("b.png"), true),
            Err(FaceError::MultipleFaceDetected)
        ));

        assert_eq!(
            api.operations(),
            vec![
                "IndexFaces",
                "AssociateFaces",
                "DeleteFaces",
                "IndexFaces",
                "AssociateFaces",
                "DeleteFaces"
            ]
        );
        assert_eq!(api.request("DeleteFaces", 0)["FaceIds"], serde_json::json!(["face-1"]));
        assert_eq!(api.request("DeleteFaces", 1)["FaceIds"], serde_json::json!(["face-2"]));
    }

    #[test]
    fn test_failed_association_discards_indexed_face() {
        let api = Arc::new(FakeFaceApi::new());
        push(&api.index_faces, Ok(indexed(vec![record("face-1", 99.0)])));
        push(
            &api.associate_faces,
            Err(service_error("AssociateFaces", "ResourceNotFoundException")),
        );
        push(&api.delete_faces, Ok(DeleteFacesResponse::default()));

        let err = service(&api)
            .add_face_image(&SubjectId::new("ghost"), &png("a.png"), true)
            .unwrap_err();

        assert!(matches!(err, FaceError::Remote(_)));
        assert_eq!(
            api.operations(),
            vec!["IndexFaces", "AssociateFaces", "DeleteFaces"]
        );
        assert_eq!(api.request("DeleteFaces", 0)["FaceIds"], serde_json::json!(["face-1"]));
    }

    #[test]
    fn test_failed_cleanup_does_not_mask_rejection() {
        let api = Arc::new(FakeFaceApi::new());
        push(&api.index_faces, Ok(indexed(vec![record("face-1", 10.0)])));
        push(&api.delete_faces, Err(service_error("DeleteFaces", "ThrottlingException")));

        assert!(matches!(
            service(&api).add_face_image(&SubjectId::new("u"), &png("a.png"), true),
            Err(FaceError::NoFaceWasDetected)
        ));
    }

    #[test]
    fn test_disenroll_and_remove_face_image() {
        let api = Arc::new(FakeFaceApi::new());
        push(&api.delete_user, Ok(DeleteUserResponse {}));
        push(
            &api.delete_faces,
            Ok(DeleteFacesResponse {
                deleted_faces: vec!["face-1".to_string()],
                ..Default::default()
            }),
        );

        let service = service(&api);
        service.disenroll_subject(&SubjectId::new("user-42")).unwrap();
        let removed = service.remove_face_image("face-1").unwrap();

        assert_eq!(removed.deleted_faces, vec!["face-1".to_string()]);
        let delete_user = api.request("DeleteUser", 0);
        assert_eq!(delete_user["CollectionId"], "staff");
        assert_eq!(delete_user["UserId"], "user-42");
    }

    #[test]
    fn test_remove_face_from_user() {
        let api = Arc::new(FakeFaceApi::new());
        push(
            &api.disassociate_faces,
            Ok(DisassociateFacesResponse {
                disassociated_faces: vec![FaceReference {
                    face_id: "face-1".to_string(),
                }],
                ..Default::default()
            }),
        );
        push(
            &api.disassociate_faces,
            Ok(DisassociateFacesResponse {
                unsuccessful_face_disassociations: vec![UnsuccessfulFaceOperation {
                    face_id: "face-9".to_string(),
                    reasons: vec!["ASSOCIATED_TO_A_DIFFERENT_USER".to_string()],
                    ..Default::default()
                }],
                ..Default::default()
            }),
        );

        let service = service(&api);
        assert!(service.remove_face_from_user("user-42", "face-1").is_ok());
        assert!(matches!(
            service.remove_face_from_user("user-42", "face-9"),
            Err(FaceError::FaceDoesNotMatch)
        ));
        assert_eq!(api.request("DisassociateFaces", 0)["UserId"], "user-42");
    }

    #[test]
    fn test_remove_all_face_images_deletes_listed_faces() {
        let api = Arc::new(FakeFaceApi::new());
        push(
            &api.list_faces,
            Ok(ListFacesResponse {
                faces: vec![
                    Face {
                        face_id: "face-1".to_string(),
                        ..Default::default()
                    },
                    Face {
                        face_id: "face-2".to_string(),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            }),
        );
        push(
            &api.delete_faces,
            Ok(DeleteFacesResponse {
                deleted_faces: vec!["face-1".to_string(), "face-2".to_string()],
                ..Default::default()
            }),
        );

        let removed = service(&api)
            .remove_all_face_images(&SubjectId::new("user-42"))
            .unwrap();

        assert_eq!(removed.deleted_faces.len(), 2);
        assert_eq!(api.request("ListFaces", 0)["UserId"], "user-42");
        assert_eq!(
            api.request("DeleteFaces", 0)["FaceIds"],
            serde_json::json!(["face-1", "face-2"])
        );
    }

    #[test]
    fn test_remove_all_face_images_with_no_faces() {
        let api = Arc::new(FakeFaceApi::new());
        push(&api.list_faces, Ok(ListFacesResponse::default()));

        let removed = service(&api)
            .remove_all_face_images(&SubjectId::new("user-42"))
            .unwrap();

        assert!(removed.deleted_faces.is_empty());
        assert_eq!(api.operations(), vec!["ListFaces"]);
    }

    #[test]
    fn test_list_users_follows_pages() {
        let api = Arc::new(FakeFaceApi::new());
        push(
            &api.list_users,
            Ok(ListUsersResponse {
                users: vec![User {
                    user_id: "a".to_string(),
                    user_status: None,
                }],
                next_token: Some("page-2".to_string()),
            }),
        );
        push(
            &api.list_users,
            Ok(ListUsersResponse {
                users: vec![User {
                    user_id: "b".to_string(),
                    user_status: None,
                }],
                next_token: None,
            }),
        );

        let users = service(&api).list_users().unwrap();
        let ids: Vec<&str> = users.users.iter().map(|u| u.user_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(users.next_token.is_none());
        assert!(api.request("ListUsers", 0).get("NextToken").is_none());
        assert_eq!(api.request("ListUsers", 1)["NextToken"], "page-2");
    }

    #[test]
    fn test_list_faces_filters_by_subject_only_when_given() {
        let api = Arc::new(FakeFaceApi::new());
        push(&api.list_faces, Ok(ListFacesResponse::default()));
        push(&api.list_faces, Ok(ListFacesResponse::default()));

        let service = service(&api);
        service.list_faces(None).unwrap();
        service.list_faces(Some(&SubjectId::new("user-42"))).unwrap();

        assert!(api.request("ListFaces", 0).get("UserId").is_none());
        assert_eq!(api.request("ListFaces", 1)["UserId"], "user-42");
    }

    #[test]
    fn test_verify_face_image_against_a_subject() {
        let api = Arc::new(FakeFaceApi::new());
        push(&api.search_users_by_image, Ok(search(vec![user_match("user-42", 97.0)])));
        push(&api.search_users_by_image, Ok(search(Vec::new())));
        push(&api.search_users_by_image, Ok(search(vec![user_match("user-42", 60.0)])));
        push(&api.search_users_by_image, Ok(search(vec![user_match("user-7", 99.0)])));

        let service = service(&api);
        let subject = SubjectId::new("user-42");

        let response = service
            .verify_face_image_against_a_subject(&subject, &png("a.png"))
            .unwrap();
        assert_eq!(response.user_matches.len(), 1);

        for _ in 0..3 {
            assert!(matches!(
                service.verify_face_image_against_a_subject(&subject, &png("a.png")),
                Err(FaceError::FaceDoesNotMatch)
            ));
        }

        let request = api.request("SearchUsersByImage", 0);
        assert_eq!(request["MaxUsers"], 1);
        assert_eq!(request["QualityFilter"], "AUTO");
    }

    #[test]
    fn test_find_user_using_image() {
        let api = Arc::new(FakeFaceApi::new());
        push(
            &api.search_users_by_image,
            Ok(search(vec![user_match("user-42", 96.0), user_match("user-7", 91.0)])),
        );
        push(&api.search_users_by_image, Ok(search(Vec::new())));
        push(&api.search_users_by_image, Ok(search(vec![user_match("user-42", 89.0)])));

        let service = service(&api);
        assert_eq!(service.find_user_using_image(&png("a.png")).unwrap(), "user-42");
        assert!(matches!(
            service.find_user_using_image(&png("a.png")),
            Err(FaceError::FaceHasNotBeenIndexed)
        ));
        assert!(matches!(
            service.find_user_using_image(&png("a.png")),
            Err(FaceError::FaceHasNotBeenIndexed)
        ));
        assert_eq!(api.request("SearchUsersByImage", 0)["MaxUsers"], 3);
    }

    #[test]
    fn test_liveness_session_lifecycle() {
        let api = Arc::new(FakeFaceApi::new());
        push(
            &api.create_face_liveness_session,
            Ok(CreateFaceLivenessSessionResponse {
                session_id: "session-1".to_string(),
            }),
        );
        push(
            &api.get_face_liveness_session_results,
            Ok(GetFaceLivenessSessionResultsResponse {
                session_id: "session-1".to_string(),
                status: LivenessStatus::Succeeded,
                confidence: Some(98.0),
                ..Default::default()
            }),
        );
        push(
            &api.get_face_liveness_session_results,
            Ok(GetFaceLivenessSessionResultsResponse {
                session_id: "session-1".to_string(),
                status: LivenessStatus::Succeeded,
                confidence: Some(40.0),
                ..Default::default()
            }),
        );
        push(
            &api.get_face_liveness_session_results,
            Ok(GetFaceLivenessSessionResultsResponse {
                session_id: "session-1".to_string(),
                status: LivenessStatus::InProgress,
                ..Default::default()
            }),
        );

        let service = service(&api).with_liveness(LivenessConfig {
            audit_images_limit: 2,
            output_bucket: Some("audit".to_string()),
            output_key_prefix: None,
        });

        assert_eq!(service.create_liveness_session().unwrap(), "session-1");
        let create = api.request("CreateFaceLivenessSession", 0);
        assert_eq!(create["Settings"]["AuditImagesLimit"], 2);
        assert_eq!(create["Settings"]["OutputConfig"]["S3Bucket"], "audit");
        assert_eq!(create["ClientRequestToken"].as_str().unwrap().len(), 36);

        assert!(service.check_liveness_session_result("session-1").is_ok());
        assert!(matches!(
            service.check_liveness_session_result("session-1"),
            Err(FaceError::LivenessNotConfirmed {
                status: LivenessStatus::Succeeded,
                ..
            })
        ));
        assert!(matches!(
            service.check_liveness_session_result("session-1"),
            Err(FaceError::LivenessNotConfirmed {
                status: LivenessStatus::InProgress,
                confidence: None,
            })
        ));
        assert_eq!(
            api.request("GetFaceLivenessSessionResults", 0)["SessionId"],
            "session-1"
        );
    }
}
