use std::sync::Arc;

use super::detection::FaceDetectionService;
use crate::errors::FaceError;
use crate::file::ImageFile;
use crate::policy::FacePolicy;
use crate::rekognition::types::{CompareFacesRequest, CompareFacesResponse, Image, QualityFilter};
use crate::rekognition::FaceApi;

/// 1:1 comparison of two images.
#[derive(Clone)]
pub struct FaceVerificationService {
    api: Arc<dyn FaceApi>,
    policy: FacePolicy,
    detection: FaceDetectionService,
}

impl FaceVerificationService {
    pub fn new(api: Arc<dyn FaceApi>, policy: FacePolicy) -> Self {
        let detection = FaceDetectionService::new(Arc::clone(&api), policy.clone());
        Self {
            api,
            policy,
            detection,
        }
    }

    /// The source must contain a detectable face before the comparison is
    /// issued.
    pub fn compare_two_face_images(
        &self,
        source: &ImageFile,
        target: &ImageFile,
    ) -> Result<CompareFacesResponse, FaceError> {
        self.detection.detect_file_image(source)?;

        let response = self.api.compare_faces(&CompareFacesRequest {
            source_image: Image::from_bytes(source.bytes()),
            target_image: Image::from_bytes(target.bytes()),
            similarity_threshold: self.policy.min_percentage(),
            quality_filter: QualityFilter::Auto,
        })?;

        self.check_response(response)
    }

    fn check_response(&self, response: CompareFacesResponse) -> Result<CompareFacesResponse, FaceError> {
        let Some(source_face) = &response.source_image_face else {
            return Err(FaceError::NoFaceWasDetected);
        };

        if !self.policy.accepts(source_face.confidence) {
            tracing::info!(confidence = source_face.confidence, "Source face below threshold");
            return Err(FaceError::NoFaceWasDetected);
        }

        let similarity = response.face_matches.first().map(|m| m.similarity);
        if !similarity.is_some_and(|s| self.policy.accepts(s)) {
            tracing::info!(similarity = ?similarity, "Faces do not match");
            return Err(FaceError::FaceDoesNotMatch);
        }

        if response.face_matches.len() > 1 {
            tracing::info!(matches = response.face_matches.len(), "Multiple faces matched");
            return Err(FaceError::MultipleMatches);
        }

        Ok(response)
    }
}
