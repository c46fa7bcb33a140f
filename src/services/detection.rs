use std::sync::Arc;

use crate::errors::FaceError;
use crate::file::ImageFile;
use crate::policy::FacePolicy;
use crate::rekognition::types::{DetectFacesRequest, DetectFacesResponse, FaceAttribute, Image};
use crate::rekognition::FaceApi;

/// Detects faces and checks the most prominent one against the policy.
#[derive(Clone)]
pub struct FaceDetectionService {
    api: Arc<dyn FaceApi>,
    policy: FacePolicy,
}

impl FaceDetectionService {
    pub fn new(api: Arc<dyn FaceApi>, policy: FacePolicy) -> Self {
        Self { api, policy }
    }

    pub fn detect_file_image(&self, file: &ImageFile) -> Result<DetectFacesResponse, FaceError> {
        let response = self.api.detect_faces(&DetectFacesRequest {
            image: Image::from_bytes(file.bytes()),
            attributes: vec![FaceAttribute::Default],
        })?;

        self.check_response(file.name(), response)
    }

    /// Same contract as [`detect_file_image`](Self::detect_file_image) for
    /// base64 (or data URL) encoded images.
    pub fn detect_base64_image(&self, data: &str) -> Result<DetectFacesResponse, FaceError> {
        let file = ImageFile::from_base64("base64-image", data)?;
        self.detect_file_image(&file)
    }

    fn check_response(
        &self,
        name: &str,
        response: DetectFacesResponse,
    ) -> Result<DetectFacesResponse, FaceError> {
        let Some(face) = response.face_details.first() else {
            tracing::info!(image = %name, "No face detected");
            return Err(FaceError::NoFaceWasDetected);
        };

        let confidence = face.confidence.unwrap_or(0.0);
        if !self.policy.accepts(confidence) {
            tracing::info!(
                image = %name,
                confidence,
                threshold = self.policy.min_percentage(),
                "Face confidence below threshold"
            );
            return Err(FaceError::NoFaceWasDetected);
        }

        tracing::debug!(image = %name, faces = response.face_details.len(), confidence, "Face detected");
        Ok(response)
    }
}
