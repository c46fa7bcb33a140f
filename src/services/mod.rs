pub mod detection;
pub mod recognition;
pub mod verification;

use anyhow::Result;
use std::sync::Arc;

use crate::config::Config;
use crate::policy::FacePolicy;
use crate::rekognition::{FaceApi, RekognitionClient};

pub use detection::FaceDetectionService;
pub use recognition::{EnrollOutcome, EnrolledFace, FaceRecognitionService};
pub use verification::FaceVerificationService;

/// The three services over one client and one policy.
#[derive(Clone)]
pub struct FaceTech {
    detection: FaceDetectionService,
    recognition: FaceRecognitionService,
    verification: FaceVerificationService,
}

impl FaceTech {
    pub fn new(api: Arc<dyn FaceApi>, policy: FacePolicy) -> Self {
        Self {
            detection: FaceDetectionService::new(Arc::clone(&api), policy.clone()),
            recognition: FaceRecognitionService::new(Arc::clone(&api), policy.clone()),
            verification: FaceVerificationService::new(api, policy),
        }
    }

    /// Build a Rekognition-backed instance from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let policy = FacePolicy::from_config(&config.recognition)?;
        let client = RekognitionClient::from_config(&config.aws)?;

        tracing::debug!(
            region = ?client.region(),
            endpoint = ?client.endpoint(),
            collection = %policy.collection_id(),
            threshold = policy.trust_threshold(),
            "Face services configured"
        );

        let mut tech = Self::new(Arc::new(client), policy);
        tech.recognition = tech.recognition.with_liveness(config.liveness.clone());
        Ok(tech)
    }

    pub fn detection(&self) -> &FaceDetectionService {
        &self.detection
    }

    pub fn recognition(&self) -> &FaceRecognitionService {
        &self.recognition
    }

    pub fn verification(&self) -> &FaceVerificationService {
        &self.verification
    }
}

/// Idempotency token for one logical request.
///
/// Fresh on every call: Rekognition replays the cached result for a token it
/// has seen, so a repeated create/delete cycle must not reuse one. SDK retries
/// resend the same request and keep the token.
pub(crate) fn request_token() -> String {
    uuid::Uuid::new_v4().to_string()
}
