use crate::config::RecognitionConfig;
use crate::errors::FaceError;

/// Immutable acceptance policy shared by the services.
///
/// The threshold is kept as a ratio and compared against the
/// percentage-scale values Rekognition returns.
#[derive(Debug, Clone, PartialEq)]
pub struct FacePolicy {
    trust_threshold: f32,
    collection_id: String,
}

impl FacePolicy {
    pub fn new(trust_threshold: f32, collection_id: impl Into<String>) -> Result<Self, FaceError> {
        if !(0.0..=1.0).contains(&trust_threshold) {
            return Err(FaceError::InvalidThreshold(trust_threshold));
        }

        Ok(Self {
            trust_threshold,
            collection_id: collection_id.into(),
        })
    }

    pub fn from_config(config: &RecognitionConfig) -> Result<Self, FaceError> {
        Self::new(config.trust_threshold, config.aws_collection_id.clone())
    }

    pub fn trust_threshold(&self) -> f32 {
        self.trust_threshold
    }

    /// Threshold on the 0-100 scale.
    pub fn min_percentage(&self) -> f32 {
        self.trust_threshold * 100.0
    }

    pub fn accepts(&self, percentage: f32) -> bool {
        percentage >= self.min_percentage()
    }

    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }
}
