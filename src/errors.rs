use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::rekognition::types::LivenessStatus;
use crate::rekognition::RemoteError;

/// Outcome of a face operation that did not produce a usable result.
///
/// The first four variants are the rejections callers act on: ask for
/// another photo, treat as a different person, or ask to enroll first.
#[derive(Debug, Error)]
pub enum FaceError {
    #[error("no face was detected")]
    NoFaceWasDetected,

    #[error("multiple faces detected")]
    MultipleFaceDetected,

    #[error("face does not match")]
    FaceDoesNotMatch,

    #[error("face has not been indexed")]
    FaceHasNotBeenIndexed,

    #[error("multiple faces matched")]
    MultipleMatches,

    #[error("liveness not confirmed (status {status:?}, confidence {confidence:?})")]
    LivenessNotConfirmed {
        status: LivenessStatus,
        confidence: Option<f32>,
    },

    #[error("invalid image {name}: {message}")]
    InvalidImage { name: String, message: String },

    #[error("failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("trust threshold {0} is outside 0.0..=1.0")]
    InvalidThreshold(f32),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl FaceError {
    /// True for rejections decided locally from a valid remote answer.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            FaceError::NoFaceWasDetected
                | FaceError::MultipleFaceDetected
                | FaceError::FaceDoesNotMatch
                | FaceError::FaceHasNotBeenIndexed
                | FaceError::MultipleMatches
                | FaceError::LivenessNotConfirmed { .. }
        )
    }
}
