use aws_sdk_rekognition::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// Failure reaching or talking to the remote face API.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RemoteError {
    #[error("{operation} could not be sent: {message}")]
    Request { operation: String, message: String },

    #[error("{operation} request failed: {message}")]
    Transport { operation: String, message: String },

    #[error("{operation} rejected by Rekognition ({status} {code}): {message}")]
    Service {
        operation: String,
        status: u16,
        code: String,
        message: String,
    },

    #[error("failed to decode {operation} response: {message}")]
    Decode { operation: String, message: String },
}

impl RemoteError {
    /// Classify an SDK failure for `operation`.
    pub fn from_sdk<E>(operation: &str, err: SdkError<E>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
    {
        let operation = operation.to_string();
        match &err {
            SdkError::ServiceError(context) => {
                let service = context.err();
                RemoteError::Service {
                    operation,
                    status: context.raw().status().as_u16(),
                    code: service.code().unwrap_or("UnknownError").to_string(),
                    message: service.message().unwrap_or_default().to_string(),
                }
            }
            SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => RemoteError::Transport {
                operation,
                message: DisplayErrorContext(&err).to_string(),
            },
            SdkError::ResponseError(_) => RemoteError::Decode {
                operation,
                message: DisplayErrorContext(&err).to_string(),
            },
            _ => RemoteError::Request {
                operation,
                message: DisplayErrorContext(&err).to_string(),
            },
        }
    }

    /// Service error code such as `ResourceNotFoundException`.
    pub fn code(&self) -> Option<&str> {
        match self {
            RemoteError::Service { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self.code(), Some("ConflictException" | "ResourceAlreadyExistsException"))
    }
}
