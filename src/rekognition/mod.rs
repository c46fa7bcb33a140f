pub mod api;
pub mod client;
mod convert;
pub mod error;
#[cfg(test)]
pub mod fake;
pub mod types;

pub use api::FaceApi;
pub use client::RekognitionClient;
pub use error::RemoteError;
