use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::ImageFormat;
use std::path::Path;

use crate::errors::FaceError;

/// Largest image Rekognition accepts as raw bytes.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Image content handed to the services. Read-only, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    name: String,
    bytes: Vec<u8>,
}

impl ImageFile {
    pub fn open(path: &Path) -> Result<Self, FaceError> {
        let bytes = std::fs::read(path).map_err(|source| FaceError::ImageRead {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::from_bytes(name, bytes)
    }

    /// Only JPEG and PNG are accepted.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, FaceError> {
        let name = name.into();
        let invalid = |message: String| FaceError::InvalidImage {
            name: name.clone(),
            message,
        };

        if bytes.is_empty() {
            return Err(invalid("image is empty".to_string()));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(invalid(format!(
                "image is {} bytes, limit is {}",
                bytes.len(),
                MAX_IMAGE_BYTES
            )));
        }
        match image::guess_format(&bytes) {
            Ok(ImageFormat::Jpeg) | Ok(ImageFormat::Png) => {}
            Ok(other) => return Err(invalid(format!("unsupported format {:?}", other))),
            Err(_) => return Err(invalid("unrecognised image format".to_string())),
        }

        Ok(Self { name, bytes })
    }

    /// Accepts plain base64 or a `data:image/...;base64,` URL.
    pub fn from_base64(name: impl Into<String>, data: &str) -> Result<Self, FaceError> {
        let name = name.into();
        let data = data.trim();
        let encoded = match data.strip_prefix("data:") {
            Some(url) => url.split_once(',').map(|(_, payload)| payload).unwrap_or(""),
            None => data,
        };

        let bytes = BASE64.decode(encoded).map_err(|e| FaceError::InvalidImage {
            name: name.clone(),
            message: format!("invalid base64: {}", e),
        })?;

        Self::from_bytes(name, bytes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// File name restricted to the characters allowed in `ExternalImageId`.
    pub fn external_image_id(&self) -> String {
        let id: String = self
            .name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | ':') {
                    c
                } else {
                    '_'
                }
            })
            .take(255)
            .collect();

        if id.is_empty() {
            "image".to_string()
        } else {
            id
        }
    }
}
