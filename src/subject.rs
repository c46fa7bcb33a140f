use serde::{Deserialize, Serialize};
use std::fmt;

/// The person faces are enrolled against. Becomes the Rekognition `UserId`.
pub trait Subject {
    fn unique_id(&self) -> &str;
}

impl Subject for &str {
    fn unique_id(&self) -> &str {
        self
    }
}

impl Subject for String {
    fn unique_id(&self) -> &str {
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(pub String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl Subject for SubjectId {
    fn unique_id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
