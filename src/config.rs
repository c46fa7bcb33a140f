use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub recognition: RecognitionConfig,

    #[serde(default)]
    pub aws: AwsConfig,

    #[serde(default)]
    pub liveness: LivenessConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionConfig {
    /// Minimum accepted confidence/similarity as a ratio (0.0-1.0).
    #[serde(default = "default_trust_threshold")]
    pub trust_threshold: f32,

    /// Rekognition collection holding enrolled faces.
    #[serde(default = "default_collection_id")]
    pub aws_collection_id: String,
}

fn default_trust_threshold() -> f32 {
    0.8
}

fn default_collection_id() -> String {
    "facegate".to_string()
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            trust_threshold: default_trust_threshold(),
            aws_collection_id: default_collection_id(),
        }
    }
}

/// Connection settings for Rekognition.
///
/// Anything left unset is resolved by the AWS SDK's default chains:
/// environment, shared config/credentials files, SSO, web identity,
/// container and instance-role credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    /// Tried before AWS_REGION and the profile's region.
    #[serde(default)]
    pub region: Option<String>,

    /// Named profile from the shared config/credentials files
    #[serde(default)]
    pub profile: Option<String>,

    /// Extra shared credentials file, read after ~/.aws/credentials
    #[serde(default)]
    pub credentials_file: Option<PathBuf>,

    /// Override of the service endpoint (e.g. a local emulator)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Static keys. When both are set they replace the default chain.
    #[serde(default)]
    pub access_key_id: Option<String>,

    #[serde(default)]
    pub secret_access_key: Option<String>,

    #[serde(default)]
    pub session_token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: None,
            profile: None,
            credentials_file: None,
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessConfig {
    /// Number of audit images returned with session results (0-4).
    #[serde(default = "default_audit_images_limit")]
    pub audit_images_limit: u32,

    /// S3 bucket receiving reference and audit images.
    #[serde(default)]
    pub output_bucket: Option<String>,

    #[serde(default)]
    pub output_key_prefix: Option<String>,
}

fn default_audit_images_limit() -> u32 {
    3
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            audit_images_limit: default_audit_images_limit(),
            output_bucket: None,
            output_key_prefix: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            // Create default config
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("facegate")
    }

    /// `$FACEGATE_CONFIG` if set, else the per-user config directory.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("FACEGATE_CONFIG") {
            return PathBuf::from(path);
        }

        Self::config_dir().join("config.toml")
    }
}
