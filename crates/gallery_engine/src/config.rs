use std::env;
use std::time::Duration;

use crate::signing::SignatureAlgorithm;

const BASE_ID_PLACEHOLDER: &str = "<BASE_ID_OF_THE_AIRTABLE_TABLE>";
const TOKEN_PLACEHOLDER: &str = "your_api_token_here";

/// Where records come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Remote,
    Proxied,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSettings {
    pub api_url: String,
    pub base_id: Option<String>,
    pub api_token: Option<String>,
    pub table_name: String,
    /// Record proxy endpoint; used when no direct credentials are configured.
    pub proxy_url: Option<String>,
    pub fallback_delay_all: Duration,
    pub fallback_delay_one: Duration,
    pub request_timeout: Option<Duration>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.airtable.com/v0".to_string(),
            base_id: None,
            api_token: None,
            table_name: "Imported Table".to_string(),
            proxy_url: None,
            fallback_delay_all: Duration::from_millis(1000),
            fallback_delay_one: Duration::from_millis(800),
            request_timeout: None,
        }
    }
}

impl SourceSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: env_var("AIRTABLE_API_URL").unwrap_or(defaults.api_url),
            base_id: env_var("AIRTABLE_BASE_ID"),
            api_token: env_var("AIRTABLE_API_TOKEN"),
            table_name: env_var("AIRTABLE_TABLE_NAME").unwrap_or(defaults.table_name),
            proxy_url: env_var("RECORD_PROXY_URL"),
            ..defaults
        }
    }

    /// Direct credentials, unless missing or left at the setup placeholders.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let base_id = self.base_id.as_deref()?;
        let token = self.api_token.as_deref()?;
        if base_id == BASE_ID_PLACEHOLDER || token == TOKEN_PLACEHOLDER {
            return None;
        }
        Some((base_id, token))
    }

    pub fn active_source(&self) -> SourceKind {
        if self.credentials().is_some() {
            SourceKind::Remote
        } else if self.proxy_url.is_some() {
            SourceKind::Proxied
        } else {
            SourceKind::Fallback
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHostSettings {
    pub api_url: String,
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub folder: String,
    pub signature_algorithm: SignatureAlgorithm,
    /// Same-origin signing proxy; preferred over direct credentials on clients.
    pub signing_proxy_url: Option<String>,
    pub request_timeout: Option<Duration>,
}

impl Default for MediaHostSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.cloudinary.com/v1_1".to_string(),
            cloud_name: None,
            api_key: None,
            api_secret: None,
            folder: "pipeline/uploads".to_string(),
            signature_algorithm: SignatureAlgorithm::Sha1,
            signing_proxy_url: None,
            request_timeout: None,
        }
    }
}

impl MediaHostSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let signature_algorithm = match env_var("CLOUDINARY_SIGNATURE_ALGORITHM").as_deref() {
            Some("sha256") => SignatureAlgorithm::Sha256,
            _ => SignatureAlgorithm::Sha1,
        };
        Self {
            api_url: env_var("CLOUDINARY_API_URL").unwrap_or(defaults.api_url),
            cloud_name: env_var("CLOUDINARY_CLOUD_NAME"),
            api_key: env_var("CLOUDINARY_API_KEY"),
            api_secret: env_var("CLOUDINARY_API_SECRET"),
            folder: env_var("CLOUDINARY_FOLDER").unwrap_or(defaults.folder),
            signature_algorithm,
            signing_proxy_url: env_var("UPLOAD_PROXY_URL"),
            ..defaults
        }
    }
}

/// Estimated progress while the media host has not answered yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSettings {
    pub interval: Duration,
    pub step: u8,
    pub cap: u8,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            step: 10,
            cap: gallery_core::MAX_PROGRESS_BEFORE_CONFIRMATION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadSettings {
    pub media_host: MediaHostSettings,
    pub backend_url: Option<String>,
    pub backend_timeout: Option<Duration>,
    pub progress: ProgressSettings,
}

impl UploadSettings {
    pub fn from_env() -> Self {
        Self {
            media_host: MediaHostSettings::from_env(),
            backend_url: env_var("PROCESSING_BACKEND_URL"),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineConfig {
    pub source: SourceSettings,
    pub upload: UploadSettings,
}

impl EngineConfig {
    /// Reads every setting from the environment. Missing values never fail;
    /// the record source falls back to the demo set instead.
    pub fn from_env() -> Self {
        Self {
            source: SourceSettings::from_env(),
            upload: UploadSettings::from_env(),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
