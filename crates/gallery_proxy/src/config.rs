use std::env;
use std::net::SocketAddr;

use gallery_engine::{MediaHostSettings, SourceSettings};

pub const DEFAULT_ADDR: &str = "127.0.0.1:8787";
/// 100 MiB of video plus room for the multipart envelope.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 101 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid listen address {value:?}: {source}")]
    InvalidAddr {
        value: String,
        source: std::net::AddrParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub addr: SocketAddr,
    pub source: SourceSettings,
    pub media_host: MediaHostSettings,
    pub max_upload_bytes: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8787)),
            source: SourceSettings::default(),
            media_host: MediaHostSettings::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ProxyConfig {
    /// Credentials come from the same variables the engine reads; only the
    /// listen address is proxy specific.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = env::var("GALLERY_PROXY_ADDR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = raw
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidAddr {
                value: raw.clone(),
                source,
            })?;
        Ok(Self {
            addr,
            source: SourceSettings::from_env(),
            media_host: MediaHostSettings::from_env(),
            ..Self::default()
        })
    }
}
