//! HTTP relay holding the record API token and the media host secret.
mod config;
mod error;
pub mod server;

pub use config::{ConfigError, ProxyConfig, DEFAULT_ADDR, DEFAULT_MAX_UPLOAD_BYTES};
pub use error::ProxyError;
pub use server::{build_router, serve, ProxyState, ServeError};
