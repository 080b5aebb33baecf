use std::fs;
use std::path::Path;

use anyhow::Context;
use engine_logging::engine_info;
use gallery_core::UploadPolicy;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILENAME: &str = "gallery.ron";

/// Optional settings file; every field falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub upload: UploadPolicy,
}

/// Reads `explicit` (which must exist) or `gallery.ron` in `dir` (which may
/// be absent).
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<AppConfig> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (dir.join(DEFAULT_CONFIG_FILENAME), false),
    };
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("reading {}", path.display()));
        }
    };
    let config: AppConfig =
        ron::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    engine_info!("Loaded settings from {:?}", path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_default_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_config(None, dir.path()).unwrap(), AppConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("elsewhere.ron");
        assert!(load_config(Some(&path), dir.path()).is_err());
    }

    #[test]
    fn partial_file_overlays_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILENAME),
            "(upload: (max_duration_secs: 30, allowed_extensions: [\"mp4\"]))",
        )
        .unwrap();

        let config = load_config(None, dir.path()).unwrap();
        assert_eq!(config.upload.max_duration_secs, 30);
        assert_eq!(config.upload.allowed_extensions, vec!["mp4".to_string()]);
        assert_eq!(config.upload.max_bytes, UploadPolicy::default().max_bytes);
    }
}
