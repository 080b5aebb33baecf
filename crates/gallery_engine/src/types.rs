use std::path::PathBuf;
use std::time::Duration;

use gallery_core::{FetchError, JobAck, MediaAsset, Record};
use serde_json::Value;

use crate::RemoteError;

/// Results flowing back from the engine thread.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    RecordsFetched(Result<Vec<Record>, FetchError>),
    RecordFetched(Result<Record, FetchError>),
    DurationProbed {
        path: PathBuf,
        result: Result<Duration, String>,
    },
    UploadProgress {
        submission: u64,
        percent: u8,
    },
    Uploaded {
        submission: u64,
        result: Result<MediaAsset, UploadError>,
    },
    Acknowledged {
        submission: u64,
        result: Result<JobAck, BackendError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("media host not configured: {0}")]
    NotConfigured(String),
    #[error("upload failed ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("upload failed: {0}")]
    Transport(String),
    #[error("unexpected media host response: {0}")]
    InvalidResponse(String),
}

impl From<RemoteError> for UploadError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Status { status, body } => UploadError::Rejected {
                status,
                message: error_message(&body),
            },
            RemoteError::Decode(message) => UploadError::InvalidResponse(message),
            RemoteError::NotConfigured(what) => UploadError::NotConfigured(what),
            other => UploadError::Transport(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("processing backend not configured")]
    NotConfigured,
    #[error("processing backend rejected the job ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("processing backend unreachable: {0}")]
    Transport(String),
    #[error("unexpected processing backend response: {0}")]
    InvalidResponse(String),
}

impl From<RemoteError> for BackendError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Status { status, body } => BackendError::Rejected {
                status,
                message: error_message(&body),
            },
            RemoteError::Decode(message) => BackendError::InvalidResponse(message),
            RemoteError::NotConfigured(_) => BackendError::NotConfigured,
            other => BackendError::Transport(other.to_string()),
        }
    }
}

/// Best human-readable message in an error body: the host's
/// `{error: {message}}`, the proxy's `{error, details}`, or the raw text.
pub(crate) fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };
    let error = value.get("error");
    let nested = error
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str);
    let flat = error.and_then(Value::as_str);
    let details = value.get("details").and_then(|details| match details {
        Value::String(text) => Some(text.clone()),
        Value::Object(_) => details
            .get("error")
            .and_then(|inner| inner.get("message"))
            .and_then(Value::as_str)
            .map(String::from),
        _ => None,
    });
    match (nested, flat, details) {
        (Some(message), _, _) => message.to_string(),
        (None, Some(error), Some(details)) => format!("{error}: {details}"),
        (None, Some(error), None) => error.to_string(),
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_error_message_is_unwrapped() {
        let body = r#"{"error":{"message":"Invalid Signature"}}"#;
        assert_eq!(error_message(body), "Invalid Signature");
    }

    #[test]
    fn proxy_error_keeps_details() {
        let body = r#"{"error":"Upload failed","details":{"error":{"message":"File size too large"}}}"#;
        assert_eq!(error_message(body), "Upload failed: File size too large");
    }

    #[test]
    fn plain_text_body_is_kept() {
        assert_eq!(error_message(" bad gateway \n"), "bad gateway");
    }

    #[test]
    fn status_maps_to_rejection() {
        let err = UploadError::from(RemoteError::Status {
            status: 401,
            body: r#"{"error":{"message":"Invalid api_key"}}"#.into(),
        });
        assert_eq!(err.to_string(), "upload failed (401): Invalid api_key");
    }
}
