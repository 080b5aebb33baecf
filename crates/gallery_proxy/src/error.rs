use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use engine_logging::engine_warn;
use gallery_engine::RemoteError;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("record source configuration missing")]
    RecordsNotConfigured,
    #[error("server configuration error: missing media host credentials")]
    UploadsNotConfigured,
    #[error("no video file provided")]
    MissingFile,
    #[error("{0}")]
    BadRequest(String),
    /// Third-party answered with a failure status; relayed with that status.
    #[error("{message}")]
    Upstream {
        status: StatusCode,
        message: String,
        details: Option<String>,
    },
    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::MissingFile | ProxyError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream { status, .. } => *status,
            ProxyError::RecordsNotConfigured
            | ProxyError::UploadsNotConfigured
            | ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn from_record_source(err: RemoteError) -> Self {
        match err {
            RemoteError::Status { status, body } => {
                engine_warn!("Record source error: {} - {}", status, body);
                ProxyError::Upstream {
                    status: relay_status(status),
                    message: format!("record source error: {status}"),
                    details: None,
                }
            }
            other => {
                engine_warn!("Record source request failed: {}", other);
                ProxyError::Internal(other.to_string())
            }
        }
    }

    pub(crate) fn from_media_host(err: RemoteError) -> Self {
        match err {
            RemoteError::Status { status, body } => {
                engine_warn!("Media host error: {} - {}", status, body);
                ProxyError::Upstream {
                    status: relay_status(status),
                    message: format!("upload failed: {status}"),
                    details: Some(body),
                }
            }
            other => {
                engine_warn!("Media host request failed: {}", other);
                ProxyError::Internal(other.to_string())
            }
        }
    }
}

fn relay_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.to_string();
        let details = match self {
            ProxyError::Upstream { details, .. } => details,
            _ => None,
        };
        (status, Json(ErrorBody { error, details })).into_response()
    }
}
