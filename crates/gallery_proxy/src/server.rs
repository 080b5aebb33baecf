//! Credential-holding relay in front of the record API and the media host.

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{HeaderName, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use engine_logging::{engine_info, engine_warn};
use gallery_engine::{AirtableClient, MediaHost, SignedUploader, UploadBody};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::{ProxyConfig, ProxyError};

pub const HEALTHZ_PATH: &str = "/healthz";
pub const RECORDS_PATH: &str = "/records";
pub const UPLOAD_PATH: &str = "/upload";
const UPLOAD_FIELD: &str = "file";
const ALLOWED_HEADERS: [&str; 4] = ["authorization", "x-client-info", "apikey", "content-type"];

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Clients built once at startup; `None` where the environment lacks credentials.
#[derive(Clone, Default)]
pub struct ProxyState {
    records: Option<Arc<AirtableClient>>,
    uploads: Option<Arc<SignedUploader>>,
}

impl ProxyState {
    pub fn new(records: Option<AirtableClient>, uploads: Option<SignedUploader>) -> Self {
        Self {
            records: records.map(Arc::new),
            uploads: uploads.map(Arc::new),
        }
    }

    pub fn from_config(config: &ProxyConfig) -> Self {
        let records = AirtableClient::new(&config.source)
            .map_err(|err| engine_warn!("Record proxy disabled: {}", err))
            .ok();
        let uploads = SignedUploader::new(&config.media_host)
            .map_err(|err| engine_warn!("Upload proxy disabled: {}", err))
            .ok();
        Self::new(records, uploads)
    }
}

#[derive(Debug, Serialize)]
struct HealthzResponse {
    status: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordsRequest {
    action: String,
    #[serde(default)]
    record_id: Option<String>,
}

pub fn build_router(state: ProxyState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route(HEALTHZ_PATH, get(healthz).fallback(method_not_allowed))
        .route(RECORDS_PATH, post(records).fallback(method_not_allowed))
        .route(UPLOAD_PATH, post(upload).fallback(method_not_allowed))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors_layer())
        .with_state(state)
}

/// Pre-flight is answered by the layer itself; every response carries
/// `Access-Control-Allow-Origin: *`.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(ALLOWED_HEADERS.map(HeaderName::from_static))
}

pub async fn serve(config: ProxyConfig) -> Result<(), ServeError> {
    let router = build_router(ProxyState::from_config(&config), config.max_upload_bytes);
    let listener = TcpListener::bind(config.addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: config.addr,
            source,
        })?;
    engine_info!("Proxy listening on {}", config.addr);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    engine_info!("Proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        engine_warn!("Could not listen for ctrl-c: {}", err);
        std::future::pending::<()>().await;
    }
    engine_info!("Shutdown requested");
}

async fn healthz() -> Json<HealthzResponse> {
    Json(HealthzResponse { status: "ok" })
}

async fn method_not_allowed() -> ProxyError {
    ProxyError::MethodNotAllowed
}

async fn records(
    State(state): State<ProxyState>,
    body: Result<Json<RecordsRequest>, JsonRejection>,
) -> Result<Json<Value>, ProxyError> {
    let client = state
        .records
        .as_deref()
        .ok_or(ProxyError::RecordsNotConfigured)?;
    let Json(request) = body.map_err(|err| ProxyError::BadRequest(err.body_text()))?;
    engine_info!(
        "Record proxy request: action={} recordId={:?}",
        request.action,
        request.record_id
    );

    let result = match (request.action.as_str(), request.record_id.as_deref()) {
        ("getAllRecords", _) => client.list_records().await,
        ("getRecord", Some(id)) if !id.is_empty() => client.get_record(id).await,
        ("getRecord", _) => {
            return Err(ProxyError::BadRequest("recordId is required".to_string()));
        }
        (other, _) => {
            return Err(ProxyError::BadRequest(format!("unknown action: {other}")));
        }
    };
    result.map(Json).map_err(ProxyError::from_record_source)
}

async fn upload(
    State(state): State<ProxyState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ProxyError> {
    let uploader = state
        .uploads
        .as_deref()
        .ok_or(ProxyError::UploadsNotConfigured)?;
    let mut multipart = multipart.map_err(|err| ProxyError::BadRequest(err.body_text()))?;

    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ProxyError::BadRequest(err.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let mime_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|err| ProxyError::BadRequest(err.body_text()))?;
        file = Some(UploadBody::Bytes {
            file_name,
            mime_type,
            data,
        });
        break;
    }
    let body = file.ok_or(ProxyError::MissingFile)?;
    if let UploadBody::Bytes { file_name, data, .. } = &body {
        engine_info!("Upload proxy: {} ({} bytes)", file_name, data.len());
    }

    uploader
        .upload(body)
        .await
        .map(Json)
        .map_err(ProxyError::from_media_host)
}
