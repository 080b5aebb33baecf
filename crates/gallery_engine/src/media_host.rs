use std::path::PathBuf;

use bytes::Bytes;
use engine_logging::{engine_info, engine_warn};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tokio_util::io::ReaderStream;

use crate::remote::{build_client, join_segments, map_reqwest_error, parse_url, read_json};
use crate::signing::{SignatureAlgorithm, UploadSignature};
use crate::{MediaHostSettings, RemoteError};

/// File content for one upload.
#[derive(Debug, Clone)]
pub enum UploadBody {
    /// Streamed from disk.
    File {
        path: PathBuf,
        file_name: String,
        mime_type: Option<String>,
    },
    /// Already in memory (the proxy receives it as multipart).
    Bytes {
        file_name: String,
        mime_type: Option<String>,
        data: Bytes,
    },
}

impl UploadBody {
    pub fn file_name(&self) -> &str {
        match self {
            UploadBody::File { file_name, .. } | UploadBody::Bytes { file_name, .. } => file_name,
        }
    }

    async fn into_part(self) -> Result<Part, RemoteError> {
        let (part, file_name, mime_type) = match self {
            UploadBody::File {
                path,
                file_name,
                mime_type,
            } => {
                let file = tokio::fs::File::open(&path)
                    .await
                    .map_err(|err| RemoteError::Io(format!("{}: {err}", path.display())))?;
                let len = file
                    .metadata()
                    .await
                    .map_err(|err| RemoteError::Io(err.to_string()))?
                    .len();
                let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
                (Part::stream_with_length(body, len), file_name, mime_type)
            }
            UploadBody::Bytes {
                file_name,
                mime_type,
                data,
            } => {
                let len = data.len() as u64;
                (
                    Part::stream_with_length(reqwest::Body::from(data), len),
                    file_name,
                    mime_type,
                )
            }
        };
        let part = part.file_name(file_name);
        match mime_type {
            Some(mime) => part
                .mime_str(&mime)
                .map_err(|err| RemoteError::InvalidRequest(format!("bad mime type {mime}: {err}"))),
            None => Ok(part),
        }
    }
}

/// Stores an uploaded video and answers with the host's JSON reference.
#[async_trait::async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload(&self, body: UploadBody) -> Result<Value, RemoteError>;
}

/// Picks the signing proxy when configured, else direct signed uploads.
pub fn media_host_from_settings(
    settings: &MediaHostSettings,
) -> Result<Box<dyn MediaHost>, RemoteError> {
    if let Some(proxy_url) = settings.signing_proxy_url.as_deref() {
        return Ok(Box::new(SigningProxyUploader::new(
            proxy_url,
            settings.request_timeout,
        )?));
    }
    Ok(Box::new(SignedUploader::new(settings)?))
}

/// Uploads straight to the media host, signing with the server-held secret.
#[derive(Debug, Clone)]
pub struct SignedUploader {
    client: reqwest::Client,
    upload_url: url::Url,
    api_key: String,
    api_secret: String,
    folder: String,
    algorithm: SignatureAlgorithm,
}

impl SignedUploader {
    pub fn new(settings: &MediaHostSettings) -> Result<Self, RemoteError> {
        let (Some(cloud_name), Some(api_key), Some(api_secret)) = (
            settings.cloud_name.as_deref(),
            settings.api_key.as_deref(),
            settings.api_secret.as_deref(),
        ) else {
            return Err(RemoteError::NotConfigured("media host credentials".into()));
        };
        let api_url = parse_url(&settings.api_url)?;
        Ok(Self {
            client: build_client(settings.request_timeout)?,
            upload_url: join_segments(&api_url, &[cloud_name, "video", "upload"])?,
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
            folder: settings.folder.clone(),
            algorithm: settings.signature_algorithm,
        })
    }
}

#[async_trait::async_trait]
impl MediaHost for SignedUploader {
    async fn upload(&self, body: UploadBody) -> Result<Value, RemoteError> {
        let file_name = body.file_name().to_string();
        let signed = UploadSignature::now(&self.folder, &self.api_secret, self.algorithm);
        let mut form = Form::new()
            .part("file", body.into_part().await?)
            .text("api_key", self.api_key.clone())
            .text("timestamp", signed.timestamp.to_string())
            .text("signature", signed.signature)
            .text("folder", signed.folder);
        if self.algorithm == SignatureAlgorithm::Sha256 {
            form = form.text("signature_algorithm", "sha256");
        }

        engine_info!("Uploading {} to media host", file_name);
        let response = self
            .client
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let result = read_json::<Value>(response).await;
        match &result {
            Ok(value) => engine_info!(
                "Media host stored {}",
                value.get("public_id").and_then(Value::as_str).unwrap_or("?")
            ),
            Err(err) => engine_warn!("Media host upload of {} failed: {}", file_name, err),
        }
        result
    }
}

/// Sends the bare file to the same-origin signing proxy.
#[derive(Debug, Clone)]
pub struct SigningProxyUploader {
    client: reqwest::Client,
    proxy_url: url::Url,
}

impl SigningProxyUploader {
    pub fn new(
        proxy_url: &str,
        timeout: Option<std::time::Duration>,
    ) -> Result<Self, RemoteError> {
        Ok(Self {
            client: build_client(timeout)?,
            proxy_url: parse_url(proxy_url)?,
        })
    }
}

#[async_trait::async_trait]
impl MediaHost for SigningProxyUploader {
    async fn upload(&self, body: UploadBody) -> Result<Value, RemoteError> {
        let form = Form::new().part("file", body.into_part().await?);
        let response = self
            .client
            .post(self.proxy_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }
}
