use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use gallery_core::{JobAck, MediaAsset};
use serde::Serialize;

use crate::remote::{build_client, map_reqwest_error, parse_url, read_json};
use crate::{BackendError, RemoteError};

/// Body announcing a stored video to the processing backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingRequest<'a> {
    pub video_url: &'a str,
    pub public_id: &'a str,
    pub asset_id: Option<&'a str>,
    pub duration: Option<f64>,
    pub file_size: Option<u64>,
    pub format: Option<&'a str>,
}

impl<'a> From<&'a MediaAsset> for ProcessingRequest<'a> {
    fn from(asset: &'a MediaAsset) -> Self {
        Self {
            video_url: &asset.secure_url,
            public_id: &asset.public_id,
            asset_id: asset.asset_id.as_deref(),
            duration: asset.duration,
            file_size: asset.bytes,
            format: asset.format.as_deref(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProcessingBackend {
    client: reqwest::Client,
    url: url::Url,
}

impl ProcessingBackend {
    pub fn new(url: &str, timeout: Option<Duration>) -> Result<Self, RemoteError> {
        Ok(Self {
            client: build_client(timeout)?,
            url: parse_url(url)?,
        })
    }

    pub async fn notify(&self, asset: &MediaAsset) -> Result<JobAck, BackendError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&ProcessingRequest::from(asset))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        match read_json::<JobAck>(response).await {
            Ok(ack) => {
                engine_info!("Processing job {} accepted for {}", ack.job_id, asset.public_id);
                Ok(ack)
            }
            Err(err) => {
                engine_warn!("Processing backend refused {}: {}", asset.public_id, err);
                Err(err.into())
            }
        }
    }
}
