use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use gallery_core::{FetchError, Record, RecordList};
use serde::Serialize;

use crate::airtable::AirtableClient;
use crate::demo::demo_records;
use crate::remote::{build_client, map_reqwest_error, read_json};
use crate::{RemoteError, SourceKind, SourceSettings};

/// Where the list and detail views get their records from.
///
/// Every implementation makes a single attempt and collapses remote failures
/// into the generic [`FetchError`] message.
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Record>, FetchError>;

    async fn fetch_one(&self, id: &str) -> Result<Record, FetchError>;

    fn kind(&self) -> SourceKind;
}

/// Picks the source the settings allow: direct credentials, then the record
/// proxy, then the local fallback set.
pub fn source_from_settings(settings: &SourceSettings) -> Box<dyn RecordSource> {
    match settings.active_source() {
        SourceKind::Remote => match AirtableSource::new(settings) {
            Ok(source) => return Box::new(source),
            Err(err) => engine_warn!("Remote record source unusable, using fallback: {}", err),
        },
        SourceKind::Proxied => match ProxiedSource::new(settings) {
            Ok(source) => return Box::new(source),
            Err(err) => engine_warn!("Record proxy unusable, using fallback: {}", err),
        },
        SourceKind::Fallback => {
            engine_warn!(
                "Using demo data - set AIRTABLE_BASE_ID and AIRTABLE_API_TOKEN to use real records"
            );
        }
    }
    Box::new(FallbackSource::new(
        demo_records(),
        settings.fallback_delay_all,
        settings.fallback_delay_one,
    ))
}

/// Fixed in-memory records served after a simulated delay.
#[derive(Debug, Clone)]
pub struct FallbackSource {
    records: Vec<Record>,
    delay_all: Duration,
    delay_one: Duration,
}

impl FallbackSource {
    pub fn new(records: Vec<Record>, delay_all: Duration, delay_one: Duration) -> Self {
        Self {
            records,
            delay_all,
            delay_one,
        }
    }

    pub fn demo() -> Self {
        let settings = SourceSettings::default();
        Self::new(
            demo_records(),
            settings.fallback_delay_all,
            settings.fallback_delay_one,
        )
    }
}

#[async_trait::async_trait]
impl RecordSource for FallbackSource {
    async fn fetch_all(&self) -> Result<Vec<Record>, FetchError> {
        tokio::time::sleep(self.delay_all).await;
        engine_info!("Fallback data loaded: {} records", self.records.len());
        Ok(self.records.clone())
    }

    async fn fetch_one(&self, id: &str) -> Result<Record, FetchError> {
        tokio::time::sleep(self.delay_one).await;
        self.records
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or_else(|| {
                engine_info!("Record not found in fallback data: {}", id);
                FetchError::NotFound { id: id.to_string() }
            })
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Fallback
    }
}

/// Direct calls to the record API with the configured token.
#[derive(Debug, Clone)]
pub struct AirtableSource {
    client: AirtableClient,
}

impl AirtableSource {
    pub fn new(settings: &SourceSettings) -> Result<Self, RemoteError> {
        let client = AirtableClient::new(settings)?;
        engine_info!(
            "Record source: base={} token={} table={}",
            engine_logging::redact(settings.base_id.as_deref().unwrap_or_default()),
            engine_logging::redact(settings.api_token.as_deref().unwrap_or_default()),
            settings.table_name
        );
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl RecordSource for AirtableSource {
    async fn fetch_all(&self) -> Result<Vec<Record>, FetchError> {
        engine_debug!("GET {}", self.client.table_url());
        let value = self.client.list_records().await.map_err(|err| {
            log_remote_failure("records", &err);
            FetchError::all_records()
        })?;
        let list: RecordList = serde_json::from_value(value).map_err(|err| {
            engine_warn!("Record list had an unexpected shape: {}", err);
            FetchError::all_records()
        })?;
        engine_info!("Fetched {} records", list.records.len());
        Ok(list.records)
    }

    async fn fetch_one(&self, id: &str) -> Result<Record, FetchError> {
        let value = self.client.get_record(id).await.map_err(|err| {
            log_remote_failure(id, &err);
            FetchError::one_record()
        })?;
        serde_json::from_value(value).map_err(|err| {
            engine_warn!("Record {} had an unexpected shape: {}", id, err);
            FetchError::one_record()
        })
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Remote
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProxyRequest<'a> {
    action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    record_id: Option<&'a str>,
}

/// Records fetched through the record proxy, which holds the credentials.
#[derive(Debug, Clone)]
pub struct ProxiedSource {
    client: reqwest::Client,
    proxy_url: url::Url,
}

impl ProxiedSource {
    pub fn new(settings: &SourceSettings) -> Result<Self, RemoteError> {
        let raw = settings
            .proxy_url
            .as_deref()
            .ok_or_else(|| RemoteError::NotConfigured("record proxy url".into()))?;
        Ok(Self {
            client: build_client(settings.request_timeout)?,
            proxy_url: crate::remote::parse_url(raw)?,
        })
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        request: ProxyRequest<'_>,
    ) -> Result<T, RemoteError> {
        let response = self
            .client
            .post(self.proxy_url.clone())
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }
}

#[async_trait::async_trait]
impl RecordSource for ProxiedSource {
    async fn fetch_all(&self) -> Result<Vec<Record>, FetchError> {
        let list: RecordList = self
            .call(ProxyRequest {
                action: "getAllRecords",
                record_id: None,
            })
            .await
            .map_err(|err| {
                log_remote_failure("records", &err);
                FetchError::all_records()
            })?;
        Ok(list.records)
    }

    async fn fetch_one(&self, id: &str) -> Result<Record, FetchError> {
        self.call(ProxyRequest {
            action: "getRecord",
            record_id: Some(id),
        })
        .await
        .map_err(|err| {
            log_remote_failure(id, &err);
            FetchError::one_record()
        })
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Proxied
    }
}

fn log_remote_failure(what: &str, err: &RemoteError) {
    match err {
        RemoteError::Status { status, body } => {
            engine_warn!("Fetching {} failed with status {}: {}", what, status, body)
        }
        other => engine_warn!("Fetching {} failed: {}", what, other),
    }
}
