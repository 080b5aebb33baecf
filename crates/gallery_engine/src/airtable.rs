use serde_json::Value;

use crate::remote::{build_client, join_segments, map_reqwest_error, parse_url, read_json};
use crate::{RemoteError, SourceSettings};

/// Thin bearer-authenticated client for one table of the record API.
///
/// Returns raw JSON so the proxy can relay it untouched.
#[derive(Debug, Clone)]
pub struct AirtableClient {
    client: reqwest::Client,
    table_url: url::Url,
    token: String,
}

impl AirtableClient {
    pub fn new(settings: &SourceSettings) -> Result<Self, RemoteError> {
        let (base_id, token) = settings
            .credentials()
            .ok_or_else(|| RemoteError::NotConfigured("record source credentials".into()))?;
        let api_url = parse_url(&settings.api_url)?;
        let table_url = join_segments(&api_url, &[base_id, settings.table_name.as_str()])?;
        Ok(Self {
            client: build_client(settings.request_timeout)?,
            table_url,
            token: token.to_string(),
        })
    }

    pub fn table_url(&self) -> &url::Url {
        &self.table_url
    }

    /// `GET {api}/{base}/{table}`; one page, no offset handling.
    pub async fn list_records(&self) -> Result<Value, RemoteError> {
        self.get(self.table_url.clone()).await
    }

    /// `GET {api}/{base}/{table}/{id}`.
    pub async fn get_record(&self, id: &str) -> Result<Value, RemoteError> {
        let url = join_segments(&self.table_url, &[id])?;
        self.get(url).await
    }

    async fn get(&self, url: url::Url) -> Result<Value, RemoteError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }
}
