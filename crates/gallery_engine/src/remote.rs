use std::time::Duration;

use serde::de::DeserializeOwned;

/// Failure talking to a third-party HTTP API, with enough detail to relay it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("http status {status}")]
    Status { status: u16, body: String },
    #[error("timeout: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("not configured: {0}")]
    NotConfigured(String),
}

pub(crate) fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, RemoteError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|err| RemoteError::Network(err.to_string()))
}

pub(crate) fn parse_url(raw: &str) -> Result<url::Url, RemoteError> {
    url::Url::parse(raw).map_err(|err| RemoteError::InvalidUrl(format!("{raw}: {err}")))
}

/// Appends percent-encoded path segments to `base`.
pub(crate) fn join_segments(base: &url::Url, segments: &[&str]) -> Result<url::Url, RemoteError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| RemoteError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Fails on non-2xx (keeping the body for relaying), then decodes JSON.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, RemoteError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(RemoteError::Status {
            status: status.as_u16(),
            body,
        });
    }
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&bytes).map_err(|err| RemoteError::Decode(err.to_string()))
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        return RemoteError::Timeout(err.to_string());
    }
    if err.is_decode() {
        return RemoteError::Decode(err.to_string());
    }
    RemoteError::Network(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_are_percent_encoded() {
        let base = parse_url("https://api.airtable.com/v0/").unwrap();
        let url = join_segments(&base, &["appX", "Imported Table", "rec/1"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.airtable.com/v0/appX/Imported%20Table/rec%2F1"
        );
    }
}
