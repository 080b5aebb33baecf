use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type RecordId = String;

/// Producer-defined field bag; the schema may differ per record.
pub type Fields = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(default)]
    pub fields: Fields,
    #[serde(rename = "createdTime", default)]
    pub created_time: String,
}

impl Record {
    pub fn new(id: impl Into<RecordId>, fields: Fields, created_time: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields,
            created_time: created_time.into(),
        }
    }
}

/// One page of records as returned by the remote table API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordList {
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("record not found: {id}")]
    NotFound { id: RecordId },
    /// Generic failure; the transport cause is logged and dropped.
    #[error("{0}")]
    Failed(String),
}

impl FetchError {
    pub fn all_records() -> Self {
        Self::Failed("failed to fetch records".to_string())
    }

    pub fn one_record() -> Self {
        Self::Failed("failed to fetch record".to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
