//! Types shared by several aggregates

use serde::{Deserialize, Serialize};

/// One tax line attached to an ore intake or a payout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxEntryDto {
    #[serde(rename = "type")]
    pub tax_type: String,
    /// Percent, e.g. `15.0`
    pub rate: f64,
}

/// Metadata of an attached file. The upload itself is handled by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetaDto {
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
}

/// Returned by every create endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRecord {
    pub id: String,
    #[serde(default)]
    pub reference: Option<String>,
}
