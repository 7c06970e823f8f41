//! Result types shared between the client and the HTTP API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single row returned by the upstream, keyed by column name
pub type Row = Map<String, Value>;

/// Column descriptor from the upstream's `meta` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
}

/// A dataset (Analytics Engine table) visible to the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    pub name: String,
}

/// Normalized outcome of a successful query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub data: Vec<Row>,
    pub meta: Vec<ColumnMeta>,
    #[serde(rename = "rowCount")]
    pub row_count: u64,
    #[serde(rename = "totalRows")]
    pub total_rows: u64,
}

/// Raw response body of the Analytics Engine SQL endpoint. Every field is
/// optional on the wire; normalization happens in [`Self::into_query_result`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SqlApiResponse {
    #[serde(default)]
    pub data: Vec<Row>,
    #[serde(default)]
    pub meta: Vec<ColumnMeta>,
    #[serde(default)]
    pub rows: Option<u64>,
    #[serde(default)]
    pub rows_before_limit_at_least: Option<u64>,
}

impl SqlApiResponse {
    /// Normalize into the uniform [`QueryResult`] shape: `row_count`
    /// defaults to 0 and `total_rows` falls back to `row_count` when the
    /// upstream omits its pre-limit estimate.
    pub fn into_query_result(self) -> QueryResult {
        let row_count = self.rows.unwrap_or(0);
        let total_rows = self.rows_before_limit_at_least.unwrap_or(row_count);
        QueryResult {
            data: self.data,
            meta: self.meta,
            row_count,
            total_rows,
        }
    }
}
