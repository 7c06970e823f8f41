//! Analytics Engine SQL client
//!
//! Substitutes template parameters, POSTs the resulting SQL to the upstream
//! endpoint with a bearer token, and normalizes the response. Every call is
//! at-most-once against the upstream: no retries, no backoff, and only the
//! transport's default timeout.

use crate::config::AnalyticsConfig;
use crate::error::{AegateError, AegateResult};
use crate::template::{substitute, Params};
use crate::types::{ColumnMeta, Dataset, QueryResult, SqlApiResponse};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Raw upstream reply before any status interpretation
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    /// Whether the upstream accepted the query (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Seam between the client and the HTTP stack, so tests can run without a
/// network and assert how many calls were made
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SqlTransport: Send + Sync {
    /// POST raw SQL text to `url` with `token` as a bearer credential
    async fn post_sql(&self, url: &str, token: &str, sql: &str)
        -> AegateResult<TransportResponse>;
}

/// Production transport over a shared `reqwest::Client`
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SqlTransport for HttpTransport {
    async fn post_sql(
        &self,
        url: &str,
        token: &str,
        sql: &str,
    ) -> AegateResult<TransportResponse> {
        let response = self
            .http_client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(CONTENT_TYPE, "text/plain")
            .body(sql.to_string())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}

/// Client for the Analytics Engine SQL endpoint
#[derive(Clone)]
pub struct AnalyticsClient {
    config: AnalyticsConfig,
    transport: Arc<dyn SqlTransport>,
}

impl AnalyticsClient {
    /// Create a client backed by the production HTTP transport
    pub fn new(config: AnalyticsConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    /// Create a client with a custom transport (tests, stubs)
    pub fn with_transport(config: AnalyticsConfig, transport: Arc<dyn SqlTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Substitute `params` into `query` and execute it against the upstream.
    ///
    /// Fails with [`AegateError::Config`] before any transport call when the
    /// account id or token is missing. A non-2xx upstream reply becomes
    /// [`AegateError::Upstream`] carrying the raw error body and the fully
    /// substituted query; network and decode failures become
    /// [`AegateError::Transport`].
    #[instrument(skip(self, query, params), level = "debug")]
    pub async fn run_query(&self, query: &str, params: &Params) -> AegateResult<QueryResult> {
        let url = self.config.sql_endpoint()?;
        let token = self.config.api_token.as_deref().unwrap_or_default();

        let sql = substitute(query, params);
        debug!(sql_len = sql.len(), "executing analytics query");

        let response = self.transport.post_sql(&url, token, &sql).await?;
        if !response.is_success() {
            warn!(status = response.status, "upstream rejected query");
            return Err(AegateError::upstream_with_query(response.body, sql));
        }

        let parsed: SqlApiResponse = serde_json::from_str(&response.body)
            .map_err(|e| AegateError::transport(format!("invalid upstream response: {e}")))?;
        Ok(parsed.into_query_result())
    }

    /// List datasets visible to the account via `SHOW TABLES`.
    ///
    /// Each row maps to `{id, name}`, preferring a `name` column when the
    /// upstream provides one and falling back to the row's first value.
    #[instrument(skip(self), level = "debug")]
    pub async fn list_datasets(&self) -> AegateResult<Vec<Dataset>> {
        let result = self.run_query("SHOW TABLES", &Params::new()).await?;

        let datasets = result
            .data
            .iter()
            .filter_map(|row| {
                let name = row
                    .get("name")
                    .and_then(|v| v.as_str().map(str::to_string))
                    .or_else(|| row.values().next().map(value_as_text))?;
                Some(Dataset {
                    id: name.clone(),
                    name,
                })
            })
            .collect();
        Ok(datasets)
    }

    /// Fetch a dataset's columns by running `SELECT * FROM <id> LIMIT 1` and
    /// returning the response metadata; row contents are ignored.
    ///
    /// The identifier is interpolated directly, not treated as a template
    /// parameter. Callers must only pass ids drawn from [`Self::list_datasets`]
    /// or operator input, never free-form client text.
    #[instrument(skip(self), level = "debug")]
    pub async fn dataset_schema(&self, dataset_id: &str) -> AegateResult<Vec<ColumnMeta>> {
        let query = format!("SELECT * FROM {dataset_id} LIMIT 1");
        let result = self.run_query(&query, &Params::new()).await?;
        Ok(result.meta)
    }
}

fn value_as_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
