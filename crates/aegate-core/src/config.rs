//! Gateway configuration
//!
//! The configuration is built once at process start (environment variables,
//! optionally a `.env` file loaded by the server binary) and injected into
//! [`crate::client::AnalyticsClient`]. Handlers never read the environment
//! themselves.

use crate::error::{AegateError, AegateResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Default Cloudflare API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Connection settings for the Analytics Engine SQL endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Cloudflare account identifier
    pub account_id: Option<String>,
    /// API token used as a bearer credential
    pub api_token: Option<String>,
    /// API base URL (overridable for tests and staging)
    pub base_url: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            api_token: None,
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl AnalyticsConfig {
    /// Create an empty configuration with the default base URL
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from `CF_ACCOUNT_ID`, `CF_API_TOKEN` and the
    /// optional `CF_API_BASE_URL` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Ok(account_id) = env::var("CF_ACCOUNT_ID") {
            if !account_id.is_empty() {
                config.account_id = Some(account_id);
            }
        }
        if let Ok(api_token) = env::var("CF_API_TOKEN") {
            if !api_token.is_empty() {
                config.api_token = Some(api_token);
            }
        }
        if let Ok(base_url) = env::var("CF_API_BASE_URL") {
            if !base_url.is_empty() {
                config.base_url = base_url;
            }
        }
        config
    }

    /// Set the account identifier
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Set the API token
    pub fn with_api_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = Some(api_token.into());
        self
    }

    /// Set the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Check whether both the account id and the API token are present
    pub fn is_configured(&self) -> bool {
        self.account_id.as_deref().is_some_and(|s| !s.is_empty())
            && self.api_token.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// The SQL endpoint URL for the configured account, or a
    /// [`AegateError::Config`] when the account id or token is missing
    pub fn sql_endpoint(&self) -> AegateResult<String> {
        if !self.is_configured() {
            return Err(AegateError::config(
                "CF_ACCOUNT_ID and CF_API_TOKEN must be configured",
            ));
        }
        let account_id = self.account_id.as_deref().unwrap_or_default();
        Ok(format!(
            "{}/accounts/{}/analytics_engine/sql",
            self.base_url.trim_end_matches('/'),
            account_id
        ))
    }

    /// Display-safe version of the API token for logs
    pub fn masked_token(&self) -> String {
        match self.api_token.as_deref() {
            Some(token) => {
                // Count chars, not bytes: tokens are not guaranteed ASCII
                let len = token.chars().count();
                if len > 8 {
                    let head: String = token.chars().take(4).collect();
                    let tail: String = token.chars().skip(len - 4).collect();
                    format!("{head}...{tail}")
                } else {
                    "****".to_string()
                }
            }
            None => "<unset>".to_string(),
        }
    }
}
