//! Hosted REST table client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::{ContentStore, RowQuery, StoreError};
use crate::config::StoreConfig;

/// Reads rows from a PostgREST endpoint with the anonymous key
#[derive(Debug, Clone)]
pub struct RestStore {
    http: Client,
    base_url: String,
    anon_key: String,
}

impl RestStore {
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("counsel-site/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        })
    }

    /// Build a client from config, failing when credentials are absent
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        match (&config.url, &config.anon_key) {
            (Some(url), Some(key)) if config.is_configured() => {
                Self::new(url, key, Duration::from_secs(config.timeout_secs))
            }
            _ => Err(StoreError::NotConfigured),
        }
    }

    /// Full request URL for a query
    pub fn url_for(&self, query: &RowQuery) -> String {
        let qs = query.to_query_string();
        if qs.is_empty() {
            format!("{}/rest/v1/{}", self.base_url, query.table)
        } else {
            format!("{}/rest/v1/{}?{}", self.base_url, query.table, qs)
        }
    }
}

#[async_trait]
impl ContentStore for RestStore {
    async fn fetch_rows(&self, query: &RowQuery) -> Result<Vec<Value>, StoreError> {
        let url = self.url_for(query);
        debug!("GET {}", url);

        let res = self
            .http
            .get(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        match res.status() {
            s if s.is_success() => {
                let body: Value = res
                    .json()
                    .await
                    .map_err(|e| StoreError::Decode(e.to_string()))?;
                match body {
                    Value::Array(rows) => Ok(rows),
                    other => Err(StoreError::Decode(format!(
                        "expected an array of rows, got {}",
                        json_kind(&other)
                    ))),
                }
            }
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Err(StoreError::Timeout),
            s => {
                let status = s.as_u16();
                let body = res.text().await.unwrap_or_default();
                Err(StoreError::Http { status, body })
            }
        }
    }

    fn name(&self) -> &'static str {
        "rest"
    }
}

fn map_reqwest_error(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Timeout
    } else {
        StoreError::Transport(e.to_string())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
