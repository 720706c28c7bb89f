//! Content store access
//!
//! The loaders read rows through [`ContentStore`] so the hosted REST table,
//! a local directory of JSON rows and test doubles are interchangeable.

mod file;
mod rest;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

use crate::helpers::encode_query_value;

pub use file::FileStore;
pub use rest::RestStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("content store is not configured")]
    NotConfigured,
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("decode error: {0}")]
    Decode(String),
    #[error("io error: {0}")]
    Io(String),
}

/// A filtered read of one table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowQuery {
    pub table: String,
    /// Column equality filters, in request order
    pub filters: IndexMap<String, String>,
    /// Projected columns; empty selects everything
    pub select: Vec<String>,
    pub limit: Option<usize>,
}

impl RowQuery {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(column.into(), value.into());
        self
    }

    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render the query string understood by the REST endpoint
    ///
    /// # Examples
    /// ```ignore
    /// RowQuery::table("pages").eq("url_path", "/about/").limit(1).to_query_string()
    /// // -> "url_path=eq.%2Fabout%2F&limit=1"
    /// ```
    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::new();

        if !self.select.is_empty() {
            parts.push(format!("select={}", self.select.join(",")));
        }
        for (column, value) in &self.filters {
            parts.push(format!("{}=eq.{}", column, encode_query_value(value)));
        }
        if let Some(limit) = self.limit {
            parts.push(format!("limit={}", limit));
        }

        parts.join("&")
    }

    /// Whether a decoded row satisfies every equality filter
    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|(column, expected)| {
            match row.get(column) {
                Some(Value::String(s)) => s == expected,
                Some(Value::Null) | None => false,
                Some(other) => other.to_string() == *expected,
            }
        })
    }

    /// Keep only the selected columns of a row
    pub fn project(&self, row: Value) -> Value {
        if self.select.is_empty() {
            return row;
        }
        match row {
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .filter(|(key, _)| self.select.iter().any(|c| c == key))
                    .collect(),
            ),
            other => other,
        }
    }
}

/// Read access to the content tables
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch every row matching the query
    async fn fetch_rows(&self, query: &RowQuery) -> Result<Vec<Value>, StoreError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}
