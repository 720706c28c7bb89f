//! In-memory store for loader and renderer tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::store::{ContentStore, RowQuery, StoreError};

/// Serves fixed rows and counts every read
#[derive(Debug, Default)]
pub(crate) struct CountingStore {
    rows: Vec<Value>,
    failure: Option<StoreError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn with_rows(rows: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            rows,
            ..Self::default()
        })
    }

    pub fn failing(error: StoreError) -> Arc<Self> {
        Arc::new(Self {
            failure: Some(error),
            ..Self::default()
        })
    }

    pub fn slow(rows: Vec<Value>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            rows,
            delay: Some(delay),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentStore for CountingStore {
    async fn fetch_rows(&self, query: &RowQuery) -> Result<Vec<Value>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(self
            .rows
            .iter()
            .filter(|row| query.matches(row))
            .take(limit)
            .cloned()
            .collect())
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}
