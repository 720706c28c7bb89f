//! Content loaders
//!
//! Named pages and site settings go through [`SectionLoader`], which merges
//! the stored override document over complete defaults. Arbitrary CMS paths
//! go through [`PageLoader`], which decodes rows verbatim. Both consult the
//! injected [`ContentCache`](crate::cache::ContentCache) before touching the
//! store and make at most one store read per key until invalidated.

mod mount;
mod page;
mod section;
#[cfg(test)]
pub(crate) mod testing;

use serde_json::Value;
use thiserror::Error;

use crate::store::StoreError;

pub use mount::Mounted;
pub use page::{PageLoader, PageLookup};
pub use section::SectionLoader;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("stored content has the wrong shape: {0}")]
    Shape(String),
}

/// What a view sees while content resolves
#[derive(Debug, Clone, PartialEq)]
pub struct LoadState<T> {
    pub content: T,
    pub is_loading: bool,
    pub error: Option<LoadError>,
}

impl<T> LoadState<T> {
    pub fn ready(content: T) -> Self {
        Self {
            content,
            is_loading: false,
            error: None,
        }
    }

    pub fn loading(content: T) -> Self {
        Self {
            content,
            is_loading: true,
            error: None,
        }
    }

    pub fn failed(content: T, error: LoadError) -> Self {
        Self {
            content,
            is_loading: false,
            error: Some(error),
        }
    }
}

/// The `content` column of a row, accepting JSON stored as text
pub(crate) fn content_column(row: &Value) -> Value {
    match row.get("content") {
        Some(Value::String(text)) => serde_json::from_str(text).unwrap_or(Value::Null),
        Some(value) => value.clone(),
        None => Value::Null,
    }
}
