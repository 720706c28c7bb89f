//! Named-page and site-settings loader

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{content_column, LoadError, LoadState, Mounted};
use crate::cache::ContentCache;
use crate::config::StoreConfig;
use crate::content::{merge_over, PageStatus, SectionContent, SectionSource};
use crate::store::{ContentStore, RowQuery};

/// Loads one section document, merged over its defaults
pub struct SectionLoader<T: SectionContent> {
    store: Option<Arc<dyn ContentStore>>,
    cache: Arc<ContentCache<&'static str, T>>,
    query: RowQuery,
    /// Serialises misses so one read serves every waiter
    fetch_lock: Mutex<()>,
}

impl<T: SectionContent> SectionLoader<T> {
    pub fn new(
        store: Option<Arc<dyn ContentStore>>,
        cache: Arc<ContentCache<&'static str, T>>,
        config: &StoreConfig,
    ) -> Self {
        Self {
            store,
            cache,
            query: Self::query_for(config),
            fetch_lock: Mutex::new(()),
        }
    }

    /// The single-row read for this section
    pub fn query_for(config: &StoreConfig) -> RowQuery {
        match T::SOURCE {
            SectionSource::Page(page) => RowQuery::table(&config.pages_table)
                .select(["id", "content"])
                .eq("url_path", page.url_path())
                .eq("status", PageStatus::Published.as_str())
                .limit(1),
            SectionSource::Settings => RowQuery::table(&config.settings_table)
                .select(["content"])
                .eq("key", &config.settings_key)
                .limit(1),
        }
    }

    fn slot(&self) -> &'static str {
        T::SOURCE.slot()
    }

    pub fn cache(&self) -> &Arc<ContentCache<&'static str, T>> {
        &self.cache
    }

    /// Current state without waiting on the store
    pub fn peek(&self) -> LoadState<T> {
        match self.cache.get(&self.slot()) {
            Some(content) => LoadState::ready(content),
            None if self.store.is_some() => LoadState::loading(T::default()),
            None => LoadState::ready(T::default()),
        }
    }

    /// Resolve the section, reading the store at most once per cache miss
    pub async fn load(&self) -> LoadState<T> {
        let slot = self.slot();
        if let Some(content) = self.cache.get(&slot) {
            debug!("Cache hit for section {}", slot);
            return LoadState::ready(content);
        }
        self.fetch().await
    }

    /// Read the store after a miss, one reader at a time
    async fn fetch(&self) -> LoadState<T> {
        let slot = self.slot();
        let Some(store) = &self.store else {
            return LoadState::ready(T::default());
        };

        let _guard = self.fetch_lock.lock().await;
        // Another waiter may have filled the slot while we queued
        if let Some(entry) = self.cache.entry(&slot) {
            return LoadState::ready(entry.value);
        }

        debug!("Fetching section {} from {} store", slot, store.name());
        let rows = match store.fetch_rows(&self.query).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Failed to load section {}, using defaults: {}", slot, e);
                return LoadState::failed(T::default(), e.into());
            }
        };

        let Some(row) = rows.first() else {
            debug!("No stored content for section {}", slot);
            let content = T::default();
            self.cache.set(slot, content.clone());
            return LoadState::ready(content);
        };

        match merge_over(&T::default(), &content_column(row)) {
            Ok(content) => {
                self.cache.set(slot, content.clone());
                LoadState::ready(content)
            }
            Err(e) => {
                warn!("Stored content for section {} ignored: {}", slot, e);
                LoadState::failed(T::default(), LoadError::Shape(e.to_string()))
            }
        }
    }

    /// Drop the cached document so the next load reads the store again
    pub fn invalidate(&self) -> bool {
        self.cache.invalidate(&self.slot())
    }

    /// Start loading for a view and hand back its state handle
    pub fn mount(self: &Arc<Self>) -> Mounted<T> {
        let loader = Arc::clone(self);
        Mounted::spawn(self.peek(), async move { loader.fetch().await })
    }
}
