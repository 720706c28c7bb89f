//! Generic CMS page loader keyed by URL path

use std::collections::HashMap;
use std::sync::{Arc, PoisonError};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{LoadError, LoadState, Mounted};
use crate::cache::ContentCache;
use crate::config::StoreConfig;
use crate::content::{Page, PageStatus};
use crate::helpers::normalize_path;
use crate::store::{ContentStore, RowQuery};

/// Result of looking up a CMS path
#[derive(Debug, Clone, PartialEq)]
pub enum PageLookup {
    Found(Arc<Page>),
    NotFound,
}

impl PageLookup {
    pub fn page(&self) -> Option<&Page> {
        match self {
            Self::Found(page) => Some(page),
            Self::NotFound => None,
        }
    }
}

/// Columns read for a CMS page
pub const PAGE_COLUMNS: [&str; 11] = [
    "id",
    "title",
    "url_path",
    "page_type",
    "content",
    "meta_title",
    "meta_description",
    "canonical_url",
    "og_image",
    "noindex",
    "status",
];

type FetchLocks = std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>;

/// A path's fetch lock, removed from the map once no one else holds it
struct LockSlot<'a> {
    locks: &'a FetchLocks,
    key: String,
    lock: Arc<Mutex<()>>,
}

impl Drop for LockSlot<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        let ours = locks
            .get(&self.key)
            .is_some_and(|lock| Arc::ptr_eq(lock, &self.lock));
        // Held only by the map and this slot
        if ours && Arc::strong_count(&self.lock) <= 2 {
            locks.remove(&self.key);
        }
    }
}

pub struct PageLoader {
    store: Option<Arc<dyn ContentStore>>,
    cache: Arc<ContentCache<String, Arc<Page>>>,
    table: String,
    /// One lock per path so concurrent misses for a path share a read
    fetch_locks: FetchLocks,
}

impl PageLoader {
    pub fn new(
        store: Option<Arc<dyn ContentStore>>,
        cache: Arc<ContentCache<String, Arc<Page>>>,
        config: &StoreConfig,
    ) -> Self {
        Self {
            store,
            cache,
            table: config.pages_table.clone(),
            fetch_locks: std::sync::Mutex::new(HashMap::new()),
        }
    }

    /// The published-row read for a normalized path
    pub fn query_for(&self, path: &str) -> RowQuery {
        RowQuery::table(&self.table)
            .select(PAGE_COLUMNS)
            .eq("url_path", path)
            .eq("status", PageStatus::Published.as_str())
            .limit(1)
    }

    pub fn cache(&self) -> &Arc<ContentCache<String, Arc<Page>>> {
        &self.cache
    }

    fn lock_for(&self, path: &str) -> LockSlot<'_> {
        let mut locks = self
            .fetch_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let lock = Arc::clone(locks.entry(path.to_string()).or_default());
        LockSlot {
            locks: &self.fetch_locks,
            key: path.to_string(),
            lock,
        }
    }

    /// Current state without waiting on the store
    pub fn peek(&self, path: &str) -> LoadState<PageLookup> {
        let key = normalize_path(path);
        match self.cache.get(&key) {
            Some(page) => LoadState::ready(PageLookup::Found(page)),
            None if self.store.is_some() => LoadState::loading(PageLookup::NotFound),
            None => LoadState::ready(PageLookup::NotFound),
        }
    }

    /// Resolve a path to a published page
    pub async fn load(&self, path: &str) -> LoadState<PageLookup> {
        let key = normalize_path(path);
        if let Some(page) = self.cache.get(&key) {
            debug!("Cache hit for page {}", key);
            return LoadState::ready(PageLookup::Found(page));
        }
        self.fetch(key).await
    }

    /// Read the store after a miss, one reader per path
    async fn fetch(&self, key: String) -> LoadState<PageLookup> {
        let Some(store) = &self.store else {
            return LoadState::ready(PageLookup::NotFound);
        };

        let slot = self.lock_for(&key);
        let _guard = slot.lock.lock().await;
        if let Some(entry) = self.cache.entry(&key) {
            return LoadState::ready(PageLookup::Found(entry.value));
        }

        debug!("Fetching page {} from {} store", key, store.name());
        let rows = match store.fetch_rows(&self.query_for(&key)).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Failed to load page {}: {}", key, e);
                return LoadState::failed(PageLookup::NotFound, e.into());
            }
        };

        let Some(row) = rows.into_iter().next() else {
            debug!("No published page at {}", key);
            return LoadState::ready(PageLookup::NotFound);
        };

        match serde_json::from_value::<Page>(row) {
            Ok(page) => {
                let page = Arc::new(page);
                self.cache.set(key, Arc::clone(&page));
                LoadState::ready(PageLookup::Found(page))
            }
            Err(e) => {
                warn!("Page row at {} could not be decoded: {}", key, e);
                LoadState::failed(PageLookup::NotFound, LoadError::Shape(e.to_string()))
            }
        }
    }

    /// Drop one cached path
    pub fn invalidate(&self, path: &str) -> bool {
        self.cache.invalidate(&normalize_path(path))
    }

    /// Drop every cached path
    pub fn clear(&self) -> usize {
        self.cache.clear()
    }

    /// Start loading a path for a view and hand back its state handle
    pub fn mount(self: &Arc<Self>, path: &str) -> Mounted<PageLookup> {
        let loader = Arc::clone(self);
        let key = normalize_path(path);
        Mounted::spawn(self.peek(&key), async move { loader.fetch(key).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentBlock, PageType};
    use crate::loader::testing::CountingStore;
    use crate::store::StoreError;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn loader(store: Arc<CountingStore>) -> PageLoader {
        PageLoader::new(
            Some(store as Arc<dyn ContentStore>),
            Arc::new(ContentCache::new()),
            &StoreConfig::default(),
        )
    }

    fn row(path: &str) -> Value {
        json!({
            "id": "9f1c",
            "title": "Car Accidents",
            "url_path": path,
            "page_type": "practice",
            "status": "published",
            "content": [
                {"type": "heading", "level": 2, "text": "Hurt in a crash?"},
                {"type": "marquee", "text": "Free consult"}
            ]
        })
    }

    #[tokio::test]
    async fn test_found_and_cached_per_path() {
        let store = CountingStore::with_rows(vec![row("/practice-areas/car-accidents/")]);
        let loader = loader(store.clone());

        let state = loader.load("practice-areas/car-accidents").await;
        let page = state.content.page().unwrap();
        assert_eq!(page.title, "Car Accidents");
        assert_eq!(page.page_type, PageType::Practice);
        let blocks = page.blocks().unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[1], ContentBlock::Unknown(_)));

        // Same key after normalisation
        loader.load("/practice-areas//car-accidents/").await;
        assert_eq!(store.calls(), 1);
        assert_eq!(loader.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let store = CountingStore::with_rows(vec![row("/other/")]);
        let loader = loader(store.clone());

        let state = loader.load("/missing/").await;
        assert_eq!(state, LoadState::ready(PageLookup::NotFound));
        loader.load("/missing/").await;
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_not_found_with_error() {
        let store = CountingStore::failing(StoreError::Timeout);
        let state = loader(store).load("/x/").await;
        assert_eq!(state.content, PageLookup::NotFound);
        assert_eq!(state.error, Some(LoadError::Store(StoreError::Timeout)));
    }

    #[tokio::test]
    async fn test_undecodable_row_is_shape_error() {
        let store = CountingStore::with_rows(vec![json!({
            "url_path": "/broken/",
            "status": "published"
        })]);
        let state = loader(store).load("/broken/").await;
        assert_eq!(state.content, PageLookup::NotFound);
        assert!(matches!(state.error, Some(LoadError::Shape(_))));
    }

    #[tokio::test]
    async fn test_malformed_content_is_found_without_blocks() {
        let mut bad = row("/bad/");
        bad["content"] = json!({"not": "an array"});
        let state = loader(CountingStore::with_rows(vec![bad])).load("/bad/").await;
        let page = state.content.page().unwrap();
        assert!(page.blocks().is_none());
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let store = CountingStore::with_rows(vec![row("/a/"), row("/b/")]);
        let loader = loader(store.clone());
        loader.load("/a/").await;
        loader.load("/b/").await;

        assert!(loader.invalidate("a"));
        loader.load("/a/").await;
        assert_eq!(store.calls(), 3);

        assert_eq!(loader.clear(), 2);
        loader.load("/b/").await;
        assert_eq!(store.calls(), 4);
    }

    #[tokio::test]
    async fn test_unconfigured_store_is_not_found() {
        let loader = PageLoader::new(None, Arc::new(ContentCache::new()), &StoreConfig::default());
        assert_eq!(loader.peek("/a/"), LoadState::ready(PageLookup::NotFound));
        assert_eq!(
            loader.load("/a/").await,
            LoadState::ready(PageLookup::NotFound)
        );
    }

    #[tokio::test]
    async fn test_fetch_locks_released() {
        let store = CountingStore::with_rows(vec![row("/a/")]);
        let loader = loader(store.clone());
        for i in 0..50 {
            loader.load(&format!("/scan-{}/", i)).await;
        }
        loader.load("/a/").await;
        assert_eq!(store.calls(), 51);
        assert!(loader.fetch_locks.lock().unwrap().is_empty());
        assert_eq!(loader.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_read() {
        let store = CountingStore::slow(vec![row("/a/")], Duration::from_millis(20));
        let loader = Arc::new(loader(store.clone()));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let loader = Arc::clone(&loader);
                tokio::spawn(async move { loader.load("/a/").await })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().content.page().is_some());
        }
        assert_eq!(store.calls(), 1);
        assert!(loader.fetch_locks.lock().unwrap().is_empty());
    }

    #[test]
    fn test_query_projects_page_columns() {
        let loader = PageLoader::new(None, Arc::new(ContentCache::new()), &StoreConfig::default());
        let query = loader.query_for("/a/");
        assert!(query
            .to_query_string()
            .starts_with("select=id,title,url_path,page_type,content,"));
    }

    #[tokio::test]
    async fn test_mount_settles() {
        let loader = Arc::new(loader(CountingStore::with_rows(vec![row("/a/")])));
        let mut view = loader.mount("/a/");
        assert!(view.current().is_loading);
        let state = view.settled().await;
        assert!(state.content.page().is_some());
    }
}
