//! Local directory of JSON rows
//!
//! A table is either `<dir>/<table>.json` holding an array of rows, or a
//! `<dir>/<table>/` directory where each `.json` file is one row (or an array
//! of rows). Used for offline rendering and fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use walkdir::WalkDir;

use super::{ContentStore, RowQuery, StoreError};

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load every row of a table, in file name order
    fn load_table(root: &Path, table: &str) -> Result<Vec<Value>, StoreError> {
        let single = root.join(format!("{}.json", table));
        let dir = root.join(table);

        let mut files = Vec::new();
        if single.is_file() {
            files.push(single);
        }
        if dir.is_dir() {
            let mut entries: Vec<PathBuf> = WalkDir::new(&dir)
                .max_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
                .map(|e| e.into_path())
                .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
                .collect();
            entries.sort();
            files.extend(entries);
        }

        let mut rows = Vec::new();
        for path in files {
            let text = fs::read_to_string(&path)
                .map_err(|e| StoreError::Io(format!("{}: {}", path.display(), e)))?;
            let value: Value = serde_json::from_str(&text)
                .map_err(|e| StoreError::Decode(format!("{}: {}", path.display(), e)))?;
            match value {
                Value::Array(items) => rows.extend(items),
                row => rows.push(row),
            }
        }

        Ok(rows)
    }
}

#[async_trait]
impl ContentStore for FileStore {
    async fn fetch_rows(&self, query: &RowQuery) -> Result<Vec<Value>, StoreError> {
        let root = self.root.clone();
        let table = query.table.clone();
        let rows = tokio::task::spawn_blocking(move || Self::load_table(&root, &table))
            .await
            .map_err(|e| StoreError::Io(e.to_string()))??;

        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(rows
            .into_iter()
            .filter(|row| query.matches(row))
            .take(limit)
            .map(|row| query.project(row))
            .collect())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, value: Value) {
        fs::write(dir.join(name), serde_json::to_string(&value).unwrap()).unwrap();
    }

    #[tokio::test]
    async fn test_directory_table() {
        let tmp = TempDir::new().unwrap();
        let pages = tmp.path().join("pages");
        fs::create_dir(&pages).unwrap();
        write(&pages, "a.json", json!({"id": 1, "url_path": "/a/", "status": "published"}));
        write(&pages, "b.json", json!({"id": 2, "url_path": "/b/", "status": "draft"}));
        fs::write(pages.join("notes.txt"), "ignored").unwrap();

        let store = FileStore::new(tmp.path());
        let all = store.fetch_rows(&RowQuery::table("pages")).await.unwrap();
        assert_eq!(all.len(), 2);

        let query = RowQuery::table("pages")
            .eq("status", "published")
            .select(["id"]);
        let rows = store.fetch_rows(&query).await.unwrap();
        assert_eq!(rows, vec![json!({"id": 1})]);
    }

    #[tokio::test]
    async fn test_single_file_table_with_limit() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "site_settings.json",
            json!([{"key": "global", "content": {}}, {"key": "global", "content": {}}]),
        );

        let store = FileStore::new(tmp.path());
        let rows = store
            .fetch_rows(&RowQuery::table("site_settings").eq("key", "global").limit(1))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_table_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());
        let rows = store.fetch_rows(&RowQuery::table("pages")).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("pages.json"), "{ nope").unwrap();
        let store = FileStore::new(tmp.path());
        let err = store.fetch_rows(&RowQuery::table("pages")).await.unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }
}
