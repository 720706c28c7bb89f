//! Check a content file against the block schema

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::content::ContentBlock;
use crate::loader::content_column;

/// Outcome for one block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockStatus {
    Ok,
    /// Tag the renderer does not know; skipped outside preview
    Unknown,
    /// Known tag whose fields do not decode, or no tag at all
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockReport {
    /// Position such as `3` or `3.left.0`
    pub position: String,
    pub tag: String,
    pub status: BlockStatus,
}

impl fmt::Display for BlockReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = if self.tag.is_empty() { "<none>" } else { &self.tag };
        match &self.status {
            BlockStatus::Ok => write!(f, "[{}] {}: ok", self.position, tag),
            BlockStatus::Unknown => write!(f, "[{}] {}: unknown block type", self.position, tag),
            BlockStatus::Malformed(e) => write!(f, "[{}] {}: malformed: {}", self.position, tag, e),
        }
    }
}

/// Validate a JSON file holding a page row, a `{content}` object or a bare block list
pub fn run(path: &Path) -> Result<Vec<BlockReport>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    let value: Value =
        serde_json::from_str(&raw).with_context(|| format!("parsing {:?}", path))?;

    let reports = check_document(&value)?;
    for report in &reports {
        println!("{}", report);
    }

    let malformed = reports
        .iter()
        .filter(|r| matches!(r.status, BlockStatus::Malformed(_)))
        .count();
    if malformed > 0 {
        bail!("{} of {} blocks are malformed", malformed, reports.len());
    }
    Ok(reports)
}

/// Locate the block list in a document and check it
pub fn check_document(value: &Value) -> Result<Vec<BlockReport>> {
    let blocks = match value {
        Value::Array(_) => value.clone(),
        _ => content_column(value),
    };
    match blocks.as_array() {
        Some(items) => Ok(check_blocks(items, "")),
        None => {
            bail!("no block list found; expected an array or an object with an array `content`")
        }
    }
}

/// Check each block, descending into two-column sides
pub fn check_blocks(items: &[Value], prefix: &str) -> Vec<BlockReport> {
    let mut reports = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let position = format!("{}{}", prefix, i);
        let block = ContentBlock::from_value(item.clone());
        let (tag, status) = match &block {
            ContentBlock::Unknown(unknown) => {
                let status = match &unknown.error {
                    Some(e) => BlockStatus::Malformed(e.clone()),
                    None => BlockStatus::Unknown,
                };
                (unknown.tag.clone(), status)
            }
            known => (known.tag().to_string(), BlockStatus::Ok),
        };
        let nested = matches!(block, ContentBlock::TwoColumn(_));
        reports.push(BlockReport {
            position: position.clone(),
            tag,
            status,
        });

        if nested {
            for side in ["left", "right"] {
                if let Some(children) = item.get(side).and_then(Value::as_array) {
                    reports.extend(check_blocks(children, &format!("{}.{}.", position, side)));
                }
            }
        }
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_check_blocks() {
        let reports = check_document(&json!([
            {"type": "heading", "text": "Hi", "level": 2},
            {"type": "marquee"},
            {"type": "two-column", "left": [{"type": "paragraph", "content": "a"}], "right": [{"type": "carousel"}]},
            {"text": "no tag"}
        ]))
        .unwrap();

        let positions: Vec<_> = reports.iter().map(|r| r.position.as_str()).collect();
        assert_eq!(positions, vec!["0", "1", "2", "2.left.0", "2.right.0", "3"]);
        assert_eq!(reports[0].status, BlockStatus::Ok);
        assert_eq!(reports[1].status, BlockStatus::Unknown);
        assert_eq!(reports[4].status, BlockStatus::Unknown);
        assert!(matches!(reports[5].status, BlockStatus::Malformed(_)));
    }

    #[test]
    fn test_page_row_and_text_content() {
        let row = json!({"url_path": "/x/", "content": "[{\"type\": \"marquee\"}]"});
        let reports = check_document(&row).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].tag, "marquee");

        assert!(check_document(&json!({"content": {"hero": {}}})).is_err());
    }

    #[test]
    fn test_run_fails_on_malformed() {
        let tmp = TempDir::new().unwrap();
        let ok = tmp.path().join("ok.json");
        fs::write(&ok, r#"{"content": [{"type": "marquee"}]}"#).unwrap();
        assert_eq!(run(&ok).unwrap().len(), 1);

        let bad = tmp.path().join("bad.json");
        fs::write(&bad, r#"[{"type": "heading", "level": "two"}]"#).unwrap();
        let err = run(&bad).unwrap_err();
        assert!(err.to_string().contains("1 of 1 blocks are malformed"));
    }
}
