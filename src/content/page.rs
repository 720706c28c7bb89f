//! CMS page records

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::block::{parse_blocks, ContentBlock};

/// Which layout shell a page is drawn with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    #[default]
    Standard,
    Practice,
    Landing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    #[default]
    Draft,
    Published,
}

impl PageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

/// Page shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Hero strip, breadcrumb, then the blocks
    Standard,
    /// Full width, the blocks supply every section
    Landing,
}

impl Layout {
    pub fn template_name(self) -> &'static str {
        match self {
            Self::Standard => "standard.html",
            Self::Landing => "landing.html",
        }
    }
}

/// A row of the pages table, consumed read-only
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    pub url_path: String,
    #[serde(default)]
    pub page_type: PageType,
    /// `None` when the stored content is not an array
    #[serde(default, deserialize_with = "deserialize_content")]
    pub content: Option<Vec<ContentBlock>>,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub og_image: Option<String>,
    #[serde(default)]
    pub noindex: bool,
    #[serde(default)]
    pub status: PageStatus,
}

impl Page {
    /// Layout shell for this page's type
    pub fn layout(&self) -> Layout {
        match self.page_type {
            PageType::Landing => Layout::Landing,
            PageType::Standard | PageType::Practice => Layout::Standard,
        }
    }

    /// Blocks to render, `None` when there is nothing renderable
    pub fn blocks(&self) -> Option<&[ContentBlock]> {
        match &self.content {
            Some(blocks) if !blocks.is_empty() => Some(blocks),
            _ => None,
        }
    }
}

/// Accepts both uuid strings and serial ids
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, found {}",
            other
        ))),
    }
}

/// Any JSON is accepted; only arrays become blocks
fn deserialize_content<'de, D>(deserializer: D) -> Result<Option<Vec<ContentBlock>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let blocks = parse_blocks(&value);
    if blocks.is_none() && !value.is_null() {
        tracing::warn!("Page content is not an array, treating as empty");
    }
    Ok(blocks)
}
