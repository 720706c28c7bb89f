//! Trusted HTML fragments authored in the CMS

use serde::{Deserialize, Serialize};
use std::fmt;

/// An HTML fragment supplied by the content store.
///
/// The CMS is the trusted producer of this markup: the renderer emits it
/// verbatim and does not sanitize it again. Every other string field of a
/// block is plain text and is escaped on output. Anything that is not
/// authored by the CMS must go through [`RichText::from_plain`] instead of
/// [`RichText::trusted`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText(String);

impl RichText {
    /// Wrap markup that comes from the trusted content store
    pub fn trusted(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    /// Build rich text from untrusted plain text by escaping it
    pub fn from_plain(text: &str) -> Self {
        Self(crate::helpers::html_escape(text))
    }

    /// The raw markup
    pub fn as_html(&self) -> &str {
        &self.0
    }

    /// Text content with tags removed
    pub fn plain_text(&self) -> String {
        crate::helpers::strip_html(&self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RichText {
    fn from(html: &str) -> Self {
        Self::trusted(html)
    }
}
