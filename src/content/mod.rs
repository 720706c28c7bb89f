//! Content module - block schema, CMS pages and named-page documents

pub mod block;
pub mod merge;
mod page;
mod rich_text;
pub mod sections;

pub use block::{ContentBlock, UnknownBlock, BLOCK_TAGS};
pub use merge::{deep_merge, merge_over, MergeError};
pub use page::{Layout, Page, PageStatus, PageType};
pub use rich_text::RichText;
pub use sections::{
    AboutContent, ContactContent, HomeContent, NamedPage, NamedPageContent, PracticeAreasContent,
    SectionContent, SectionSource, SiteSettings,
};
