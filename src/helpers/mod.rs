//! Helper functions shared by the renderers
//!
//! Escaping, link and image tags, head metadata and URL handling.

mod html;
mod url;

pub use html::*;
pub use url::*;
