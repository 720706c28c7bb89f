//! Render one path to stdout

use anyhow::Result;

use crate::generator::RenderOptions;
use crate::Site;

/// Render `path` and return the document; missing pages yield the 404 page
pub async fn run(site: &Site, path: &str, preview: bool) -> Result<String> {
    let options = RenderOptions {
        preview: preview || site.config.preview,
        ..RenderOptions::default()
    };
    let output = site.render_path(path, &options).await?;
    if !output.found {
        tracing::warn!("No page at {}, rendered the not-found page", path);
    }
    Ok(output.html)
}
