//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Site;

/// Remove the static export
pub fn run(site: &Site) -> Result<()> {
    if site.public_dir.exists() {
        fs::remove_dir_all(&site.public_dir)?;
        tracing::info!("Deleted: {:?}", site.public_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_public_dir() {
        let tmp = TempDir::new().unwrap();
        let site = Site::with_store(tmp.path(), SiteConfig::default(), None).unwrap();

        fs::create_dir_all(site.public_dir.join("about")).unwrap();
        fs::write(site.public_dir.join("about/index.html"), "x").unwrap();

        run(&site).unwrap();
        assert!(!site.public_dir.exists());

        // Nothing to remove is fine
        run(&site).unwrap();
    }
}
