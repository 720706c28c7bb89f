//! Generate static files

use anyhow::Result;

use crate::generator::{GenerateReport, Generator};
use crate::Site;

/// Render every exported page into the public directory
pub async fn run(site: &Site) -> Result<GenerateReport> {
    let start = std::time::Instant::now();

    let report = Generator::new(site).generate().await?;

    tracing::info!(
        "Wrote {} pages and {} assets to {:?}",
        report.pages.len(),
        report.assets,
        site.public_dir
    );
    if !report.skipped.is_empty() {
        tracing::warn!(
            "Skipped {} missing pages: {}",
            report.skipped.len(),
            report.skipped.join(", ")
        );
    }

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(report)
}
