//! Start the HTTP server

use anyhow::Result;
use std::sync::Arc;

use crate::server;
use crate::Site;

/// Serve pages live; CLI flags win over `server` in `_config.yml`
pub async fn run(site: Site, ip: Option<String>, port: Option<u16>) -> Result<()> {
    let ip = ip.unwrap_or_else(|| site.config.server.ip.clone());
    let port = port.unwrap_or(site.config.server.port);

    tracing::info!("Starting server at http://{}:{}", ip, port);
    server::start(Arc::new(site), &ip, port).await
}
