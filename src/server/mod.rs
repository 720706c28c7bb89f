//! HTTP server rendering pages on request

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::post,
    Form, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::generator::{PageOutput, RenderOptions};
use crate::render::ContactFormState;
use crate::Site;

/// Header carrying the cache-clear secret
pub const CACHE_TOKEN_HEADER: &str = "x-cache-token";

#[derive(Debug, Default, Deserialize)]
struct PageQuery {
    preview: Option<String>,
}

impl PageQuery {
    fn preview(&self) -> bool {
        matches!(self.preview.as_deref(), Some("" | "1" | "true"))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ClearQuery {
    path: Option<String>,
}

/// Build the application router
pub fn router(site: Arc<Site>) -> Router {
    let assets = ServeDir::new(&site.static_dir);

    Router::new()
        .route("/__contact", post(contact_handler))
        .route("/__cache/clear", post(clear_cache_handler))
        .nest_service("/assets", assets)
        .fallback(page_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(site)
}

/// Start the server
pub async fn start(site: Arc<Site>, ip: &str, port: u16) -> Result<()> {
    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    match site.store_name() {
        Some(name) => tracing::info!("Reading content from the {} store", name),
        None => tracing::info!("No content store, serving built-in defaults"),
    }
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(site)).await?;

    Ok(())
}

fn page_response(result: Result<PageOutput>) -> Response {
    match result {
        Ok(output) => {
            let status = if output.found {
                StatusCode::OK
            } else {
                StatusCode::NOT_FOUND
            };
            (status, Html(output.html)).into_response()
        }
        Err(e) => {
            tracing::error!("Render failed: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// Any other GET renders a page
async fn page_handler(
    State(site): State<Arc<Site>>,
    uri: Uri,
    query: Option<Query<PageQuery>>,
) -> Response {
    let preview = site.config.preview
        || query.map(|Query(q)| q.preview()).unwrap_or(false);
    let options = RenderOptions {
        preview,
        ..RenderOptions::default()
    };
    page_response(site.render_path(uri.path(), &options).await)
}

/// Contact form stub: shows the thank-you state, stores nothing
async fn contact_handler(
    State(site): State<Arc<Site>>,
    Form(mut form): Form<ContactFormState>,
) -> Response {
    form.submit();
    let options = RenderOptions {
        preview: site.config.preview,
        contact: Some(form),
    };
    page_response(site.render_path("/contact/", &options).await)
}

async fn clear_cache_handler(
    State(site): State<Arc<Site>>,
    headers: HeaderMap,
    Query(query): Query<ClearQuery>,
) -> Response {
    if let Some(expected) = &site.config.server.cache_token {
        let given = headers
            .get(CACHE_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());
        if given != Some(expected.as_str()) {
            tracing::warn!("Rejected cache clear without a valid token");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }

    let cleared = site.clear_cache(query.path.as_deref());
    tracing::info!(
        "Cleared {} cache entries ({})",
        cleared,
        query.path.as_deref().unwrap_or("all")
    );
    format!("cleared {}\n", cleared).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::loader::testing::CountingStore;
    use crate::store::ContentStore;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::json;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app(config: SiteConfig, tmp: &TempDir) -> (Router, Arc<CountingStore>) {
        let store = CountingStore::with_rows(vec![json!({
            "id": 1,
            "title": "Blog",
            "url_path": "/blog/",
            "status": "published",
            "content": [{"type": "marquee"}]
        })]);
        let site = Site::with_store(
            tmp.path(),
            config,
            Some(store.clone() as Arc<dyn ContentStore>),
        )
        .unwrap();
        (router(Arc::new(site)), store)
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_pages_and_404() {
        let tmp = TempDir::new().unwrap();
        let (app, _) = app(SiteConfig::default(), &tmp);

        let res = app
            .clone()
            .oneshot(Request::get("/about/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert!(body_text(res).await.contains("noindex"));
    }

    #[tokio::test]
    async fn test_preview_query() {
        let tmp = TempDir::new().unwrap();
        let (app, _) = app(SiteConfig::default(), &tmp);

        let res = app
            .clone()
            .oneshot(Request::get("/blog/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(!body_text(res).await.contains("Unknown block type"));

        let res = app
            .oneshot(Request::get("/blog/?preview=1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(body_text(res).await.contains("Unknown block type: marquee"));
    }

    #[tokio::test]
    async fn test_contact_post() {
        let tmp = TempDir::new().unwrap();
        let (app, _) = app(SiteConfig::default(), &tmp);

        let res = app
            .oneshot(
                Request::post("/__contact")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body(Body::from("name=Ana&email=ana%40example.com"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_text(res).await;
        assert!(body.contains("Thank you"));
        assert!(body.contains("Ana"));
    }

    #[tokio::test]
    async fn test_cache_clear_requires_token() {
        let tmp = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.server.cache_token = Some("s3cret".to_string());
        let (app, store) = app(config, &tmp);

        app.clone()
            .oneshot(Request::get("/blog/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let reads = store.calls();

        let res = app
            .clone()
            .oneshot(Request::post("/__cache/clear").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = app
            .clone()
            .oneshot(
                Request::post("/__cache/clear?path=/blog/")
                    .header(CACHE_TOKEN_HEADER, "s3cret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_text(res).await, "cleared 1\n");

        app.oneshot(Request::get("/blog/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(store.calls(), reads + 1);
    }
}
