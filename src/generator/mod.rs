//! Generator module - assembles page views and renders them through the shells
//!
//! A request path resolves to one of the named pages, a CMS page, or the
//! branded 404. The generator also writes the static export.

use anyhow::Result;
use chrono::Datelike;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tera::Context;
use walkdir::WalkDir;

use crate::content::{ContentBlock, Layout, NamedPage, NamedPageContent, Page, SiteSettings};
use crate::helpers::{full_url_for, meta_tags, normalize_path, SeoMeta};
use crate::loader::{PageLookup, SectionLoader};
use crate::render::{breadcrumbs, BlockRenderer, ContactFormState, Crumb, RenderedSection};
use crate::templates::NOT_FOUND_TEMPLATE;
use crate::Site;

/// Per-request rendering switches
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Show diagnostics for blocks that cannot be drawn
    pub preview: bool,
    /// Contact form state to draw in place of an empty form
    pub contact: Option<ContactFormState>,
}

/// A rendered document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOutput {
    pub found: bool,
    pub html: String,
}

/// Site-wide values shown in the header and footer
#[derive(Debug, Clone, Serialize)]
struct SiteView {
    language: String,
    url: String,
    firm_name: String,
    phone: String,
    email: String,
    address: String,
    /// Trusted markup
    tagline: String,
    hours: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct NavItem {
    label: String,
    href: &'static str,
    active: bool,
}

#[derive(Debug, Clone, Serialize)]
struct PageInfo {
    title: String,
    url_path: String,
    layout: Layout,
    preview: bool,
    /// False when the stored content is empty or not a block list
    has_content: bool,
}

/// Everything a shell template reads
#[derive(Debug, Clone, Serialize)]
struct PageView {
    site: SiteView,
    seo: SeoMeta,
    head_tags: String,
    page: PageInfo,
    nav: Vec<NavItem>,
    crumbs: Vec<Crumb>,
    sections: Vec<RenderedSection>,
    year: i32,
    t: HashMap<String, String>,
}

/// What a static export wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub pages: Vec<String>,
    pub skipped: Vec<String>,
    pub assets: usize,
}

/// Page assembly over a site
pub struct Generator<'a> {
    site: &'a Site,
}

impl<'a> Generator<'a> {
    pub fn new(site: &'a Site) -> Self {
        Self { site }
    }

    /// Render any request path
    pub async fn render_path(&self, path: &str, options: &RenderOptions) -> Result<PageOutput> {
        let path = normalize_path(path);
        let loaders = &self.site.loaders;

        match NamedPage::from_path(&path) {
            Some(NamedPage::Home) => self.render_named(&loaders.home, options).await,
            Some(NamedPage::About) => self.render_named(&loaders.about, options).await,
            Some(NamedPage::Contact) => self.render_named(&loaders.contact, options).await,
            Some(NamedPage::PracticeAreas) => {
                self.render_named(&loaders.practice_areas, options).await
            }
            None => self.render_cms(&path, options).await,
        }
    }

    async fn settings(&self) -> SiteSettings {
        self.site.loaders.settings.mount().settled().await.content
    }

    async fn render_named<T: NamedPageContent>(
        &self,
        loader: &Arc<SectionLoader<T>>,
        options: &RenderOptions,
    ) -> Result<PageOutput> {
        let content = loader.mount().settled().await.content;
        let settings = self.settings().await;
        let page = T::PAGE;
        let meta = content.meta();

        let seo = SeoMeta {
            title: meta.title.clone(),
            description: Some(meta.description.clone()),
            canonical: Some(full_url_for(&self.site.config.url, page.url_path())),
            og_image: meta.og_image.clone(),
            noindex: options.preview,
        };

        let html = self.render_shell(
            &settings,
            seo,
            PageInfo {
                title: content.title().to_string(),
                url_path: page.url_path().to_string(),
                layout: page.layout(),
                preview: options.preview,
                has_content: true,
            },
            self.sections(&content.to_blocks(), options),
        )?;

        Ok(PageOutput { found: true, html })
    }

    async fn render_cms(&self, path: &str, options: &RenderOptions) -> Result<PageOutput> {
        // Mounted so a dropped request still lets the read fill the cache
        let state = self.site.loaders.pages.mount(path).settled().await;
        let page = match state.content {
            PageLookup::Found(page) => page,
            PageLookup::NotFound => return self.render_not_found(options).await,
        };
        let settings = self.settings().await;

        let sections = match page.blocks() {
            Some(blocks) => self.sections(blocks, options),
            None => Vec::new(),
        };

        let html = self.render_shell(
            &settings,
            self.cms_seo(&page, path, options),
            PageInfo {
                title: page.title.clone(),
                url_path: path.to_string(),
                layout: page.layout(),
                preview: options.preview,
                has_content: page.blocks().is_some(),
            },
            sections,
        )?;

        Ok(PageOutput { found: true, html })
    }

    /// Page metadata passed through, with the canonical URL defaulted
    fn cms_seo(&self, page: &Page, path: &str, options: &RenderOptions) -> SeoMeta {
        SeoMeta {
            title: page
                .meta_title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| page.title.clone()),
            description: page.meta_description.clone(),
            canonical: Some(
                page.canonical_url
                    .clone()
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| full_url_for(&self.site.config.url, path)),
            ),
            og_image: page.og_image.clone(),
            noindex: page.noindex || options.preview,
        }
    }

    /// The branded 404, never indexed
    pub async fn render_not_found(&self, options: &RenderOptions) -> Result<PageOutput> {
        let settings = self.settings().await;
        let i18n = &self.site.i18n;
        let view = self.view(
            &settings,
            SeoMeta {
                title: format!("{} | {}", i18n.get("not_found.title"), settings.firm_name),
                noindex: true,
                ..SeoMeta::default()
            },
            PageInfo {
                title: i18n.get("not_found.title"),
                url_path: String::new(),
                layout: Layout::Standard,
                preview: options.preview,
                has_content: false,
            },
            Vec::new(),
        );
        let html = self
            .site
            .templates
            .render(NOT_FOUND_TEMPLATE, &Context::from_serialize(&view)?)?;
        Ok(PageOutput { found: false, html })
    }

    fn sections(
        &self,
        blocks: &[ContentBlock],
        options: &RenderOptions,
    ) -> Vec<RenderedSection> {
        let renderer = BlockRenderer::new(&self.site.i18n, options.preview);
        match &options.contact {
            Some(state) => renderer.with_contact_state(state).render(blocks),
            None => renderer.render(blocks),
        }
    }

    fn render_shell(
        &self,
        settings: &SiteSettings,
        seo: SeoMeta,
        page: PageInfo,
        sections: Vec<RenderedSection>,
    ) -> Result<String> {
        let template = page.layout.template_name();
        let view = self.view(settings, seo, page, sections);
        self.site
            .templates
            .render(template, &Context::from_serialize(&view)?)
    }

    fn view(
        &self,
        settings: &SiteSettings,
        seo: SeoMeta,
        page: PageInfo,
        sections: Vec<RenderedSection>,
    ) -> PageView {
        let i18n = &self.site.i18n;
        let crumbs = match page.layout {
            Layout::Standard if !page.url_path.is_empty() => {
                breadcrumbs(&page.url_path, &page.title, &i18n.get("breadcrumb.home"))
            }
            _ => Vec::new(),
        };
        let nav = [
            (NamedPage::Home, "nav.home"),
            (NamedPage::About, "nav.about"),
            (NamedPage::PracticeAreas, "nav.practice_areas"),
            (NamedPage::Contact, "nav.contact"),
        ]
        .into_iter()
        .map(|(named, key)| NavItem {
            label: i18n.get(key),
            href: named.url_path(),
            active: named.url_path() == page.url_path,
        })
        .collect();

        PageView {
            site: SiteView {
                language: i18n.language().to_string(),
                url: self.site.config.url.clone(),
                firm_name: settings.firm_name.clone(),
                phone: settings.phone.clone(),
                email: settings.email.clone(),
                address: settings.address.clone(),
                tagline: settings.tagline.as_html().to_string(),
                hours: settings.hours.clone(),
            },
            head_tags: meta_tags(&seo, &settings.firm_name),
            seo,
            page,
            nav,
            crumbs,
            sections,
            year: chrono::Utc::now().year(),
            t: i18n.get_all_translations(),
        }
    }

    /// Write every named page, the configured CMS paths and the 404 page
    pub async fn generate(&self) -> Result<GenerateReport> {
        let public_dir = &self.site.public_dir;
        fs::create_dir_all(public_dir)?;

        let mut report = GenerateReport::default();
        let options = RenderOptions::default();

        let mut paths: Vec<String> = NamedPage::ALL
            .iter()
            .map(|p| p.url_path().to_string())
            .collect();
        for extra in &self.site.config.generate.paths {
            let path = normalize_path(extra);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }

        for path in paths {
            let output = self.render_path(&path, &options).await?;
            if !output.found {
                tracing::warn!("No published page at {}, skipping", path);
                report.skipped.push(path);
                continue;
            }
            write_file(&output_path(public_dir, &path), &output.html)?;
            tracing::debug!("Generated {}", path);
            report.pages.push(path);
        }

        let not_found = self.render_not_found(&options).await?;
        write_file(&public_dir.join("404.html"), &not_found.html)?;

        report.assets = copy_assets(&self.site.static_dir, &public_dir.join("assets"))?;
        Ok(report)
    }
}

/// `/a/b/` -> `<public>/a/b/index.html`
fn output_path(public_dir: &Path, url_path: &str) -> PathBuf {
    let relative = url_path.trim_matches('/');
    if relative.is_empty() {
        public_dir.join("index.html")
    } else {
        public_dir.join(relative).join("index.html")
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

/// Copy static assets, returning how many files were copied
fn copy_assets(source_dir: &Path, dest_dir: &Path) -> Result<usize> {
    if !source_dir.exists() {
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(source_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let relative = path.strip_prefix(source_dir)?;
        let dest = dest_dir.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &dest)?;
        copied += 1;
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::loader::testing::CountingStore;
    use crate::store::{ContentStore, StoreError};
    use serde_json::{json, Value};
    use std::time::Duration;
    use tempfile::TempDir;

    fn site_with(rows: Vec<Value>, tmp: &TempDir) -> Site {
        let config = SiteConfig {
            url: "https://harbor.example".to_string(),
            ..SiteConfig::default()
        };
        let store = CountingStore::with_rows(rows);
        Site::with_store(tmp.path(), config, Some(store as Arc<dyn ContentStore>)).unwrap()
    }

    fn cms_row(path: &str, page_type: &str, content: Value) -> Value {
        json!({
            "id": 11,
            "title": "Car Accidents",
            "url_path": path,
            "page_type": page_type,
            "status": "published",
            "meta_title": "Car Accident Lawyer",
            "meta_description": "Injured in a crash?",
            "noindex": false,
            "content": content
        })
    }

    #[test]
    fn test_output_path() {
        let root = Path::new("/out");
        assert_eq!(output_path(root, "/"), PathBuf::from("/out/index.html"));
        assert_eq!(
            output_path(root, "/a/b/"),
            PathBuf::from("/out/a/b/index.html")
        );
    }

    #[tokio::test]
    async fn test_home_uses_landing_shell() {
        let tmp = TempDir::new().unwrap();
        let site = site_with(vec![], &tmp);
        let out = site.render_path("/", &RenderOptions::default()).await.unwrap();

        assert!(out.found);
        assert!(out.html.contains("layout-landing"));
        assert!(!out.html.contains(r#"class="breadcrumb""#));
        assert!(out.html.contains("block-hero"));
        assert!(out.html.contains(r#"<link rel="canonical" href="https://harbor.example/">"#));
    }

    #[tokio::test]
    async fn test_named_standard_page_has_breadcrumb() {
        let tmp = TempDir::new().unwrap();
        let site = site_with(vec![], &tmp);
        let out = site
            .render_path("/practice-areas", &RenderOptions::default())
            .await
            .unwrap();

        assert!(out.html.contains("layout-standard"));
        assert!(out.html.contains(r#"<nav class="breadcrumb""#));
        assert!(out.html.contains("block-practice-areas-grid"));
    }

    #[tokio::test]
    async fn test_cms_page_metadata_passthrough() {
        let tmp = TempDir::new().unwrap();
        let site = site_with(
            vec![cms_row(
                "/practice-areas/car-accidents/",
                "practice",
                json!([{"type": "heading", "level": 2, "text": "Hurt?"}]),
            )],
            &tmp,
        );
        let out = site
            .render_path("/practice-areas/car-accidents/", &RenderOptions::default())
            .await
            .unwrap();

        assert!(out.found);
        assert!(out.html.contains("<title>Car Accident Lawyer</title>"));
        assert!(out.html.contains(r#"content="Injured in a crash?""#));
        assert!(out.html.contains(
            r#"<link rel="canonical" href="https://harbor.example/practice-areas/car-accidents/">"#
        ));
        assert!(!out.html.contains("noindex"));
        // Practice pages use the standard shell
        assert!(out.html.contains(r#"<a href="/practice-areas/">Practice Areas</a>"#));
        assert!(out.html.contains("<h2>Hurt?</h2>"));
    }

    #[tokio::test]
    async fn test_malformed_content_shows_placeholder() {
        let tmp = TempDir::new().unwrap();
        let site = site_with(
            vec![cms_row("/odd/", "landing", json!({"blocks": "nope"}))],
            &tmp,
        );
        let out = site.render_path("/odd/", &RenderOptions::default()).await.unwrap();
        assert!(out.found);
        assert!(out.html.contains("Content not available"));
        assert!(out.html.contains("layout-landing"));
    }

    #[tokio::test]
    async fn test_preview_marks_unknown_blocks() {
        let tmp = TempDir::new().unwrap();
        let site = site_with(
            vec![cms_row(
                "/promo/",
                "standard",
                json!([{"type": "marquee", "text": "Sale"}, {"type": "bullets", "items": ["One"]}]),
            )],
            &tmp,
        );

        let normal = site.render_path("/promo/", &RenderOptions::default()).await.unwrap();
        assert!(!normal.html.contains("Unknown block type"));
        assert!(!normal.html.contains("Content not available"));

        let preview = RenderOptions {
            preview: true,
            ..RenderOptions::default()
        };
        let out = site.render_path("/promo/", &preview).await.unwrap();
        assert!(out.html.contains("Unknown block type: marquee"));
        assert!(out.html.contains("noindex"));
    }

    #[tokio::test]
    async fn test_missing_page_is_branded_404() {
        let tmp = TempDir::new().unwrap();
        let site = site_with(vec![], &tmp);
        let out = site.render_path("/nowhere/", &RenderOptions::default()).await.unwrap();
        assert!(!out.found);
        assert!(out.html.contains("Page not found"));
        assert!(out.html.contains(r#"<meta name="robots" content="noindex, nofollow">"#));
    }

    #[tokio::test]
    async fn test_store_failure_still_renders_defaults() {
        let tmp = TempDir::new().unwrap();
        let store = CountingStore::failing(StoreError::Transport("refused".to_string()));
        let site = Site::with_store(
            tmp.path(),
            SiteConfig::default(),
            Some(store as Arc<dyn ContentStore>),
        )
        .unwrap();

        let out = site.render_path("/about/", &RenderOptions::default()).await.unwrap();
        assert!(out.found);
        assert!(out.html.contains("Harbor Legal Clinic"));
    }

    #[tokio::test]
    async fn test_contact_state_renders_thanks() {
        let tmp = TempDir::new().unwrap();
        let site = site_with(vec![], &tmp);
        let mut form = ContactFormState::default();
        form.submit();
        let options = RenderOptions {
            contact: Some(form),
            ..RenderOptions::default()
        };
        let out = site.render_path("/contact/", &options).await.unwrap();
        assert!(out.html.contains("Thank you"));
    }

    #[tokio::test]
    async fn test_only_unknown_blocks_is_not_placeholder() {
        let tmp = TempDir::new().unwrap();
        let site = site_with(
            vec![cms_row("/promo/", "standard", json!([{"type": "marquee"}]))],
            &tmp,
        );
        let out = site.render_path("/promo/", &RenderOptions::default()).await.unwrap();
        assert!(out.found);
        assert!(!out.html.contains("Content not available"));
        assert!(!out.html.contains("Unknown block type"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_request_still_fills_cache() {
        let tmp = TempDir::new().unwrap();
        let store = CountingStore::slow(
            vec![cms_row("/blog/", "standard", json!([]))],
            Duration::from_millis(100),
        );
        let site = Arc::new(
            Site::with_store(
                tmp.path(),
                SiteConfig::default(),
                Some(store.clone() as Arc<dyn ContentStore>),
            )
            .unwrap(),
        );

        let request = {
            let site = Arc::clone(&site);
            tokio::spawn(async move {
                site.render_path("/blog/", &RenderOptions::default()).await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        request.abort();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(store.calls(), 1);
        assert_eq!(site.loaders.pages.cache().len(), 1);

        let out = site.render_path("/blog/", &RenderOptions::default()).await.unwrap();
        assert!(out.found);
        // Only the settings read; the page comes from the cache
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn test_generate_writes_pages() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("static/css")).unwrap();
        fs::write(tmp.path().join("static/css/site.css"), "body{}").unwrap();

        let mut config = SiteConfig::default();
        config.generate.paths = vec!["blog".to_string(), "missing".to_string()];
        let store = CountingStore::with_rows(vec![cms_row("/blog/", "standard", json!([]))]);
        let site =
            Site::with_store(tmp.path(), config, Some(store as Arc<dyn ContentStore>)).unwrap();

        let report = site.generate().await.unwrap();
        assert_eq!(report.pages.len(), 5);
        assert_eq!(report.skipped, vec!["/missing/".to_string()]);
        assert_eq!(report.assets, 1);

        let public = tmp.path().join("public");
        assert!(public.join("index.html").exists());
        assert!(public.join("practice-areas/index.html").exists());
        assert!(public.join("blog/index.html").exists());
        assert!(public.join("404.html").exists());
        assert!(public.join("assets/css/site.css").exists());
    }
}
