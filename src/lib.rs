//! counsel-site: a law firm brochure site rendered from CMS content blocks
//!
//! Page content lives as structured JSON in a hosted REST table. This crate
//! fetches it, merges it over built-in defaults, caches it, and renders it
//! through embedded Tera page shells, either live over HTTP or as a static
//! export.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod i18n;
pub mod loader;
pub mod render;
pub mod server;
pub mod store;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cache::ContentCache;
use content::{
    AboutContent, ContactContent, HomeContent, NamedPage, PracticeAreasContent, SiteSettings,
};
use helpers::normalize_path;
use loader::{PageLoader, SectionLoader};
use store::{ContentStore, FileStore, RestStore};

/// Name of the site configuration file in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// One loader per named page, the settings loader and the CMS loader
pub struct Loaders {
    pub home: Arc<SectionLoader<HomeContent>>,
    pub about: Arc<SectionLoader<AboutContent>>,
    pub contact: Arc<SectionLoader<ContactContent>>,
    pub practice_areas: Arc<SectionLoader<PracticeAreasContent>>,
    pub settings: Arc<SectionLoader<SiteSettings>>,
    pub pages: Arc<PageLoader>,
}

impl Loaders {
    pub fn new(store: Option<Arc<dyn ContentStore>>, config: &config::StoreConfig) -> Self {
        Self {
            home: Arc::new(SectionLoader::new(
                store.clone(),
                Arc::new(ContentCache::new()),
                config,
            )),
            about: Arc::new(SectionLoader::new(
                store.clone(),
                Arc::new(ContentCache::new()),
                config,
            )),
            contact: Arc::new(SectionLoader::new(
                store.clone(),
                Arc::new(ContentCache::new()),
                config,
            )),
            practice_areas: Arc::new(SectionLoader::new(
                store.clone(),
                Arc::new(ContentCache::new()),
                config,
            )),
            settings: Arc::new(SectionLoader::new(
                store.clone(),
                Arc::new(ContentCache::new()),
                config,
            )),
            pages: Arc::new(PageLoader::new(store, Arc::new(ContentCache::new()), config)),
        }
    }

    fn invalidate_named(&self, page: NamedPage) -> bool {
        match page {
            NamedPage::Home => self.home.invalidate(),
            NamedPage::About => self.about.invalidate(),
            NamedPage::Contact => self.contact.invalidate(),
            NamedPage::PracticeAreas => self.practice_areas.invalidate(),
        }
    }
}

/// The site application
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Static assets served under `/assets`
    pub static_dir: PathBuf,
    pub loaders: Loaders,
    pub i18n: i18n::I18n,
    pub templates: templates::TemplateRenderer,
    store_name: Option<&'static str>,
}

impl Site {
    /// Create a site from a directory, reading `_config.yml` and the environment
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        let store = select_store(&base_dir, &config)?;
        Self::with_store(base_dir, config, store)
    }

    /// Create a site over an explicit store
    pub fn with_store<P: AsRef<Path>>(
        base_dir: P,
        config: config::SiteConfig,
        store: Option<Arc<dyn ContentStore>>,
    ) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);

        let mut i18n = i18n::I18n::new(&config.language);
        i18n.load_languages(base_dir.join(&config.i18n_dir))?;

        let store_name = store.as_ref().map(|s| s.name());
        let loaders = Loaders::new(store, &config.store);
        let templates = templates::TemplateRenderer::new()?;

        Ok(Self {
            config,
            base_dir,
            public_dir,
            static_dir,
            loaders,
            i18n,
            templates,
            store_name,
        })
    }

    /// Which store backs the loaders, if any
    pub fn store_name(&self) -> Option<&'static str> {
        self.store_name
    }

    /// Render one path to a full HTML document
    pub async fn render_path(
        &self,
        path: &str,
        options: &generator::RenderOptions,
    ) -> Result<generator::PageOutput> {
        generator::Generator::new(self).render_path(path, options).await
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<generator::GenerateReport> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Drop cached content for one path, or for everything when `None`
    pub fn clear_cache(&self, path: Option<&str>) -> usize {
        tracing::debug!(
            "Page cache before clear: {}",
            self.loaders.pages.cache().stats().summary()
        );
        match path {
            Some(path) => {
                let key = normalize_path(path);
                let named = NamedPage::from_path(&key)
                    .map(|page| self.loaders.invalidate_named(page))
                    .unwrap_or(false);
                usize::from(named) + usize::from(self.loaders.pages.invalidate(&key))
            }
            None => {
                let named = NamedPage::ALL
                    .into_iter()
                    .filter(|page| self.loaders.invalidate_named(*page))
                    .count();
                named
                    + usize::from(self.loaders.settings.invalidate())
                    + self.loaders.pages.clear()
            }
        }
    }
}

/// REST when credentials are present, else the local content directory
fn select_store(
    base_dir: &Path,
    config: &config::SiteConfig,
) -> Result<Option<Arc<dyn ContentStore>>> {
    if config.store.is_configured() {
        let store = RestStore::from_config(&config.store)?;
        tracing::debug!("Using REST content store");
        return Ok(Some(Arc::new(store)));
    }

    if let Some(dir) = &config.content_dir {
        let dir = base_dir.join(dir);
        tracing::debug!("Using local content store at {:?}", dir);
        return Ok(Some(Arc::new(FileStore::new(dir))));
    }

    tracing::warn!("No content store configured, rendering built-in defaults");
    Ok(None)
}
