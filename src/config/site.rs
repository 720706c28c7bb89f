//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable holding the content store base URL
pub const ENV_STORE_URL: &str = "SUPABASE_URL";
/// Environment variable holding the anonymous content store key
pub const ENV_STORE_KEY: &str = "SUPABASE_ANON_KEY";
/// Environment variable overriding the public site URL
pub const ENV_SITE_URL: &str = "SITE_URL";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,

    // URL (used for canonical links)
    pub url: String,

    // Directory
    pub public_dir: String,
    pub static_dir: String,
    pub i18n_dir: String,
    /// Local JSON rows used when no REST store is configured
    pub content_dir: Option<String>,

    /// Render diagnostics for unknown blocks by default
    pub preview: bool,

    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generate: GenerateConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Harbor Legal Clinic".to_string(),
            description: String::new(),
            language: "en".to_string(),

            url: "http://localhost:4000".to_string(),

            public_dir: "public".to_string(),
            static_dir: "static".to_string(),
            i18n_dir: "languages".to_string(),
            content_dir: None,

            preview: false,

            store: StoreConfig::default(),
            server: ServerConfig::default(),
            generate: GenerateConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_STORE_URL) {
            self.store.url = Some(url);
        }
        if let Some(key) = non_empty(ENV_STORE_KEY) {
            self.store.anon_key = Some(key);
        }
        if let Some(site_url) = non_empty(ENV_SITE_URL) {
            self.url = site_url;
        }
    }
}

/// Content store connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub pages_table: String,
    pub settings_table: String,
    /// Value of the `key` column identifying the site settings row
    pub settings_key: String,
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            pages_table: "pages".to_string(),
            settings_table: "site_settings".to_string(),
            settings_key: "global".to_string(),
            timeout_secs: 10,
        }
    }
}

impl StoreConfig {
    /// Both credentials are present
    pub fn is_configured(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.url) && present(&self.anon_key)
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
    /// Shared secret required by the cache-clear endpoint, if set
    pub cache_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
            cache_token: None,
        }
    }
}

/// Static export settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// CMS paths exported in addition to the named pages
    pub paths: Vec<String>,
}
