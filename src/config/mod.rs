//! Configuration module

mod site;

pub use site::GenerateConfig;
pub use site::ServerConfig;
pub use site::SiteConfig;
pub use site::StoreConfig;
pub use site::{ENV_SITE_URL, ENV_STORE_KEY, ENV_STORE_URL};
