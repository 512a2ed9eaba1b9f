use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub archive: ArchiveConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_http_timeout_seconds")]
    pub http_timeout_seconds: u64,
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://nemweb.com.au/Data_Archive/Wholesale_Electricity/MMSDM".to_string()
}

fn default_http_timeout_seconds() -> u64 {
    30
}

fn default_cache_ttl_seconds() -> u64 {
    3600
}

fn default_user_agent() -> String {
    "nemde-constraints/0.1".to_string()
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            http_timeout_seconds: default_http_timeout_seconds(),
            cache_ttl_seconds: default_cache_ttl_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("NEMDE__").split("__"));
        figment.extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ArchiveConfig::default();
        assert!(cfg.base_url.starts_with("https://nemweb.com.au"));
        assert_eq!(cfg.http_timeout_seconds, 30);
        assert_eq!(cfg.cache_ttl_seconds, 3600);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let cfg = Config::load().expect("load");
        assert_eq!(cfg.archive.user_agent, "nemde-constraints/0.1");
    }
}
