//! # Configuration Module
//!
//! File and environment configuration for applications (and the `tokenroute`
//! binary) that build their routing table from route files.
//!
//! ## File Format
//!
//! ```toml
//! controller_key = "controller"
//!
//! [[providers]]
//! path = "routes/site.ini"
//!
//! [[providers]]
//! path = "routes/api.conf"
//! format = "json"
//!
//! [log]
//! level = "info"
//! format = "json"
//! ```
//!
//! Providers are registered in the order listed, so earlier files take
//! matching priority. Relative provider paths are resolved against the
//! directory of the config file. `format` may be omitted when the extension
//! says it (`.ini`, `.json`, `.yaml`, `.yml`).
//!
//! ## Environment Variables
//!
//! - `TOKENROUTE_ROUTES` - comma-separated route files, replacing `providers`
//! - `TOKENROUTE_CONTROLLER_KEY` - replaces `controller_key`
//! - `TOKENROUTE_LOG_*` - see [`crate::logging`]

use crate::logging::LogConfig;
use crate::provider::{
    controller_factory, open_provider_with, ProviderFormat, DEFAULT_CONTROLLER_KEY,
};
use crate::router::RouteCollection;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// One route file to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    pub path: PathBuf,
    /// Explicit format; inferred from the extension when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ProviderFormat>,
}

impl ProviderConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: None,
        }
    }

    /// The explicit format, else the one implied by the file extension.
    #[must_use]
    pub fn format(&self) -> Option<ProviderFormat> {
        self.format.or_else(|| ProviderFormat::from_path(&self.path))
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    pub providers: Vec<ProviderConfig>,
    /// Parameter the default factory fills with the route name
    pub controller_key: String,
    pub log: LogConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
            controller_key: DEFAULT_CONTROLLER_KEY.to_string(),
            log: LogConfig::default(),
        }
    }
}

impl RouterConfig {
    /// Parse a TOML document. Relative provider paths are left as written.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not valid TOML for this shape.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse router config")
    }

    /// Apply `TOKENROUTE_*` environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
        self.log.apply_env();
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(routes) = var("TOKENROUTE_ROUTES") {
            self.providers = routes
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(ProviderConfig::new)
                .collect();
        }
        if let Some(key) = var("TOKENROUTE_CONTROLLER_KEY") {
            self.controller_key = key;
        }
    }

    /// Check that the configuration can be turned into a collection.
    ///
    /// # Errors
    ///
    /// Fails when no provider is configured, a provider's format cannot be
    /// determined, or the controller key is blank.
    pub fn validate(&self) -> Result<()> {
        if self.providers.is_empty() {
            bail!("no route providers configured");
        }
        if self.controller_key.trim().is_empty() {
            bail!("controller_key must not be empty");
        }
        for provider in &self.providers {
            if provider.format().is_none() {
                bail!(
                    "cannot determine route file format of {}, set `format`",
                    provider.path.display()
                );
            }
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        for provider in &mut self.providers {
            if provider.path.is_relative() {
                provider.path = base.join(&provider.path);
            }
        }
    }
}

/// Read, resolve and validate a config file. Environment overrides are applied
/// before validation.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or fails
/// [`RouterConfig::validate`].
pub fn load_config(path: impl AsRef<Path>) -> Result<RouterConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read router config: {}", path.display()))?;
    let mut config = RouterConfig::from_toml(&contents)
        .with_context(|| format!("Failed to load router config: {}", path.display()))?;

    config.apply_env();
    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }
    config
        .validate()
        .with_context(|| format!("Invalid router config: {}", path.display()))?;
    Ok(config)
}

/// Build a collection from every configured provider, in order.
///
/// # Errors
///
/// Returns the first provider failure; no partial collection is returned.
pub fn build_collection(config: &RouterConfig) -> Result<RouteCollection> {
    config.validate()?;
    let factory = controller_factory(config.controller_key.clone());

    let mut routes = RouteCollection::new();
    for provider_config in &config.providers {
        let path = &provider_config.path;
        let format = provider_config
            .format()
            .with_context(|| format!("Unknown route file format: {}", path.display()))?;
        let provider = open_provider_with(path, format, Arc::clone(&factory))
            .with_context(|| format!("Failed to open route file: {}", path.display()))?;
        let count = routes
            .register(provider.as_ref())
            .with_context(|| format!("Failed to load routes from {}", path.display()))?;
        info!(path = %path.display(), routes_count = count, "Registered route file");
    }

    routes.log_summary();
    Ok(routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const CONFIG: &str = r#"
controller_key = "handler"

[[providers]]
path = "site.ini"

[[providers]]
path = "api.conf"
format = "json"

[log]
level = "debug"
"#;

    #[test]
    fn test_parse_config() {
        let config = RouterConfig::from_toml(CONFIG).unwrap();
        assert_eq!(config.controller_key, "handler");
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.providers[0].format(), Some(ProviderFormat::Ini));
        assert_eq!(config.providers[1].format(), Some(ProviderFormat::Json));
        assert_eq!(config.log.level, "debug");
        config.validate().unwrap();
    }

    #[test]
    fn test_defaults() {
        let config = RouterConfig::from_toml("").unwrap();
        assert_eq!(config.controller_key, DEFAULT_CONTROLLER_KEY);
        assert!(config.providers.is_empty());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_keys_and_formats() {
        assert!(RouterConfig::from_toml("controler_key = \"x\"").is_err());
        assert!(RouterConfig::from_toml("[[providers]]\npath = \"a.ini\"\nformat = \"xml\"").is_err());

        let config = RouterConfig::from_toml("[[providers]]\npath = \"routes.txt\"").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TOKENROUTE_ROUTES", "a.ini, b.yaml,,"),
            ("TOKENROUTE_CONTROLLER_KEY", "action"),
        ]
        .into_iter()
        .collect();
        let mut config = RouterConfig::from_toml(CONFIG).unwrap();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(
            config.providers,
            vec![ProviderConfig::new("a.ini"), ProviderConfig::new("b.yaml")]
        );
        assert_eq!(config.controller_key, "action");
    }

    #[test]
    fn test_overrides_absent_keep_file_values() {
        let mut config = RouterConfig::from_toml(CONFIG).unwrap();
        let before = config.clone();
        config.apply_overrides(|_| None);
        assert_eq!(config, before);
    }

    #[test]
    fn test_load_and_build() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("site.ini"), "home = \"\"\npost = blog/:slug\n").unwrap();
        std::fs::write(
            dir.path().join("api.conf"),
            r#"{ "user": "users/:id", "post": "ignored/:slug" }"#,
        )
        .unwrap();
        let config_path = dir.path().join("tokenroute.toml");
        std::fs::write(&config_path, CONFIG).unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.providers[0].path, dir.path().join("site.ini"));

        let routes = build_collection(&config).unwrap();
        let names: Vec<_> = routes.names().collect();
        assert_eq!(names, vec!["home", "post", "user"]);

        // the later file replaced `post` but it kept its priority slot
        let m = routes.query("ignored/hello").unwrap();
        assert_eq!(m.name, "post");
        assert_eq!(m.get("handler"), Some("post"));
    }

    #[test]
    fn test_load_config_keeps_log_table() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("site.ini"), "home = \"\"\n").unwrap();
        let config_path = dir.path().join("tokenroute.toml");
        std::fs::write(
            &config_path,
            "[[providers]]\npath = \"site.ini\"\n\n[log]\nlevel = \"info\"\n\
             target_filter = \"tokenroute::provider=debug\"\n",
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.log.level(), tracing::Level::INFO);
        assert!(config
            .log
            .env_filter()
            .to_string()
            .contains("tokenroute::provider=debug"));
    }

    #[test]
    fn test_build_fails_on_missing_file() {
        let config = RouterConfig {
            providers: vec![ProviderConfig::new("/nope/routes.ini")],
            ..RouterConfig::default()
        };
        let err = build_collection(&config).unwrap_err();
        assert!(format!("{err:#}").contains("/nope/routes.ini"));
    }
}
