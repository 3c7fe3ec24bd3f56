//! Configuration service implementation.
//!
//! Loads the console configuration from `config.toml` in the console config
//! directory and applies environment overrides on top.

use crate::paths::ConsolePaths;
use console_core::ConsoleError;
use console_core::config::ConsoleConfig;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Environment variable overriding `api.base_url`.
pub const ENV_API_URL: &str = "ADMIN_CONSOLE_API_URL";
/// Environment variable overriding `api.token`.
pub const ENV_API_TOKEN: &str = "ADMIN_CONSOLE_API_TOKEN";

/// Configuration service that loads and caches the console configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration, loaded lazily on first access
    config: Arc<RwLock<Option<ConsoleConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the default config file location.
    pub fn new(paths: &ConsolePaths) -> Result<Self, ConsoleError> {
        let path = paths
            .config_file()
            .map_err(|e| ConsoleError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a service reading an explicit config file (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// A missing file yields the defaults; a malformed file is an error.
    pub fn get_config(&self) -> Result<ConsoleConfig, ConsoleError> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = Self::load_file(&self.path)?;
        apply_overrides(&mut loaded, |key| std::env::var(key).ok());

        {
            let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    /// Writes a default config file if none exists yet.
    pub fn ensure_config_file(&self) -> Result<PathBuf, ConsoleError> {
        if self.path.exists() {
            return Ok(self.path.clone());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let template = toml::to_string_pretty(&ConsoleConfig::default())?;
        std::fs::write(&self.path, template)?;
        tracing::info!("[ConfigService] Wrote default config to {:?}", self.path);
        Ok(self.path.clone())
    }

    fn load_file(path: &Path) -> Result<ConsoleConfig, ConsoleError> {
        if !path.exists() {
            tracing::debug!("[ConfigService] {:?} not found, using defaults", path);
            return Ok(ConsoleConfig::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: ConsoleConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Applies environment overrides. `lookup` returns the value of a variable.
pub fn apply_overrides<F>(config: &mut ConsoleConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        config.api.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(token) = lookup(ENV_API_TOKEN).filter(|v| !v.trim().is_empty()) {
        config.api.token = Some(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));

        let config = service.get_config().unwrap();
        assert_eq!(config.list, ConsoleConfig::default().list);
    }

    #[test]
    fn test_loads_and_caches_until_invalidated() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[list]\ndefault_page_size = 25\n").unwrap();

        let service = ConfigService::with_path(path.clone());
        assert_eq!(service.get_config().unwrap().list.default_page_size, 25);

        std::fs::write(&path, "[list]\ndefault_page_size = 50\n").unwrap();
        assert_eq!(service.get_config().unwrap().list.default_page_size, 25);

        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap().list.default_page_size, 50);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[list\n").unwrap();

        let err = ConfigService::with_path(path).get_config().unwrap_err();
        assert!(matches!(err, ConsoleError::Serialization { .. }));
    }

    #[test]
    fn test_ensure_config_file_writes_template_once() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("nested/config.toml"));

        let path = service.ensure_config_file().unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("base_url"));

        std::fs::write(&path, "[list]\ndefault_page_size = 7\n").unwrap();
        service.ensure_config_file().unwrap();
        assert_eq!(service.get_config().unwrap().list.default_page_size, 7);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ConsoleConfig::default();
        apply_overrides(&mut config, |key| match key {
            ENV_API_URL => Some("https://admin.example.com/api/".to_string()),
            ENV_API_TOKEN => Some("secret".to_string()),
            _ => None,
        });
        assert_eq!(config.api.base_url, "https://admin.example.com/api");
        assert_eq!(config.api.token.as_deref(), Some("secret"));

        let mut untouched = ConsoleConfig::default();
        apply_overrides(&mut untouched, |_| Some("  ".to_string()));
        assert_eq!(untouched, ConsoleConfig::default());
    }
}
