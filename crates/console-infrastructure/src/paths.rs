//! Unified path management for console configuration and logs.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/admin-console/     # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/admin-console/
//! ├── conversations.json       # Default inbox fixture
//! └── logs/                    # Daily rolling log files
//!     └── admin-console.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "admin-console";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config/data directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves console paths, optionally under an explicit base directory.
///
/// With a base directory (tests, `--config-dir`), config and data both live
/// directly under it.
#[derive(Debug, Clone, Default)]
pub struct ConsolePaths {
    base: Option<PathBuf>,
}

impl ConsolePaths {
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }

    /// Returns the console configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/admin-console/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the console data directory.
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("logs"))
    }

    /// Inbox fixture used when the config does not name one.
    pub fn default_conversations_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("conversations.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_base_directory() {
        let paths = ConsolePaths::new(Some(PathBuf::from("/tmp/console-test")));
        assert_eq!(
            paths.config_file().unwrap(),
            PathBuf::from("/tmp/console-test/config.toml")
        );
        assert_eq!(
            paths.logs_dir().unwrap(),
            PathBuf::from("/tmp/console-test/logs")
        );
    }
}
