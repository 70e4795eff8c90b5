use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigSortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) order: Option<ConfigSortOrder>,
    #[serde(default)]
    pub(crate) color: Option<ConfigColorMode>,
    #[serde(default)]
    pub(crate) locale: Option<String>,
    #[serde(default)]
    pub(crate) currency: Option<String>,
    #[serde(default)]
    pub(crate) delimiter: Option<char>,
    #[serde(default)]
    pub(crate) day_first: bool,
}

impl Config {
    /// Load the first readable config from the default locations, or defaults
    pub(crate) fn load() -> Self {
        for path in Self::get_config_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(config) => return config,
                Err(e) => tracing::warn!("{e}"),
            }
        }

        Self::default()
    }

    /// Load an explicitly requested config file; failures are errors
    pub(crate) fn load_from(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = toml::from_str::<Config>(&content).map_err(|e| AppError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/kwhstats/config.toml (Linux/cross-platform)
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("kwhstats").join("config.toml"));
        }

        // 2. Platform config dir, e.g. ~/Library/Application Support/kwhstats/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("kwhstats").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.kwhstats.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".kwhstats.toml"));
        }

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paths() {
        let paths = Config::get_config_paths();
        for p in &paths {
            println!("Path: {:?}, exists: {}", p, p.exists());
        }
        assert!(paths.iter().all(|p| p.to_string_lossy().contains("kwhstats")));
    }

    #[test]
    fn empty_config_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert!(!config.no_color);
        assert!(config.order.is_none());
        assert!(config.delimiter.is_none());
        assert!(!config.day_first);
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "locale = \"pt\"\ncurrency = \"R$\"\nno_color = true\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.locale.as_deref(), Some("pt"));
        assert_eq!(config.currency.as_deref(), Some("R$"));
        assert!(config.no_color);
    }

    #[test]
    fn load_from_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "order = \"sideways\"\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn load_from_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
    }
}
