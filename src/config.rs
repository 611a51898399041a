use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::error::AppError;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) provider: Option<String>,
    #[serde(default)]
    pub(crate) offline: bool,
    #[serde(default)]
    pub(crate) cache_ttl_hours: Option<i64>,
    #[serde(default)]
    pub(crate) cache_path: Option<PathBuf>,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) no_color: bool,
}

/// Result of probing the config locations; reported once logging is up
#[derive(Debug, Default)]
pub(crate) struct LoadedConfig {
    pub(crate) config: Config,
    pub(crate) path: Option<PathBuf>,
    pub(crate) errors: Vec<AppError>,
}

impl Config {
    /// First parseable config file found, else defaults
    pub(crate) fn load() -> LoadedConfig {
        let mut errors = Vec::new();

        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match Self::parse(&content, path.clone()) {
                    Ok(config) => {
                        return LoadedConfig {
                            config,
                            path: Some(path),
                            errors,
                        };
                    }
                    Err(e) => errors.push(e),
                }
            }
        }

        LoadedConfig {
            errors,
            ..LoadedConfig::default()
        }
    }

    fn parse(content: &str, path: PathBuf) -> Result<Self, AppError> {
        toml::from_str::<Config>(content).map_err(|source| AppError::Config { path, source })
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/ccprice/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("ccprice").join("config.toml"));
        }

        // 2. Platform config dir (macOS: ~/Library/Application Support)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("ccprice").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. ~/.ccprice.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".ccprice.toml"));
        }

        paths
    }
}
