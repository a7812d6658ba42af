//! Demo configuration. A tiny TOML file lets the user override the tray
//! title and start from an icon file instead of the generated bitmap.

use std::fs;
use std::path::PathBuf;

use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    pub title: String,
    #[serde(default)]
    pub icon_path: Option<PathBuf>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "trayshell demo".to_string(),
            icon_path: None,
        }
    }
}

fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trayshell")
        .join("demo.toml")
}

/// Load the config, falling back to defaults on a missing or broken file.
pub fn load() -> DemoConfig {
    let path = config_path();
    if !path.exists() {
        info!("no config at {:?}, using defaults", path);
        return DemoConfig::default();
    }

    match fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                info!("loaded config from {:?}", path);
                config
            }
            Err(e) => {
                warn!("failed to parse {:?}: {}; using defaults", path, e);
                DemoConfig::default()
            }
        },
        Err(e) => {
            warn!("failed to read {:?}: {}; using defaults", path, e);
            DemoConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let config = DemoConfig::default();
        let text = toml::to_string(&config).unwrap();
        let back: DemoConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.title, config.title);
        assert!(back.icon_path.is_none());
    }

    #[test]
    fn icon_path_is_optional_in_file() {
        let config: DemoConfig = toml::from_str(r#"title = "mine""#).unwrap();
        assert_eq!(config.title, "mine");
        assert!(config.icon_path.is_none());
    }
}
