//! Configuration management
//!
//! TOML file under `~/.config/dishdesk/`, with environment fallbacks for the
//! service URLs.
//! Priority: CLI argument > environment variable > config.toml

use super::Result;
use crate::error::StorageError;
use crate::table::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const API_URL_ENV: &str = "DISHDESK_API_URL";
pub const REALTIME_URL_ENV: &str = "DISHDESK_REALTIME_URL";

const APP_DIR: &str = "dishdesk";
const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "dishdesk-tui.log";

/// Color theme for the terminal UI
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => write!(f, "dark"),
            Theme::Light => write!(f, "light"),
        }
    }
}

impl FromStr for Theme {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(StorageError::InvalidValue {
                field: "theme".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// New-order notification settings
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct NotificationSettings {
    pub enabled: bool,
    /// Ring the terminal bell on each new order
    pub sound: bool,
    /// Keep the notified-order set across restarts
    pub persist_seen: bool,
    pub session: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: true,
            persist_seen: false,
            session: "default".to_string(),
        }
    }
}

/// Application configuration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// REST API base URL
    pub api_url: Option<String>,
    /// Realtime database URL
    pub realtime_url: Option<String>,
    pub page_size: usize,
    pub theme: Theme,
    pub notifications: NotificationSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            realtime_url: None,
            page_size: DEFAULT_PAGE_SIZE,
            theme: Theme::default(),
            notifications: NotificationSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
            message: format!("Failed to parse config file: {}", e),
        })?;

        if config.page_size == 0 {
            return Err(StorageError::InvalidValue {
                field: "page_size".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string(self).map_err(|e| StorageError::ConfigParseError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&config_path, toml_content).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        Ok(())
    }

    /// `~/.config/dishdesk`
    pub fn config_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().ok_or(StorageError::ConfigDirNotFound)?;
        Ok(home_dir.join(".config").join(APP_DIR))
    }

    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_file_in(&Self::config_dir()?))
    }

    pub fn config_file_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }

    pub fn log_file_in(dir: &Path) -> PathBuf {
        dir.join(LOG_FILE)
    }

    /// Seen-orders file for one notification session.
    pub fn seen_orders_file_in(dir: &Path, session: &str) -> PathBuf {
        let session: String = session
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        dir.join(format!("seen-orders-{}.json", session))
    }

    /// API URL: CLI argument, then `DISHDESK_API_URL`, then the file.
    pub fn resolve_api_url(&self, cli: Option<&str>) -> Option<String> {
        resolve(cli, read_env(API_URL_ENV), self.api_url.as_deref())
    }

    /// Realtime URL: CLI argument, then `DISHDESK_REALTIME_URL`, then the file.
    pub fn resolve_realtime_url(&self, cli: Option<&str>) -> Option<String> {
        resolve(cli, read_env(REALTIME_URL_ENV), self.realtime_url.as_deref())
    }

    pub fn set_api_url(&mut self, url: String) {
        self.api_url = Some(url);
    }

    pub fn set_realtime_url(&mut self, url: String) {
        self.realtime_url = Some(url);
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        if page_size == 0 {
            return Err(StorageError::InvalidValue {
                field: "page_size".to_string(),
                value: page_size.to_string(),
            });
        }
        self.page_size = page_size;
        Ok(())
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn resolve(cli: Option<&str>, env: Option<String>, file: Option<&str>) -> Option<String> {
    let non_empty = |s: &str| !s.trim().is_empty();
    cli.filter(|s| non_empty(s))
        .map(str::to_string)
        .or_else(|| env.filter(|s| non_empty(s)))
        .or_else(|| file.filter(|s| non_empty(s)).map(str::to_string))
        .map(|url| url.trim_end_matches('/').to_string())
}
