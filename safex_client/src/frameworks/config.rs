use std::path::{Path, PathBuf};
use std::{env, fmt, fs};

use serde::Deserialize;
use url::Url;

// Runtime configuration: optional TOML file first, then environment overrides.

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_STORAGE_PATH: &str = ".safex/storage.json";
pub const DEFAULT_CONFIG_FILE: &str = "safex.toml";
// Reported when the host cannot tell its display size.
pub const DEFAULT_SCREEN: &str = "0x0";
const TIMEZONE_FILE: &str = "/etc/timezone";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: Url,
    pub storage_path: PathBuf,
    pub screen: String,
    pub timezone: String,
}

// Shape of `safex.toml`; every key is optional.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub storage_path: Option<PathBuf>,
    pub screen: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, error: String },
    Parse { path: PathBuf, error: String },
    InvalidApiUrl { value: String, error: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, error } => {
                write!(f, "failed to read {}: {error}", path.display())
            }
            ConfigError::Parse { path, error } => {
                write!(f, "failed to parse {}: {error}", path.display())
            }
            ConfigError::InvalidApiUrl { value, error } => {
                write!(f, "invalid API url {value:?}: {error}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ClientConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env locally; safe to ignore when not present.
        let _ = dotenvy::dotenv();
        let file = match config_file_path() {
            Some(path) => read_file_config(&path)?,
            None => FileConfig::default(),
        };
        Self::from_sources(file, |key| env::var(key).ok(), system_timezone)
    }

    // Environment wins over the file; `fallback_timezone` is only consulted
    // when neither names a zone.
    pub fn from_sources(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
        fallback_timezone: impl FnOnce() -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let raw_url = non_empty("SAFEX_API_URL")
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&raw_url).map_err(|err| ConfigError::InvalidApiUrl {
            value: raw_url.clone(),
            error: err.to_string(),
        })?;

        let storage_path = non_empty("SAFEX_STORAGE_PATH")
            .map(PathBuf::from)
            .or(file.storage_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH));
        let screen = non_empty("SAFEX_SCREEN")
            .or(file.screen)
            .unwrap_or_else(|| DEFAULT_SCREEN.to_string());
        let timezone = non_empty("TZ")
            .or(file.timezone)
            .or_else(fallback_timezone)
            .unwrap_or_else(|| "UTC".to_string());

        Ok(Self {
            api_url,
            storage_path,
            screen,
            timezone,
        })
    }

    // The API root without a trailing slash.
    pub fn api_base(&self) -> String {
        self.api_url.as_str().trim_end_matches('/').to_string()
    }
}

fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("SAFEX_CONFIG") {
        return Some(PathBuf::from(path));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_FILE);
    default.exists().then_some(default)
}

pub fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|err| ConfigError::Read {
        path: path.to_path_buf(),
        error: err.to_string(),
    })?;
    parse_file_config(path, &raw)
}

fn parse_file_config(path: &Path, raw: &str) -> Result<FileConfig, ConfigError> {
    toml::from_str(raw).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        error: err.to_string(),
    })
}

fn system_timezone() -> Option<String> {
    fs::read_to_string(TIMEZONE_FILE)
        .ok()
        .map(|zone| zone.trim().to_string())
        .filter(|zone| !zone.is_empty())
}
