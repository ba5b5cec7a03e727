//! Bootstrap configuration and root folder resolution
//!
//! Settings sources, highest priority first:
//! 1. Command-line arguments
//! 2. Environment variables (`THERMAL_ROOT`, `THERMAL_SIGNING_SECRET`)
//! 3. TOML configuration file
//! 4. Compiled defaults
//!
//! A missing TOML file is not an error: the service starts on defaults and
//! logs a warning.

use crate::coverage::SensorProfile;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the root folder
pub const ROOT_ENV_VAR: &str = "THERMAL_ROOT";

/// Environment variable holding the URL signing secret
pub const SIGNING_SECRET_ENV_VAR: &str = "THERMAL_SIGNING_SECRET";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Folder holding the record store and the object bucket
    pub root_folder: Option<PathBuf>,

    pub bind_address: String,

    /// HTTP server port (default 5001)
    pub port: u16,

    /// Record store file, relative to the root folder unless absolute
    pub database_file: PathBuf,

    /// Object bucket directory, relative to the root folder unless absolute
    pub object_root: PathBuf,

    /// Base of issued object URLs; defaults to `http://{bind_address}:{port}`
    pub public_base_url: Option<String>,

    pub signing_secret: Option<String>,

    /// Lifetime of issued object URLs
    pub url_expiry_secs: u64,

    pub logging: LoggingConfig,

    /// Camera model used for coverage estimates
    pub sensor: SensorProfile,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            bind_address: "127.0.0.1".to_string(),
            port: 5001,
            database_file: PathBuf::from("thermal.db"),
            object_root: PathBuf::from("objects"),
            public_base_url: None,
            signing_secret: None,
            url_expiry_secs: 3600,
            logging: LoggingConfig::default(),
            sensor: SensorProfile::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file found; compiled defaults in use
    Defaults,
}

impl TomlConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load a TOML file; a missing or unreadable file is an error
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `explicit` if given, else the platform config file if present, else defaults
    ///
    /// An explicitly named file must exist and parse. The platform file is
    /// optional but must parse when present.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, ConfigSource::File(path.to_path_buf())));
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                let config = Self::load(&path)?;
                Ok((config, ConfigSource::File(path)))
            }
            _ => Ok((Self::default(), ConfigSource::Defaults)),
        }
    }

    /// Record store path under `root`
    pub fn database_path(&self, root: &Path) -> PathBuf {
        root.join(&self.database_file)
    }

    /// Object bucket path under `root`
    pub fn object_root_path(&self, root: &Path) -> PathBuf {
        root.join(&self.object_root)
    }

    pub fn base_url(&self) -> String {
        self.public_base_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.bind_address, self.port))
    }

    /// Signing secret from the environment, then the TOML file
    pub fn resolve_signing_secret(&self) -> Option<String> {
        std::env::var(SIGNING_SECRET_ENV_VAR)
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.signing_secret.clone().filter(|s| !s.is_empty()))
    }
}

/// Root folder resolution: CLI argument, environment variable, TOML, OS default
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_root: Option<&Path>,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = toml_root {
        return path.to_path_buf();
    }

    default_root_folder()
}

/// Platform config file: `<config dir>/thermal-api/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("thermal-api").join("config.toml"))
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("thermal-api"))
        .unwrap_or_else(|| PathBuf::from("./thermal_data"))
}
