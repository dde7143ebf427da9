// crates/stubcheck-config/src/config.rs
// ============================================================================
// Module: Harness Configuration
// Description: Config model, TOML loading, env overrides, and validation.
// Purpose: Produce validated settings for the HTTP collaborators and the store.
// Dependencies: serde, toml, url, thiserror, tracing
// ============================================================================

//! ## Overview
//! The file format mirrors the struct layout:
//!
//! ```toml
//! [mock]
//! base_url = "http://localhost:8080"
//! timeout_ms = 10000
//!
//! [store]
//! path = "target/test-results.db"
//! busy_timeout_ms = 5000
//! ```
//!
//! Every section and key is optional; missing values take the defaults.
//! Security posture: config files are untrusted input; path, size, and
//! encoding limits are enforced before parsing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::OsString;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use stubcheck_http::DEFAULT_BASE_URL;
use stubcheck_http::DEFAULT_TIMEOUT_MS;
use stubcheck_http::HttpClientConfig;
use stubcheck_store_sqlite::DEFAULT_BUSY_TIMEOUT_MS;
use stubcheck_store_sqlite::DEFAULT_STORE_PATH;
use stubcheck_store_sqlite::SqliteStoreConfig;
use thiserror::Error;
use tracing::debug;
use url::Url;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum config file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;
/// Maximum total config path length in bytes.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a single config path component in bytes.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;

// ============================================================================
// SECTION: Environment Variables
// ============================================================================

/// Names the config file to load when no explicit path is given.
pub const CONFIG_ENV_VAR: &str = "STUBCHECK_CONFIG";
/// Overrides `mock.base_url`.
pub const MOCK_BASE_URL_ENV_VAR: &str = "STUBCHECK_MOCK_BASE_URL";
/// Overrides `store.path`.
pub const STORE_PATH_ENV_VAR: &str = "STUBCHECK_STORE_PATH";
/// Overrides `mock.timeout_ms`.
pub const TIMEOUT_ENV_VAR: &str = "STUBCHECK_TIMEOUT_MS";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// The config file is not valid TOML for this model.
    #[error("config parse error: {0}")]
    Parse(String),
    /// A value or input violates a limit or constraint.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Model
// ============================================================================

/// Mock server connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MockConfig {
    /// Base URL of the WireMock-compatible server.
    pub base_url: String,
    /// Whole-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Result store settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_PATH),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// Fully resolved harness configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Mock server settings.
    pub mock: MockConfig,
    /// Result store settings.
    pub store: StoreConfig,
}

impl HarnessConfig {
    /// Loads configuration from defaults, the optional file, and the process
    /// environment, then validates it.
    ///
    /// When `path` is `None`, `STUBCHECK_CONFIG` names the file; when neither
    /// is set, only defaults and env overrides apply.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file or environment is unusable or the
    /// resolved values fail validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, &EnvOverrides::from_env()?)
    }

    /// Same as [`HarnessConfig::load`] with explicit environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on unreadable input or invalid values.
    pub fn load_with_env(path: Option<&Path>, env: &EnvOverrides) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).or_else(|| env.config_path.clone());
        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        env.apply(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a config file without applying overrides or validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the path, size, encoding, or TOML is invalid.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = read_config_bytes(path)?;
        let text = String::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), "config file loaded");
        Ok(config)
    }

    /// Parses TOML text without applying overrides or validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Checks value constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_base_url(&self.mock.base_url)?;
        if self.mock.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "mock.timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("store.path must not be empty".to_string()));
        }
        if self.store.busy_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "store.busy_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the HTTP client configuration for the mock server.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the base URL is unusable.
    pub fn http_client_config(&self) -> Result<HttpClientConfig, ConfigError> {
        let config = HttpClientConfig::new(&self.mock.base_url)
            .map_err(|err| ConfigError::Invalid(format!("mock.base_url: {err}")))?;
        Ok(config.with_timeout_ms(self.mock.timeout_ms))
    }

    /// Builds the `SQLite` store configuration.
    #[must_use]
    pub fn sqlite_store_config(&self) -> SqliteStoreConfig {
        let mut config = SqliteStoreConfig::for_path(self.store.path.clone());
        config.busy_timeout_ms = self.store.busy_timeout_ms;
        config
    }
}

// ============================================================================
// SECTION: Environment Overrides
// ============================================================================

/// Overrides read from `STUBCHECK_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// Config file path from `STUBCHECK_CONFIG`.
    pub config_path: Option<PathBuf>,
    /// Mock base URL from `STUBCHECK_MOCK_BASE_URL`.
    pub mock_base_url: Option<String>,
    /// Store path from `STUBCHECK_STORE_PATH`.
    pub store_path: Option<PathBuf>,
    /// Raw timeout from `STUBCHECK_TIMEOUT_MS`.
    pub timeout_ms: Option<String>,
}

impl EnvOverrides {
    /// Reads overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a set variable is not UTF-8 or is
    /// empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut values = Vec::new();
        for name in [CONFIG_ENV_VAR, MOCK_BASE_URL_ENV_VAR, STORE_PATH_ENV_VAR, TIMEOUT_ENV_VAR] {
            let value = std::env::var_os(name).map(|raw| utf8_env_value(name, raw)).transpose()?;
            values.push((name, value));
        }
        Self::from_lookup(|name| {
            values.iter().find(|(key, _)| *key == name).and_then(|(_, value)| value.clone())
        })
    }

    /// Reads overrides through `lookup`, which returns a variable's value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a set variable is empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| -> Result<Option<String>, ConfigError> {
            match lookup(name) {
                Some(value) if value.trim().is_empty() => {
                    Err(ConfigError::Invalid(format!("env var {name} must not be empty")))
                }
                other => Ok(other),
            }
        };
        Ok(Self {
            config_path: read(CONFIG_ENV_VAR)?.map(PathBuf::from),
            mock_base_url: read(MOCK_BASE_URL_ENV_VAR)?,
            store_path: read(STORE_PATH_ENV_VAR)?.map(PathBuf::from),
            timeout_ms: read(TIMEOUT_ENV_VAR)?,
        })
    }

    /// Applies the overrides to `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the timeout is not an integer.
    pub fn apply(&self, config: &mut HarnessConfig) -> Result<(), ConfigError> {
        if let Some(base_url) = &self.mock_base_url {
            config.mock.base_url.clone_from(base_url);
        }
        if let Some(path) = &self.store_path {
            config.store.path.clone_from(path);
        }
        if let Some(raw) = &self.timeout_ms {
            config.mock.timeout_ms = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("env var {TIMEOUT_ENV_VAR} must be an integer"))
            })?;
        }
        Ok(())
    }
}

/// Converts a raw environment value, rejecting non-UTF-8 content.
fn utf8_env_value(name: &str, raw: OsString) -> Result<String, ConfigError> {
    raw.into_string().map_err(|_| ConfigError::Invalid(format!("env var {name} must be utf-8")))
}

// ============================================================================
// SECTION: Input Guards
// ============================================================================

/// Checks config path length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Reads the config file, refusing anything over [`MAX_CONFIG_FILE_SIZE`].
fn read_config_bytes(path: &Path) -> Result<Vec<u8>, ConfigError> {
    let file = File::open(path)
        .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
    let mut bytes = Vec::new();
    file.take(MAX_CONFIG_FILE_SIZE + 1)
        .read_to_end(&mut bytes)
        .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
    if u64::try_from(bytes.len()).unwrap_or(u64::MAX) > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    Ok(bytes)
}

/// Checks that `raw` is an absolute `http`/`https` URL.
fn validate_base_url(raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw)
        .map_err(|err| ConfigError::Invalid(format!("mock.base_url {raw}: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid(format!(
            "mock.base_url must use http or https, got {}",
            url.scheme()
        )));
    }
    Ok(())
}
