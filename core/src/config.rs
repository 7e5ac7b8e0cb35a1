//! Environment-driven client configuration.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

/// Backend origin, e.g. `http://127.0.0.1:5000`. Role base paths are appended.
pub const API_URL_ENV: &str = "SCHOOL_API_URL";
/// Per-call timeout in whole seconds.
pub const API_TIMEOUT_ENV: &str = "SCHOOL_API_TIMEOUT_SECS";

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SCHOOL_API_TIMEOUT_SECS must be a positive number of seconds, got '{0}'")]
    InvalidTimeout(String),
    #[error("SCHOOL_API_URL must start with http:// or https://, got '{0}'")]
    InvalidUrl(String),
    #[error("could not read env file: {0}")]
    EnvFile(String),
}

/// Source of configuration values. Lets tests supply values without
/// mutating the process environment.
pub trait ConfigEnv {
    fn string(&self, name: &str) -> Option<String>;
}

/// Reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ConfigEnv for ProcessEnv {
    fn string(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Process variables first, then values read from a `.env` file. Matches
/// dotenvy's rule that a file never overrides the real environment.
struct LayeredEnv<'a, P> {
    process: &'a P,
    file: HashMap<String, String>,
}

impl<P: ConfigEnv> ConfigEnv for LayeredEnv<'_, P> {
    fn string(&self, name: &str) -> Option<String> {
        self.process
            .string(name)
            .or_else(|| self.file.get(name).cloned())
    }
}

fn read_env_file<R: std::io::Read>(
    entries: dotenvy::Iter<R>,
) -> Result<HashMap<String, String>, ConfigError> {
    entries
        .map(|entry| entry.map_err(|e| ConfigError::EnvFile(e.to_string())))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout,
        }
    }

    /// Load from the process environment, falling back to a `.env` file in
    /// the working directory or one of its parents when one exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the `.env` file is malformed or a variable
    /// is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let file = match dotenvy::dotenv_iter() {
            Ok(entries) => read_env_file(entries)?,
            Err(_) => HashMap::new(),
        };
        Self::from_env_with(&LayeredEnv {
            process: &ProcessEnv,
            file,
        })
    }

    /// Like `from_env`, but with an explicit env file that must exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EnvFile` when the file is missing or malformed.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_env_file_with(path.as_ref(), &ProcessEnv)
    }

    fn from_env_file_with(path: &Path, process: &impl ConfigEnv) -> Result<Self, ConfigError> {
        let entries = dotenvy::from_path_iter(path)
            .map_err(|e| ConfigError::EnvFile(format!("{}: {e}", path.display())))?;
        Self::from_env_with(&LayeredEnv {
            process,
            file: read_env_file(entries)?,
        })
    }

    /// Load from a custom environment source. Unset variables fall back to
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set to an unusable value.
    pub fn from_env_with(env: &impl ConfigEnv) -> Result<Self, ConfigError> {
        let base_url = match env.string(API_URL_ENV) {
            Some(url) => {
                let url = url.trim().to_string();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidUrl(url));
                }
                url
            }
            None => DEFAULT_API_URL.to_string(),
        };

        let timeout = match env.string(API_TIMEOUT_ENV) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self { base_url, timeout })
    }
}
