//! Application configuration.
//!
//! Settings are layered: built-in defaults, then a YAML file, then
//! environment variables. The YAML file is the one given explicitly, or
//! `<config dir>/powershare/config.yaml` when it exists:
//!
//! ```yaml
//! endpoints:
//!   auth: https://auth.powershare.example/auth
//!   producers: https://api.powershare.example/admin/producers
//!   users: https://auth.powershare.example/users
//! session_file: /var/lib/powershare/session.json
//! download_dir: /home/reviewer/Downloads/powershare
//! ```

use std::path::{Path, PathBuf};

use powershare_domain::ApiEndpoints;
use powershare_domain::endpoints::parse_base;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::persistence::FileCredentialStorage;

/// Overrides the auth service base URL.
pub const ENV_AUTH_URL: &str = "POWERSHARE_AUTH_URL";
/// Overrides the producer registry base URL.
pub const ENV_PRODUCERS_URL: &str = "POWERSHARE_PRODUCERS_URL";
/// Overrides the user service base URL.
pub const ENV_USERS_URL: &str = "POWERSHARE_USERS_URL";
/// Overrides the session file path.
pub const ENV_SESSION_FILE: &str = "POWERSHARE_SESSION_FILE";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("could not read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for [`AppConfig`].
    #[error("invalid configuration in {path}: {message}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A file entry or environment override holds an unusable URL.
    #[error("{key}: {message}")]
    InvalidUrl {
        /// File key or environment variable name.
        key: &'static str,
        /// Validation message.
        message: String,
    },
}

/// Console settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Remote service base URLs.
    pub endpoints: ApiEndpoints,
    /// Where the session is persisted; the platform data directory if unset.
    pub session_file: Option<PathBuf>,
    /// Where downloaded documents go; the platform download directory if unset.
    pub download_dir: Option<PathBuf>,
}

/// On-disk shape of the YAML file; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    endpoints: EndpointsFile,
    session_file: Option<PathBuf>,
    download_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EndpointsFile {
    auth: Option<String>,
    producers: Option<String>,
    users: Option<String>,
}

impl AppConfig {
    /// Built-in settings: local service URLs, platform directories.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if a built-in URL does not parse.
    pub fn defaults() -> Result<Self, ConfigError> {
        let endpoints = ApiEndpoints::localhost().map_err(|e| ConfigError::InvalidUrl {
            key: "endpoints",
            message: e.to_string(),
        })?;
        Ok(Self {
            endpoints,
            session_file: None,
            download_dir: None,
        })
    }

    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing or any layer is invalid.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(explicit, default_config_path().as_deref(), |key| {
            std::env::var(key).ok()
        })
    }

    /// Loads configuration with an explicit fallback file and environment.
    ///
    /// `explicit` must exist; `fallback` is used only if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing or any layer is invalid.
    pub fn load_with(
        explicit: Option<&Path>,
        fallback: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match (explicit, fallback) {
            (Some(path), _) => Self::from_file(path)?,
            (None, Some(path)) if path.is_file() => Self::from_file(path)?,
            _ => Self::defaults()?,
        };
        config.apply_env(env)?;
        Ok(config)
    }

    /// Reads a YAML configuration file over the built-in settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds a
    /// URL that is not absolute http(s).
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut config = Self::defaults()?;
        for (key, target, raw) in [
            ("endpoints.auth", &mut config.endpoints.auth, file.endpoints.auth),
            ("endpoints.producers", &mut config.endpoints.producers, file.endpoints.producers),
            ("endpoints.users", &mut config.endpoints.users, file.endpoints.users),
        ] {
            if let Some(raw) = raw {
                *target = parse_url(key, &raw)?;
            }
        }
        config.session_file = file.session_file;
        config.download_dir = file.download_dir;
        debug!(path = %path.display(), "configuration file loaded");
        Ok(config)
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        for (key, target) in [
            (ENV_AUTH_URL, &mut self.endpoints.auth),
            (ENV_PRODUCERS_URL, &mut self.endpoints.producers),
            (ENV_USERS_URL, &mut self.endpoints.users),
        ] {
            if let Some(raw) = env(key).filter(|v| !v.trim().is_empty()) {
                *target = parse_url(key, &raw)?;
            }
        }
        if let Some(path) = env(ENV_SESSION_FILE).filter(|v| !v.trim().is_empty()) {
            self.session_file = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Returns the session file in effect.
    #[must_use]
    pub fn session_path(&self) -> Option<PathBuf> {
        self.session_file
            .clone()
            .or_else(FileCredentialStorage::default_path)
    }

    /// Returns the download directory in effect, falling back to the
    /// current directory.
    #[must_use]
    pub fn download_path(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn parse_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
    parse_base(raw).map_err(|e| ConfigError::InvalidUrl {
        key,
        message: e.to_string(),
    })
}

/// Returns `<config dir>/powershare/config.yaml`, if the platform has a
/// config directory.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("powershare").join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::load_with(None, None, no_env).expect("config");
        assert_eq!(config, AppConfig::defaults().expect("defaults"));
        assert_eq!(
            config.endpoints.login(),
            "http://localhost:8081/auth/login"
        );
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "endpoints:\n  producers: https://api.example.com/admin/producers\ndownload_dir: /tmp/docs\n",
        )
        .expect("write");

        let config = AppConfig::load_with(Some(&path), None, no_env).expect("config");

        assert_eq!(
            config.endpoints.approve("u-1"),
            "https://api.example.com/admin/producers/u-1/approve"
        );
        assert_eq!(config.endpoints.login(), "http://localhost:8081/auth/login");
        assert_eq!(config.download_dir, Some(PathBuf::from("/tmp/docs")));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("absent.yaml");

        let result = AppConfig::load_with(Some(&path), None, no_env);

        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_missing_fallback_file_is_ignored() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("absent.yaml");

        let config = AppConfig::load_with(None, Some(&path), no_env).expect("config");

        assert_eq!(config, AppConfig::defaults().expect("defaults"));
    }

    #[test]
    fn test_invalid_yaml() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "endpoints: [unclosed").expect("write");

        let result = AppConfig::load_with(None, Some(&path), no_env);

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "endpoints:\n  auth: https://file.example.com/auth\n").expect("write");
        let env = HashMap::from([
            (ENV_AUTH_URL, "https://env.example.com/auth"),
            (ENV_SESSION_FILE, "/tmp/session.json"),
        ]);

        let config = AppConfig::load_with(Some(&path), None, |key| {
            env.get(key).map(|v| (*v).to_string())
        })
        .expect("config");

        assert_eq!(config.endpoints.refresh(), "https://env.example.com/auth/refresh");
        assert_eq!(config.session_path(), Some(PathBuf::from("/tmp/session.json")));
    }

    #[test]
    fn test_file_url_must_be_http() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "endpoints:\n  auth: ftp://files.example.com/auth\n").expect("write");

        let result = AppConfig::load_with(Some(&path), None, no_env);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidUrl {
                key: "endpoints.auth",
                ..
            })
        ));
    }

    #[test]
    fn test_env_url_must_be_http() {
        let result = AppConfig::load_with(None, None, |key| {
            (key == ENV_USERS_URL).then(|| "ftp://users".to_string())
        });

        assert!(matches!(
            result,
            Err(ConfigError::InvalidUrl {
                key: ENV_USERS_URL,
                ..
            })
        ));
    }
}
