// SPDX-License-Identifier: Apache-2.0

//! Configuration management for safe-intake.
//!
//! Provides layered configuration from files and environment variables.
//! Uses XDG-compliant paths with environment variable support.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables (prefix: `SAFE_INTAKE_`)
//! 2. Config file: `~/.config/safe-intake/config.toml` (or `--config <path>`)
//! 3. Built-in defaults
//!
//! Database credentials are never read from here; see [`crate::credentials`].
//!
//! # Examples
//!
//! ```bash
//! # Tighten the read timeout via environment variable
//! SAFE_INTAKE_FETCH__READ_TIMEOUT_MS=2000 safe-intake
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use url::Url;

use crate::error::IntakeError;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote fetch settings.
    pub fetch: FetchConfig,
    /// Notification settings.
    pub notify: NotifyConfig,
}

/// Remote fetch settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// HTTPS endpoint fetched once per run.
    pub url: String,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Read timeout in milliseconds.
    pub read_timeout_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url: "https://insecure-api.com/get-data".to_string(),
            connect_timeout_ms: 5000,
            read_timeout_ms: 5000,
        }
    }
}

impl FetchConfig {
    /// Connect timeout as a `Duration`.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Read timeout as a `Duration`.
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Checks that the endpoint is HTTPS and both timeouts are bounded.
    pub fn validate(&self) -> Result<(), IntakeError> {
        let url = Url::parse(&self.url).map_err(|e| IntakeError::Settings {
            message: format!("fetch.url is not a valid URL: {e}"),
        })?;
        if url.scheme() != "https" {
            return Err(IntakeError::Settings {
                message: format!("fetch.url must use https, got {}", url.scheme()),
            });
        }
        if self.connect_timeout_ms == 0 || self.read_timeout_ms == 0 {
            return Err(IntakeError::Settings {
                message: "fetch timeouts must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Notification settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Recipient address.
    pub recipient: String,
    /// Subject line.
    pub subject: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            recipient: "admin@example.com".to_string(),
            subject: "User Input".to_string(),
        }
    }
}

/// Returns the safe-intake configuration directory.
///
/// Respects the `XDG_CONFIG_HOME` environment variable if set,
/// otherwise defaults to `~/.config/safe-intake`.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        return PathBuf::from(xdg_config).join("safe-intake");
    }
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".config")
        .join("safe-intake")
}

/// Returns the path to the default configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load application configuration.
///
/// Loads from the config file (if it exists) and environment variables.
/// Environment variables use the prefix `SAFE_INTAKE_` and double underscore
/// for nested keys (e.g., `SAFE_INTAKE_FETCH__URL`).
///
/// # Arguments
///
/// * `path` - Explicit config file; when `None` the default path is optional
///
/// # Errors
///
/// Returns `IntakeError::Settings` if the file is invalid, an explicit file is
/// missing, or the resulting fetch settings fail validation.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, IntakeError> {
    let file = match path {
        Some(explicit) => File::from(explicit).required(true),
        None => File::from(config_file_path()).required(false),
    };

    let config = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix("SAFE_INTAKE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;
    app_config.fetch.validate()?;

    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_load_config_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", dir.path());
        }

        let config = load_config(None).expect("should load with defaults");

        assert_eq!(config.fetch.url, "https://insecure-api.com/get-data");
        assert_eq!(config.fetch.connect_timeout(), Duration::from_millis(5000));
        assert_eq!(config.fetch.read_timeout(), Duration::from_millis(5000));
        assert_eq!(config.notify.recipient, "admin@example.com");
        assert_eq!(config.notify.subject, "User Input");

        // Cleanup
        unsafe {
            match original {
                Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }
    }

    #[test]
    #[serial]
    fn test_load_config_from_explicit_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[fetch]
url = "https://api.example.com/data"
read_timeout_ms = 1500

[notify]
recipient = "ops@example.com"
"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).expect("should load file");

        assert_eq!(config.fetch.url, "https://api.example.com/data");
        assert_eq!(config.fetch.read_timeout_ms, 1500);
        assert_eq!(config.fetch.connect_timeout_ms, 5000);
        assert_eq!(config.notify.recipient, "ops@example.com");
        assert_eq!(config.notify.subject, "User Input");
    }

    #[test]
    #[serial]
    fn test_load_config_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(IntakeError::Settings { .. })));
    }

    #[test]
    #[serial]
    fn test_env_override_nested_key() {
        let dir = tempfile::tempdir().unwrap();
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", dir.path());
            std::env::set_var("SAFE_INTAKE_FETCH__CONNECT_TIMEOUT_MS", "250");
        }

        let config = load_config(None).expect("should load");
        assert_eq!(config.fetch.connect_timeout_ms, 250);

        // Cleanup
        unsafe {
            std::env::remove_var("SAFE_INTAKE_FETCH__CONNECT_TIMEOUT_MS");
            match original {
                Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }
    }

    #[test]
    fn test_validate_rejects_plain_http() {
        let fetch = FetchConfig {
            url: "http://insecure-api.com/get-data".to_string(),
            ..FetchConfig::default()
        };
        let err = fetch.validate().unwrap_err();
        assert!(err.to_string().contains("must use https"));
    }

    #[test]
    fn test_validate_rejects_unparseable_url() {
        let fetch = FetchConfig {
            url: "not a url".to_string(),
            ..FetchConfig::default()
        };
        assert!(matches!(fetch.validate(), Err(IntakeError::Settings { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let fetch = FetchConfig {
            read_timeout_ms: 0,
            ..FetchConfig::default()
        };
        assert!(matches!(fetch.validate(), Err(IntakeError::Settings { .. })));
    }

    #[test]
    fn test_config_file_path() {
        assert!(config_file_path().ends_with("safe-intake/config.toml"));
    }
}
