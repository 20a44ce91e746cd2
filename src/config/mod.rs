//! Configuration layer: typed settings with layered precedence (file → env).

use std::{path::Path, time::Duration};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::infra::http::RetryPolicy;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 500;
const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 8_000;
const LOCAL_CONFIG_BASENAME: &str = "girder";
const ENV_PREFIX: &str = "GIRDER";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub client: ClientSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Base URL of the CMS instance, e.g. `https://cms.example.com`.
    pub site_url: Option<String>,
    pub timeout_secs: u64,
    pub retry: RetrySettings,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            site_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry: RetrySettings::default(),
        }
    }
}

impl ClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RETRY_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_RETRY_MAX_DELAY_MS,
        }
    }
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            retry_statuses: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: LogLevel,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
}

/// Load settings from an explicit file (or `girder.toml` next to the
/// binary when none is given) overlaid with `GIRDER_`-prefixed
/// environment variables (`GIRDER_CLIENT__SITE_URL`, ...).
pub fn load(config_file: Option<&Path>) -> Result<Settings, LoadError> {
    let mut builder = Config::builder();
    builder = match config_file {
        Some(path) => builder.add_source(File::from(path)),
        None => builder.add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false)),
    };

    let config = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    Ok(config.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply_without_any_source() {
        let settings = Settings::default();
        assert_eq!(settings.client.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(settings.client.retry.max_attempts, DEFAULT_RETRY_MAX_ATTEMPTS);
        assert_eq!(settings.logging.level, LogLevel::Info);
        assert_eq!(settings.logging.format, LogFormat::Compact);
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("tmp file");
        writeln!(
            file,
            "[client]\nsite_url = \"https://cms.example.com\"\ntimeout_secs = 5\n\n[logging]\nlevel = \"debug\"\nformat = \"json\""
        )
        .expect("write config");

        let settings = load(Some(file.path())).expect("load");
        assert_eq!(
            settings.client.site_url.as_deref(),
            Some("https://cms.example.com")
        );
        assert_eq!(settings.client.timeout_secs, 5);
        assert_eq!(settings.logging.level, LogLevel::Debug);
        assert_eq!(settings.logging.format, LogFormat::Json);
    }

    #[test]
    fn retry_settings_build_a_policy_with_at_least_one_attempt() {
        let retry = RetrySettings {
            max_attempts: 0,
            base_delay_ms: 100,
            max_delay_ms: 1_000,
        };
        let policy = retry.policy();
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.base_delay, Duration::from_millis(100));
    }
}
