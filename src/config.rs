//! Runtime configuration.
//!
//! Values come from the environment (a `.env` file is loaded first if present)
//! and can be overridden by command-line flags:
//!
//! | variable | default |
//! |---|---|
//! | `TICKETS_API_BASE` | `http://localhost:5000/api/v1` |
//! | `TICKETS_API_TIMEOUT_SECS` | `10` |
//! | `TICKETS_LOG` | `warn` (`info` when logging to a file) |

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const ENV_API_BASE: &str = "TICKETS_API_BASE";
pub const ENV_TIMEOUT_SECS: &str = "TICKETS_API_TIMEOUT_SECS";
pub const ENV_LOG: &str = "TICKETS_LOG";

/// Where and how to reach the prediction API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Command-line overrides; `None` keeps the environment/default value.
#[derive(Debug, Clone, Default)]
pub struct ApiOverrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ApiConfig {
    /// Load from the process environment and apply overrides.
    ///
    /// `.env` is read once at startup by `app::run`, before logging is set up.
    pub fn load(overrides: &ApiOverrides) -> Result<Self, AppError> {
        Self::resolve(
            std::env::var(ENV_API_BASE).ok(),
            std::env::var(ENV_TIMEOUT_SECS).ok(),
            overrides,
        )
    }

    /// Merge raw environment values with overrides (pure; used by `load`).
    pub fn resolve(
        env_base: Option<String>,
        env_timeout: Option<String>,
        overrides: &ApiOverrides,
    ) -> Result<Self, AppError> {
        let base_url = overrides
            .base_url
            .clone()
            .or(env_base)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AppError::new(
                2,
                format!("Invalid API base URL '{base_url}': expected http:// or https://"),
            ));
        }

        let timeout_secs = match (overrides.timeout_secs, env_timeout) {
            (Some(secs), _) => secs,
            (None, Some(raw)) => raw.trim().parse::<u64>().map_err(|e| {
                AppError::new(2, format!("Invalid {ENV_TIMEOUT_SECS} '{raw}': {e}"))
            })?,
            (None, None) => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(AppError::new(2, "API timeout must be at least 1 second."));
        }

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Logging destination and filter.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Append logs here instead of stderr.
    pub file: Option<PathBuf>,
    /// `EnvFilter` directive; falls back to `TICKETS_LOG`, then a default level.
    pub filter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_env() {
        let cfg = ApiConfig::resolve(None, None, &ApiOverrides::default()).unwrap();
        assert_eq!(cfg, ApiConfig::default());
    }

    #[test]
    fn overrides_beat_environment() {
        let overrides = ApiOverrides {
            base_url: Some("https://forecast.example.com/api/v2".to_string()),
            timeout_secs: Some(3),
        };
        let cfg = ApiConfig::resolve(
            Some("http://env.example.com".to_string()),
            Some("30".to_string()),
            &overrides,
        )
        .unwrap();
        assert_eq!(cfg.base_url, "https://forecast.example.com/api/v2");
        assert_eq!(cfg.timeout, Duration::from_secs(3));
    }

    #[test]
    fn load_applies_overrides_without_touching_dotenv() {
        let overrides = ApiOverrides {
            base_url: Some("http://127.0.0.1:8080/api/v1".to_string()),
            timeout_secs: Some(7),
        };
        let cfg = ApiConfig::load(&overrides).unwrap();
        assert_eq!(cfg.base_url, "http://127.0.0.1:8080/api/v1");
        assert_eq!(cfg.timeout, Duration::from_secs(7));
    }

    #[test]
    fn environment_values_are_used() {
        let cfg = ApiConfig::resolve(
            Some(" http://env.example.com/api ".to_string()),
            Some("25".to_string()),
            &ApiOverrides::default(),
        )
        .unwrap();
        assert_eq!(cfg.base_url, "http://env.example.com/api");
        assert_eq!(cfg.timeout, Duration::from_secs(25));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_timeout = ApiConfig::resolve(None, Some("soon".to_string()), &ApiOverrides::default());
        assert_eq!(bad_timeout.unwrap_err().exit_code(), 2);

        let zero = ApiOverrides {
            timeout_secs: Some(0),
            ..ApiOverrides::default()
        };
        assert!(ApiConfig::resolve(None, None, &zero).is_err());

        let bad_url = ApiConfig::resolve(Some("localhost:5000".to_string()), None, &ApiOverrides::default());
        assert!(bad_url.is_err());
    }
}
