//! Session settings

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix (`OBD_QUEUE_CAPACITY`, ...)
pub const ENV_PREFIX: &str = "OBD";

/// Diagnostics session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Notifications buffered between the transport and the session actor
    pub queue_capacity: usize,

    /// Channel updates buffered per subscriber before it starts lagging
    pub update_capacity: usize,

    /// Log each dropped packet at debug level
    pub log_rejections: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            update_capacity: 64,
            log_rejections: true,
        }
    }
}

impl SessionConfig {
    /// Load from an optional TOML file, overridden by `OBD_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(false));
        }
        let config: Self = builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from a TOML string
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = ::config::Config::builder()
            .add_source(::config::File::from_str(toml, ::config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject capacities the channels cannot be built with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid("queue_capacity must be > 0".to_string()));
        }
        if self.update_capacity == 0 {
            return Err(ConfigError::Invalid("update_capacity must be > 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.queue_capacity, 256);
        assert_eq!(config.update_capacity, 64);
        assert!(config.log_rejections);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SessionConfig::from_toml_str("queue_capacity = 32\n").unwrap();
        assert_eq!(config.queue_capacity, 32);
        assert_eq!(config.update_capacity, 64);
        assert!(config.log_rejections);
    }

    #[test]
    fn test_full_toml() {
        let config = SessionConfig::from_toml_str(
            "queue_capacity = 8\nupdate_capacity = 4\nlog_rejections = false\n",
        )
        .unwrap();
        assert_eq!(
            config,
            SessionConfig {
                queue_capacity: 8,
                update_capacity: 4,
                log_rejections: false,
            }
        );
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = SessionConfig::from_toml_str("queue_capacity = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    /// Serializes tests that touch the process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_KEYS: [&str; 3] = [
        "OBD_QUEUE_CAPACITY",
        "OBD_UPDATE_CAPACITY",
        "OBD_LOG_REJECTIONS",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let config = SessionConfig::load(Some(Path::new("/nonexistent/obd-session.toml"))).unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        std::env::set_var("OBD_QUEUE_CAPACITY", "32");
        std::env::set_var("OBD_LOG_REJECTIONS", "false");

        let result = SessionConfig::load(None);
        clear_env();

        assert_eq!(
            result.unwrap(),
            SessionConfig {
                queue_capacity: 32,
                update_capacity: 64,
                log_rejections: false,
            }
        );
    }

    #[test]
    fn test_env_overrides_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let path = std::env::temp_dir().join(format!("obd-session-{}.toml", std::process::id()));
        std::fs::write(&path, "queue_capacity = 8\nupdate_capacity = 4\n").unwrap();
        std::env::set_var("OBD_UPDATE_CAPACITY", "16");

        let result = SessionConfig::load(Some(&path));
        clear_env();
        let _ = std::fs::remove_file(&path);

        let config = result.unwrap();
        assert_eq!(config.queue_capacity, 8);
        assert_eq!(config.update_capacity, 16);
    }

    #[test]
    fn test_invalid_env_value_rejected() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        std::env::set_var("OBD_QUEUE_CAPACITY", "0");

        let result = SessionConfig::load(None);
        clear_env();

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
