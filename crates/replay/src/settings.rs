//! Replay tool settings

use diagnostics::SessionConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment prefix for replay settings (`OBD_REPLAY__LOG_LEVEL`, ...)
const ENV_PREFIX: &str = "OBD_REPLAY";

/// How the final report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaySettings {
    /// tracing level filter (`error` .. `trace`)
    pub log_level: String,
    pub format: OutputFormat,
    pub session: SessionConfig,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: OutputFormat::Pretty,
            session: SessionConfig::default(),
        }
    }
}

impl ReplaySettings {
    /// Load from an optional TOML file layered under `OBD_REPLAY__*` variables
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        let settings: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.session.validate()?;
        Ok(settings)
    }

    pub fn from_toml_str(toml: &str) -> anyhow::Result<Self> {
        let settings: Self = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.session.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ReplaySettings::default();
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.format, OutputFormat::Pretty);
        assert_eq!(settings.session, SessionConfig::default());
    }

    #[test]
    fn test_nested_session_table() {
        let settings = ReplaySettings::from_toml_str(
            r#"
            log_level = "debug"
            format = "json"

            [session]
            queue_capacity = 16
            "#,
        )
        .unwrap();

        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.session.queue_capacity, 16);
        assert_eq!(settings.session.update_capacity, 64);
    }

    #[test]
    fn test_invalid_session_rejected() {
        assert!(ReplaySettings::from_toml_str("[session]\nupdate_capacity = 0\n").is_err());
    }
}
