//! Logging configuration

use serde::Deserialize;

use super::ValidationError;

/// Controls the tracing subscriber installed by the binary
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "info,copilot_script=debug".to_string()
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.level.trim().is_empty() {
            return Err(ValidationError::EmptyLogLevel);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info,copilot_script=debug");
        assert!(!config.json);
    }

    #[test]
    fn test_blank_level_is_rejected() {
        let config = LoggingConfig {
            level: "  ".to_string(),
            json: false,
        };
        assert_eq!(config.validate(), Err(ValidationError::EmptyLogLevel));
    }

    #[test]
    fn test_logging_deserialization() {
        let json = r#"{ "level": "warn", "json": true }"#;
        let config: LoggingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.level, "warn");
        assert!(config.json);
    }
}
