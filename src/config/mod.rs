//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `COPILOT_SCRIPT` prefix and nested values use double underscores as separators.
//!
//! Every setting has a default, so an empty environment yields a usable config.
//!
//! # Example
//!
//! ```no_run
//! use copilot_script::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Replies play at {}x", config.pacing.speed_factor);
//! ```

mod error;
mod logging;
mod pacing;
mod ui;

pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use pacing::{PacingConfig, MAX_SPEED_FACTOR};
pub use ui::UiConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Reply pacing (speed factor)
    #[serde(default)]
    pub pacing: PacingConfig,

    /// Tracing subscriber settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Terminal front-end settings
    #[serde(default)]
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `COPILOT_SCRIPT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `COPILOT_SCRIPT__PACING__SPEED_FACTOR=0.5` -> `pacing.speed_factor = 0.5`
    /// - `COPILOT_SCRIPT__LOGGING__JSON=true` -> `logging.json = true`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("COPILOT_SCRIPT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.pacing.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "COPILOT_SCRIPT__PACING__SPEED_FACTOR",
        "COPILOT_SCRIPT__LOGGING__LEVEL",
        "COPILOT_SCRIPT__LOGGING__JSON",
        "COPILOT_SCRIPT__UI__SHOW_HELP_ON_START",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.pacing.speed_factor, 1.0);
        assert_eq!(config.logging.level, "info,copilot_script=debug");
        assert!(!config.logging.json);
        assert!(config.ui.show_help_on_start);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("COPILOT_SCRIPT__PACING__SPEED_FACTOR", "0.25");
        env::set_var("COPILOT_SCRIPT__LOGGING__LEVEL", "warn");
        env::set_var("COPILOT_SCRIPT__LOGGING__JSON", "true");
        env::set_var("COPILOT_SCRIPT__UI__SHOW_HELP_ON_START", "false");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.pacing.speed_factor, 0.25);
        assert_eq!(config.logging.level, "warn");
        assert!(config.logging.json);
        assert!(!config.ui.show_help_on_start);
    }

    #[test]
    fn test_validate_rejects_out_of_range_speed() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("COPILOT_SCRIPT__PACING__SPEED_FACTOR", "42");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidSpeedFactor(42.0))
        );
    }

    #[test]
    fn test_unparseable_value_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("COPILOT_SCRIPT__PACING__SPEED_FACTOR", "fast");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
