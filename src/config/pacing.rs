//! Reply pacing configuration

use serde::Deserialize;

use super::ValidationError;
use crate::application::Pacing;

/// Largest accepted speed factor.
pub const MAX_SPEED_FACTOR: f64 = 10.0;

/// Controls how fast scripted replies are delivered
#[derive(Debug, Clone, Deserialize)]
pub struct PacingConfig {
    /// Multiplier for every scripted delay (0 delivers instantly)
    #[serde(default = "default_speed_factor")]
    pub speed_factor: f64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            speed_factor: default_speed_factor(),
        }
    }
}

fn default_speed_factor() -> f64 {
    1.0
}

impl PacingConfig {
    /// Validate pacing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=MAX_SPEED_FACTOR).contains(&self.speed_factor) {
            return Err(ValidationError::InvalidSpeedFactor(self.speed_factor));
        }
        Ok(())
    }

    pub fn to_pacing(&self) -> Pacing {
        Pacing::new(self.speed_factor)
    }
}
