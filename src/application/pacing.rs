//! Scaling of scripted reply delays.

use std::time::Duration;

/// Multiplier applied to every scripted delay.
///
/// `1.0` plays scripts at their authored speed, `0.0` delivers instantly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacing {
    speed_factor: f64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self { speed_factor: 1.0 }
    }
}

impl Pacing {
    /// Creates a pacing with the given factor.
    ///
    /// Negative and non-finite factors are treated as `0.0`.
    pub fn new(speed_factor: f64) -> Self {
        let speed_factor = if speed_factor.is_finite() && speed_factor > 0.0 {
            speed_factor
        } else {
            0.0
        };
        Self { speed_factor }
    }

    /// Delivers everything without delay.
    pub fn instant() -> Self {
        Self { speed_factor: 0.0 }
    }

    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    /// Applies the factor to an authored delay.
    pub fn scale(&self, delay: Duration) -> Duration {
        if self.speed_factor == 0.0 {
            return Duration::ZERO;
        }
        delay.mul_f64(self.speed_factor)
    }
}
