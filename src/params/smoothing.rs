//! Exponential smoothing rates per tracked quantity.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Low-pass rates (α in (0, 1]) applied as `state += (target - state) * α`
///
/// Larger α follows the raw signal faster; α = 1 disables smoothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingRates {
    /// Peak-amplitude audio factor
    /// Default: 0.06
    pub audio_factor: f32,

    /// Material colors (per RGB channel)
    /// Default: 0.05
    pub color: f32,

    /// Beam angles
    /// Default: 0.1
    pub beam_angle: f32,
}

impl Default for SmoothingRates {
    fn default() -> Self {
        Self {
            audio_factor: 0.06,
            color: 0.05,
            beam_angle: 0.1,
        }
    }
}

impl SmoothingRates {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("audio_factor", self.audio_factor),
            ("color", self.color),
            ("beam_angle", self.beam_angle),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::SmoothingRate { name, value });
            }
        }
        Ok(())
    }
}
