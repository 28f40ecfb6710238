//! Parameter definitions with units and documented semantics.
//!
//! Every tunable of the pipeline lives here:
//! - Units (seconds, radians, Hz, dBFS)
//! - Defaults equal to the tuned scene values
//! - `validate()` so bad values fail at startup, never mid-tick

mod audio;
mod mapping;
mod schedule;
mod smoothing;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// Re-export all types
pub use audio::{AnalyserConfig, SamplerConfig, MAX_FFT_SIZE, MIN_FFT_SIZE};
pub use mapping::{
    BeamConfig, ColorCurve, LightConfig, LightDrive, MappingConfig, MaterialConfig, PulseCurve,
};
pub use schedule::ScheduleConfig;
pub use smoothing::SmoothingRates;

/// Top-level pipeline configuration (one TOML file)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub analyser: AnalyserConfig,
    pub sampler: SamplerConfig,
    pub smoothing: SmoothingRates,
    pub schedule: ScheduleConfig,
    pub mapping: MappingConfig,
}

impl PipelineConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analyser.validate()?;
        self.sampler.validate(&self.analyser)?;
        self.smoothing.validate()?;
        self.schedule.validate()?;
        self.mapping.validate()?;
        Ok(())
    }

    /// Parse a TOML document; missing fields keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a TOML tuning file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Render the configuration as a TOML tuning file
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [smoothing]
            audio_factor = 0.1

            [schedule]
            fps = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.smoothing.audio_factor, 0.1);
        assert_eq!(config.smoothing.color, 0.05);
        assert_eq!(config.schedule.fps, 30);
        assert_eq!(config.analyser, AnalyserConfig::default());
        assert_eq!(config.mapping, MappingConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lights_from_toml() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [mapping]
            light_color_source = "main"

            [[mapping.materials]]
            name = "main"
            rotation_rate = [0.01, 0.0, -0.5]
            [mapping.materials.color]
            lightness_scale = 0.8

            [[mapping.lights]]
            name = "wash"
            drive = { kind = "pulse", gain = 1.5 }

            [[mapping.lights]]
            name = "beam"
            drive = { kind = "beam", min_angle_rad = 0.1, max_angle_rad = 0.4, max_intensity = 2.0 }
            "#,
        )
        .unwrap();

        let mapping = &config.mapping;
        assert_eq!(mapping.materials.len(), 1);
        assert_eq!(mapping.materials[0].audio_factor_scale, 1.0);
        assert_eq!(mapping.materials[0].color.lightness_scale, 0.8);
        assert_eq!(mapping.materials[0].rotation_rate.z, -0.5);
        assert_eq!(mapping.lights[0].drive, LightDrive::Pulse { gain: 1.5 });
        match &mapping.lights[1].drive {
            LightDrive::Beam(beam) => {
                assert_eq!(beam.input_max, 1.0);
                assert_eq!(beam.min_intensity, 0.0);
                assert_eq!(beam.max_intensity, 2.0);
            }
            other => panic!("expected beam, got {:?}", other),
        }
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_dump_parses_back() {
        let config = PipelineConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(PipelineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        assert!(matches!(
            PipelineConfig::from_toml_str("schedule = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
