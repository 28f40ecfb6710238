//! Mapping from smoothed audio features to material and light parameters.

use std::f32::consts::PI;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// HSL target built from the spectral balance signal (`color_factor`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorCurve {
    /// Formula: hue = color_factor * hue_scale (wrapped into [0, 1))
    pub hue_scale: f32,

    /// Saturation (clamped to [0, 1])
    pub saturation: f32,

    /// Formula: lightness = color_factor * lightness_scale + lightness_offset
    /// (clamped to [0, 1])
    pub lightness_scale: f32,

    pub lightness_offset: f32,
}

impl Default for ColorCurve {
    fn default() -> Self {
        Self::primary()
    }
}

impl ColorCurve {
    /// Main sphere color: l = cf * 0.7 + 0.1
    pub fn primary() -> Self {
        Self {
            hue_scale: 1.0,
            saturation: 1.0,
            lightness_scale: 0.7,
            lightness_offset: 0.1,
        }
    }

    /// Inner sphere color: l = cf + 0.5
    pub fn accent() -> Self {
        Self {
            hue_scale: 1.0,
            saturation: 1.0,
            lightness_scale: 1.0,
            lightness_offset: 0.5,
        }
    }
}

/// Periodic pulse applied to the smoothed audio factor
///
/// Formula: intensity = amplitude * sin(frequency * audio_factor) + offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseCurve {
    /// Default: 1.0
    pub amplitude: f32,

    /// Radians per unit of audio factor
    /// Default: 3.0
    pub frequency: f32,

    /// Default: 0.5
    pub offset: f32,
}

impl Default for PulseCurve {
    fn default() -> Self {
        Self {
            amplitude: 1.0,
            frequency: 3.0,
            offset: 0.5,
        }
    }
}

/// Shader material fed by the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialConfig {
    pub name: String,

    /// Multiplier on the smoothed audio factor before upload
    #[serde(default = "unit_scale")]
    pub audio_factor_scale: f32,

    #[serde(default)]
    pub color: ColorCurve,

    /// Mesh rotation added every tick, per axis (radians/tick)
    /// Default: none
    #[serde(default)]
    pub rotation_rate: Vec3,
}

fn unit_scale() -> f32 {
    1.0
}

/// Spot light whose cone follows the audio factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamConfig {
    /// Audio factor mapped onto `min_angle_rad`
    #[serde(default)]
    pub input_min: f32,

    /// Audio factor mapped onto `max_angle_rad`
    #[serde(default = "unit_scale")]
    pub input_max: f32,

    /// Narrowest cone half-angle (radians)
    pub min_angle_rad: f32,

    /// Widest cone half-angle (radians)
    pub max_angle_rad: f32,

    /// Smoothed angle at startup (radians)
    /// Default: π/6
    #[serde(default = "default_initial_angle")]
    pub initial_angle_rad: f32,

    /// Intensity at the narrowest angle
    #[serde(default)]
    pub min_intensity: f32,

    /// Intensity at the widest angle
    pub max_intensity: f32,
}

fn default_initial_angle() -> f32 {
    PI / 6.0
}

/// How a light's intensity (and angle) is derived each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LightDrive {
    /// Intensity = gain * pulse(audio_factor)
    Pulse { gain: f32 },

    /// Angle tracks the audio factor, intensity tracks the angle
    Beam(BeamConfig),

    /// Fixed intensity, color only
    Static { intensity: f32 },
}

/// Light driven by the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    pub name: String,
    pub drive: LightDrive,
}

impl LightConfig {
    fn pulse(name: &str, gain: f32) -> Self {
        Self {
            name: name.to_string(),
            drive: LightDrive::Pulse { gain },
        }
    }
}

/// Complete feature-to-visual mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Material whose smoothed color is copied onto every light
    pub light_color_source: String,

    pub pulse: PulseCurve,

    pub materials: Vec<MaterialConfig>,

    pub lights: Vec<LightConfig>,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            light_color_source: "primary".to_string(),
            pulse: PulseCurve::default(),
            materials: vec![
                MaterialConfig {
                    name: "primary".to_string(),
                    audio_factor_scale: 1.0,
                    color: ColorCurve::primary(),
                    rotation_rate: Vec3::new(0.002, -0.002, 0.003),
                },
                MaterialConfig {
                    name: "accent".to_string(),
                    audio_factor_scale: 2.0,
                    color: ColorCurve::accent(),
                    rotation_rate: Vec3::new(0.003, -0.002, 0.002),
                },
            ],
            lights: vec![
                LightConfig::pulse("ambient", 0.5),
                LightConfig::pulse("left_bottom_spot", 2.0),
                LightConfig::pulse("right_bottom_spot", 2.0),
                LightConfig::pulse("left_top_spot", 2.0),
                LightConfig::pulse("right_top_spot", 2.0),
                LightConfig {
                    name: "spot".to_string(),
                    drive: LightDrive::Beam(BeamConfig {
                        input_min: 0.0,
                        input_max: 1.0,
                        min_angle_rad: PI / 24.0,
                        max_angle_rad: PI / 8.0,
                        initial_angle_rad: PI / 6.0,
                        min_intensity: 0.0,
                        max_intensity: 5.0,
                    }),
                },
                LightConfig {
                    name: "big_spot".to_string(),
                    drive: LightDrive::Beam(BeamConfig {
                        input_min: 0.0,
                        input_max: 1.0,
                        min_angle_rad: PI / 8.0,
                        max_angle_rad: PI / 4.0,
                        initial_angle_rad: PI / 6.0,
                        min_intensity: 0.0,
                        max_intensity: 1.0,
                    }),
                },
                LightConfig {
                    name: "left_point".to_string(),
                    drive: LightDrive::Static { intensity: 1.0 },
                },
                LightConfig {
                    name: "right_point".to_string(),
                    drive: LightDrive::Static { intensity: 1.0 },
                },
            ],
        }
    }
}

impl MappingConfig {
    /// Index of the material whose color the lights copy
    pub fn light_color_index(&self) -> Option<usize> {
        self.materials
            .iter()
            .position(|m| m.name == self.light_color_source)
    }

    /// Beam configurations in light order
    pub fn beams(&self) -> impl Iterator<Item = &BeamConfig> {
        self.lights.iter().filter_map(|light| match &light.drive {
            LightDrive::Beam(beam) => Some(beam),
            _ => None,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.materials.is_empty() {
            return Err(ConfigError::invalid(
                "mapping.materials",
                "at least one material is required",
            ));
        }
        if self.light_color_index().is_none() {
            return Err(ConfigError::invalid(
                "mapping.light_color_source",
                format!("no material named '{}'", self.light_color_source),
            ));
        }

        let pulse = &self.pulse;
        require_finite(
            "pulse",
            &[pulse.amplitude, pulse.frequency, pulse.offset],
        )?;

        for material in &self.materials {
            let c = &material.color;
            require_finite(
                &material.name,
                &[
                    material.audio_factor_scale,
                    c.hue_scale,
                    c.saturation,
                    c.lightness_scale,
                    c.lightness_offset,
                    material.rotation_rate.x,
                    material.rotation_rate.y,
                    material.rotation_rate.z,
                ],
            )?;
        }

        for light in &self.lights {
            match &light.drive {
                LightDrive::Pulse { gain } => require_finite(&light.name, &[*gain])?,
                LightDrive::Static { intensity } => require_finite(&light.name, &[*intensity])?,
                LightDrive::Beam(beam) => validate_beam(&light.name, beam)?,
            }
        }
        Ok(())
    }
}

fn validate_beam(name: &str, beam: &BeamConfig) -> Result<(), ConfigError> {
    require_finite(
        name,
        &[
            beam.input_min,
            beam.input_max,
            beam.min_angle_rad,
            beam.max_angle_rad,
            beam.initial_angle_rad,
            beam.min_intensity,
            beam.max_intensity,
        ],
    )?;
    // Both remaps divide by their input span
    if beam.input_min == beam.input_max {
        return Err(ConfigError::DegenerateRange {
            name: format!("{name} input"),
            min: beam.input_min,
            max: beam.input_max,
        });
    }
    if beam.min_angle_rad == beam.max_angle_rad {
        return Err(ConfigError::DegenerateRange {
            name: format!("{name} angle"),
            min: beam.min_angle_rad,
            max: beam.max_angle_rad,
        });
    }
    Ok(())
}

fn require_finite(name: &str, values: &[f32]) -> Result<(), ConfigError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::invalid(name, "all tunables must be finite"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping_is_valid() {
        let mapping = MappingConfig::default();
        assert!(mapping.validate().is_ok());
        assert_eq!(mapping.light_color_index(), Some(0));
        assert_eq!(mapping.beams().count(), 2);
    }

    #[test]
    fn test_degenerate_beam_range_rejected() {
        let mut mapping = MappingConfig::default();
        mapping.lights.push(LightConfig {
            name: "broken".to_string(),
            drive: LightDrive::Beam(BeamConfig {
                input_min: 0.5,
                input_max: 0.5,
                min_angle_rad: 0.1,
                max_angle_rad: 0.2,
                initial_angle_rad: 0.1,
                min_intensity: 0.0,
                max_intensity: 1.0,
            }),
        });
        assert!(matches!(
            mapping.validate(),
            Err(ConfigError::DegenerateRange { .. })
        ));
    }

    #[test]
    fn test_non_finite_rotation_rejected() {
        let mut mapping = MappingConfig::default();
        mapping.materials[1].rotation_rate.y = f32::INFINITY;
        assert!(matches!(
            mapping.validate(),
            Err(ConfigError::Invalid { ref name, .. }) if name == "accent"
        ));
    }

    #[test]
    fn test_unknown_light_color_source_rejected() {
        let mapping = MappingConfig {
            light_color_source: "missing".to_string(),
            ..Default::default()
        };
        assert!(mapping.validate().is_err());
    }
}
