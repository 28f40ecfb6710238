//! Per-tick parameter bundle handed to the renderer.

use glam::Vec3;
use serde::Serialize;

/// Uniforms for one shader material
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialParams {
    pub name: String,

    /// Smoothed audio factor times the material's scale
    pub audio_factor: f32,

    /// Smoothed RGB in [0, 1]
    pub color: Vec3,

    /// Accumulated mesh rotation per axis, wrapped into [0, 2π)
    pub rotation_rad: Vec3,
}

/// State of one light
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightParams {
    pub name: String,

    pub intensity: f32,

    /// Cone half-angle (radians), beam lights only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle_rad: Option<f32>,

    /// Copy of the light color source material's color
    pub color: Vec3,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutputParameterVector {
    /// Seconds since the scheduler started
    pub time_s: f32,

    /// Smoothed peak amplitude (unscaled)
    pub audio_factor: f32,

    /// Smoothed color broadcast to the lights
    pub color: Vec3,

    pub materials: Vec<MaterialParams>,

    pub lights: Vec<LightParams>,
}

impl OutputParameterVector {
    /// Whether every scalar and color channel is finite
    pub fn is_finite(&self) -> bool {
        self.time_s.is_finite()
            && self.audio_factor.is_finite()
            && self.color.is_finite()
            && self
                .materials
                .iter()
                .all(|m| {
                    m.audio_factor.is_finite() && m.color.is_finite() && m.rotation_rad.is_finite()
                })
            && self.lights.iter().all(|l| {
                l.intensity.is_finite()
                    && l.angle_rad.map_or(true, f32::is_finite)
                    && l.color.is_finite()
            })
    }

    pub fn material(&self, name: &str) -> Option<&MaterialParams> {
        self.materials.iter().find(|m| m.name == name)
    }

    pub fn light(&self, name: &str) -> Option<&LightParams> {
        self.lights.iter().find(|l| l.name == name)
    }
}
