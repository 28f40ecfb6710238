//! Per-tick audio-to-visual pipeline.
//!
//! One tick runs, in order:
//! sampler → feature extraction → smoothing → mapping → output vector.
//! Every stage runs to completion; nothing here blocks or allocates per sample.

mod features;
mod mapper;
mod output;
mod sampler;
mod smoother;

pub use features::{extract, FeatureVector};
pub use mapper::{
    beam_angle, beam_angle_target, beam_intensity, color_target, hsl_to_rgb, lerp, map_range,
    map_range_clamped, pulse,
};
pub use output::{LightParams, MaterialParams, OutputParameterVector};
pub use sampler::{SpectralSampler, SpectrumSnapshot, WaveformSnapshot, SILENT_BIN, SILENT_SAMPLE};
pub use smoother::{ColorId, ColorSmoother, ExpSmoother, ParameterSmoother, Quantity};

use std::f32::consts::TAU;

use glam::Vec3;

use crate::audio::AudioSource;
use crate::error::ConfigError;
use crate::params::{LightDrive, MappingConfig, PipelineConfig};

/// Audio-reactive parameter pipeline
pub struct Pipeline {
    sampler: SpectralSampler,
    smoother: ParameterSmoother,
    mapping: MappingConfig,

    /// Material whose color the lights copy
    light_color_index: usize,

    /// Accumulated mesh rotation per material
    rotations: Vec<Vec3>,

    output: OutputParameterVector,
    last_features: FeatureVector,
}

impl Pipeline {
    /// Build a pipeline; the whole configuration is validated first
    pub fn new(config: &PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let light_color_index = config.mapping.light_color_index().ok_or_else(|| {
            ConfigError::invalid("mapping.light_color_source", "no such material")
        })?;

        Ok(Self {
            sampler: SpectralSampler::new(&config.sampler)?,
            smoother: ParameterSmoother::new(&config.smoothing, &config.mapping),
            mapping: config.mapping.clone(),
            light_color_index,
            rotations: vec![Vec3::ZERO; config.mapping.materials.len()],
            output: OutputParameterVector::default(),
            last_features: FeatureVector::default(),
        })
    }

    /// Run one tick against `source` at absolute time `time_s`
    pub fn tick<S: AudioSource + ?Sized>(
        &mut self,
        source: &mut S,
        time_s: f32,
    ) -> &OutputParameterVector {
        let (waveform, spectrum) = self.sampler.sample(source);
        let features = extract(waveform, spectrum);
        self.apply(features, time_s)
    }

    /// Smooth and map already-extracted features
    pub fn apply(&mut self, features: FeatureVector, time_s: f32) -> &OutputParameterVector {
        self.last_features = features;

        let audio_factor = self
            .smoother
            .smooth(Quantity::AudioFactor, features.peak_amplitude);
        let color_factor = features.color_factor();

        let out = &mut self.output;
        out.time_s = time_s;
        out.audio_factor = audio_factor;

        out.materials.clear();
        for (i, material) in self.mapping.materials.iter().enumerate() {
            let target = color_target(&material.color, color_factor);
            let color = self.smoother.smooth_color(ColorId(i), target);
            let rotation = &mut self.rotations[i];
            *rotation = (*rotation + material.rotation_rate).rem_euclid(Vec3::splat(TAU));
            out.materials.push(MaterialParams {
                name: material.name.clone(),
                audio_factor: audio_factor * material.audio_factor_scale,
                color,
                rotation_rad: *rotation,
            });
        }
        let light_color = out.materials[self.light_color_index].color;
        out.color = light_color;

        out.lights.clear();
        let mut beam_index = 0;
        for light in &self.mapping.lights {
            let (intensity, angle_rad) = match &light.drive {
                LightDrive::Pulse { gain } => {
                    (gain * pulse(&self.mapping.pulse, audio_factor), None)
                }
                LightDrive::Beam(beam) => {
                    let smoothed = self.smoother.smooth(
                        Quantity::BeamAngle(beam_index),
                        beam_angle_target(beam, audio_factor),
                    );
                    beam_index += 1;
                    (
                        beam_intensity(beam, smoothed),
                        Some(beam_angle(beam, smoothed)),
                    )
                }
                LightDrive::Static { intensity } => (*intensity, None),
            };
            out.lights.push(LightParams {
                name: light.name.clone(),
                intensity,
                angle_rad,
                color: light_color,
            });
        }

        &self.output
    }

    /// Output of the most recent tick
    pub fn output(&self) -> &OutputParameterVector {
        &self.output
    }

    /// Raw features of the most recent tick
    pub fn features(&self) -> FeatureVector {
        self.last_features
    }
}
