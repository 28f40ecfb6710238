//! Exponential smoothing of raw features across ticks.

use glam::Vec3;

use crate::params::{MappingConfig, SmoothingRates};

/// First-order low-pass filter: `value += (target - value) * alpha`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpSmoother {
    value: f32,
    alpha: f32,
}

impl ExpSmoother {
    pub fn new(initial: f32, alpha: f32) -> Self {
        Self {
            value: initial,
            alpha,
        }
    }

    /// Move one step toward `target` and return the new value
    pub fn step(&mut self, target: f32) -> f32 {
        self.value += (target - self.value) * self.alpha;
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

/// Component-wise low-pass filter over an RGB color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSmoother {
    value: Vec3,
    alpha: f32,
}

impl ColorSmoother {
    pub fn new(initial: Vec3, alpha: f32) -> Self {
        Self {
            value: initial,
            alpha,
        }
    }

    pub fn step(&mut self, target: Vec3) -> Vec3 {
        self.value = self.value.lerp(target, self.alpha);
        self.value
    }

    pub fn value(&self) -> Vec3 {
        self.value
    }
}

/// Scalar quantities tracked across ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Peak-amplitude audio factor
    AudioFactor,
    /// Cone angle of the n-th beam light (counting beam lights only)
    BeamAngle(usize),
}

/// Color accumulator of the n-th material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorId(pub usize);

/// All smoothing state of one pipeline instance
///
/// Created once with neutral values (audio factor 0, white colors, beams at
/// their initial angle) and never reset afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSmoother {
    audio_factor: ExpSmoother,
    beam_angles: Vec<ExpSmoother>,
    colors: Vec<ColorSmoother>,
}

impl ParameterSmoother {
    pub fn new(rates: &SmoothingRates, mapping: &MappingConfig) -> Self {
        Self {
            audio_factor: ExpSmoother::new(0.0, rates.audio_factor),
            beam_angles: mapping
                .beams()
                .map(|beam| ExpSmoother::new(beam.initial_angle_rad, rates.beam_angle))
                .collect(),
            colors: mapping
                .materials
                .iter()
                .map(|_| ColorSmoother::new(Vec3::ONE, rates.color))
                .collect(),
        }
    }

    /// Advance one quantity toward `target`
    ///
    /// # Panics
    /// If a beam index is outside the mapping this smoother was built from.
    pub fn smooth(&mut self, quantity: Quantity, target: f32) -> f32 {
        self.filter_mut(quantity).step(target)
    }

    /// Advance one material color toward `target`
    ///
    /// # Panics
    /// If the material index is outside the mapping this smoother was built from.
    pub fn smooth_color(&mut self, id: ColorId, target: Vec3) -> Vec3 {
        self.colors[id.0].step(target)
    }

    /// Current value of a quantity without advancing it
    pub fn value(&self, quantity: Quantity) -> f32 {
        match quantity {
            Quantity::AudioFactor => self.audio_factor.value(),
            Quantity::BeamAngle(i) => self.beam_angles[i].value(),
        }
    }

    pub fn color(&self, id: ColorId) -> Vec3 {
        self.colors[id.0].value()
    }

    fn filter_mut(&mut self, quantity: Quantity) -> &mut ExpSmoother {
        match quantity {
            Quantity::AudioFactor => &mut self.audio_factor,
            Quantity::BeamAngle(i) => &mut self.beam_angles[i],
        }
    }
}
