//! Windowed FFT analyser producing unsigned 8-bit snapshots.
//!
//! Holds the most recent `fft_size` mono samples. Time-domain reads map
//! `[-1, 1]` onto `[0, 255]` with 128 as silence; frequency reads apply a
//! Blackman window, temporal averaging and a decibel-to-byte scale.

use std::collections::VecDeque;
use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::error::ConfigError;
use crate::params::AnalyserConfig;

/// Rolling-window analyser shared by every transport
pub struct Analyser {
    config: AnalyserConfig,
    /// Most recent samples, oldest first; always exactly `fft_size` long
    window: VecDeque<f32>,
    fft: Arc<dyn Fft<f32>>,
    blackman: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    /// Averaged linear magnitude per bin
    magnitudes: Vec<f32>,
}

impl Analyser {
    /// Create an analyser; the window starts out silent
    pub fn new(config: AnalyserConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let size = config.fft_size;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);

        Ok(Self {
            window: VecDeque::from(vec![0.0; size]),
            fft,
            blackman: (0..size).map(|i| blackman_window(i, size)).collect(),
            scratch: vec![Complex::new(0.0, 0.0); size],
            magnitudes: vec![0.0; config.frequency_bin_count()],
            config,
        })
    }

    /// Append mono samples, discarding the oldest beyond the window
    pub fn push_samples(&mut self, samples: &[f32]) {
        let size = self.config.fft_size;
        let tail = &samples[samples.len().saturating_sub(size)..];

        let overflow = (self.window.len() + tail.len()).saturating_sub(size);
        self.window.drain(..overflow);
        self.window
            .extend(tail.iter().map(|&s| if s.is_finite() { s } else { 0.0 }));
    }

    /// Append `count` zero samples (transport ran past the end of its clip)
    pub fn push_silence(&mut self, count: usize) {
        let count = count.min(self.config.fft_size);
        self.window.drain(..count);
        self.window.extend(std::iter::repeat(0.0).take(count));
    }

    /// Most recent `out.len()` samples as bytes (128 = zero crossing)
    pub fn byte_time_domain(&self, out: &mut [u8]) {
        let available = out.len().min(self.window.len());
        let (padding, recent) = out.split_at_mut(out.len() - available);
        padding.fill(128);

        let start = self.window.len() - available;
        for (byte, &sample) in recent.iter_mut().zip(self.window.range(start..)) {
            *byte = (128.0 * (1.0 + sample)).clamp(0.0, 255.0) as u8;
        }
    }

    /// Lowest `out.len()` frequency bins as bytes scaled between the dB bounds
    pub fn byte_frequency(&mut self, out: &mut [u8]) {
        self.update_magnitudes();

        let AnalyserConfig {
            min_decibels,
            max_decibels,
            ..
        } = self.config;
        let range_scale = 255.0 / (max_decibels - min_decibels);

        for (i, byte) in out.iter_mut().enumerate() {
            let Some(&magnitude) = self.magnitudes.get(i) else {
                *byte = 0;
                continue;
            };
            // log10(0) = -inf clamps to byte 0
            let db = 20.0 * magnitude.log10();
            let scaled = range_scale * (db - min_decibels);
            *byte = if scaled.is_nan() {
                0
            } else {
                scaled.clamp(0.0, 255.0) as u8
            };
        }
    }

    /// Run the transform over the current window and fold it into the average
    fn update_magnitudes(&mut self) {
        let size = self.config.fft_size;

        for ((slot, &sample), &w) in self
            .scratch
            .iter_mut()
            .zip(self.window.iter())
            .zip(self.blackman.iter())
        {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let tau = self.config.smoothing_time_constant;
        let norm = 1.0 / size as f32;
        for (avg, bin) in self.magnitudes.iter_mut().zip(self.scratch.iter()) {
            let magnitude = bin.norm() * norm;
            *avg = tau * *avg + (1.0 - tau) * magnitude;
        }
    }
}

/// Blackman window function (α = 0.16) for FFT analysis
pub fn blackman_window(index: usize, size: usize) -> f32 {
    let x = index as f32 / size as f32;
    0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
}
