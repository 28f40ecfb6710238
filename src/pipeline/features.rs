//! Scalar features reduced from one tick's snapshots.

use serde::Serialize;

use super::sampler::{SpectrumSnapshot, WaveformSnapshot, SILENT_BIN, SILENT_SAMPLE};

/// Per-tick audio features
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FeatureVector {
    /// `max(waveform) / 128 - 1`, in [-1, 1)
    pub peak_amplitude: f32,

    /// Highest captured bin / 255, in [0, 1]
    pub low_band_energy: f32,

    /// Lowest captured bin / 255, in [0, 1]
    pub high_band_energy: f32,
}

impl FeatureVector {
    /// Spectral balance driving hue and lightness, in [-1, 1]
    pub fn color_factor(&self) -> f32 {
        self.high_band_energy - self.low_band_energy
    }
}

/// Reduce a tick's snapshots to features
///
/// The peak is the loudest sample (transient-sensitive, not RMS); the two
/// band energies are single-bin proxies taken from the spectrum's ends.
pub fn extract(waveform: WaveformSnapshot<'_>, spectrum: SpectrumSnapshot<'_>) -> FeatureVector {
    let peak = waveform
        .samples()
        .iter()
        .copied()
        .max()
        .unwrap_or(SILENT_SAMPLE);
    let bins = spectrum.bins();
    let last_bin = bins.last().copied().unwrap_or(SILENT_BIN);
    let first_bin = bins.first().copied().unwrap_or(SILENT_BIN);

    FeatureVector {
        peak_amplitude: peak as f32 / 128.0 - 1.0,
        low_band_energy: last_bin as f32 / 255.0,
        high_band_energy: first_bin as f32 / 255.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn features(waveform: &[u8], spectrum: &[u8]) -> FeatureVector {
        extract(WaveformSnapshot::new(waveform), SpectrumSnapshot::new(spectrum))
    }

    #[test]
    fn test_mid_scale_silence() {
        let f = features(&[SILENT_SAMPLE; 1024], &[0; 1024]);

        assert_eq!(f.peak_amplitude, 0.0);
        assert_eq!(f.color_factor(), 0.0);
    }

    #[test]
    fn test_floor_waveform_is_minus_one() {
        let f = features(&[0; 64], &[0; 64]);
        assert_eq!(f.peak_amplitude, -1.0);
    }

    #[test]
    fn test_single_transient_sets_peak() {
        let mut waveform = [SILENT_SAMPLE; 1024];
        waveform[300] = 255;
        let f = features(&waveform, &[0; 1024]);

        assert_relative_eq!(f.peak_amplitude, 0.9921875);
    }

    #[test]
    fn test_band_proxies_use_spectrum_ends() {
        let mut spectrum = [100u8; 16];
        spectrum[0] = 255;
        spectrum[15] = 51;
        let f = features(&[SILENT_SAMPLE; 16], &spectrum);

        assert_relative_eq!(f.high_band_energy, 1.0);
        assert_relative_eq!(f.low_band_energy, 0.2);
        assert_relative_eq!(f.color_factor(), 0.8);
    }

    #[test]
    fn test_features_bounded_over_all_byte_values() {
        for b in 0..=255u8 {
            let f = features(&[b; 4], &[b; 4]);
            assert!((-1.0..=1.0).contains(&f.peak_amplitude));
            assert!((0.0..=1.0).contains(&f.low_band_energy));
            assert!((0.0..=1.0).contains(&f.high_band_energy));
            assert!((-1.0..=1.0).contains(&f.color_factor()));
        }
    }
}
