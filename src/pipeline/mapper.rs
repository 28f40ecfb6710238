//! Pure mapping functions from smoothed features to visual parameters.
//!
//! Nothing here holds state; the smoother owns every accumulator.

use glam::Vec3;

use crate::params::{BeamConfig, ColorCurve, PulseCurve};

/// Linear remap of `value` from `[in_min, in_max]` onto `[out_min, out_max]`
///
/// Unclamped: values outside the input range extrapolate. Callers guarantee
/// `in_min != in_max` (config validation rejects degenerate ranges).
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    out_min + (value - in_min) * (out_max - out_min) / (in_max - in_min)
}

/// [`map_range`] with the result held inside the output interval
///
/// Reversed output ranges are accepted.
pub fn map_range_clamped(
    value: f32,
    in_min: f32,
    in_max: f32,
    out_min: f32,
    out_max: f32,
) -> f32 {
    let (lo, hi) = ordered(out_min, out_max);
    map_range(value, in_min, in_max, out_min, out_max).clamp(lo, hi)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Oscillatory light intensity: `amplitude * sin(frequency * audio_factor) + offset`
pub fn pulse(curve: &PulseCurve, audio_factor: f32) -> f32 {
    curve.amplitude * (curve.frequency * audio_factor).sin() + curve.offset
}

/// HSL to RGB, all components in [0, 1]
///
/// Hue wraps around; saturation and lightness are clamped first.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Vec3 {
    let h = hue.rem_euclid(1.0);
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    if s == 0.0 {
        return Vec3::splat(l);
    }

    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Vec3::new(
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    )
    .clamp(Vec3::ZERO, Vec3::ONE)
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

/// Unsmoothed RGB target for a material given the spectral balance
pub fn color_target(curve: &ColorCurve, color_factor: f32) -> Vec3 {
    hsl_to_rgb(
        color_factor * curve.hue_scale,
        curve.saturation,
        color_factor * curve.lightness_scale + curve.lightness_offset,
    )
}

/// Cone angle the beam moves toward for a smoothed audio factor
pub fn beam_angle_target(beam: &BeamConfig, audio_factor: f32) -> f32 {
    map_range_clamped(
        audio_factor,
        beam.input_min,
        beam.input_max,
        beam.min_angle_rad,
        beam.max_angle_rad,
    )
}

/// Clamp a smoothed angle into the beam's configured range
pub fn beam_angle(beam: &BeamConfig, smoothed_angle: f32) -> f32 {
    let (lo, hi) = ordered(beam.min_angle_rad, beam.max_angle_rad);
    smoothed_angle.clamp(lo, hi)
}

/// Beam intensity: interpolated by where the smoothed angle sits in its range
pub fn beam_intensity(beam: &BeamConfig, smoothed_angle: f32) -> f32 {
    let t = map_range_clamped(
        smoothed_angle,
        beam.min_angle_rad,
        beam.max_angle_rad,
        0.0,
        1.0,
    );
    lerp(beam.min_intensity, beam.max_intensity, t)
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    fn beam() -> BeamConfig {
        BeamConfig {
            input_min: 0.0,
            input_max: 1.0,
            min_angle_rad: PI / 24.0,
            max_angle_rad: PI / 8.0,
            initial_angle_rad: PI / 6.0,
            min_intensity: 0.0,
            max_intensity: 5.0,
        }
    }

    #[test]
    fn test_map_range() {
        assert_relative_eq!(map_range(5.0, 0.0, 10.0, 0.0, 100.0), 50.0);
        assert_relative_eq!(map_range(0.0, 0.0, 10.0, 0.0, 100.0), 0.0);
        assert_relative_eq!(map_range(10.0, 0.0, 10.0, 0.0, 100.0), 100.0);
        // Reversed output, extrapolation
        assert_relative_eq!(map_range(0.25, 0.0, 1.0, 1.0, -1.0), 0.5);
        assert_relative_eq!(map_range(2.0, 0.0, 1.0, 0.0, 10.0), 20.0);
    }

    #[test]
    fn test_map_range_clamped() {
        assert_relative_eq!(map_range_clamped(2.0, 0.0, 1.0, 0.0, 10.0), 10.0);
        assert_relative_eq!(map_range_clamped(-1.0, 0.0, 1.0, 0.0, 10.0), 0.0);
        assert_relative_eq!(map_range_clamped(2.0, 0.0, 1.0, 10.0, 0.0), 0.0);
        assert_relative_eq!(map_range_clamped(0.5, 0.0, 1.0, 10.0, 0.0), 5.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(1.0, 3.0, 0.0), 1.0);
        assert_eq!(lerp(1.0, 3.0, 1.0), 3.0);
        assert_eq!(lerp(1.0, 3.0, 0.5), 2.0);
    }

    #[test]
    fn test_pulse_bounds() {
        let curve = PulseCurve::default();
        assert_relative_eq!(pulse(&curve, 0.0), 0.5);
        assert_relative_eq!(pulse(&curve, PI / 6.0), 1.5);

        for i in -100..=100 {
            let value = pulse(&curve, i as f32 / 50.0);
            assert!((-0.5..=1.5).contains(&value));
        }
    }

    #[test]
    fn test_hsl_primaries() {
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert_relative_eq!(red.x, 1.0);
        assert_relative_eq!(red.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(red.z, 0.0, epsilon = 1e-5);
        assert_relative_eq!(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5).y, 1.0);
        assert_relative_eq!(hsl_to_rgb(2.0 / 3.0, 1.0, 0.5).z, 1.0);
        assert_eq!(hsl_to_rgb(0.3, 0.0, 0.25), Vec3::splat(0.25));
        assert_eq!(hsl_to_rgb(0.7, 1.0, 1.0), Vec3::ONE);
        assert_eq!(hsl_to_rgb(0.7, 1.0, 0.0), Vec3::ZERO);
    }

    #[test]
    fn test_hsl_hue_wraps() {
        let a = hsl_to_rgb(-0.25, 1.0, 0.5);
        let b = hsl_to_rgb(0.75, 1.0, 0.5);
        assert_relative_eq!(a.x, b.x, epsilon = 1e-6);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-6);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-6);
    }

    #[test]
    fn test_color_target_stays_in_unit_cube() {
        for curve in [ColorCurve::primary(), ColorCurve::accent()] {
            for i in -20..=20 {
                let rgb = color_target(&curve, i as f32 / 20.0);
                assert!(rgb.cmpge(Vec3::ZERO).all() && rgb.cmple(Vec3::ONE).all());
            }
        }
    }

    #[test]
    fn test_silent_primary_color_is_dark_red() {
        // cf = 0 gives hue 0 and lightness 0.1
        let rgb = color_target(&ColorCurve::primary(), 0.0);
        assert_relative_eq!(rgb.x, 0.2);
        assert_relative_eq!(rgb.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(rgb.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_beam_angle_target_is_clamped_to_range() {
        let beam = beam();
        assert_relative_eq!(beam_angle_target(&beam, 0.0), PI / 24.0);
        assert_relative_eq!(beam_angle_target(&beam, 1.0), PI / 8.0);
        assert_relative_eq!(beam_angle_target(&beam, 5.0), PI / 8.0);
        assert_relative_eq!(beam_angle_target(&beam, -1.0), PI / 24.0);
    }

    #[test]
    fn test_beam_intensity_follows_angle() {
        let beam = beam();
        assert_relative_eq!(beam_intensity(&beam, PI / 24.0), 0.0, epsilon = 1e-6);
        assert_relative_eq!(beam_intensity(&beam, PI / 8.0), 5.0);
        assert_relative_eq!(beam_intensity(&beam, PI / 12.0), 2.5, epsilon = 1e-5);
        // Initial angle sits above the range
        assert_relative_eq!(beam_intensity(&beam, PI / 6.0), 5.0);
        assert_relative_eq!(beam_angle(&beam, PI / 6.0), PI / 8.0);
    }
}
