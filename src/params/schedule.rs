//! Frame scheduling configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tick cadence of the frame scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Display refresh rate the pipeline ticks at (FPS)
    /// Default: 60
    pub fps: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { fps: 60 }
    }
}

impl ScheduleConfig {
    /// Time between two ticks
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }

    /// Number of frames covering `duration_secs`
    pub fn frames_for(&self, duration_secs: f32) -> u64 {
        (duration_secs.max(0.0) * self.fps as f32).ceil() as u64
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::invalid("schedule.fps", "must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_budget() {
        let schedule = ScheduleConfig { fps: 60 };
        assert_eq!(schedule.frames_for(1.0), 60);
        assert_eq!(schedule.frames_for(0.51), 31);
        assert_eq!(schedule.frames_for(-3.0), 0);
    }

    #[test]
    fn test_zero_fps_rejected() {
        assert!(ScheduleConfig { fps: 0 }.validate().is_err());
    }
}
