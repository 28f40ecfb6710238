//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::ScheduleConfig;
use crate::scheduler::{PlayTrigger, RunLimits};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "pulsesphere")]
#[command(about = "Audio-reactive shader and light parameters, one frame at a time", long_about = None)]
pub struct Args {
    /// WAV file to play and analyse (silence when omitted)
    #[arg(long, value_name = "FILE")]
    pub audio: Option<PathBuf>,

    /// TOML tuning file (missing fields keep their defaults)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub dump_config: bool,

    /// Audio transport: device (default), clock
    #[arg(long, value_name = "TRANSPORT", default_value = "device")]
    pub transport: String,

    /// Output sink: log (default), jsonl
    #[arg(long, value_name = "SINK", default_value = "log")]
    pub sink: String,

    /// JSON Lines output file (jsonl sink; stdout when omitted)
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Override the frame rate from the config file
    #[arg(long, value_name = "FPS")]
    pub fps: Option<u32>,

    /// Stop after this many seconds of frames
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f32>,

    /// Stop after this many frames
    #[arg(long, value_name = "COUNT")]
    pub frames: Option<u64>,

    /// Stop once the clip has finished playing
    #[arg(long)]
    pub exit_on_end: bool,

    /// Start playback when Enter is pressed instead of immediately
    #[arg(long)]
    pub wait_for_enter: bool,

    /// Log sink: summarize every N frames
    #[arg(long, value_name = "N", default_value = "60")]
    pub log_every: u64,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Which audio transport plays the clip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Default output device via cpal
    Device,
    /// Monotonic clock, no output device
    Clock,
}

/// Where frames go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    Log,
    JsonLines,
}

impl Args {
    /// Parse transport from command-line arguments
    pub fn parse_transport(&self) -> Transport {
        match self.transport.to_lowercase().as_str() {
            "device" => Transport::Device,
            "clock" => Transport::Clock,
            other => {
                log::warn!("Unknown transport '{}', using device", other);
                Transport::Device
            }
        }
    }

    /// Parse sink from command-line arguments
    pub fn parse_sink(&self) -> Sink {
        match self.sink.to_lowercase().as_str() {
            "log" => Sink::Log,
            "jsonl" | "json" => Sink::JsonLines,
            other => {
                log::warn!("Unknown sink '{}', using log", other);
                Sink::Log
            }
        }
    }

    /// Frame budget from `--frames` and `--duration` (the smaller wins)
    pub fn run_limits(&self, schedule: &ScheduleConfig) -> RunLimits {
        let from_duration = self.duration.map(|secs| schedule.frames_for(secs));
        let max_frames = match (self.frames, from_duration) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        RunLimits {
            max_frames,
            exit_on_end: self.exit_on_end,
        }
    }

    pub fn play_trigger(&self) -> PlayTrigger {
        if self.wait_for_enter {
            log::info!("Press Enter to start playback");
            PlayTrigger::on_stdin_line()
        } else {
            PlayTrigger::immediate()
        }
    }
}
