//! pulsesphere library - audio-reactive visual parameter pipeline

pub mod audio;
pub mod cli;
pub mod error;
pub mod params;
pub mod pipeline;
pub mod render;
pub mod scheduler;
