//! Headless renderer sinks for the per-tick output vector.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::RenderError;
use crate::pipeline::OutputParameterVector;
use crate::scheduler::Renderer;

/// Writes one JSON object per tick (JSON Lines)
pub struct JsonLinesRenderer<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLinesRenderer<BufWriter<File>> {
    /// Create (or truncate) `path`
    pub fn create(path: &Path) -> Result<Self, RenderError> {
        let file = File::create(path)?;
        log::info!("Writing frames to {}", path.display());
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> Renderer for JsonLinesRenderer<W> {
    fn render(&mut self, _time_s: f32, params: &OutputParameterVector) -> Result<(), RenderError> {
        serde_json::to_writer(&mut self.writer, params)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RenderError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Logs a one-line summary every `every` ticks
pub struct LogRenderer {
    every: u64,
    frames: u64,
}

impl LogRenderer {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frames: 0,
        }
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, time_s: f32, params: &OutputParameterVector) -> Result<(), RenderError> {
        self.frames += 1;
        if (self.frames - 1) % self.every != 0 {
            return Ok(());
        }

        let beams: Vec<String> = params
            .lights
            .iter()
            .filter_map(|l| {
                l.angle_rad
                    .map(|a| format!("{}={:.3}rad/{:.2}", l.name, a, l.intensity))
            })
            .collect();
        log::info!(
            "t={:.2}s audio={:.3} color=({:.2}, {:.2}, {:.2}) {}",
            time_s,
            params.audio_factor,
            params.color.x,
            params.color.y,
            params.color.z,
            beams.join(" ")
        );
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RenderError> {
        log::info!("Rendered {} frames", self.frames);
        Ok(())
    }
}
