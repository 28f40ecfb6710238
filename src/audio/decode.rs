//! WAV decoding into an in-memory mono clip.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::AudioError;

/// Decoded mono audio held in memory
#[derive(Debug, Clone)]
pub struct Clip {
    samples: Arc<[f32]>,
    sample_rate: u32,
}

impl Clip {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples: samples.into(),
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Cheap shared handle to the sample data (for the audio callback)
    pub fn shared_samples(&self) -> Arc<[f32]> {
        Arc::clone(&self.samples)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Audio asset a transport decodes when playback is triggered
#[derive(Debug, Clone)]
pub enum ClipAsset {
    /// WAV file decoded on `play`
    Path(PathBuf),
    /// Already decoded clip
    Decoded(Clip),
}

impl ClipAsset {
    pub fn load(&self) -> Result<Clip, AudioError> {
        match self {
            Self::Path(path) => decode_wav(path),
            Self::Decoded(clip) => Ok(clip.clone()),
        }
    }
}

/// Decode a WAV file, downmixing to mono
pub fn decode_wav(path: &Path) -> Result<Clip, AudioError> {
    let file = std::fs::File::open(path).map_err(|e| AudioError::Decode {
        label: path.display().to_string(),
        reason: e.to_string(),
    })?;
    decode_wav_reader(std::io::BufReader::new(file), &path.display().to_string())
}

/// Decode WAV data from any reader; `label` names the asset in errors
pub fn decode_wav_reader<R: Read>(reader: R, label: &str) -> Result<Clip, AudioError> {
    let decode_err = |reason: String| AudioError::Decode {
        label: label.to_string(),
        reason,
    };

    let reader = hound::WavReader::new(reader).map_err(|e| decode_err(e.to_string()))?;
    let spec = reader.spec();
    if spec.channels == 0 || spec.sample_rate == 0 {
        return Err(decode_err(format!(
            "unsupported format: {} channels @ {}Hz",
            spec.channels, spec.sample_rate
        )));
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| decode_err(e.to_string()))?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()
                .map_err(|e| decode_err(e.to_string()))?
        }
    };

    let channels = spec.channels as usize;
    let mono: Vec<f32> = interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();

    if mono.is_empty() {
        return Err(decode_err("no audio frames".to_string()));
    }

    log::info!(
        "Decoded {}: {} frames, {} channel(s) @ {}Hz ({:.1}s)",
        label,
        mono.len(),
        spec.channels,
        spec.sample_rate,
        mono.len() as f32 / spec.sample_rate as f32
    );

    Ok(Clip::new(mono, spec.sample_rate))
}
