use super::buffer::{AudioBuffer, AudioBufferMut};
use std::io::{Seek, Write};
use thiserror::Error;

/// Peak amplitude every rendered phrase is normalized to.
pub const NORMALIZED_PEAK: f32 = 0.8;

/// A rendered, normalized mono phrase ready to be triggered.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedPhrase {
    sample_rate: u32,
    data: Box<[f32]>,
}

impl RenderedPhrase {
    pub fn new(sample_rate: u32, data: Vec<f32>) -> Self {
        Self {
            sample_rate,
            data: data.into_boxed_slice(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns the length of the phrase in samples.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the length of the phrase in seconds.
    pub fn duration(&self) -> f32 {
        self.data.len() as f32 / self.sample_rate as f32
    }

    pub fn samples(&self) -> &[f32] {
        &self.data
    }

    pub fn peak(&self) -> f32 {
        self.data.peak()
    }

    /// Normalizes the phrase such that the most extreme sample reaches `NORMALIZED_PEAK`.
    pub fn normalize(&mut self) {
        self.data.normalize(NORMALIZED_PEAK);
    }

    /// Writes the phrase as a mono 32-bit float WAV file.
    pub fn write_wav<W: Write + Seek>(&self, writer: W) -> Result<(), ExportError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut wav = hound::WavWriter::new(writer, spec)?;
        for &sample in self.data.iter() {
            wav.write_sample(sample)?;
        }
        wav.finalize()?;
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("WAV error: {0}")]
    WavError(hound::Error),
}

impl From<hound::Error> for ExportError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(inner) => ExportError::IoError(inner),
            other => ExportError::WavError(other),
        }
    }
}
