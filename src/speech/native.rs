use crate::audio::{
    resample::{resample, CubicInterpolator},
    RenderedPhrase,
};
use crate::convert::interleaved_to_mono;
use thiserror::Error;

/// Raw PCM produced by a platform speech engine.
#[derive(Clone, Debug, Default)]
pub struct NativePcm {
    pub sample_rate: u32,
    pub channels: u16,
    /// Interleaved samples between -1.0 and 1.0.
    pub samples: Vec<f32>,
}

/// A text-to-speech engine provided by the host platform.
///
/// Implementations may block; they are only ever called from the control path.
pub trait NativeSpeech: Send {
    /// Speaks `text`, preferably at `sample_rate`.
    fn synthesize(&self, text: &str, sample_rate: u32) -> Result<NativePcm, NativeSpeechError>;
}

#[derive(Error, Debug)]
pub enum NativeSpeechError {
    #[error("Native speech is not available on this platform")]
    Unavailable,
    #[error("Native speech failed: {0}")]
    Failed(String),
    #[error("Unsupported PCM format: {0}")]
    BadFormat(&'static str),
}

impl NativePcm {
    /// Downmixes and resamples the PCM into an unnormalized phrase at `sample_rate`.
    pub fn into_phrase(self, sample_rate: u32) -> Result<RenderedPhrase, NativeSpeechError> {
        let channels = match self.channels {
            1 | 2 => self.channels as usize,
            _ => return Err(NativeSpeechError::BadFormat("Unsupported number of channels")),
        };
        if self.sample_rate == 0 {
            return Err(NativeSpeechError::BadFormat("Zero sample rate"));
        }
        if self.samples.len() < channels {
            return Err(NativeSpeechError::BadFormat("No samples"));
        }

        let mut mono = Vec::with_capacity(self.samples.len() / channels);
        interleaved_to_mono(&self.samples, channels, &mut mono);
        let data = resample::<CubicInterpolator>(&mono, self.sample_rate, sample_rate);
        Ok(RenderedPhrase::new(sample_rate, data))
    }
}
