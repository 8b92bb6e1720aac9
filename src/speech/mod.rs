//! Text to formant-synthesised speech.
//!
//! Text is tokenized into phoneme descriptors, each descriptor is rendered by
//! driving three resonators from a buzz/noise excitation, and the segments are
//! joined into one normalized phrase.

pub mod envelope;
pub mod native;
pub mod params;
pub mod phoneme;
pub mod phrase;
pub mod resonator;
pub mod segment;
pub mod tokenizer;

pub use native::{NativePcm, NativeSpeech, NativeSpeechError};
pub use params::{Parameter, SynthParams};
pub use phoneme::PhonemeDescriptor;
pub use phrase::PhraseBuilder;
pub use resonator::Resonator;
pub use segment::SegmentRenderer;
pub use tokenizer::tokenize;
