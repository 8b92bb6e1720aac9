pub mod audio;
pub mod convert;
pub mod instrument;
pub mod midi;
pub mod note;
pub mod speech;
mod util;
pub mod voice;

pub use instrument::{ConfigError, InstrumentOpts, SpeechInstrument};
