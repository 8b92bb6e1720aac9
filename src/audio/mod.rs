pub mod buffer;
pub mod phrase;
pub mod resample;

pub use phrase::{ExportError, RenderedPhrase, NORMALIZED_PEAK};
