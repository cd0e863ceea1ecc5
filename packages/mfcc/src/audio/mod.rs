pub mod audio_types;

/* handy re-exports */
pub use audio_types::{Sample, SampleFormat, normalize};
