//! fluent-voice MFCC – public crate root
//! ====================================
//! Sphinx-style **mel log-spectra and cepstra** for speech models.
//!
//! * [`Filterbank`] – triangular mel filters in DFT-bin space.
//! * [`FrameExtractor`] + [`PipelineState`] – framing, pre-emphasis, Hamming window.
//! * [`SpectralAnalyzer`] – power spectrum → clipped log filter-bank energies.
//! * [`CepstralTransform`] – orthogonal / normalized DCT-II & DCT-III and the
//!   legacy Sphinx transform.
//! * [`MfccPipeline`] – the composed front-end, single signal or batch.
//!
//! The crate performs no I/O on audio: callers hand it mono PCM in any
//! [`Sample`] type and receive dense `ndarray` matrices (rows = frames).
//!
//! ```no_run
//! use fluent_voice_mfcc::{MfccConfig, MfccPipeline};
//!
//! let pipeline = MfccPipeline::new(MfccConfig::default())?;
//! let pcm: Vec<i16> = vec![0; 16_000];
//! let log_mel = pipeline.extract_log_mel(&pcm, 16_000)?; // 161 × 40
//! let cepstra = pipeline.extract_cepstra(&pcm, 16_000)?; // 161 × 13
//! # Ok::<(), fluent_voice_mfcc::MfccError>(())
//! ```
#![deny(unsafe_code)]

/* ────────────────────────  sub-modules  ─────────────────────────────── */
pub mod audio;
pub mod batch;
pub mod config;
pub mod constants;
pub mod dct;
pub mod error;
pub mod filterbank;
pub mod frame;
pub mod normalizer;
pub mod pipeline;
pub mod spectrum;

/* ──────────────────────── public façade ─────────────────────────────── */
pub use audio::{Sample, SampleFormat};
pub use config::MfccConfig;
pub use constants::*;
pub use dct::{
    CepstralTransform, DctKind, dct, dct_matrix, dct2, dct3, idct, legacy_dct_matrix,
    logspec_to_cepstra,
};
pub use error::{ConfigError, InputError, MfccError, Result};
pub use filterbank::{FilterEdges, Filterbank, build_filterbank, mel, mel_inv};
pub use frame::{FrameExtractor, PipelineState, hamming};
pub use normalizer::CepstralMeanNormalizer;
pub use pipeline::{MfccPipeline, extract_cepstra, extract_log_mel};
pub use spectrum::{SpectralAnalyzer, SpectrumScratch};
