//! Error taxonomy for the MFCC front-end.
//!
//! Configuration problems surface when a [`Filterbank`](crate::Filterbank),
//! [`CepstralTransform`](crate::CepstralTransform) or
//! [`MfccPipeline`](crate::MfccPipeline) is built; bad input surfaces at the
//! start of an extraction call, before any frame is touched.

use thiserror::Error;

/// Returned when an [`MfccConfig`](crate::MfccConfig) cannot describe a valid front-end.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Upper filter edge lies above half the sample rate.
    #[error("upper frequency {upper} Hz exceeds Nyquist {nyquist} Hz")]
    UpperAboveNyquist {
        /// Configured upper edge.
        upper: f64,
        /// `sample_rate / 2`.
        nyquist: f64,
    },
    /// Lower edge is negative or not below the upper edge.
    #[error("lower frequency {lower} Hz must be in [0, {upper}) Hz")]
    LowerFrequency {
        /// Configured lower edge.
        lower: f64,
        /// Configured upper edge.
        upper: f64,
    },
    /// Sample rate is zero.
    #[error("sample rate must be positive")]
    SampleRate,
    /// Frame rate is zero.
    #[error("frame rate must be positive")]
    FrameRate,
    /// Frame duration rounds down to zero samples.
    #[error("frame duration {duration} s yields an empty frame at {sample_rate} Hz")]
    FrameDuration {
        /// Configured duration in seconds.
        duration: f64,
        /// Configured sample rate.
        sample_rate: u32,
    },
    /// Transform size is not a power of two or is shorter than one frame.
    #[error("transform size {size} must be a power of two >= frame length {frame_length}")]
    TransformSize {
        /// Configured DFT length.
        size: usize,
        /// Frame length in samples.
        frame_length: usize,
    },
    /// No mel filters requested.
    #[error("filter count must be positive")]
    FilterCount,
    /// No cepstral coefficients requested.
    #[error("cepstral coefficient count must be positive")]
    CepstralCount,
    /// Pre-emphasis coefficient outside `[0, 1)`.
    #[error("pre-emphasis coefficient {0} must be in [0, 1)")]
    PreEmphasis(f64),
    /// Left and right edge of a filter land on the same DFT bin.
    #[error("mel filter {index} collapses onto DFT bin {bin}")]
    DegenerateFilter {
        /// Filter index.
        index: usize,
        /// The shared bin.
        bin: usize,
    },
    /// Filter bank was built for a different transform size.
    #[error("filter bank has {bins} bins, transform yields {expected}")]
    FilterbankShape {
        /// Rows of the supplied filter matrix.
        bins: usize,
        /// `transform_size / 2 + 1`.
        expected: usize,
    },
    /// A cosine basis was requested with a zero dimension.
    #[error("cosine basis dimensions must be positive (got {rows}x{cols})")]
    BasisShape {
        /// Input length.
        rows: usize,
        /// Output length.
        cols: usize,
    },
}

/// Returned when a signal or frame handed to the pipeline cannot be processed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// Signal has no samples.
    #[error("signal contains no samples")]
    EmptySignal,
    /// Sample rate supplied with the signal is zero.
    #[error("sample rate must be positive")]
    SampleRate,
    /// Signal sample rate differs from the one the pipeline was built for.
    #[error("signal sample rate {given} Hz does not match configured {expected} Hz")]
    SampleRateMismatch {
        /// Sample rate supplied with the signal.
        given: u32,
        /// Configured sample rate.
        expected: u32,
    },
    /// Frame length does not match the configured frame size.
    #[error("frame length ({given}) must equal configured frame size ({expected})")]
    BadFrame {
        /// The provided frame length.
        given: usize,
        /// The expected frame length.
        expected: usize,
    },
    /// Frame does not fit in the transform.
    #[error("frame length ({given}) exceeds transform size ({max})")]
    FrameTooLong {
        /// The provided frame length.
        given: usize,
        /// Transform size.
        max: usize,
    },
    /// Scratch buffers were made by an analyzer of another transform size.
    #[error("scratch sized for a {given}-point transform, analyzer uses {expected}")]
    Scratch {
        /// Transform size the scratch was made for.
        given: usize,
        /// Transform size of the analyzer.
        expected: usize,
    },
    /// Matrix column count does not match the transform's input length.
    #[error("input has {given} columns, transform expects {expected}")]
    Width {
        /// Columns supplied.
        given: usize,
        /// Columns the basis was built for.
        expected: usize,
    },
}

/// Crate-wide error.
#[derive(Debug, Error)]
pub enum MfccError {
    /// Configuration rejected while building a component.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    /// Signal, frame or matrix rejected at call time.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),
    /// Configuration file could not be read.
    #[error("config io: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration file is not valid TOML for [`MfccConfig`](crate::MfccConfig).
    #[error("config parse: {0}")]
    Toml(#[from] toml::de::Error),
    /// Configuration could not be rendered as TOML.
    #[error("config serialize: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Result alias used across the public API.
pub type Result<T> = std::result::Result<T, MfccError>;
