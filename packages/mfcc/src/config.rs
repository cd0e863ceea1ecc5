//! Front-end configuration.
//!
//! [`MfccConfig`] is immutable for the lifetime of a pipeline. Every derived
//! artifact (filter bank, Hamming window, FFT plan, cosine bases) is built from
//! it once and shared read-only. It (de)serializes from TOML so batch drivers
//! can keep their feature settings next to the rest of their configuration:
//!
//! ```toml
//! sample_rate = 16000
//! filter_count = 40
//! upper_frequency = 6855.4976
//! ```
//!
//! Any key that is left out takes its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CEPSTRAL_COUNT, DEFAULT_FILTER_COUNT, DEFAULT_FRAME_DURATION, DEFAULT_FRAME_RATE,
    DEFAULT_LOWER_FREQUENCY, DEFAULT_PRE_EMPHASIS, DEFAULT_SAMPLE_RATE, DEFAULT_TRANSFORM_SIZE,
    DEFAULT_UPPER_FREQUENCY,
};
use crate::error::{ConfigError, Result};

/// Parameters of the mel front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MfccConfig {
    /// Sample rate of the signals fed to the pipeline (Hz).
    pub sample_rate: u32,
    /// Analysis frames per second; the hop is `sample_rate / frame_rate` samples.
    pub frame_rate: u32,
    /// Analysis window length in seconds.
    pub frame_duration: f64,
    /// DFT length (power of two, at least one frame long).
    pub transform_size: usize,
    /// Number of triangular mel filters.
    pub filter_count: usize,
    /// Number of cepstral coefficients per frame.
    pub cepstral_count: usize,
    /// Left edge of the first filter (Hz).
    pub lower_frequency: f64,
    /// Right edge of the last filter (Hz), at most Nyquist.
    pub upper_frequency: f64,
    /// Pre-emphasis coefficient α in `[0, 1)`.
    pub pre_emphasis: f64,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            frame_rate: DEFAULT_FRAME_RATE,
            frame_duration: DEFAULT_FRAME_DURATION,
            transform_size: DEFAULT_TRANSFORM_SIZE,
            filter_count: DEFAULT_FILTER_COUNT,
            cepstral_count: DEFAULT_CEPSTRAL_COUNT,
            lower_frequency: DEFAULT_LOWER_FREQUENCY,
            upper_frequency: DEFAULT_UPPER_FREQUENCY,
            pre_emphasis: DEFAULT_PRE_EMPHASIS,
        }
    }
}

impl MfccConfig {
    /// Frame length in samples (`frame_duration · sample_rate`, truncated).
    #[inline]
    pub fn frame_length(&self) -> usize {
        (self.frame_duration * f64::from(self.sample_rate)) as usize
    }

    /// Hop between frame starts in samples. Not necessarily an integer.
    #[inline]
    pub fn frame_shift(&self) -> f64 {
        f64::from(self.sample_rate) / f64::from(self.frame_rate)
    }

    /// Width of one DFT bin in Hz.
    #[inline]
    pub fn bin_width(&self) -> f64 {
        f64::from(self.sample_rate) / self.transform_size as f64
    }

    /// Half the sample rate.
    #[inline]
    pub fn nyquist(&self) -> f64 {
        f64::from(self.sample_rate) / 2.0
    }

    /// Number of non-redundant bins of a real DFT (`transform_size / 2 + 1`).
    #[inline]
    pub fn spectrum_bins(&self) -> usize {
        self.transform_size / 2 + 1
    }

    /// Check every invariant the front-end relies on.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::SampleRate);
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::FrameRate);
        }
        if !(self.frame_duration > 0.0) || self.frame_length() == 0 {
            return Err(ConfigError::FrameDuration {
                duration: self.frame_duration,
                sample_rate: self.sample_rate,
            });
        }
        let frame_length = self.frame_length();
        if !self.transform_size.is_power_of_two() || self.transform_size < frame_length {
            return Err(ConfigError::TransformSize {
                size: self.transform_size,
                frame_length,
            });
        }
        if self.filter_count == 0 {
            return Err(ConfigError::FilterCount);
        }
        if self.cepstral_count == 0 {
            return Err(ConfigError::CepstralCount);
        }
        let nyquist = self.nyquist();
        if !(self.upper_frequency <= nyquist) {
            return Err(ConfigError::UpperAboveNyquist {
                upper: self.upper_frequency,
                nyquist,
            });
        }
        if !(self.lower_frequency >= 0.0 && self.lower_frequency < self.upper_frequency) {
            return Err(ConfigError::LowerFrequency {
                lower: self.lower_frequency,
                upper: self.upper_frequency,
            });
        }
        if !(0.0..1.0).contains(&self.pre_emphasis) {
            return Err(ConfigError::PreEmphasis(self.pre_emphasis));
        }
        Ok(())
    }

    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a TOML configuration file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}
