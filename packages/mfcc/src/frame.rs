//! Framing, pre-emphasis and windowing.
//!
//! Frame `i` starts at `round(i · frame_shift)` (ties to even), recomputed
//! from the index so a fractional hop never accumulates drift. A signal of
//! `L` samples yields `floor(L / frame_shift) + 1` frames; frames running past
//! the end are zero-padded on the right.
//!
//! Pre-emphasis is the only cross-frame dependency. Its single sample of
//! memory lives in a caller-owned [`PipelineState`], never in the extractor,
//! so one [`FrameExtractor`] can serve any number of signals concurrently.

use std::f64::consts::PI;

use crate::config::MfccConfig;
use crate::error::{ConfigError, InputError, Result};

/// Hamming window of `len` samples (`[1.0]` for a single sample).
pub fn hamming(len: usize) -> Vec<f64> {
    if len == 1 {
        return vec![1.0];
    }
    let denom = (len - 1) as f64;
    (0..len)
        .map(|n| 0.54 - 0.46 * (2.0 * PI * n as f64 / denom).cos())
        .collect()
}

/// Per-signal pre-emphasis memory.
///
/// Holds the last raw sample of the previous frame. A fresh state (prior
/// `0.0`) must be used for every independent signal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PipelineState {
    prior: f64,
}

impl PipelineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last raw sample seen by pre-emphasis.
    #[inline]
    pub fn prior(&self) -> f64 {
        self.prior
    }

    /// Forget the previous frame.
    #[inline]
    pub fn reset(&mut self) {
        self.prior = 0.0;
    }
}

/// Slices signals into conditioned analysis frames.
#[derive(Debug, Clone)]
pub struct FrameExtractor {
    frame_length: usize,
    frame_shift: f64,
    alpha: f64,
    window: Vec<f64>,
}

impl FrameExtractor {
    pub fn new(config: &MfccConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let frame_length = config.frame_length();
        Ok(Self {
            frame_length,
            frame_shift: config.frame_shift(),
            alpha: config.pre_emphasis,
            window: hamming(frame_length),
        })
    }

    /// Samples per frame.
    #[inline]
    pub fn frame_length(&self) -> usize {
        self.frame_length
    }

    /// Hop between frame starts, in (fractional) samples.
    #[inline]
    pub fn frame_shift(&self) -> f64 {
        self.frame_shift
    }

    #[inline]
    pub fn window(&self) -> &[f64] {
        &self.window
    }

    /// Number of frames produced for a signal of `signal_len` samples.
    #[inline]
    pub fn frame_count(&self, signal_len: usize) -> usize {
        (signal_len as f64 / self.frame_shift) as usize + 1
    }

    /// First sample of frame `index`.
    #[inline]
    pub fn frame_start(&self, index: usize) -> usize {
        (index as f64 * self.frame_shift).round_ties_even() as usize
    }

    /// Copy raw frame `index` of `signal` into `out`, zero-padding the tail.
    ///
    /// `out` must be exactly [`frame_length`](Self::frame_length) long.
    pub(crate) fn fill_frame(&self, signal: &[f64], index: usize, out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.frame_length);
        let start = self.frame_start(index).min(signal.len());
        let end = (start + self.frame_length).min(signal.len());
        let taken = end - start;
        out[..taken].copy_from_slice(&signal[start..end]);
        out[taken..].fill(0.0);
    }

    /// Raw frame `index` of `signal`, zero-padded to the frame length.
    pub fn next_frame(&self, signal: &[f64], index: usize) -> Vec<f64> {
        let mut frame = vec![0.0; self.frame_length];
        self.fill_frame(signal, index, &mut frame);
        frame
    }

    /// First-order high-pass: `y[0] = raw[0] - α·prior`,
    /// `y[i] = raw[i] - α·raw[i-1]`. Afterwards `state` remembers `raw`'s
    /// last sample.
    pub fn pre_emphasize(&self, raw: &[f64], state: &mut PipelineState) -> Vec<f64> {
        let mut out = vec![0.0; raw.len()];
        self.pre_emphasize_into(raw, state, &mut out);
        out
    }

    // `out` must be as long as `raw`
    pub(crate) fn pre_emphasize_into(&self, raw: &[f64], state: &mut PipelineState, out: &mut [f64]) {
        debug_assert_eq!(raw.len(), out.len());
        let Some(&last) = raw.last() else {
            return;
        };
        out[0] = raw[0] - self.alpha * state.prior;
        for i in 1..raw.len() {
            out[i] = raw[i] - self.alpha * raw[i - 1];
        }
        state.prior = last;
    }

    /// Multiply `frame` (exactly one frame long) by the Hamming window in place.
    pub fn apply_window(&self, frame: &mut [f64]) -> Result<()> {
        if frame.len() != self.frame_length {
            return Err(InputError::BadFrame {
                given: frame.len(),
                expected: self.frame_length,
            }
            .into());
        }
        self.window_in_place(frame);
        Ok(())
    }

    #[inline]
    fn window_in_place(&self, frame: &mut [f64]) {
        for (x, &w) in frame.iter_mut().zip(&self.window) {
            *x *= w;
        }
    }

    /// Pre-emphasize then window `raw` into `out` (same length as `raw`).
    pub(crate) fn condition(&self, raw: &[f64], state: &mut PipelineState, out: &mut [f64]) {
        self.pre_emphasize_into(raw, state, out);
        self.window_in_place(out);
    }
}
