//! **MfccPipeline** – waveform → log-mel spectrogram / Sphinx cepstra.
//!
//! 1. Normalize samples to `f64` (via [`Sample`]).
//! 2. Slice into frames, pre-emphasize, window ([`FrameExtractor`]).
//! 3. Power spectrum → clipped log filter-bank energies ([`SpectralAnalyzer`]).
//! 4. Optionally the legacy cepstral transform ([`CepstralTransform`]).
//!
//! The pipeline itself is immutable: every call builds a fresh
//! [`PipelineState`] and a private set of scratch buffers, so one pipeline can
//! serve many threads and no signal ever sees another signal's last sample.

use std::sync::Arc;

use ndarray::{Array1, Array2, ArrayView1};
use tracing::{debug, instrument, trace};

use crate::audio::Sample;
use crate::config::MfccConfig;
use crate::dct::{CepstralTransform, DctKind};
use crate::error::{InputError, Result};
use crate::filterbank::Filterbank;
use crate::frame::{FrameExtractor, PipelineState};
use crate::spectrum::{SpectralAnalyzer, SpectrumScratch};

/* ─────────────────────── per-signal buffers ─────────────────────── */

struct Workspace {
    conditioned: Vec<f64>,
    spectrum: SpectrumScratch,
    log_mel: Array1<f64>,
}

/* ─────────────────────────── pipeline ───────────────────────────── */

/// Feature extractor built once per [`MfccConfig`].
#[derive(Debug)]
pub struct MfccPipeline {
    config: MfccConfig,
    frames: FrameExtractor,
    analyzer: SpectralAnalyzer,
    cepstra: CepstralTransform,
}

impl MfccPipeline {
    /// Validate `config` and precompute the filter bank, window, FFT plan
    /// and cepstral basis.
    pub fn new(config: MfccConfig) -> Result<Self> {
        config.validate()?;
        let filterbank = Arc::new(Filterbank::new(&config)?);
        let frames = FrameExtractor::new(&config)?;
        let analyzer = SpectralAnalyzer::new(&config, filterbank)?;
        let cepstra =
            CepstralTransform::new(DctKind::Legacy, config.filter_count, config.cepstral_count)?;

        debug!(
            sample_rate = config.sample_rate,
            frame_length = frames.frame_length(),
            frame_shift = frames.frame_shift(),
            transform_size = config.transform_size,
            filters = config.filter_count,
            cepstra = config.cepstral_count,
            "mfcc pipeline ready"
        );

        Ok(Self {
            config,
            frames,
            analyzer,
            cepstra,
        })
    }

    #[inline]
    pub fn config(&self) -> &MfccConfig {
        &self.config
    }

    #[inline]
    pub fn filterbank(&self) -> &Filterbank {
        self.analyzer.filterbank()
    }

    #[inline]
    pub fn frame_extractor(&self) -> &FrameExtractor {
        &self.frames
    }

    #[inline]
    pub fn analyzer(&self) -> &SpectralAnalyzer {
        &self.analyzer
    }

    /// The legacy `filter_count → cepstral_count` transform used by
    /// [`extract_cepstra`](Self::extract_cepstra).
    #[inline]
    pub fn cepstral_transform(&self) -> &CepstralTransform {
        &self.cepstra
    }

    /// Log-mel spectrogram of `signal` (`frames × filter_count`).
    #[instrument(level = "debug", skip_all, fields(samples = signal.len(), format = ?S::FORMAT))]
    pub fn extract_log_mel<S: Sample>(&self, signal: &[S], sample_rate: u32) -> Result<Array2<f64>> {
        let samples = self.prepare(signal, sample_rate)?;
        let mut out = Array2::zeros((self.frames.frame_count(samples.len()), self.config.filter_count));
        self.for_each_log_mel(&samples, |i, log_mel| out.row_mut(i).assign(&log_mel));
        Ok(out)
    }

    /// Sphinx cepstra of `signal` (`frames × cepstral_count`).
    #[instrument(level = "debug", skip_all, fields(samples = signal.len(), format = ?S::FORMAT))]
    pub fn extract_cepstra<S: Sample>(&self, signal: &[S], sample_rate: u32) -> Result<Array2<f64>> {
        let samples = self.prepare(signal, sample_rate)?;
        let mut out = Array2::zeros((
            self.frames.frame_count(samples.len()),
            self.config.cepstral_count,
        ));
        self.for_each_log_mel(&samples, |i, log_mel| {
            self.cepstra.apply_into(&log_mel, out.row_mut(i));
        });
        Ok(out)
    }

    /// Log-mel energies of one raw frame, threading pre-emphasis through `state`.
    pub fn frame_to_log_mel(&self, raw_frame: &[f64], state: &mut PipelineState) -> Result<Array1<f64>> {
        self.check_frame(raw_frame)?;
        let mut ws = self.workspace();
        self.frames.condition(raw_frame, state, &mut ws.conditioned);
        self.analyzer
            .frame_to_log_mel_into(&ws.conditioned, &mut ws.spectrum, ws.log_mel.view_mut());
        Ok(ws.log_mel)
    }

    /// Sphinx cepstra of one raw frame, threading pre-emphasis through `state`.
    pub fn frame_to_cepstra(&self, raw_frame: &[f64], state: &mut PipelineState) -> Result<Array1<f64>> {
        let log_mel = self.frame_to_log_mel(raw_frame, state)?;
        self.cepstra.apply_vec(&log_mel)
    }

    /* -------- helpers ------------------------------------------------- */

    fn prepare<S: Sample>(&self, signal: &[S], sample_rate: u32) -> Result<Vec<f64>> {
        if sample_rate == 0 {
            return Err(InputError::SampleRate.into());
        }
        if sample_rate != self.config.sample_rate {
            return Err(InputError::SampleRateMismatch {
                given: sample_rate,
                expected: self.config.sample_rate,
            }
            .into());
        }
        if signal.is_empty() {
            return Err(InputError::EmptySignal.into());
        }
        Ok(crate::audio::normalize(signal))
    }

    fn check_frame(&self, raw_frame: &[f64]) -> Result<()> {
        if raw_frame.len() != self.frames.frame_length() {
            return Err(InputError::BadFrame {
                given: raw_frame.len(),
                expected: self.frames.frame_length(),
            }
            .into());
        }
        Ok(())
    }

    fn workspace(&self) -> Workspace {
        let frame_length = self.frames.frame_length();
        Workspace {
            conditioned: vec![0.0; frame_length],
            spectrum: self.analyzer.make_scratch(),
            log_mel: Array1::zeros(self.config.filter_count),
        }
    }

    // Runs every frame of `samples` through a fresh state and hands each
    // log-mel vector to `sink` in frame order.
    fn for_each_log_mel<F>(&self, samples: &[f64], mut sink: F)
    where
        F: FnMut(usize, ArrayView1<'_, f64>),
    {
        let mut state = PipelineState::new();
        let mut ws = self.workspace();
        let mut raw = vec![0.0; self.frames.frame_length()];
        let count = self.frames.frame_count(samples.len());
        trace!(frames = count, "extracting frames");

        for index in 0..count {
            self.frames.fill_frame(samples, index, &mut raw);
            self.frames.condition(&raw, &mut state, &mut ws.conditioned);
            self.analyzer
                .frame_to_log_mel_into(&ws.conditioned, &mut ws.spectrum, ws.log_mel.view_mut());
            sink(index, ws.log_mel.view());
        }
    }
}

/// One-shot log-mel extraction: builds a pipeline for `config` and runs it.
pub fn extract_log_mel<S: Sample>(signal: &[S], sample_rate: u32, config: &MfccConfig) -> Result<Array2<f64>> {
    MfccPipeline::new(config.clone())?.extract_log_mel(signal, sample_rate)
}

/// One-shot cepstral extraction: builds a pipeline for `config` and runs it.
pub fn extract_cepstra<S: Sample>(signal: &[S], sample_rate: u32, config: &MfccConfig) -> Result<Array2<f64>> {
    MfccPipeline::new(config.clone())?.extract_cepstra(signal, sample_rate)
}
