//! Batch extraction over independent signals.
//!
//! Each signal is processed with its own state and scratch buffers, so the
//! work is embarrassingly parallel: with the `rayon` feature (on by default
//! through `desktop`) signals run on the rayon pool, otherwise sequentially.
//! Results are returned in input order, one `Result` per signal.

use ndarray::Array2;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing::debug;

use crate::audio::Sample;
use crate::error::Result;
use crate::pipeline::MfccPipeline;

impl MfccPipeline {
    /// Log-mel spectrogram of every signal in `signals`.
    pub fn extract_log_mel_batch<S, T>(&self, signals: &[T], sample_rate: u32) -> Vec<Result<Array2<f64>>>
    where
        S: Sample,
        T: AsRef<[S]> + Sync,
    {
        debug!(signals = signals.len(), "batch log-mel extraction");
        self.map_signals(signals, |s| self.extract_log_mel(s, sample_rate))
    }

    /// Sphinx cepstra of every signal in `signals`.
    pub fn extract_cepstra_batch<S, T>(&self, signals: &[T], sample_rate: u32) -> Vec<Result<Array2<f64>>>
    where
        S: Sample,
        T: AsRef<[S]> + Sync,
    {
        debug!(signals = signals.len(), "batch cepstra extraction");
        self.map_signals(signals, |s| self.extract_cepstra(s, sample_rate))
    }

    fn map_signals<S, T, F>(&self, signals: &[T], extract: F) -> Vec<Result<Array2<f64>>>
    where
        S: Sample,
        T: AsRef<[S]> + Sync,
        F: Fn(&[S]) -> Result<Array2<f64>> + Sync + Send,
    {
        #[cfg(feature = "rayon")]
        {
            signals.par_iter().map(|s| extract(s.as_ref())).collect()
        }

        #[cfg(not(feature = "rayon"))]
        {
            signals.iter().map(|s| extract(s.as_ref())).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{MfccConfig, MfccError, MfccPipeline, error::InputError};

    #[test]
    fn batch_matches_individual_calls_in_order() {
        let p = MfccPipeline::new(MfccConfig::default()).unwrap();
        let signals: Vec<Vec<f64>> = (1..=6)
            .map(|k| (0..1_600 * k).map(|n| (n as f64 * 0.01 * k as f64).sin() * 0.2).collect())
            .collect();

        let batch = p.extract_log_mel_batch(&signals, 16_000);
        assert_eq!(batch.len(), signals.len());
        for (signal, result) in signals.iter().zip(batch) {
            assert_eq!(result.unwrap(), p.extract_log_mel(signal, 16_000).unwrap());
        }
    }

    #[test]
    fn one_bad_signal_does_not_poison_the_batch() {
        let p = MfccPipeline::new(MfccConfig::default()).unwrap();
        let signals: Vec<Vec<i16>> = vec![vec![100; 800], Vec::new(), vec![-100; 400]];
        let out = p.extract_cepstra_batch(&signals, 16_000);
        assert!(out[0].is_ok());
        assert!(matches!(
            out[1],
            Err(MfccError::InvalidInput(InputError::EmptySignal))
        ));
        assert_eq!(out[2].as_ref().unwrap().ncols(), 13);
    }
}
