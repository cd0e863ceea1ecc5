//! Power spectrum → clipped log-mel energies.
//!
//! *No* heap allocation occurs per frame once a [`SpectrumScratch`] exists –
//! the FFT buffer, FFT scratch and power vector are allocated once per signal.

use std::sync::Arc;

use ndarray::{Array1, ArrayViewMut1, linalg::general_mat_vec_mul};
use rustfft::{Fft, FftPlanner, num_complex::Complex64};

use crate::config::MfccConfig;
use crate::constants::LOG_ENERGY_FLOOR;
use crate::error::{ConfigError, InputError, Result};
use crate::filterbank::Filterbank;

/// Per-signal buffers for [`SpectralAnalyzer`].
#[derive(Debug, Clone)]
pub struct SpectrumScratch {
    fft_buf: Vec<Complex64>,
    fft_scratch: Vec<Complex64>,
    power: Array1<f64>,
}

/// Computes frame power spectra and projects them through the filter bank.
///
/// Immutable after construction; share it behind `&` or `Arc` across threads.
pub struct SpectralAnalyzer {
    transform_size: usize,
    fft: Arc<dyn Fft<f64>>,
    filterbank: Arc<Filterbank>,
}

impl std::fmt::Debug for SpectralAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectralAnalyzer")
            .field("transform_size", &self.transform_size)
            .field("filters", &self.filterbank.filter_count())
            .finish()
    }
}

impl SpectralAnalyzer {
    /// Plan a forward FFT of `config.transform_size` points around `filterbank`.
    ///
    /// `filterbank` must have been built for the same transform size.
    pub fn new(config: &MfccConfig, filterbank: Arc<Filterbank>) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        if filterbank.bin_count() != config.spectrum_bins() {
            return Err(ConfigError::FilterbankShape {
                bins: filterbank.bin_count(),
                expected: config.spectrum_bins(),
            });
        }
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(config.transform_size);
        Ok(Self {
            transform_size: config.transform_size,
            fft,
            filterbank,
        })
    }

    #[inline]
    pub fn transform_size(&self) -> usize {
        self.transform_size
    }

    #[inline]
    pub fn filterbank(&self) -> &Filterbank {
        &self.filterbank
    }

    /// Allocate the buffers one signal needs.
    pub fn make_scratch(&self) -> SpectrumScratch {
        SpectrumScratch {
            fft_buf: vec![Complex64::ZERO; self.transform_size],
            fft_scratch: vec![Complex64::ZERO; self.fft.get_inplace_scratch_len()],
            power: Array1::zeros(self.transform_size / 2 + 1),
        }
    }

    /// `|DFT|²` of `windowed` zero-padded to the transform size, over the
    /// `transform_size / 2 + 1` non-redundant bins.
    ///
    /// `scratch` must come from this analyzer's [`make_scratch`](Self::make_scratch).
    pub fn power_spectrum<'s>(
        &self,
        windowed: &[f64],
        scratch: &'s mut SpectrumScratch,
    ) -> Result<&'s Array1<f64>> {
        self.check_frame(windowed)?;
        if scratch.fft_buf.len() != self.transform_size {
            return Err(InputError::Scratch {
                given: scratch.fft_buf.len(),
                expected: self.transform_size,
            }
            .into());
        }
        Ok(self.fill_power(windowed, scratch))
    }

    /// Log filter-bank energies of one windowed frame (`filter_count` values).
    pub fn frame_to_log_mel(&self, windowed: &[f64]) -> Result<Array1<f64>> {
        self.check_frame(windowed)?;
        let mut scratch = self.make_scratch();
        let mut out = Array1::zeros(self.filterbank.filter_count());
        self.frame_to_log_mel_into(windowed, &mut scratch, out.view_mut());
        Ok(out)
    }

    /// Log-mel energies of `windowed` written into `out`.
    ///
    /// Callers guarantee `windowed` fits the transform, `scratch` comes from
    /// [`make_scratch`](Self::make_scratch) and `out` holds `filter_count` values.
    pub(crate) fn frame_to_log_mel_into(
        &self,
        windowed: &[f64],
        scratch: &mut SpectrumScratch,
        mut out: ArrayViewMut1<'_, f64>,
    ) {
        let power = self.fill_power(windowed, scratch);
        general_mat_vec_mul(1.0, &self.filterbank.matrix().t(), power, 0.0, &mut out);
        out.mapv_inplace(|e| e.max(LOG_ENERGY_FLOOR).ln());
    }

    fn check_frame(&self, windowed: &[f64]) -> Result<()> {
        if windowed.len() > self.transform_size {
            return Err(InputError::FrameTooLong {
                given: windowed.len(),
                max: self.transform_size,
            }
            .into());
        }
        Ok(())
    }

    fn fill_power<'s>(&self, windowed: &[f64], scratch: &'s mut SpectrumScratch) -> &'s Array1<f64> {
        let SpectrumScratch {
            fft_buf,
            fft_scratch,
            power,
        } = scratch;

        // 1) real frame -> complex buffer, zero-padded
        for (dst, &x) in fft_buf.iter_mut().zip(windowed) {
            *dst = Complex64::new(x, 0.0);
        }
        fft_buf[windowed.len()..].fill(Complex64::ZERO);
        self.fft.process_with_scratch(fft_buf, fft_scratch);

        // 2) squared magnitude
        for (p, c) in power.iter_mut().zip(fft_buf.iter()) {
            *p = c.re * c.re + c.im * c.im;
        }
        power
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MfccError;

    fn analyzer() -> SpectralAnalyzer {
        let cfg = MfccConfig::default();
        let fb = Arc::new(Filterbank::new(&cfg).unwrap());
        SpectralAnalyzer::new(&cfg, fb).unwrap()
    }

    #[test]
    fn silence_hits_the_energy_floor() {
        let a = analyzer();
        let out = a.frame_to_log_mel(&vec![0.0; 409]).unwrap();
        assert_eq!(out.len(), 40);
        for v in out.iter() {
            assert!((v - LOG_ENERGY_FLOOR.ln()).abs() < 1e-12);
        }
    }

    #[test]
    fn impulse_has_flat_power_spectrum() {
        let a = analyzer();
        let mut scratch = a.make_scratch();
        let mut frame = vec![0.0; 409];
        frame[0] = 2.0;
        let power = a.power_spectrum(&frame, &mut scratch).unwrap();
        assert_eq!(power.len(), 257);
        assert!(power.iter().all(|&p| (p - 4.0).abs() < 1e-9));
    }

    #[test]
    fn log_mel_matches_explicit_product() {
        let a = analyzer();
        let frame: Vec<f64> = (0..409).map(|n| ((n * 7 % 13) as f64 - 6.0) / 6.0).collect();

        let mut scratch = a.make_scratch();
        let power = a.power_spectrum(&frame, &mut scratch).unwrap().clone();
        let expected = power
            .dot(a.filterbank().matrix())
            .mapv(|e| e.max(LOG_ENERGY_FLOOR).ln());

        let got = a.frame_to_log_mel(&frame).unwrap();
        for (g, e) in got.iter().zip(expected.iter()) {
            assert!((g - e).abs() < 1e-9);
        }
    }

    #[test]
    fn scratch_reuse_does_not_leak_between_frames() {
        let a = analyzer();
        let loud: Vec<f64> = (0..409).map(|n| (n as f64 * 0.3).sin()).collect();
        let quiet = vec![0.0; 409];

        let mut scratch = a.make_scratch();
        let mut out = Array1::zeros(40);
        a.frame_to_log_mel_into(&loud, &mut scratch, out.view_mut());
        a.frame_to_log_mel_into(&quiet, &mut scratch, out.view_mut());
        assert_eq!(out, a.frame_to_log_mel(&quiet).unwrap());
    }

    #[test]
    fn filterbank_for_another_transform_size_is_rejected() {
        let cfg = MfccConfig::default();
        let wide = Filterbank::new(&MfccConfig {
            transform_size: 1024,
            ..MfccConfig::default()
        })
        .unwrap();
        assert_eq!(
            SpectralAnalyzer::new(&cfg, Arc::new(wide)).unwrap_err(),
            ConfigError::FilterbankShape {
                bins: 513,
                expected: 257,
            }
        );
    }

    #[test]
    fn frame_longer_than_transform_is_invalid_input() {
        let a = analyzer();
        let long = vec![0.1; 600];
        assert!(matches!(
            a.frame_to_log_mel(&long),
            Err(MfccError::InvalidInput(InputError::FrameTooLong { given: 600, max: 512 }))
        ));

        let mut scratch = a.make_scratch();
        assert!(matches!(
            a.power_spectrum(&long, &mut scratch),
            Err(MfccError::InvalidInput(InputError::FrameTooLong { given: 600, max: 512 }))
        ));

        // a frame filling the whole transform is fine
        assert!(a.frame_to_log_mel(&vec![0.1; 512]).is_ok());
    }

    #[test]
    fn scratch_from_another_analyzer_is_rejected() {
        let a = analyzer();
        let cfg = MfccConfig {
            transform_size: 1024,
            ..MfccConfig::default()
        };
        let wide = SpectralAnalyzer::new(&cfg, Arc::new(Filterbank::new(&cfg).unwrap())).unwrap();

        let mut foreign = wide.make_scratch();
        assert!(matches!(
            a.power_spectrum(&vec![0.0; 409], &mut foreign),
            Err(MfccError::InvalidInput(InputError::Scratch {
                given: 1024,
                expected: 512,
            }))
        ));
    }
}
