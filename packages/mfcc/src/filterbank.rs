//! Mel-scale triangular filter bank.
//!
//! Filters are laid out in DFT-bin space: `filter_count + 2` edges are spaced
//! evenly on the mel scale between the configured lower and upper frequency,
//! every edge snaps to its nearest bin (ties to even) and each consecutive
//! `(left, center, right)` triple forms one triangle. Heights are
//! `2 / ((right - left) · bin_width)` so every filter integrates to one.

use ndarray::{Array1, Array2, ArrayView1};
use tracing::debug;

use crate::config::MfccConfig;
use crate::error::{ConfigError, Result};

/// Hz → mel (`2595 · log10(1 + f / 700)`).
#[inline]
pub fn mel(f: f64) -> f64 {
    2595.0 * (1.0 + f / 700.0).log10()
}

/// mel → Hz, inverse of [`mel`].
#[inline]
pub fn mel_inv(m: f64) -> f64 {
    700.0 * (10f64.powf(m / 2595.0) - 1.0)
}

/// Nearest DFT bin of `hz`, ties to even, clamped to the last of `bins`.
#[inline]
pub(crate) fn hz_to_bin(hz: f64, bin_width: f64, bins: usize) -> usize {
    ((hz / bin_width).round_ties_even() as usize).min(bins - 1)
}

/// Bin geometry of a single triangular filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterEdges {
    /// First bin of the support (value zero).
    pub left: usize,
    /// Peak bin.
    pub center: usize,
    /// Last bin of the support (value zero).
    pub right: usize,
    /// Peak value.
    pub height: f64,
}

/// Precomputed `(transform_size / 2 + 1) × filter_count` mel filter matrix.
#[derive(Debug, Clone)]
pub struct Filterbank {
    matrix: Array2<f64>, // [bin][filter]
    edges: Vec<FilterEdges>,
    center_frequencies: Vec<f64>,
}

impl Filterbank {
    /// Build the filter bank for `config`.
    pub fn new(config: &MfccConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        let bins = config.spectrum_bins();
        let nfilt = config.filter_count;
        let dfreq = config.bin_width();

        let mel_min = mel(config.lower_frequency);
        let mel_max = mel(config.upper_frequency);
        let dmel = (mel_max - mel_min) / (nfilt + 1) as f64;

        // filter edges in Hz
        let edge_hz: Vec<f64> = (0..nfilt + 2)
            .map(|i| mel_inv(mel_min + dmel * i as f64))
            .collect();

        let mut matrix = Array2::<f64>::zeros((bins, nfilt));
        let mut edges = Vec::with_capacity(nfilt);

        for (index, triple) in edge_hz.windows(3).enumerate() {
            let left = hz_to_bin(triple[0], dfreq, bins);
            let center = hz_to_bin(triple[1], dfreq, bins);
            let right = hz_to_bin(triple[2], dfreq, bins);
            if left == right {
                return Err(ConfigError::DegenerateFilter { index, bin: left });
            }

            let height = 2.0 / ((right - left) as f64 * dfreq);
            let mut column = matrix.column_mut(index);

            if center != left {
                let slope = height / (center - left) as f64;
                for bin in left + 1..center {
                    column[bin] = (bin - left) as f64 * slope;
                }
            }
            column[center] = height;
            if center != right {
                let slope = height / (center as f64 - right as f64);
                for bin in center + 1..right {
                    column[bin] = (bin as f64 - right as f64) * slope;
                }
            }

            edges.push(FilterEdges {
                left,
                center,
                right,
                height,
            });
        }

        let center_frequencies = edge_hz[1..=nfilt].to_vec();

        debug!(
            bins,
            filters = nfilt,
            lower_hz = config.lower_frequency,
            upper_hz = config.upper_frequency,
            "built mel filter bank"
        );

        Ok(Self {
            matrix,
            edges,
            center_frequencies,
        })
    }

    /// The `[bin, filter]` weight matrix.
    #[inline]
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Per-filter bin geometry, in filter order.
    #[inline]
    pub fn filters(&self) -> &[FilterEdges] {
        &self.edges
    }

    /// Un-snapped center frequency of every filter (Hz).
    #[inline]
    pub fn center_frequencies(&self) -> &[f64] {
        &self.center_frequencies
    }

    #[inline]
    pub fn filter_count(&self) -> usize {
        self.matrix.ncols()
    }

    #[inline]
    pub fn bin_count(&self) -> usize {
        self.matrix.nrows()
    }

    /// Project a power spectrum (`bin_count` values) onto the filters.
    #[inline]
    pub fn apply(&self, power: ArrayView1<'_, f64>) -> Array1<f64> {
        power.dot(&self.matrix)
    }
}

/// Build the mel filter bank for `config`.
pub fn build_filterbank(config: &MfccConfig) -> Result<Filterbank> {
    Ok(Filterbank::new(config)?)
}
