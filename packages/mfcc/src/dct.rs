//! Cosine transforms between log-mel spectra and cepstra.
//!
//! Every variant is a product with one cosine basis built by [`dct_matrix`]:
//!
//! | kind                          | basis (`in × out`)                       | scale     |
//! |-------------------------------|------------------------------------------|-----------|
//! | [`DctKind::Dct2Orthogonal`]   | `dct_matrix(N, K, π/N, true)`            | `√(2/N)`  |
//! | [`DctKind::Dct2`]             | `dct_matrix(N, K, π/N, false)`           | `2/N`     |
//! | [`DctKind::Dct3Orthogonal`]   | `dct_matrix(K, N, π/K, true)ᵗ`           | `√(2/K)`  |
//! | [`DctKind::Dct3`]             | `dct_matrix(K, N, π/K, false)ᵗ`, DC × ½  | `1`       |
//! | [`DctKind::Legacy`]           | Sphinx basis, filter 0 × ½               | `1/N`     |
//!
//! `N` is the input width and `K` the output width. The legacy transform is
//! the one Sphinx front-ends use for MFCCs; it is *not* a scaled DCT-II and
//! produces different coefficients.

use std::f64::consts::PI;

use ndarray::{Array1, Array2, ArrayBase, ArrayViewMut1, Data, Ix1, Ix2, linalg::general_mat_vec_mul};

use crate::constants::{DCT3_FIRST_COEFF_WEIGHT, LEGACY_FIRST_FILTER_WEIGHT};
use crate::error::{ConfigError, InputError, Result};

/// `N × K` cosine basis: `(n, k) = cos(freq_step · (n + 0.5) · k)`.
///
/// With `orthogonalize` the first column is scaled by `1/√2`.
pub fn dct_matrix(n: usize, k: usize, freq_step: f64, orthogonalize: bool) -> Array2<f64> {
    let mut m = Array2::from_shape_fn((n, k), |(row, col)| {
        (freq_step * (row as f64 + 0.5) * col as f64).cos()
    });
    if orthogonalize && k > 0 {
        m.column_mut(0).mapv_inplace(|v| v * std::f64::consts::FRAC_1_SQRT_2);
    }
    m
}

/// Sphinx cepstral basis, `cepstral_count × filter_count`:
/// `(i, j) = cos(π·i/filter_count · (j + 0.5))` with filter `j = 0` halved.
pub fn legacy_dct_matrix(filter_count: usize, cepstral_count: usize) -> Array2<f64> {
    legacy_basis(filter_count, cepstral_count).reversed_axes()
}

// filter_count × cepstral_count, ready for `log_mel · basis`
fn legacy_basis(filter_count: usize, cepstral_count: usize) -> Array2<f64> {
    let mut m = dct_matrix(filter_count, cepstral_count, PI / filter_count as f64, false);
    if filter_count > 0 {
        m.row_mut(0).mapv_inplace(|v| v * LEGACY_FIRST_FILTER_WEIGHT);
    }
    m
}

/// The cepstral transform variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DctKind {
    /// Orthogonal DCT-II (log spectrum → cepstrum).
    Dct2Orthogonal,
    /// DCT-II normalized by `2/N`, no orthogonalization.
    Dct2,
    /// Orthogonal DCT-III (cepstrum → log spectrum), inverse of [`Self::Dct2Orthogonal`].
    Dct3Orthogonal,
    /// Unnormalized DCT-III, inverse of [`Self::Dct2`].
    Dct3,
    /// Sphinx "not-quite-DCT".
    Legacy,
}

/// A cosine transform prepared for a fixed `input_len → output_len` shape.
///
/// Immutable after construction; build once and apply to every frame.
#[derive(Debug, Clone)]
pub struct CepstralTransform {
    kind: DctKind,
    basis: Array2<f64>, // [input][output]
    scale: f64,
}

impl CepstralTransform {
    /// Prepare `kind` mapping rows of `input_len` values to `output_len` values.
    pub fn new(kind: DctKind, input_len: usize, output_len: usize) -> std::result::Result<Self, ConfigError> {
        if input_len == 0 || output_len == 0 {
            return Err(ConfigError::BasisShape {
                rows: input_len,
                cols: output_len,
            });
        }
        let n = input_len;
        let k = output_len;
        let (basis, scale) = match kind {
            DctKind::Dct2Orthogonal => (
                dct_matrix(n, k, PI / n as f64, true),
                (2.0 / n as f64).sqrt(),
            ),
            DctKind::Dct2 => (dct_matrix(n, k, PI / n as f64, false), 2.0 / n as f64),
            DctKind::Dct3Orthogonal => (
                dct_matrix(k, n, PI / k as f64, true).reversed_axes(),
                (2.0 / k as f64).sqrt(),
            ),
            DctKind::Dct3 => {
                let mut m = dct_matrix(k, n, PI / k as f64, false);
                m.column_mut(0)
                    .mapv_inplace(|v| v * DCT3_FIRST_COEFF_WEIGHT);
                (m.reversed_axes(), 1.0)
            }
            DctKind::Legacy => (legacy_basis(n, k), 1.0 / n as f64),
        };
        Ok(Self { kind, basis, scale })
    }

    #[inline]
    pub fn kind(&self) -> DctKind {
        self.kind
    }

    /// Expected row width.
    #[inline]
    pub fn input_len(&self) -> usize {
        self.basis.nrows()
    }

    /// Produced row width.
    #[inline]
    pub fn output_len(&self) -> usize {
        self.basis.ncols()
    }

    /// The `input_len × output_len` basis (scale not applied).
    #[inline]
    pub fn basis(&self) -> &Array2<f64> {
        &self.basis
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Transform every row of `input`.
    pub fn apply<S: Data<Elem = f64>>(&self, input: &ArrayBase<S, Ix2>) -> Result<Array2<f64>> {
        self.check_width(input.ncols())?;
        Ok(input.dot(&self.basis) * self.scale)
    }

    /// Transform a single vector.
    pub fn apply_vec<S: Data<Elem = f64>>(&self, input: &ArrayBase<S, Ix1>) -> Result<Array1<f64>> {
        self.check_width(input.len())?;
        let mut out = Array1::zeros(self.output_len());
        self.apply_into(input, out.view_mut());
        Ok(out)
    }

    /// Transform `input` into `out` without allocating. Widths must match.
    pub(crate) fn apply_into<S: Data<Elem = f64>>(
        &self,
        input: &ArrayBase<S, Ix1>,
        mut out: ArrayViewMut1<'_, f64>,
    ) {
        general_mat_vec_mul(self.scale, &self.basis.t(), input, 0.0, &mut out);
    }

    fn check_width(&self, given: usize) -> Result<()> {
        if given != self.input_len() {
            return Err(InputError::Width {
                given,
                expected: self.input_len(),
            }
            .into());
        }
        Ok(())
    }
}

/// Log spectrum → `k` cepstra with the orthogonal DCT-II.
pub fn dct<S: Data<Elem = f64>>(input: &ArrayBase<S, Ix2>, k: usize) -> Result<Array2<f64>> {
    CepstralTransform::new(DctKind::Dct2Orthogonal, input.ncols(), k)?.apply(input)
}

/// Log spectrum → `k` cepstra with the `2/N`-normalized DCT-II.
pub fn dct2<S: Data<Elem = f64>>(input: &ArrayBase<S, Ix2>, k: usize) -> Result<Array2<f64>> {
    CepstralTransform::new(DctKind::Dct2, input.ncols(), k)?.apply(input)
}

/// Cepstra → `k` log-spectrum bins with the orthogonal DCT-III.
pub fn idct<S: Data<Elem = f64>>(input: &ArrayBase<S, Ix2>, k: usize) -> Result<Array2<f64>> {
    CepstralTransform::new(DctKind::Dct3Orthogonal, input.ncols(), k)?.apply(input)
}

/// Cepstra → `k` log-spectrum bins with the unnormalized DCT-III.
pub fn dct3<S: Data<Elem = f64>>(input: &ArrayBase<S, Ix2>, k: usize) -> Result<Array2<f64>> {
    CepstralTransform::new(DctKind::Dct3, input.ncols(), k)?.apply(input)
}

/// Log-mel spectrogram → `cepstral_count` Sphinx cepstra per frame.
pub fn logspec_to_cepstra<S: Data<Elem = f64>>(
    input: &ArrayBase<S, Ix2>,
    cepstral_count: usize,
) -> Result<Array2<f64>> {
    CepstralTransform::new(DctKind::Legacy, input.ncols(), cepstral_count)?.apply(input)
}
