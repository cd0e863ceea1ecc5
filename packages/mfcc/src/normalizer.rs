//! Cepstral mean normalisation.
//!
//! Downstream models usually expect cepstra (or log-mel energies) to be
//! **mean-centred** per coefficient across an utterance. Both methods subtract
//! the per-column mean (µ) so every column of the `frames × coeffs` matrix has
//! zero mean.
//!
//! ```rust
//! use fluent_voice_mfcc::CepstralMeanNormalizer;
//! use ndarray::array;
//!
//! let mut frames = array![[1.0, 2.0], [3.0, 4.0]];
//! CepstralMeanNormalizer::normalize(&mut frames);
//! assert!((frames[[0, 0]] + frames[[1, 0]]).abs() < 1e-12); // ≈ 0
//! ```

use ndarray::{Array2, ArrayBase, Axis, Data, Ix2};

/// Stateless helper for mean-centering feature matrices.
pub struct CepstralMeanNormalizer;

impl CepstralMeanNormalizer {
    /// In-place mean-centre of `frames` (rows = frames).
    ///
    /// An empty matrix is left untouched.
    pub fn normalize(frames: &mut Array2<f64>) {
        if let Some(mean) = frames.mean_axis(Axis(0)) {
            *frames -= &mean;
        }
    }

    /// Allocate-new variant: returns a **new** matrix and leaves `frames` as is.
    pub fn normalize_to_new<S: Data<Elem = f64>>(frames: &ArrayBase<S, Ix2>) -> Array2<f64> {
        let mut out = frames.to_owned();
        Self::normalize(&mut out);
        out
    }
}

/* --------------------------------------------------------------------- */
/*  Unit-tests                                                           */
