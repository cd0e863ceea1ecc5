//! PCM scalar types accepted by the front-end.
//
//  • Every variant names its width explicitly (`I16`, `F32`, …).
//  • `Sample` is implemented via a macro for each scalar type; integer
//    types are scaled by their positive maximum so `MAX` maps to `1.0`.

/* ─────────────────────────────── ENUMS ─────────────────────────────── */

/// PCM sample encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleFormat {
    /// 8-bit signed integer samples.
    I8,
    /// 16-bit signed integer samples.
    I16,
    /// 32-bit signed integer samples.
    I32,
    /// 32-bit floating point samples.
    F32,
    /// 64-bit floating point samples.
    F64,
}

impl SampleFormat {
    /// Bits per scalar.
    #[inline]
    pub const fn bits(self) -> u16 {
        match self {
            Self::I8 => 8,
            Self::I16 => 16,
            Self::I32 | Self::F32 => 32,
            Self::F64 => 64,
        }
    }

    /// `true` for the fixed-point variants.
    #[inline]
    pub const fn is_int(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32)
    }
}

/* ──────────────────────────── TRAIT CORE ───────────────────────────── */

/// A scalar type accepted by the DSP pipeline.
///
/// *All* conversions are inline and panic-free.
pub trait Sample: Copy + PartialOrd + Send + Sync + 'static {
    /// The format of this sample type.
    const FORMAT: SampleFormat;
    /// Converts this sample to a normalized `f64`.
    fn into_f64(self) -> f64;
}

macro_rules! with_sample_type {
    ($ty:ty, $variant:ident, $to_f64:expr) => {
        impl Sample for $ty {
            const FORMAT: SampleFormat = SampleFormat::$variant;
            #[inline]
            fn into_f64(self) -> f64 {
                $to_f64(self)
            }
        }
    };
}

/* i8  */
with_sample_type!(i8, I8, |v: i8| f64::from(v) / f64::from(i8::MAX));
/* i16 */
with_sample_type!(i16, I16, |v: i16| f64::from(v) / f64::from(i16::MAX));
/* i32 */
with_sample_type!(i32, I32, |v: i32| f64::from(v) / f64::from(i32::MAX));
/* f32 */
with_sample_type!(f32, F32, f64::from);
/* f64 */
with_sample_type!(f64, F64, |v: f64| v);

/// Convert a slice of any [`Sample`] type into normalized `f64` samples.
pub fn normalize<S: Sample>(samples: &[S]) -> Vec<f64> {
    samples.iter().map(|s| s.into_f64()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_full_scale_maps_to_one() {
        assert_eq!(i16::MAX.into_f64(), 1.0);
        assert_eq!(i8::MAX.into_f64(), 1.0);
        assert_eq!(i32::MAX.into_f64(), 1.0);
        assert_eq!(0i16.into_f64(), 0.0);
        assert!((i16::MIN.into_f64() + 1.0).abs() < 1e-4);
    }

    #[test]
    fn floats_pass_through() {
        assert_eq!(0.25f32.into_f64(), 0.25);
        assert_eq!(normalize(&[-0.5f64, 0.5]), vec![-0.5, 0.5]);
        assert_eq!(<f32 as Sample>::FORMAT.bits(), 32);
        assert!(!SampleFormat::F64.is_int());
        assert!(SampleFormat::I16.is_int());
    }
}
