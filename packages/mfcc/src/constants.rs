/// DEFAULT_SAMPLE_RATE is the sample rate (Hz) the default configuration expects.
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

/// DEFAULT_FRAME_RATE is the number of analysis frames per second of audio.
pub const DEFAULT_FRAME_RATE: u32 = 160;

/// DEFAULT_FRAME_DURATION is the analysis window length in seconds (409 samples @ 16 kHz).
pub const DEFAULT_FRAME_DURATION: f64 = 0.0256;

/// DEFAULT_TRANSFORM_SIZE is the DFT length every frame is zero-padded to.
pub const DEFAULT_TRANSFORM_SIZE: usize = 512;

/// DEFAULT_FILTER_COUNT is the number of triangular mel filters.
pub const DEFAULT_FILTER_COUNT: usize = 40;

/// DEFAULT_CEPSTRAL_COUNT is the number of cepstral coefficients kept per frame.
pub const DEFAULT_CEPSTRAL_COUNT: usize = 13;

/// DEFAULT_LOWER_FREQUENCY is the left edge (Hz) of the first mel filter.
pub const DEFAULT_LOWER_FREQUENCY: f64 = 133.3333;

/// DEFAULT_UPPER_FREQUENCY is the right edge (Hz) of the last mel filter.
pub const DEFAULT_UPPER_FREQUENCY: f64 = 6855.4976;

/// DEFAULT_PRE_EMPHASIS is the first-order high-pass coefficient applied to every frame.
pub const DEFAULT_PRE_EMPHASIS: f64 = 0.97;

/// LOG_ENERGY_FLOOR clips filter-bank energies before the natural log.
pub const LOG_ENERGY_FLOOR: f64 = 1e-5;

/// LEGACY_FIRST_FILTER_WEIGHT is the weight of filter 0 in the Sphinx cepstral transform.
pub(crate) const LEGACY_FIRST_FILTER_WEIGHT: f64 = 0.5;

/// DCT3_FIRST_COEFF_WEIGHT halves the DC term of the unnormalized DCT-III.
pub(crate) const DCT3_FIRST_COEFF_WEIGHT: f64 = 0.5;
