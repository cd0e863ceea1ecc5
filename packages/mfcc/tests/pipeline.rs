//! End-to-end tests for the MFCC front-end.
//
//  Run with `cargo test -p fluent_voice_mfcc --test pipeline`
//

use fluent_voice_mfcc::{
    CepstralMeanNormalizer, MfccConfig, MfccError, MfccPipeline, PipelineState,
};
use ndarray::{Array1, Axis};
use std::f64::consts::PI;
use std::io::Write;

/* ───────────────────────────── helpers ────────────────────────────── */

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sine(freq: f64, sample_rate: u32, len: usize, amp: f64) -> Vec<f64> {
    (0..len)
        .map(|n| amp * (2.0 * PI * freq * n as f64 / f64::from(sample_rate)).sin())
        .collect()
}

fn argmax(v: &Array1<f64>) -> usize {
    v.iter()
        .enumerate()
        .fold((0, f64::MIN), |best, (i, &x)| if x > best.1 { (i, x) } else { best })
        .0
}

fn pipeline() -> MfccPipeline {
    init_tracing();
    MfccPipeline::new(MfccConfig::default()).unwrap()
}

/* ───────────────────────────── frame layout ───────────────────────── */

#[test]
fn frame_count_follows_hop() {
    let p = pipeline();
    // hop = 100 samples
    assert_eq!(p.extract_log_mel(&vec![0.0f64; 16_000], 16_000).unwrap().nrows(), 161);
    assert_eq!(p.extract_log_mel(&vec![0.0f64; 16_050], 16_000).unwrap().nrows(), 161);

    // hop = 106.67 samples
    let p = MfccPipeline::new(MfccConfig {
        frame_rate: 150,
        ..MfccConfig::default()
    })
    .unwrap();
    assert_eq!(p.extract_cepstra(&vec![0.0f64; 1_000], 16_000).unwrap().nrows(), 10);
}

#[test]
fn silence_is_floored_not_infinite() {
    let p = pipeline();
    let log_mel = p.extract_log_mel(&vec![0i16; 3_200], 16_000).unwrap();
    let floor = fluent_voice_mfcc::LOG_ENERGY_FLOOR.ln();
    assert!(log_mel.iter().all(|&v| v.is_finite() && (v - floor).abs() < 1e-12));
}

/* ───────────────────────────── spectral content ───────────────────── */

#[test]
fn pure_tone_peaks_in_the_nearest_filter() {
    let p = pipeline();
    let centers = p.filterbank().center_frequencies().to_vec();

    for target in [10usize, 20, 30] {
        let freq = centers[target];
        let signal = sine(freq, 16_000, 16_000, 0.5);
        let log_mel = p.extract_log_mel(&signal, 16_000).unwrap();
        let average = log_mel.mean_axis(Axis(0)).unwrap();

        let nearest = centers
            .iter()
            .enumerate()
            .min_by(|a, b| (a.1 - freq).abs().total_cmp(&(b.1 - freq).abs()))
            .map(|(i, _)| i)
            .unwrap();

        assert_eq!(nearest, target);
        assert_eq!(argmax(&average), nearest, "tone at {freq:.1} Hz");
    }
}

#[test]
fn thousand_hertz_tone_lands_near_thousand_hertz_filter() {
    let p = pipeline();
    let signal = sine(1_000.0, 16_000, 16_000, 0.5);
    let average = p
        .extract_log_mel(&signal, 16_000)
        .unwrap()
        .mean_axis(Axis(0))
        .unwrap();
    let peak = p.filterbank().center_frequencies()[argmax(&average)];
    assert!((peak - 1_000.0).abs() < 100.0, "peak filter centred at {peak}");
}

/* ───────────────────────────── state isolation ────────────────────── */

#[test]
fn previous_signal_does_not_leak_into_the_next() {
    let p = pipeline();
    let a = vec![0.8f64; 4_000];
    let b = sine(440.0, 16_000, 4_000, 0.3);

    let standalone = p.extract_log_mel(&b, 16_000).unwrap();
    let _ = p.extract_log_mel(&a, 16_000).unwrap();
    let after_a = p.extract_log_mel(&b, 16_000).unwrap();
    assert_eq!(standalone, after_a);

    let cepstra_alone = p.extract_cepstra(&b, 16_000).unwrap();
    let _ = p.extract_cepstra(&a, 16_000).unwrap();
    assert_eq!(cepstra_alone, p.extract_cepstra(&b, 16_000).unwrap());
}

#[test]
fn carrying_state_across_signals_would_be_observable() {
    let p = pipeline();
    let fx = p.frame_extractor();
    let a = vec![0.8f64; 4_000];
    let b = sine(440.0, 16_000, 4_000, 0.3);
    let first_b = fx.next_frame(&b, 0);

    let mut leaked = PipelineState::new();
    p.frame_to_log_mel(&fx.next_frame(&a, 0), &mut leaked).unwrap();
    assert_eq!(leaked.prior(), 0.8);
    let with_leak = p.frame_to_log_mel(&first_b, &mut leaked).unwrap();

    let fresh = p.frame_to_log_mel(&first_b, &mut PipelineState::new()).unwrap();
    assert_ne!(with_leak, fresh);

    let standalone = p.extract_log_mel(&b, 16_000).unwrap();
    assert_eq!(standalone.row(0), fresh);
}

#[test]
fn pipeline_is_shareable_across_threads() {
    let p = pipeline();
    let signals: Vec<Vec<f64>> = (0..4)
        .map(|k| sine(300.0 + 200.0 * k as f64, 16_000, 8_000, 0.4))
        .collect();
    let expected: Vec<_> = signals
        .iter()
        .map(|s| p.extract_log_mel(s, 16_000).unwrap())
        .collect();

    let shared = &p;
    let got: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = signals
            .iter()
            .map(|s| scope.spawn(move || shared.extract_log_mel(s, 16_000).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(expected, got);
}

/* ───────────────────────────── post-processing / config ───────────── */

#[test]
fn mean_normalised_cepstra_have_zero_column_mean() {
    let p = pipeline();
    let signal = sine(700.0, 16_000, 12_000, 0.2);
    let cepstra = p.extract_cepstra(&signal, 16_000).unwrap();
    let centred = CepstralMeanNormalizer::normalize_to_new(&cepstra);
    for m in centred.mean_axis(Axis(0)).unwrap().iter() {
        assert!(m.abs() < 1e-9);
    }
}

#[test]
fn pipeline_from_toml_file() {
    init_tracing();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "sample_rate = 8000").unwrap();
    writeln!(file, "upper_frequency = 3800.0").unwrap();
    writeln!(file, "transform_size = 256").unwrap();
    writeln!(file, "frame_rate = 100").unwrap();
    writeln!(file, "filter_count = 24").unwrap();

    let cfg = MfccConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(cfg.frame_length(), 204);
    let p = MfccPipeline::new(cfg.clone()).unwrap();
    assert_eq!(p.filterbank().matrix().dim(), (129, 24));

    let out = p.extract_log_mel(&vec![0.1f32; 8_000], 8_000).unwrap();
    assert_eq!(out.dim(), (101, 24));

    let text = cfg.to_toml_string().unwrap();
    assert_eq!(MfccConfig::from_toml_str(&text).unwrap(), cfg);
}

#[test]
fn missing_config_file_is_an_io_error() {
    let err = MfccConfig::from_toml_file("/definitely/not/here.toml").unwrap_err();
    assert!(matches!(err, MfccError::Io(_)));
}
