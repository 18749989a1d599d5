mod common;

use std::sync::Arc;
use stft_codec::prelude::*;

#[test]
fn test_centered_roundtrip_exact_length() {
    let config = TransformConfig::<f32>::new(4096, 1024, true).unwrap();
    let (encoder, decoder) = make_transform_pair(config);

    // two channels, length a multiple of the hop
    let samples = 64 * 1024;
    let left: Vec<f32> = (0..samples).map(|i| (i as f32 * 0.01).sin() * 0.1).collect();
    let right: Vec<f32> = (0..samples).map(|i| (i as f32 * 0.013).cos() * 0.1).collect();
    let mut data = left.clone();
    data.extend_from_slice(&right);
    let original = Waveform::from_data(1, 2, data);

    let spectrogram = encoder.process(&original).unwrap();
    let reconstructed = decoder.process(&spectrogram, Some(samples)).unwrap();

    assert_eq!(reconstructed.samples(), samples);
    let err_left = common::max_abs_error(&left, reconstructed.channel(0, 0));
    let err_right = common::max_abs_error(&right, reconstructed.channel(0, 1));
    println!("roundtrip max error: left={:.2e} right={:.2e}", err_left, err_right);
    assert!(err_left < 1e-5, "left error too large: {:.2e}", err_left);
    assert!(err_right < 1e-5, "right error too large: {:.2e}", err_right);
}

#[test]
fn test_centered_roundtrip_without_length() {
    // with centering and a hop-aligned input, the decoded length already
    // matches the input without an explicit crop
    let config = TransformConfig::<f32>::new(2048, 512, true).unwrap();
    let (encoder, decoder) = make_transform_pair(config);

    let samples = 40 * 512;
    let signal: Vec<f32> = (0..samples).map(|i| (i as f32 * 0.02).sin() * 0.1).collect();
    let original = Waveform::from_data(1, 1, signal.clone());

    let spectrogram = encoder.process(&original).unwrap();
    let reconstructed = decoder.process(&spectrogram, None).unwrap();

    assert_eq!(reconstructed.samples(), samples);
    let err = common::max_abs_error(&signal, reconstructed.channel(0, 0));
    assert!(err < 1e-5, "error too large: {:.2e}", err);
}

#[test]
fn test_centered_roundtrip_f64() {
    let config = TransformConfig::<f64>::new(4096, 1024, true).unwrap();
    let (encoder, decoder) = make_transform_pair(config);

    let samples = 32 * 1024;
    let signal: Vec<f64> = (0..samples).map(|i| (i as f64 * 0.01).sin() * 0.5).collect();
    let original = Waveform::from_data(1, 1, signal.clone());

    let spectrogram = encoder.process(&original).unwrap();
    let reconstructed = decoder.process(&spectrogram, Some(samples)).unwrap();

    let max_err = signal
        .iter()
        .zip(reconstructed.channel(0, 0).iter())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0f64, f64::max);
    assert!(max_err < 1e-10, "f64 error too large: {:.2e}", max_err);
}

#[test]
fn test_batched_multichannel_roundtrip() {
    let config = TransformConfig::<f32>::new(4096, 1024, true).unwrap();
    let (encoder, decoder) = make_transform_pair(config);

    // batch of 2 stereo signals, distinct tone per row; length stays a
    // multiple of the hop so the decoded length lines up exactly
    let samples = 44 * 1024;
    let mut data = Vec::with_capacity(4 * samples);
    for i in 0..4 {
        data.extend(common::generate_tone(220.0 + 110.0 * i as f32, samples, 44100.0));
    }
    let original = Waveform::from_data(2, 2, data);

    let spectrogram = encoder.process(&original).unwrap();
    assert_eq!(spectrogram.batch(), 2);
    assert_eq!(spectrogram.channels(), 2);

    let reconstructed = decoder.process(&spectrogram, Some(samples)).unwrap();
    assert_eq!(reconstructed.batch(), 2);
    assert_eq!(reconstructed.channels(), 2);

    for b in 0..2 {
        for c in 0..2 {
            let snr = common::calculate_snr(original.channel(b, c), reconstructed.channel(b, c));
            println!("batch {} channel {} SNR: {:.2} dB", b, c, snr);
            assert!(snr > 100.0, "SNR too low: {:.2} dB", snr);
        }
    }
}

#[test]
fn test_length_crop_and_zero_pad() {
    let config = TransformConfig::<f32>::new(1024, 256, true).unwrap();
    let (encoder, decoder) = make_transform_pair(config);

    let samples = 20 * 256;
    let signal: Vec<f32> = (0..samples).map(|i| (i as f32 * 0.05).sin() * 0.1).collect();
    let original = Waveform::from_data(1, 1, signal.clone());
    let spectrogram = encoder.process(&original).unwrap();

    // crop
    let cropped = decoder.process(&spectrogram, Some(samples - 100)).unwrap();
    assert_eq!(cropped.samples(), samples - 100);
    let err = common::max_abs_error(&signal[..samples - 100], cropped.channel(0, 0));
    assert!(err < 1e-5);

    // zero-pad
    let padded = decoder.process(&spectrogram, Some(samples + 64)).unwrap();
    assert_eq!(padded.samples(), samples + 64);
    for &x in &padded.channel(0, 0)[samples..] {
        assert_eq!(x, 0.0, "padded tail must be zero");
    }
}

#[test]
fn test_uncentered_roundtrip_interior() {
    // without centering the edges lack full window overlap; the interior
    // still reconstructs exactly
    let config = TransformConfig::<f32>::new(4096, 1024, false).unwrap();
    let (encoder, decoder) = make_transform_pair(config);

    let samples = 32 * 1024;
    let signal: Vec<f32> = (0..samples).map(|i| (i as f32 * 0.01).sin() * 0.1).collect();
    let original = Waveform::from_data(1, 1, signal.clone());

    let spectrogram = encoder.process(&original).unwrap();
    let reconstructed = decoder.process(&spectrogram, Some(samples)).unwrap();

    let interior = 4096..samples - 4096;
    let err = common::max_abs_error(
        &signal[interior.clone()],
        &reconstructed.channel(0, 0)[interior],
    );
    assert!(err < 1e-5, "interior error too large: {:.2e}", err);
}

#[test]
fn test_reconstruction_compatible() {
    let config = TransformConfig::<f32>::new(4096, 1024, true).unwrap();
    let (encoder, decoder) = make_transform_pair(config.clone());
    assert!(reconstruction_compatible(&encoder, &decoder));

    // hop disagreement
    let other = TransformConfig::<f32>::new(4096, 512, true).unwrap();
    let mismatched = InverseTransform::new(other);
    assert!(!reconstruction_compatible(&encoder, &mismatched));

    // same config, element-wise different window
    let mut altered = WindowTable::<f32>::hann(4096).as_slice().to_vec();
    altered[100] += 1e-3;
    let altered_decoder =
        InverseTransform::with_window(config, Arc::new(WindowTable::from_samples(altered)))
            .unwrap();
    assert!(!reconstruction_compatible(&encoder, &altered_decoder));
}
