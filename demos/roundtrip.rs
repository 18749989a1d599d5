//! Example: encode a stereo waveform and reconstruct it exactly
//!
//! This example demonstrates:
//! - Building an encoder/decoder pair with a shared window
//! - The perfect-reconstruction contract with `center = true`
//! - Measuring reconstruction quality

use stft_codec::prelude::*;

/// Generate a test sine wave
fn generate_tone(freq: f32, duration_samples: usize, sample_rate: f32) -> Vec<f32> {
    (0..duration_samples)
        .map(|i| {
            let t = i as f32 / sample_rate;
            (2.0 * std::f32::consts::PI * freq * t).sin()
        })
        .collect()
}

fn calculate_snr(original: &[f32], reconstructed: &[f32]) -> f32 {
    let signal_power: f32 = original.iter().map(|x| x * x).sum();
    let noise_power: f32 = original
        .iter()
        .zip(reconstructed.iter())
        .map(|(o, r)| (o - r).powi(2))
        .sum();
    if noise_power == 0.0 {
        f32::INFINITY
    } else {
        10.0 * (signal_power / noise_power).log10()
    }
}

fn main() {
    env_logger::init();

    println!("=== Reconstruction Roundtrip Example ===\n");

    let sample_rate = 44100.0;
    let samples = 4 * 44100;

    let config = TransformConfig::<f32>::new(4096, 1024, true).unwrap();
    let (encoder, decoder) = make_transform_pair(config);
    assert!(reconstruction_compatible(&encoder, &decoder));

    let left = generate_tone(220.0, samples, sample_rate); // A3
    let right = generate_tone(440.0, samples, sample_rate); // A4
    let mut data = left.clone();
    data.extend_from_slice(&right);
    let original = Waveform::from_data(1, 2, data);

    println!("Input: {} samples per channel, stereo", samples);

    let spectrogram = encoder.process(&original).unwrap();
    println!(
        "Spectrogram: {} bins x {} frames per channel",
        spectrogram.freq_bins(),
        spectrogram.num_frames()
    );

    let reconstructed = decoder.process(&spectrogram, Some(samples)).unwrap();

    let snr_left = calculate_snr(&left, reconstructed.channel(0, 0));
    let snr_right = calculate_snr(&right, reconstructed.channel(0, 1));
    println!("Left channel SNR:  {:.2} dB", snr_left);
    println!("Right channel SNR: {:.2} dB", snr_right);
}
