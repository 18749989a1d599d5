//! Example: magnitude analysis for a downstream estimator
//!
//! This example demonstrates:
//! - The analysis frontend composing forward transform and magnitude
//! - Mono downmix derived from the channel count
//! - Locating spectral peaks in the magnitude output

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

fn main() {
    env_logger::init();

    println!("=== Analysis Frontend Example ===\n");

    let sample_rate = 44100.0;
    let samples = 2 * 44100;

    let frontend = AnalysisFrontend::<f32>::new(4096, 1024, sample_rate as f64, 2).unwrap();

    let left = generate_tone(220.0, samples, sample_rate);
    let right = generate_tone(440.0, samples, sample_rate);
    let mut data = left;
    data.extend_from_slice(&right);
    let wave = Waveform::from_data(1, 2, data);

    let magnitudes = frontend.process(&wave).unwrap();
    println!(
        "Magnitude spectrogram: ({}, {}, {}, {})",
        magnitudes.batch(),
        magnitudes.channels(),
        magnitudes.freq_bins(),
        magnitudes.num_frames()
    );

    // report the loudest bin per channel, converted to Hz
    let bin_hz = sample_rate / 4096.0;
    for c in 0..magnitudes.channels() {
        let frame = magnitudes.num_frames() / 2;
        let peak = (0..magnitudes.freq_bins())
            .max_by(|&a, &b| {
                magnitudes
                    .value(0, c, a, frame)
                    .partial_cmp(&magnitudes.value(0, c, b, frame))
                    .unwrap()
            })
            .unwrap();
        println!("Channel {} peak: bin {} (~{:.0} Hz)", c, peak, peak as f32 * bin_hz);
    }
}
