use std::sync::Arc;
use stft_codec::prelude::*;

#[test]
fn test_config_validation() {
    assert!(TransformConfig::<f32>::new(4096, 1024, false).is_ok());
    assert!(TransformConfig::<f32>::new(4096, 1024, true).is_ok());
    assert!(TransformConfig::<f32>::new(4, 2, false).is_ok());
}

#[test]
fn test_config_invalid_fft_size() {
    let config = TransformConfig::<f32>::new(0, 1024, false);
    assert!(matches!(config, Err(ConfigError::InvalidFftSize)));

    let config = TransformConfig::<f32>::new(4095, 1024, false);
    assert!(matches!(config, Err(ConfigError::InvalidFftSize)));
}

#[test]
fn test_config_invalid_hop_size() {
    let config = TransformConfig::<f32>::new(4096, 0, false);
    assert!(matches!(config, Err(ConfigError::InvalidHopSize)));

    let config = TransformConfig::<f32>::new(4096, 5000, false);
    assert!(matches!(config, Err(ConfigError::InvalidHopSize)));
}

#[test]
fn test_config_nola_violation() {
    // hop == n_fft leaves gaps where the Hann window is zero
    let config = TransformConfig::<f32>::new(4096, 4096, false);
    assert!(matches!(config, Err(ConfigError::NolaViolation { .. })));

    // a length-2 Hann window is identically zero
    let config = TransformConfig::<f32>::new(2, 1, false);
    assert!(matches!(config, Err(ConfigError::NolaViolation { .. })));
}

#[test]
fn test_window_length_mismatch() {
    let config = TransformConfig::<f32>::new(4096, 1024, false).unwrap();
    let wrong = Arc::new(WindowTable::hann(2048));

    let encoder = ForwardTransform::with_window(config.clone(), Arc::clone(&wrong));
    assert!(matches!(
        encoder,
        Err(ConfigError::WindowLengthMismatch {
            expected: 4096,
            actual: 2048
        })
    ));

    let decoder = InverseTransform::with_window(config, wrong);
    assert!(matches!(
        decoder,
        Err(ConfigError::WindowLengthMismatch { .. })
    ));
}
