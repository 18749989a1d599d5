//! Complex-to-magnitude reduction and the analysis frontend composing it
//! with the forward transform.

use num_traits::{Float, FromPrimitive};
use rustfft::FftNum;
use std::fmt;

use crate::simd;
use crate::tensor::{ComplexSpectrogram, MagnitudeSpectrogram, Waveform};
use crate::transform::ForwardTransform;
use crate::{ConfigError, ShapeError, TransformConfig};

/// Reduces a complex spectrogram to per-bin magnitudes, optionally downmixed
/// to a single channel.
///
/// The downmix averages magnitudes across the channel axis rather than
/// averaging complex bins before taking the magnitude, which preserves
/// spectral energy across channels with unrelated phase.
#[derive(Debug, Clone, Copy)]
pub struct SpectralMagnitude {
    mono: bool,
}

impl SpectralMagnitude {
    pub fn new(mono: bool) -> Self {
        Self { mono }
    }

    pub fn mono(&self) -> bool {
        self.mono
    }

    pub fn process<T: Float + 'static>(
        &self,
        spectrogram: &ComplexSpectrogram<T>,
    ) -> MagnitudeSpectrogram<T> {
        let batch = spectrogram.batch();
        let channels = spectrogram.channels();
        let freq_bins = spectrogram.freq_bins();
        let num_frames = spectrogram.num_frames();

        let mut magnitudes = vec![T::zero(); batch * channels * freq_bins * num_frames];
        simd::magnitudes_interleaved(spectrogram.data(), &mut magnitudes);

        if self.mono && channels > 1 {
            let plane = freq_bins * num_frames;
            let channels_t = T::from(channels).unwrap();
            let mut downmixed = vec![T::zero(); batch * plane];
            for b in 0..batch {
                for i in 0..plane {
                    let mut sum = T::zero();
                    for c in 0..channels {
                        sum = sum + magnitudes[(b * channels + c) * plane + i];
                    }
                    downmixed[b * plane + i] = sum / channels_t;
                }
            }
            MagnitudeSpectrogram::from_data(batch, 1, freq_bins, num_frames, downmixed)
        } else {
            MagnitudeSpectrogram::from_data(batch, channels, freq_bins, num_frames, magnitudes)
        }
    }
}

/// Analysis frontend: forward transform followed by magnitude reduction.
///
/// Pure inference-time analysis; constructed once per
/// `(n_fft, n_hop, sample_rate, num_channels)` tuple, with the mono downmix
/// derived from the channel count. Framing is uncentered, matching
/// training-time use where the output length never round-trips.
pub struct AnalysisFrontend<T: Float + FftNum> {
    stft: ForwardTransform<T>,
    norm: SpectralMagnitude,
    sample_rate: f64,
    num_channels: usize,
}

impl<T: Float + FftNum + FromPrimitive + fmt::Debug> AnalysisFrontend<T> {
    pub fn new(
        n_fft: usize,
        n_hop: usize,
        sample_rate: f64,
        num_channels: usize,
    ) -> Result<Self, ConfigError<T>> {
        let config = TransformConfig::new(n_fft, n_hop, false)?;
        Ok(Self {
            stft: ForwardTransform::new(config),
            norm: SpectralMagnitude::new(num_channels == 1),
            sample_rate,
            num_channels,
        })
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    pub fn stft(&self) -> &ForwardTransform<T> {
        &self.stft
    }

    pub fn norm(&self) -> &SpectralMagnitude {
        &self.norm
    }

    /// Encode a waveform to the magnitude spectrogram consumed by downstream
    /// estimators. Rejects waveforms whose channel count differs from the
    /// configured one.
    pub fn process(&self, input: &Waveform<T>) -> Result<MagnitudeSpectrogram<T>, ShapeError> {
        if input.channels() != self.num_channels {
            return Err(ShapeError::ChannelMismatch {
                expected: self.num_channels,
                actual: input.channels(),
            });
        }
        Ok(self.norm.process(&self.stft.process(input)?))
    }
}
