/*MIT License

Copyright (c) 2025 stft-codec contributors

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Batched multichannel time-frequency transform codec.
//!
//! A forward STFT encoder maps waveforms of shape `(batch, channels, samples)`
//! to one-sided complex spectrograms of shape
//! `(batch, channels, freq_bins, frames, 2)`; the inverse decoder reconstructs
//! the waveform via weighted overlap-add. When built with `center = true` and
//! decoded back to the original sample count, the pair is a perfect
//! reconstruction up to floating-point round-off. A magnitude stage with an
//! optional energy-preserving mono downmix serves as the analysis frontend
//! for downstream spectral estimators.

use num_traits::{Float, FromPrimitive};
use std::fmt;
use std::marker::PhantomData;

pub mod magnitude;
pub mod simd;
pub mod tensor;
pub mod transform;
pub mod window;

pub use magnitude::{AnalysisFrontend, SpectralMagnitude};
pub use tensor::{ComplexSpectrogram, MagnitudeSpectrogram, Waveform};
pub use transform::{
    make_transform_pair, reconstruction_compatible, reflect_pad, ForwardTransform,
    InverseTransform,
};
pub use window::WindowTable;

pub mod prelude {
    pub use crate::{
        make_transform_pair, reconstruction_compatible, AnalysisFrontend, ComplexSpectrogram,
        ConfigError, ForwardTransform, InverseTransform, MagnitudeSpectrogram, ShapeError,
        SpectralMagnitude, TransformConfig, Waveform, WindowTable,
    };
}

pub type TransformConfigF32 = TransformConfig<f32>;
pub type TransformConfigF64 = TransformConfig<f64>;
pub type ForwardTransformF32 = ForwardTransform<f32>;
pub type ForwardTransformF64 = ForwardTransform<f64>;
pub type InverseTransformF32 = InverseTransform<f32>;
pub type InverseTransformF64 = InverseTransform<f64>;
pub type AnalysisFrontendF32 = AnalysisFrontend<f32>;
pub type AnalysisFrontendF64 = AnalysisFrontend<f64>;

/// Construction-time misconfiguration. Raised before any data is processed.
#[derive(Debug, Clone)]
pub enum ConfigError<T: Float + fmt::Debug> {
    InvalidFftSize,
    InvalidHopSize,
    WindowLengthMismatch { expected: usize, actual: usize },
    NolaViolation { min_energy: T, threshold: T },
}

impl<T: Float + fmt::Display + fmt::Debug> fmt::Display for ConfigError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidFftSize => write!(f, "Invalid FFT size"),
            ConfigError::InvalidHopSize => write!(f, "Invalid hop size"),
            ConfigError::WindowLengthMismatch { expected, actual } => {
                write!(
                    f,
                    "Window length {} does not match FFT size {}",
                    actual, expected
                )
            }
            ConfigError::NolaViolation {
                min_energy,
                threshold,
            } => {
                write!(
                    f,
                    "NOLA condition violated: min_energy={} < threshold={}",
                    min_energy, threshold
                )
            }
        }
    }
}

impl<T: Float + fmt::Display + fmt::Debug> std::error::Error for ConfigError<T> {}

/// Call-time shape violation. Fatal to the single call; no state to corrupt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    InputTooShort { samples: usize, required: usize },
    FreqBinMismatch { expected: usize, actual: usize },
    EmptySpectrogram,
    ChannelMismatch { expected: usize, actual: usize },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::InputTooShort { samples, required } => {
                write!(
                    f,
                    "Input of {} samples is too short, need at least {}",
                    samples, required
                )
            }
            ShapeError::FreqBinMismatch { expected, actual } => {
                write!(f, "Expected {} frequency bins, got {}", expected, actual)
            }
            ShapeError::EmptySpectrogram => write!(f, "Spectrogram has no frames"),
            ShapeError::ChannelMismatch { expected, actual } => {
                write!(f, "Expected {} channels, got {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for ShapeError {}

/// Immutable transform configuration shared by an encoder/decoder pair.
///
/// `center` controls whether the signal is reflect-padded by `n_fft / 2` on
/// each side before framing. Centering is required to reconstruct the exact
/// input sample count; leaving it off reduces edge distortion when the
/// spectrogram only feeds an estimator and the output length does not matter.
#[derive(Debug, Clone)]
pub struct TransformConfig<T: Float> {
    pub n_fft: usize,
    pub n_hop: usize,
    pub center: bool,
    _phantom: PhantomData<T>,
}

impl<T: Float + FromPrimitive + fmt::Debug> TransformConfig<T> {
    fn nola_threshold() -> T {
        T::from(1e-8).unwrap()
    }

    pub fn new(n_fft: usize, n_hop: usize, center: bool) -> Result<Self, ConfigError<T>> {
        if n_fft < 2 || !n_fft.is_power_of_two() {
            return Err(ConfigError::InvalidFftSize);
        }
        if n_hop == 0 || n_hop > n_fft {
            return Err(ConfigError::InvalidHopSize);
        }

        let config = Self {
            n_fft,
            n_hop,
            center,
            _phantom: PhantomData,
        };

        config.validate_nola(&window::WindowTable::hann(n_fft))?;

        Ok(config)
    }

    /// Default: 4096 FFT, 1024 hop, centering off
    pub fn default_4096() -> Self {
        Self::new(4096, 1024, false).expect("Default config should always be valid")
    }

    pub fn freq_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Samples of reflect padding applied on each side before framing.
    pub fn pad_amount(&self) -> usize {
        if self.center {
            self.n_fft / 2
        } else {
            0
        }
    }

    /// Smallest input length the encoder accepts: one full frame when not
    /// centering, or enough samples to reflect-pad by `n_fft / 2`.
    pub fn min_input_len(&self) -> usize {
        if self.center {
            self.n_fft / 2 + 1
        } else {
            self.n_fft
        }
    }

    /// Frame count for an input of `samples`, or `None` if the input is
    /// shorter than [`min_input_len`](Self::min_input_len).
    pub fn num_frames(&self, samples: usize) -> Option<usize> {
        if samples < self.min_input_len() {
            return None;
        }
        let padded = samples + 2 * self.pad_amount();
        Some((padded - self.n_fft) / self.n_hop + 1)
    }

    /// Validate that the overlapped squared window leaves no gaps at the
    /// configured hop, so overlap-add normalization cannot divide by zero.
    pub fn validate_nola(&self, window: &window::WindowTable<T>) -> Result<(), ConfigError<T>> {
        let w = window.as_slice();
        let num_overlaps = (self.n_fft + self.n_hop - 1) / self.n_hop;
        let test_len = self.n_fft + (num_overlaps - 1) * self.n_hop;
        let mut energy = vec![T::zero(); test_len];

        for i in 0..num_overlaps {
            let offset = i * self.n_hop;
            for j in 0..self.n_fft {
                if offset + j < test_len {
                    energy[offset + j] = energy[offset + j] + w[j] * w[j];
                }
            }
        }

        // Check the steady-state region (skip edges)
        let start = self.n_fft / 2;
        let end = test_len - self.n_fft / 2;
        let min_energy = energy[start..end]
            .iter()
            .copied()
            .min_by(|a, b| a.partial_cmp(b).unwrap())
            .unwrap_or_else(T::zero);

        if min_energy < Self::nola_threshold() {
            return Err(ConfigError::NolaViolation {
                min_energy,
                threshold: Self::nola_threshold(),
            });
        }

        Ok(())
    }
}
