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

//! Forward and inverse short-time Fourier transforms over batched
//! multichannel waveforms.

use num_traits::{Float, FromPrimitive};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftNum, FftPlanner};
use std::fmt;
use std::sync::Arc;

use crate::simd;
use crate::tensor::{ComplexSpectrogram, Waveform};
use crate::window::WindowTable;
use crate::{ConfigError, ShapeError, TransformConfig};

/// Reflect-pad `signal` by `pad_amount` samples on each side, mirroring
/// around the boundary samples without repeating them.
///
/// # Panics
///
/// Panics if `pad_amount >= signal.len()`.
pub fn reflect_pad<T: Float>(signal: &[T], pad_amount: usize) -> Vec<T> {
    assert!(
        pad_amount < signal.len(),
        "reflect padding of {} requires more than {} samples",
        pad_amount,
        pad_amount
    );

    let n = signal.len();
    let mut padded = vec![T::zero(); n + 2 * pad_amount];
    padded[pad_amount..pad_amount + n].copy_from_slice(signal);

    for i in 0..pad_amount {
        padded[pad_amount - 1 - i] = signal[i + 1];
        padded[pad_amount + n + i] = signal[n - 2 - i];
    }

    padded
}

/// Build an encoder/decoder pair sharing one analysis window, so the
/// reconstruction contract holds by construction.
pub fn make_transform_pair<T: Float + FftNum + FromPrimitive + fmt::Debug>(
    config: TransformConfig<T>,
) -> (ForwardTransform<T>, InverseTransform<T>) {
    let window = Arc::new(WindowTable::hann(config.n_fft));
    let encoder = ForwardTransform::with_window(config.clone(), Arc::clone(&window))
        .expect("Hann window always matches its own config");
    let decoder = InverseTransform::with_window(config, window)
        .expect("Hann window always matches its own config");
    (encoder, decoder)
}

/// Whether decoding `decoder(encoder(x))` is guaranteed to reconstruct `x`.
///
/// Logs a warning for every violated condition; a pair that fails this check
/// still processes data, it just cannot honor the reconstruction guarantee.
pub fn reconstruction_compatible<T: Float + FftNum + FromPrimitive + fmt::Debug>(
    encoder: &ForwardTransform<T>,
    decoder: &InverseTransform<T>,
) -> bool {
    let enc = encoder.config();
    let dec = decoder.config();
    let mut compatible = true;

    if enc.n_fft != dec.n_fft || enc.n_hop != dec.n_hop || enc.center != dec.center {
        log::warn!(
            "encoder ({}, {}, center={}) and decoder ({}, {}, center={}) disagree on configuration",
            enc.n_fft,
            enc.n_hop,
            enc.center,
            dec.n_fft,
            dec.n_hop,
            dec.center
        );
        compatible = false;
    }

    if !encoder.window().same_samples(decoder.window()) {
        log::warn!("encoder and decoder windows differ element-wise; reconstruction will be lossy");
        compatible = false;
    }

    compatible
}

/// STFT encoder: `(batch, channels, samples)` waveform to
/// `(batch, channels, freq_bins, frames, 2)` one-sided complex spectrogram.
pub struct ForwardTransform<T: Float + FftNum> {
    config: TransformConfig<T>,
    window: Arc<WindowTable<T>>,
    fft: Arc<dyn Fft<T>>,
}

impl<T: Float + FftNum + FromPrimitive + fmt::Debug> ForwardTransform<T> {
    pub fn new(config: TransformConfig<T>) -> Self {
        let window = Arc::new(WindowTable::hann(config.n_fft));
        Self::with_window(config, window).expect("Hann window always matches its own config")
    }

    /// Construct with an externally supplied window. The window must have
    /// length `n_fft` and satisfy the overlap condition at the configured hop.
    pub fn with_window(
        config: TransformConfig<T>,
        window: Arc<WindowTable<T>>,
    ) -> Result<Self, ConfigError<T>> {
        if window.len() != config.n_fft {
            return Err(ConfigError::WindowLengthMismatch {
                expected: config.n_fft,
                actual: window.len(),
            });
        }
        config.validate_nola(&window)?;

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.n_fft);

        Ok(Self {
            config,
            window,
            fft,
        })
    }

    pub fn config(&self) -> &TransformConfig<T> {
        &self.config
    }

    pub fn window(&self) -> &Arc<WindowTable<T>> {
        &self.window
    }

    /// Encode a batched waveform.
    ///
    /// Leading axes are collapsed to flat rows, each row is (optionally
    /// reflect-padded and) framed at stride `n_hop`, windowed and transformed,
    /// and the original leading-axis shape is restored on the output.
    pub fn process(&self, input: &Waveform<T>) -> Result<ComplexSpectrogram<T>, ShapeError> {
        let samples = input.samples();
        let required = self.config.min_input_len();
        if samples < required {
            return Err(ShapeError::InputTooShort { samples, required });
        }

        let n_fft = self.config.n_fft;
        let n_hop = self.config.n_hop;
        let freq_bins = self.config.freq_bins();
        let num_frames = self
            .config
            .num_frames(samples)
            .expect("length checked above");

        let mut result =
            ComplexSpectrogram::zeros(input.batch(), input.channels(), freq_bins, num_frames);
        let mut fft_buffer = vec![Complex::new(T::zero(), T::zero()); n_fft];
        let window = self.window.as_slice();

        for row in 0..input.rows() {
            let signal = input.row(row);
            let padded;
            let frames_src: &[T] = if self.config.center {
                padded = reflect_pad(signal, n_fft / 2);
                &padded
            } else {
                signal
            };

            for (frame_idx, frame_start) in (0..frames_src.len() - n_fft + 1)
                .step_by(n_hop)
                .enumerate()
            {
                // Apply window and prepare FFT input
                for i in 0..n_fft {
                    fft_buffer[i] =
                        Complex::new(frames_src[frame_start + i] * window[i], T::zero());
                }

                self.fft.process(&mut fft_buffer);

                // Keep the one-sided half
                for bin in 0..freq_bins {
                    result.set_row_complex(row, bin, frame_idx, fft_buffer[bin]);
                }
            }
        }

        Ok(result)
    }
}

/// ISTFT decoder: weighted overlap-add back to a
/// `(batch, channels, samples)` waveform.
pub struct InverseTransform<T: Float + FftNum> {
    config: TransformConfig<T>,
    window: Arc<WindowTable<T>>,
    ifft: Arc<dyn Fft<T>>,
}

impl<T: Float + FftNum + FromPrimitive + fmt::Debug> InverseTransform<T> {
    pub fn new(config: TransformConfig<T>) -> Self {
        let window = Arc::new(WindowTable::hann(config.n_fft));
        Self::with_window(config, window).expect("Hann window always matches its own config")
    }

    /// Construct with an externally supplied window; see
    /// [`ForwardTransform::with_window`].
    pub fn with_window(
        config: TransformConfig<T>,
        window: Arc<WindowTable<T>>,
    ) -> Result<Self, ConfigError<T>> {
        if window.len() != config.n_fft {
            return Err(ConfigError::WindowLengthMismatch {
                expected: config.n_fft,
                actual: window.len(),
            });
        }
        config.validate_nola(&window)?;

        let mut planner = FftPlanner::new();
        let ifft = planner.plan_fft_inverse(config.n_fft);

        Ok(Self {
            config,
            window,
            ifft,
        })
    }

    pub fn config(&self) -> &TransformConfig<T> {
        &self.config
    }

    pub fn window(&self) -> &Arc<WindowTable<T>> {
        &self.window
    }

    /// Decode a batched spectrogram.
    ///
    /// Each frame is expanded to the full conjugate-symmetric spectrum,
    /// inverse-transformed, windowed with the analysis window and
    /// overlap-added at stride `n_hop`; the sum is normalized per sample by
    /// the accumulated squared-window envelope. When `center` is set the
    /// `n_fft / 2` padding introduced by the encoder is stripped. `length`
    /// crops or zero-pads the result to an exact sample count.
    pub fn process(
        &self,
        spectrogram: &ComplexSpectrogram<T>,
        length: Option<usize>,
    ) -> Result<Waveform<T>, ShapeError> {
        let freq_bins = self.config.freq_bins();
        if spectrogram.freq_bins() != freq_bins {
            return Err(ShapeError::FreqBinMismatch {
                expected: freq_bins,
                actual: spectrogram.freq_bins(),
            });
        }
        let num_frames = spectrogram.num_frames();
        if num_frames == 0 {
            return Err(ShapeError::EmptySpectrogram);
        }

        let n_fft = self.config.n_fft;
        let n_hop = self.config.n_hop;
        let pad_amount = self.config.pad_amount();
        let padded_len = (num_frames - 1) * n_hop + n_fft;
        let full_len = padded_len - 2 * pad_amount;
        let out_len = length.unwrap_or(full_len);

        let window = self.window.as_slice();
        let threshold = T::from(1e-8).unwrap();
        let inv_n = T::one() / T::from(n_fft).unwrap();

        // The squared-window envelope depends only on frame count, not data
        let mut window_energy = vec![T::zero(); padded_len];
        for frame_idx in 0..num_frames {
            let pos = frame_idx * n_hop;
            simd::accumulate_windowed(window, window, &mut window_energy[pos..pos + n_fft]);
        }

        let mut result = Waveform::zeros(spectrogram.batch(), spectrogram.channels(), out_len);
        let mut ifft_buffer = vec![Complex::new(T::zero(), T::zero()); n_fft];
        let mut segment = vec![T::zero(); n_fft];
        let mut overlap = vec![T::zero(); padded_len];

        for row in 0..spectrogram.rows() {
            overlap.fill(T::zero());

            for frame_idx in 0..num_frames {
                for bin in 0..freq_bins {
                    ifft_buffer[bin] = spectrogram.get_row_complex(row, bin, frame_idx);
                }

                // Conjugate symmetry for negative frequencies (skip DC and Nyquist)
                for bin in 1..(freq_bins - 1) {
                    ifft_buffer[n_fft - bin] = ifft_buffer[bin].conj();
                }

                self.ifft.process(&mut ifft_buffer);

                for i in 0..n_fft {
                    segment[i] = ifft_buffer[i].re * inv_n;
                }

                let pos = frame_idx * n_hop;
                simd::accumulate_windowed(&segment, window, &mut overlap[pos..pos + n_fft]);
            }

            simd::normalize_by_energy(&mut overlap, &window_energy, threshold);

            // Strip the centering pad, then crop; any zero-pad tail is
            // already zeroed
            let copy_len = out_len.min(full_len);
            result.row_mut(row)[..copy_len]
                .copy_from_slice(&overlap[pad_amount..pad_amount + copy_len]);
        }

        Ok(result)
    }
}
