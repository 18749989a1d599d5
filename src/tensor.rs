//! Batched array containers with documented stride layouts.
//!
//! All containers own one contiguous row-major buffer. Leading batch and
//! channel axes are collapsed into flat row indices by arithmetic, never by
//! copying; the trailing axis is always contiguous.

use num_traits::Float;
use rustfft::num_complex::Complex;

/// Real waveform of shape `(batch, channels, samples)`.
///
/// Layout: `index(b, c, s) = (b * channels + c) * samples + s`.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform<T: Float> {
    batch: usize,
    channels: usize,
    samples: usize,
    data: Vec<T>,
}

impl<T: Float> Waveform<T> {
    pub fn zeros(batch: usize, channels: usize, samples: usize) -> Self {
        assert!(batch > 0, "batch must be greater than 0");
        assert!(channels > 0, "channels must be greater than 0");
        Self {
            batch,
            channels,
            samples,
            data: vec![T::zero(); batch * channels * samples],
        }
    }

    /// Wrap an existing planar buffer.
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` is not divisible by `batch * channels`.
    pub fn from_data(batch: usize, channels: usize, data: Vec<T>) -> Self {
        assert!(batch > 0, "batch must be greater than 0");
        assert!(channels > 0, "channels must be greater than 0");
        assert_eq!(
            data.len() % (batch * channels),
            0,
            "data length ({}) must be divisible by batch * channels ({})",
            data.len(),
            batch * channels
        );
        let samples = data.len() / (batch * channels);
        Self {
            batch,
            channels,
            samples,
            data,
        }
    }

    /// Build a single-batch waveform from interleaved PCM
    /// (e.g. `[L,R,L,R,...]` for stereo).
    ///
    /// # Panics
    ///
    /// Panics if `channels` is 0 or `interleaved.len()` is not divisible by
    /// `channels`.
    pub fn from_interleaved(channels: usize, interleaved: &[T]) -> Self {
        assert!(channels > 0, "channels must be greater than 0");
        assert_eq!(
            interleaved.len() % channels,
            0,
            "interleaved length ({}) must be divisible by channels ({})",
            interleaved.len(),
            channels
        );

        let samples = interleaved.len() / channels;
        let mut data = vec![T::zero(); interleaved.len()];
        for (i, &sample) in interleaved.iter().enumerate() {
            let c = i % channels;
            let s = i / channels;
            data[c * samples + s] = sample;
        }

        Self {
            batch: 1,
            channels,
            samples,
            data,
        }
    }

    /// Interleave back to PCM order. Single-batch only.
    ///
    /// # Panics
    ///
    /// Panics if `batch != 1`.
    pub fn to_interleaved(&self) -> Vec<T> {
        assert_eq!(self.batch, 1, "interleaving is defined for batch == 1");
        let mut interleaved = Vec::with_capacity(self.channels * self.samples);
        for s in 0..self.samples {
            for c in 0..self.channels {
                interleaved.push(self.data[c * self.samples + s]);
            }
        }
        interleaved
    }

    pub fn batch(&self) -> usize {
        self.batch
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Number of collapsed leading rows (`batch * channels`).
    pub fn rows(&self) -> usize {
        self.batch * self.channels
    }

    /// One collapsed row, i.e. the sample axis of `(b, c)` where
    /// `row = b * channels + c`.
    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.samples;
        &self.data[start..start + self.samples]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        let start = row * self.samples;
        &mut self.data[start..start + self.samples]
    }

    pub fn channel(&self, b: usize, c: usize) -> &[T] {
        self.row(b * self.channels + c)
    }

    pub fn channel_mut(&mut self, b: usize, c: usize) -> &mut [T] {
        let channels = self.channels;
        self.row_mut(b * channels + c)
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }
}

/// One-sided complex spectrogram of shape
/// `(batch, channels, freq_bins, frames, 2)`; the trailing axis holds the
/// interleaved `(re, im)` pair.
///
/// Layout: `pair(b, c, f, t) = (((b * channels + c) * freq_bins + f) * frames + t) * 2`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSpectrogram<T: Float> {
    batch: usize,
    channels: usize,
    freq_bins: usize,
    num_frames: usize,
    data: Vec<T>,
}

impl<T: Float> ComplexSpectrogram<T> {
    pub fn zeros(batch: usize, channels: usize, freq_bins: usize, num_frames: usize) -> Self {
        assert!(batch > 0, "batch must be greater than 0");
        assert!(channels > 0, "channels must be greater than 0");
        Self {
            batch,
            channels,
            freq_bins,
            num_frames,
            data: vec![T::zero(); batch * channels * freq_bins * num_frames * 2],
        }
    }

    /// Wrap an existing buffer in the layout above.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != batch * channels * freq_bins * frames * 2`.
    pub fn from_data(
        batch: usize,
        channels: usize,
        freq_bins: usize,
        num_frames: usize,
        data: Vec<T>,
    ) -> Self {
        assert!(batch > 0, "batch must be greater than 0");
        assert!(channels > 0, "channels must be greater than 0");
        assert_eq!(
            data.len(),
            batch * channels * freq_bins * num_frames * 2,
            "data length ({}) does not match shape ({}, {}, {}, {}, 2)",
            data.len(),
            batch,
            channels,
            freq_bins,
            num_frames
        );
        Self {
            batch,
            channels,
            freq_bins,
            num_frames,
            data,
        }
    }

    #[inline]
    fn pair_index(&self, row: usize, bin: usize, frame: usize) -> usize {
        ((row * self.freq_bins + bin) * self.num_frames + frame) * 2
    }

    #[inline]
    pub fn re(&self, b: usize, c: usize, bin: usize, frame: usize) -> T {
        self.data[self.pair_index(b * self.channels + c, bin, frame)]
    }

    #[inline]
    pub fn im(&self, b: usize, c: usize, bin: usize, frame: usize) -> T {
        self.data[self.pair_index(b * self.channels + c, bin, frame) + 1]
    }

    #[inline]
    pub fn get_complex(&self, b: usize, c: usize, bin: usize, frame: usize) -> Complex<T> {
        self.get_row_complex(b * self.channels + c, bin, frame)
    }

    #[inline]
    pub fn set_complex(&mut self, b: usize, c: usize, bin: usize, frame: usize, value: Complex<T>) {
        self.set_row_complex(b * self.channels + c, bin, frame, value);
    }

    /// Collapsed-row accessor, `row = b * channels + c`.
    #[inline]
    pub fn get_row_complex(&self, row: usize, bin: usize, frame: usize) -> Complex<T> {
        let idx = self.pair_index(row, bin, frame);
        Complex::new(self.data[idx], self.data[idx + 1])
    }

    #[inline]
    pub fn set_row_complex(&mut self, row: usize, bin: usize, frame: usize, value: Complex<T>) {
        let idx = self.pair_index(row, bin, frame);
        self.data[idx] = value.re;
        self.data[idx + 1] = value.im;
    }

    pub fn batch(&self) -> usize {
        self.batch
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn freq_bins(&self) -> usize {
        self.freq_bins
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    pub fn rows(&self) -> usize {
        self.batch * self.channels
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }
}

/// Real, non-negative magnitude spectrogram of shape
/// `(batch, channels_or_1, freq_bins, frames)`.
///
/// Layout: `index(b, c, f, t) = ((b * channels + c) * freq_bins + f) * frames + t`.
#[derive(Debug, Clone, PartialEq)]
pub struct MagnitudeSpectrogram<T: Float> {
    batch: usize,
    channels: usize,
    freq_bins: usize,
    num_frames: usize,
    data: Vec<T>,
}

impl<T: Float> MagnitudeSpectrogram<T> {
    pub fn zeros(batch: usize, channels: usize, freq_bins: usize, num_frames: usize) -> Self {
        assert!(batch > 0, "batch must be greater than 0");
        assert!(channels > 0, "channels must be greater than 0");
        Self {
            batch,
            channels,
            freq_bins,
            num_frames,
            data: vec![T::zero(); batch * channels * freq_bins * num_frames],
        }
    }

    /// # Panics
    ///
    /// Panics if `data.len() != batch * channels * freq_bins * frames`.
    pub fn from_data(
        batch: usize,
        channels: usize,
        freq_bins: usize,
        num_frames: usize,
        data: Vec<T>,
    ) -> Self {
        assert!(batch > 0, "batch must be greater than 0");
        assert!(channels > 0, "channels must be greater than 0");
        assert_eq!(
            data.len(),
            batch * channels * freq_bins * num_frames,
            "data length ({}) does not match shape ({}, {}, {}, {})",
            data.len(),
            batch,
            channels,
            freq_bins,
            num_frames
        );
        Self {
            batch,
            channels,
            freq_bins,
            num_frames,
            data,
        }
    }

    #[inline]
    pub fn value(&self, b: usize, c: usize, bin: usize, frame: usize) -> T {
        self.data[((b * self.channels + c) * self.freq_bins + bin) * self.num_frames + frame]
    }

    pub fn batch(&self) -> usize {
        self.batch
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn freq_bins(&self) -> usize {
        self.freq_bins
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }
}
