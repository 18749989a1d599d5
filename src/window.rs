//! Fixed analysis window shared by an encoder/decoder pair.

use num_traits::{Float, FromPrimitive};

/// Symmetric real-valued analysis window of length `n_fft`.
///
/// An encoder/decoder pair is only guaranteed to invert when both were built
/// from the identical window instance or an element-wise identical copy;
/// [`make_transform_pair`](crate::make_transform_pair) shares one table
/// between the two. The table never mutates after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowTable<T: Float> {
    samples: Vec<T>,
}

impl<T: Float + FromPrimitive> WindowTable<T> {
    /// Symmetric Hann window: `w[k] = 0.5 * (1 - cos(2*pi*k / (n - 1)))`.
    pub fn hann(n_fft: usize) -> Self {
        let pi = T::from(std::f64::consts::PI).unwrap();
        let two = T::from(2.0).unwrap();
        let half = T::from(0.5).unwrap();
        let one = T::one();

        let samples = (0..n_fft)
            .map(|k| {
                let k_t = T::from(k).unwrap();
                let n_m1 = T::from(n_fft - 1).unwrap();
                half * (one - (two * pi * k_t / n_m1).cos())
            })
            .collect();

        Self { samples }
    }

    /// Wrap an externally supplied window. Length is checked against the
    /// transform's `n_fft` at transform construction, not here.
    pub fn from_samples(samples: Vec<T>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.samples
    }

    /// Element-wise identity with another table. This is the reconstruction
    /// contract between an encoder and a decoder, not structural equality.
    pub fn same_samples(&self, other: &Self) -> bool {
        self.samples.len() == other.samples.len()
            && self
                .samples
                .iter()
                .zip(other.samples.iter())
                .all(|(a, b)| *a == *b)
    }
}
