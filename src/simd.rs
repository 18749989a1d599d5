//! SIMD-accelerated element-wise kernels for the transform hot loops,
//! using pulp with scalar fallbacks.

use num_traits::Float;

#[cfg(feature = "simd")]
use pulp::Arch;

/// Magnitudes of interleaved `(re, im)` pairs:
/// `output[i] = sqrt(pairs[2i]^2 + pairs[2i+1]^2)`.
#[inline]
pub fn magnitudes_interleaved<T: Float + 'static>(pairs: &[T], output: &mut [T]) {
    debug_assert_eq!(pairs.len(), 2 * output.len());

    #[cfg(feature = "simd")]
    {
        let simd = pulp::Arch::new();
        match (
            std::any::TypeId::of::<T>(),
            std::any::TypeId::of::<f32>(),
            std::any::TypeId::of::<f64>(),
        ) {
            (t, f32_id, _) if t == f32_id => {
                magnitudes_interleaved_f32_simd(
                    simd,
                    unsafe { std::mem::transmute::<&[T], &[f32]>(pairs) },
                    unsafe { std::mem::transmute::<&mut [T], &mut [f32]>(output) },
                );
                return;
            }
            (t, _, f64_id) if t == f64_id => {
                magnitudes_interleaved_f64_simd(
                    simd,
                    unsafe { std::mem::transmute::<&[T], &[f64]>(pairs) },
                    unsafe { std::mem::transmute::<&mut [T], &mut [f64]>(output) },
                );
                return;
            }
            _ => {}
        }
    }

    // Fallback to scalar
    for i in 0..output.len() {
        let re = pairs[2 * i];
        let im = pairs[2 * i + 1];
        output[i] = (re * re + im * im).sqrt();
    }
}

#[cfg(feature = "simd")]
fn magnitudes_interleaved_f32_simd(simd: Arch, pairs: &[f32], output: &mut [f32]) {
    simd.dispatch(|| {
        let (pairs_head, pairs_tail) = pulp::as_arrays::<8, _>(pairs);
        let (output_head, output_tail) = pulp::as_arrays_mut::<4, _>(output);

        for i in 0..output_head.len() {
            for j in 0..4 {
                let re = pairs_head[i][2 * j];
                let im = pairs_head[i][2 * j + 1];
                output_head[i][j] = (re * re + im * im).sqrt();
            }
        }

        for i in 0..output_tail.len() {
            let re = pairs_tail[2 * i];
            let im = pairs_tail[2 * i + 1];
            output_tail[i] = (re * re + im * im).sqrt();
        }
    });
}

#[cfg(feature = "simd")]
fn magnitudes_interleaved_f64_simd(simd: Arch, pairs: &[f64], output: &mut [f64]) {
    simd.dispatch(|| {
        let (pairs_head, pairs_tail) = pulp::as_arrays::<8, _>(pairs);
        let (output_head, output_tail) = pulp::as_arrays_mut::<4, _>(output);

        for i in 0..output_head.len() {
            for j in 0..4 {
                let re = pairs_head[i][2 * j];
                let im = pairs_head[i][2 * j + 1];
                output_head[i][j] = (re * re + im * im).sqrt();
            }
        }

        for i in 0..output_tail.len() {
            let re = pairs_tail[2 * i];
            let im = pairs_tail[2 * i + 1];
            output_tail[i] = (re * re + im * im).sqrt();
        }
    });
}

/// Windowed accumulate for overlap-add: `acc[i] += values[i] * window[i]`.
///
/// Passing the window for both arguments accumulates the squared-window
/// energy envelope used for overlap-add normalization.
#[inline]
pub fn accumulate_windowed<T: Float + 'static>(values: &[T], window: &[T], acc: &mut [T]) {
    debug_assert_eq!(values.len(), window.len());
    debug_assert_eq!(values.len(), acc.len());

    #[cfg(feature = "simd")]
    {
        let simd = pulp::Arch::new();
        match (
            std::any::TypeId::of::<T>(),
            std::any::TypeId::of::<f32>(),
            std::any::TypeId::of::<f64>(),
        ) {
            (t, f32_id, _) if t == f32_id => {
                accumulate_windowed_f32_simd(
                    simd,
                    unsafe { std::mem::transmute::<&[T], &[f32]>(values) },
                    unsafe { std::mem::transmute::<&[T], &[f32]>(window) },
                    unsafe { std::mem::transmute::<&mut [T], &mut [f32]>(acc) },
                );
                return;
            }
            (t, _, f64_id) if t == f64_id => {
                accumulate_windowed_f64_simd(
                    simd,
                    unsafe { std::mem::transmute::<&[T], &[f64]>(values) },
                    unsafe { std::mem::transmute::<&[T], &[f64]>(window) },
                    unsafe { std::mem::transmute::<&mut [T], &mut [f64]>(acc) },
                );
                return;
            }
            _ => {}
        }
    }

    // Fallback to scalar
    for i in 0..values.len() {
        acc[i] = acc[i] + values[i] * window[i];
    }
}

#[cfg(feature = "simd")]
fn accumulate_windowed_f32_simd(simd: Arch, values: &[f32], window: &[f32], acc: &mut [f32]) {
    simd.dispatch(|| {
        let (values_head, values_tail) = pulp::as_arrays::<4, _>(values);
        let (window_head, window_tail) = pulp::as_arrays::<4, _>(window);
        let (acc_head, acc_tail) = pulp::as_arrays_mut::<4, _>(acc);

        for i in 0..values_head.len() {
            acc_head[i][0] += values_head[i][0] * window_head[i][0];
            acc_head[i][1] += values_head[i][1] * window_head[i][1];
            acc_head[i][2] += values_head[i][2] * window_head[i][2];
            acc_head[i][3] += values_head[i][3] * window_head[i][3];
        }

        for i in 0..values_tail.len() {
            acc_tail[i] += values_tail[i] * window_tail[i];
        }
    });
}

#[cfg(feature = "simd")]
fn accumulate_windowed_f64_simd(simd: Arch, values: &[f64], window: &[f64], acc: &mut [f64]) {
    simd.dispatch(|| {
        let (values_head, values_tail) = pulp::as_arrays::<4, _>(values);
        let (window_head, window_tail) = pulp::as_arrays::<4, _>(window);
        let (acc_head, acc_tail) = pulp::as_arrays_mut::<4, _>(acc);

        for i in 0..values_head.len() {
            acc_head[i][0] += values_head[i][0] * window_head[i][0];
            acc_head[i][1] += values_head[i][1] * window_head[i][1];
            acc_head[i][2] += values_head[i][2] * window_head[i][2];
            acc_head[i][3] += values_head[i][3] * window_head[i][3];
        }

        for i in 0..values_tail.len() {
            acc_tail[i] += values_tail[i] * window_tail[i];
        }
    });
}

/// In-place overlap-add normalization: `buffer[i] /= energy[i]` where the
/// energy clears `threshold`, else the sample is zeroed.
#[inline]
pub fn normalize_by_energy<T: Float>(buffer: &mut [T], energy: &[T], threshold: T) {
    debug_assert_eq!(buffer.len(), energy.len());

    // Scalar implementation (SIMD not as beneficial due to conditional)
    for i in 0..buffer.len() {
        buffer[i] = if energy[i] > threshold {
            buffer[i] / energy[i]
        } else {
            T::zero()
        };
    }
}
