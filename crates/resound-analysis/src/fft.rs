//! In-place radix-2 FFT.
//!
//! Iterative decimation-in-time Cooley-Tukey over split real/imaginary
//! buffers. Input is bit-reverse permuted, then each butterfly stage walks
//! its twiddle factor by repeated multiplication with the stage's unit
//! rotation `e^(-2πi/size)`. The twiddle is carried in `f64` so the
//! accumulated rotation stays accurate for long transforms.
//!
//! The forward transform is unscaled; [`ifft`] divides by `n`.
//!
//! ```rust
//! use resound_analysis::fft::{fft, ifft};
//!
//! let mut re = vec![1.0f32, 2.0, 3.0, 4.0];
//! let mut im = vec![0.0f32; 4];
//!
//! fft(&mut re, &mut im);
//! assert_eq!(re[0], 10.0); // DC bin is the sum
//!
//! ifft(&mut re, &mut im);
//! assert!((re[3] - 4.0).abs() < 1e-6);
//! ```

use std::f64::consts::TAU;

/// Forward FFT in place.
///
/// `real` and `imag` must have the same power-of-two length. Lengths 0 and 1
/// are left untouched.
///
/// # Panics
///
/// Panics if the buffers differ in length. Non-power-of-two lengths are
/// caught by a debug assertion only.
pub fn fft(real: &mut [f32], imag: &mut [f32]) {
    assert_eq!(
        real.len(),
        imag.len(),
        "real and imaginary buffers must have equal length"
    );
    let n = real.len();
    if n < 2 {
        return;
    }
    debug_assert!(n.is_power_of_two(), "FFT length {n} is not a power of two");

    bit_reverse_permute(real, imag);

    let mut size = 2;
    while size <= n {
        let half = size / 2;
        let angle = -TAU / size as f64;
        let (w_re, w_im) = (angle.cos(), angle.sin());

        for start in (0..n).step_by(size) {
            let (mut u_re, mut u_im) = (1.0f64, 0.0f64);
            for k in 0..half {
                let even = start + k;
                let odd = even + half;

                let (ur, ui) = (u_re as f32, u_im as f32);
                let t_re = ur * real[odd] - ui * imag[odd];
                let t_im = ur * imag[odd] + ui * real[odd];

                real[odd] = real[even] - t_re;
                imag[odd] = imag[even] - t_im;
                real[even] += t_re;
                imag[even] += t_im;

                let next_re = u_re * w_re - u_im * w_im;
                u_im = u_re * w_im + u_im * w_re;
                u_re = next_re;
            }
        }
        size *= 2;
    }
}

/// Inverse FFT in place, scaled by `1/n`.
///
/// Computed as conjugate, forward transform, scale, conjugate. Same length
/// requirements as [`fft`].
pub fn ifft(real: &mut [f32], imag: &mut [f32]) {
    assert_eq!(
        real.len(),
        imag.len(),
        "real and imaginary buffers must have equal length"
    );
    let n = real.len();
    if n < 2 {
        return;
    }

    for x in imag.iter_mut() {
        *x = -*x;
    }
    fft(real, imag);

    let scale = 1.0 / n as f32;
    for (re, im) in real.iter_mut().zip(imag.iter_mut()) {
        *re *= scale;
        *im = -*im * scale;
    }
}

fn bit_reverse_permute(real: &mut [f32], imag: &mut [f32]) {
    let n = real.len();
    let shift = usize::BITS - n.trailing_zeros();
    for i in 0..n {
        let j = i.reverse_bits() >> shift;
        if i < j {
            real.swap(i, j);
            imag.swap(i, j);
        }
    }
}
