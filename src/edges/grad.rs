//! Separable derivative-of-Gaussian gradients.
//!
//! - Smooths the luminance plane along x and along y with the half-kernel
//!   taps of [`GaussianKernel`].
//! - Differentiates the y-smoothed plane along x and the x-smoothed plane
//!   along y, giving `gx`, `gy`.
//!
//! Pixels closer than the kernel width to the border are left at zero; the
//! later stages skip that frame as well.
//!
//! Rows are processed on the rayon pool when the `parallel` feature is on.
//!
//! Complexity: O(W·H·K) for K taps; memory: four float planes.
use crate::edges::kernel::GaussianKernel;
use crate::image::{ImageF32, ImageView};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Gradient planes in image coordinates (`y` down).
#[derive(Clone, Debug)]
pub struct Gradients {
    /// Horizontal derivative
    pub gx: ImageF32,
    /// Vertical derivative
    pub gy: ImageF32,
}

impl Gradients {
    #[inline]
    pub fn magnitude_at(&self, i: usize) -> f32 {
        self.gx.data[i].hypot(self.gy.data[i])
    }
}

/// Half-open range `[kw-1, len-kw)` where every `±k` tap stays in bounds.
#[inline]
fn valid_range(len: usize, kw: usize) -> std::ops::Range<usize> {
    let start = kw.saturating_sub(1);
    let end = len.saturating_sub(kw);
    start..end.max(start)
}

pub fn smoothed_gradients(lum: &ImageF32, kernel: &GaussianKernel) -> Gradients {
    let w = lum.width();
    let h = lum.height();
    let kw = kernel.width();
    let mut x_conv = ImageF32::new(w, h);
    let mut y_conv = ImageF32::new(w, h);
    let mut gx = ImageF32::new(w, h);
    let mut gy = ImageF32::new(w, h);
    if kw == 0 || w == 0 || h == 0 {
        return Gradients { gx, gy };
    }

    let xs = valid_range(w, kw);
    let ys = valid_range(h, kw);
    let p = &lum.data;

    for_each_row_pair(&mut x_conv.data, &mut y_conv.data, w, |y, x_row, y_row| {
        if !ys.contains(&y) {
            return;
        }
        for x in xs.clone() {
            let i = y * w + x;
            let mut sum_x = 0.0f32;
            let mut sum_y = 0.0f32;
            for (k, &tap) in kernel.smooth.iter().enumerate() {
                sum_x += tap * (p[i - k] + p[i + k]);
                sum_y += tap * (p[i - k * w] + p[i + k * w]);
            }
            x_row[x] = sum_x;
            y_row[x] = sum_y;
        }
    });

    let (xc, yc) = (&x_conv.data, &y_conv.data);
    for_each_row_pair(&mut gx.data, &mut gy.data, w, |y, gx_row, gy_row| {
        if !ys.contains(&y) {
            return;
        }
        for x in xs.clone() {
            let i = y * w + x;
            let mut sum_x = 0.0f32;
            let mut sum_y = 0.0f32;
            for (k, &tap) in kernel.diff.iter().enumerate() {
                sum_x += tap * (yc[i - k] - yc[i + k]);
                sum_y += tap * (xc[i - k * w] - xc[i + k * w]);
            }
            gx_row[x] = sum_x;
            gy_row[x] = sum_y;
        }
    });

    Gradients { gx, gy }
}

/// Runs `f(y, row_a, row_b)` over matching rows of two planes of width `w`.
fn for_each_row_pair<F>(a: &mut [f32], b: &mut [f32], w: usize, f: F)
where
    F: Fn(usize, &mut [f32], &mut [f32]) + Sync,
{
    #[cfg(feature = "parallel")]
    {
        a.par_chunks_mut(w)
            .zip(b.par_chunks_mut(w))
            .enumerate()
            .for_each(|(y, (ra, rb))| f(y, ra, rb));
    }
    #[cfg(not(feature = "parallel"))]
    {
        a.chunks_mut(w)
            .zip(b.chunks_mut(w))
            .enumerate()
            .for_each(|(y, (ra, rb))| f(y, ra, rb));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_step_produces_horizontal_gradient() {
        let (w, h) = (24, 24);
        let samples: Vec<u8> = (0..w * h)
            .map(|i| if i % w < w / 2 { 0 } else { 200 })
            .collect();
        let lum = ImageF32::from_samples(w, h, &samples);
        let kernel = GaussianKernel::new(1.5, 0.1, 0.005);
        let grad = smoothed_gradients(&lum, &kernel);

        let at_step = grad.gx.get(w / 2, h / 2).abs();
        let flat = grad.gx.get(w / 2 - 6, h / 2).abs();
        assert!(at_step > 10.0, "expected strong gx at step, got {at_step:.3}");
        assert!(flat < 1e-3, "expected flat response away from step, got {flat:.3}");
        assert!(grad.gy.get(w / 2, h / 2).abs() < 1e-3);
    }

    #[test]
    fn tiny_image_yields_zero_planes() {
        let lum = ImageF32::from_samples(3, 3, &[9; 9]);
        let kernel = GaussianKernel::new(1.5, 0.1, 0.005);
        let grad = smoothed_gradients(&lum, &kernel);
        assert_eq!(grad.gx.count_positive(), 0);
        assert_eq!(grad.gy.max_value(), 0.0);
    }

    #[test]
    fn narrow_kernel_still_sees_a_step() {
        let (w, h) = (16, 16);
        let samples: Vec<u8> = (0..w * h)
            .map(|i| if i % w < w / 2 { 0 } else { 200 })
            .collect();
        let lum = ImageF32::from_samples(w, h, &samples);
        let kernel = GaussianKernel::new(0.2, 0.1, 0.005);
        let grad = smoothed_gradients(&lum, &kernel);
        let peak = (0..w).map(|x| grad.gx.get(x, h / 2).abs()).fold(0.0f32, f32::max);
        assert!(peak > 1.0, "expected a gradient at the step, got {peak:.3}");
    }
}
