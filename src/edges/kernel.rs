//! 1-D Gaussian smoothing and derivative taps for the Canny front end.
//!
//! Only the non-negative half of each symmetric kernel is stored; tap `k`
//! weighs the samples at `±k`. Taps are generated until the Gaussian falls
//! below the cut-off (never fewer than two), capped by the mask size implied
//! by `sigma` and the mask threshold.

/// Unnormalised Gaussian density `exp(-x²/2σ²) / sqrt(2πσ)`.
#[inline]
pub fn gaussian(x: f32, sigma: f32) -> f32 {
    let s = sigma as f64;
    let x = x as f64;
    ((-(x * x) / (2.0 * s * s)).exp() / (2.0 * std::f64::consts::PI * s).sqrt()) as f32
}

/// Full mask size `2·round(sqrt(-ln(t)·2σ²)) + 1`.
pub fn mask_size(threshold: f32, sigma: f32) -> usize {
    let t = threshold as f64;
    let s = sigma as f64;
    let half = (-t.ln() * 2.0 * s * s).sqrt().round().max(0.0) as usize;
    2 * half + 1
}

#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKernel {
    /// Smoothing taps, averaged over `k-½, k, k+½`.
    pub smooth: Vec<f32>,
    /// Derivative taps `g(k+½) - g(k-½)`.
    pub diff: Vec<f32>,
}

impl GaussianKernel {
    pub fn new(sigma: f32, mask_threshold: f32, cut_off: f32) -> Self {
        // a single tap has a zero derivative
        let size = mask_size(mask_threshold, sigma).max(3);
        let mut smooth = Vec::with_capacity(size);
        let mut diff = Vec::with_capacity(size);
        for k in 0..size {
            let kf = k as f32;
            let g1 = gaussian(kf, sigma);
            if g1 <= cut_off && k >= 2 {
                break;
            }
            let g2 = gaussian(kf - 0.5, sigma);
            let g3 = gaussian(kf + 0.5, sigma);
            smooth.push((g1 + g2 + g3) / 3.0);
            diff.push(g3 - g2);
        }
        Self { smooth, diff }
    }

    /// Number of taps actually used.
    #[inline]
    pub fn width(&self) -> usize {
        self.smooth.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_kernel_shape() {
        assert_eq!(mask_size(0.1, 1.5), 7);
        let k = GaussianKernel::new(1.5, 0.1, 0.005);
        assert_eq!(k.width(), 5);
        assert!(k.smooth.windows(2).all(|p| p[0] > p[1]));
        assert_eq!(k.diff[0], 0.0);
        assert!(k.diff[1..].iter().all(|&d| d < 0.0));
    }

    #[test]
    fn narrow_sigma_still_yields_a_derivative_tap() {
        assert_eq!(mask_size(0.1, 0.2), 1);
        let k = GaussianKernel::new(0.2, 0.1, 0.005);
        assert!(k.width() >= 2, "only {} taps", k.width());
        assert!(k.diff[1] < 0.0);
    }
}
