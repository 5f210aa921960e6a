//! Non-maximum suppression on the gradient magnitude.
//!
//! The test avoids trigonometry: the sign of `gx·gy` and the larger of
//! `|gx|`, `|gy|` select one of four neighbour pairs, and the interpolated
//! magnitude comparison is multiplied through by the dominant partial
//! derivative. A pixel survives when it is at least as strong as the forward
//! interpolated neighbour and strictly stronger than the backward one.
//!
//! Surviving magnitudes are capped at `magnitude_limit`. A diagnostic plane
//! stores the gradient direction binned to 0, 45, 90 or 135 degrees.
use crate::edges::grad::Gradients;
use crate::image::{ImageF32, ImageView};

#[derive(Clone, Debug)]
pub struct Suppressed {
    /// Capped magnitude of local maxima, zero elsewhere
    pub magnitude: ImageF32,
    /// Direction bin in degrees per pixel (0, 45, 90, 135)
    pub direction: Vec<u8>,
}

/// Bin `atan2(gy, gx)` into the four undirected Canny directions.
#[inline]
pub fn direction_bin(gx: f32, gy: f32) -> u8 {
    let mut deg = gy.atan2(gx).to_degrees();
    if deg < 0.0 {
        deg += 180.0;
    }
    if deg < 22.5 || deg >= 157.5 {
        0
    } else if deg < 67.5 {
        45
    } else if deg < 112.5 {
        90
    } else {
        135
    }
}

pub fn suppress(grad: &Gradients, kernel_width: usize, magnitude_limit: f32) -> Suppressed {
    let w = grad.gx.width();
    let h = grad.gx.height();
    let mut magnitude = ImageF32::new(w, h);
    let mut direction = vec![0u8; w * h];

    let kw = kernel_width.max(1);
    let x_end = w.saturating_sub(kw + 1);
    let y_end = h.saturating_sub(kw + 1);
    for y in kw..y_end {
        for x in kw..x_end {
            let i = y * w + x;
            let gx = grad.gx.data[i];
            let gy = grad.gy.data[i];
            let mag = gx.hypot(gy);
            direction[i] = direction_bin(gx, gy);

            let n = grad.magnitude_at(i - w);
            let s = grad.magnitude_at(i + w);
            let west = grad.magnitude_at(i - 1);
            let east = grad.magnitude_at(i + 1);
            let ne = grad.magnitude_at(i - w + 1);
            let se = grad.magnitude_at(i + w + 1);
            let sw = grad.magnitude_at(i + w - 1);
            let nw = grad.magnitude_at(i - w - 1);

            let is_max = if gx * gy <= 0.0 {
                if gx.abs() >= gy.abs() {
                    let tmp = (gx * mag).abs();
                    tmp >= (gy * ne - (gx + gy) * east).abs()
                        && tmp > (gy * sw - (gx + gy) * west).abs()
                } else {
                    let tmp = (gy * mag).abs();
                    tmp >= (gx * ne - (gy + gx) * n).abs() && tmp > (gx * sw - (gy + gx) * s).abs()
                }
            } else if gx.abs() >= gy.abs() {
                let tmp = (gx * mag).abs();
                tmp >= (gy * se + (gx - gy) * east).abs()
                    && tmp > (gy * nw + (gx - gy) * west).abs()
            } else {
                let tmp = (gy * mag).abs();
                tmp >= (gx * se + (gy - gx) * s).abs() && tmp > (gx * nw + (gy - gx) * n).abs()
            };

            if is_max {
                magnitude.data[i] = mag.min(magnitude_limit);
            }
        }
    }

    Suppressed {
        magnitude,
        direction,
    }
}
