use crate::error::{DetectorError, Result};

/// Borrowed RGBA view, four bytes per pixel.
#[derive(Clone, Debug)]
pub struct ImageRgba<'a> {
    pub w: usize,
    pub h: usize,
    /// Bytes between rows (at least `4 * w`).
    pub stride: usize,
    pub data: &'a [u8],
}

impl<'a> ImageRgba<'a> {
    /// Tightly packed view over `data`.
    pub fn packed(w: usize, h: usize, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            stride: w * 4,
            data,
        }
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = y * self.stride + x * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn validate(&self) -> Result<()> {
        if self.w == 0 || self.h == 0 {
            return Err(DetectorError::EmptyImage {
                width: self.w,
                height: self.h,
            });
        }
        let expected = self.stride * (self.h - 1) + self.w * 4;
        if self.stride < self.w * 4 || self.data.len() < expected {
            return Err(DetectorError::SizeMismatch {
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    /// Rounded ITU-R 601 luminance `0.299R + 0.587G + 0.114B`, row-major.
    pub fn luminance(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.w * self.h);
        for y in 0..self.h {
            for x in 0..self.w {
                let [r, g, b, _] = self.pixel(x, y);
                out.push(luma(r, g, b));
            }
        }
        out
    }
}

#[inline]
pub(crate) fn luma(r: u8, g: u8, b: u8) -> u8 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32)
        .round()
        .clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luminance_uses_601_weights() {
        let data = [255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255, 255, 255, 255, 255];
        let img = ImageRgba::packed(4, 1, &data);
        assert_eq!(img.luminance(), vec![76, 150, 29, 255]);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let data = [0u8; 10];
        let img = ImageRgba::packed(2, 2, &data);
        assert!(matches!(
            img.validate(),
            Err(DetectorError::SizeMismatch { expected: 16, actual: 10 })
        ));
        let empty = ImageRgba::packed(0, 3, &data);
        assert!(matches!(empty.validate(), Err(DetectorError::EmptyImage { .. })));
    }
}
