//! Binary edge raster.
//!
//! Pixels are either [`EdgeMap::FOREGROUND`] or [`EdgeMap::BACKGROUND`].
//! Coordinates outside the raster read as background so tracers can read
//! neighbours without clamping.
use crate::edges::explored::ExploredMap;
use crate::error::{DetectorError, Result};
use crate::image::{ImageView, ImageViewMut};
use crate::types::{BoundingBox, Point};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeMap {
    w: usize,
    h: usize,
    data: Vec<u8>,
}

impl EdgeMap {
    pub const FOREGROUND: u8 = 255;
    pub const BACKGROUND: u8 = 0;

    /// All-background map of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![Self::BACKGROUND; w * h],
        }
    }

    /// Wrap a row-major buffer. Any non-zero byte counts as foreground.
    pub fn from_mask(w: usize, h: usize, mask: Vec<u8>) -> Result<Self> {
        if mask.len() != w * h {
            return Err(DetectorError::SizeMismatch {
                expected: w * h,
                actual: mask.len(),
            });
        }
        let data = mask
            .into_iter()
            .map(|v| {
                if v != 0 {
                    Self::FOREGROUND
                } else {
                    Self::BACKGROUND
                }
            })
            .collect();
        Ok(Self { w, h, data })
    }

    /// Build a map by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut map = Self::new(w, h);
        for y in 0..h {
            for x in 0..w {
                if f(x, y) {
                    map.data[y * w + x] = Self::FOREGROUND;
                }
            }
        }
        map
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    /// Total number of pixels.
    #[inline]
    pub fn area(&self) -> usize {
        self.w * self.h
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::of_raster(self.w, self.h)
    }

    #[inline]
    pub fn is_foreground(&self, x: i64, y: i64) -> bool {
        self.in_bounds(x, y) && self.data[y as usize * self.w + x as usize] == Self::FOREGROUND
    }

    #[inline]
    pub fn is_foreground_at(&self, p: Point) -> bool {
        self.is_foreground(p.x as i64, p.y as i64)
    }

    /// Set or clear a pixel. Out-of-range coordinates are ignored.
    pub fn set(&mut self, x: i64, y: i64, foreground: bool) {
        if self.in_bounds(x, y) {
            let i = y as usize * self.w + x as usize;
            self.data[i] = if foreground {
                Self::FOREGROUND
            } else {
                Self::BACKGROUND
            };
        }
    }

    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == Self::FOREGROUND).count()
    }

    /// Re-binarise so pixels equal to `search_value` become foreground and
    /// every other pixel becomes background.
    pub fn normalize(&mut self, search_value: u8) {
        for px in &mut self.data {
            *px = if *px == search_value {
                Self::FOREGROUND
            } else {
                Self::BACKGROUND
            };
        }
    }

    /// Fresh working copy for tracing: same raster, nothing explored yet.
    pub fn explored_copy(&self) -> ExploredMap {
        ExploredMap::new(self.w, self.h)
    }

}

impl ImageView for EdgeMap {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.w
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}

impl ImageViewMut for EdgeMap {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.w;
        &mut self.data[start..start + self.w]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_reads_as_background() {
        let mut map = EdgeMap::new(4, 3);
        map.set(3, 2, true);
        assert!(map.is_foreground(3, 2));
        assert!(!map.is_foreground(4, 2));
        assert!(!map.is_foreground(-1, 0));
        map.set(10, 10, true);
        assert_eq!(map.foreground_count(), 1);
    }

    #[test]
    fn normalize_keeps_only_search_value() {
        let mut map = EdgeMap::from_mask(3, 1, vec![0, 7, 9]).unwrap();
        assert_eq!(map.foreground_count(), 2);
        map.normalize(EdgeMap::BACKGROUND);
        assert!(map.is_foreground(0, 0));
        assert!(!map.is_foreground(1, 0));
        assert!(!map.is_foreground(2, 0));
    }

    #[test]
    fn fill_overwrites_every_pixel() {
        let mut map = EdgeMap::new(4, 3);
        map.fill(EdgeMap::FOREGROUND);
        assert_eq!(map.foreground_count(), 12);
        map.row_mut(1).fill(EdgeMap::BACKGROUND);
        assert_eq!(map.foreground_count(), 8);
        assert!(!map.is_foreground(2, 1));
    }

    #[test]
    fn from_mask_checks_length() {
        let err = EdgeMap::from_mask(3, 3, vec![0; 8]).unwrap_err();
        assert_eq!(
            err,
            DetectorError::SizeMismatch {
                expected: 9,
                actual: 8
            }
        );
    }
}
