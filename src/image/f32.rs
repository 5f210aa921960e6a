//! Owned single-channel float plane in row-major layout (stride == width).
//!
//! Holds the smoothed images, gradients and suppressed magnitudes produced
//! while running Canny.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageF32 {
    /// Plane width in pixels
    pub w: usize,
    /// Plane height in pixels
    pub h: usize,
    /// Elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Zero-initialised plane of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![0.0; w * h],
        }
    }

    /// Plane built from integer samples, e.g. luminance values.
    pub fn from_samples(w: usize, h: usize, samples: &[u8]) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: samples.iter().map(|&v| v as f32).collect(),
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Largest sample, `0.0` for an empty plane.
    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(0.0, f32::max)
    }

    /// Number of samples strictly greater than zero.
    pub fn count_positive(&self) -> usize {
        self.data.iter().filter(|&&v| v > 0.0).count()
    }
}

impl crate::image::traits::ImageView for ImageF32 {
    type Pixel = f32;

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
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

impl crate::image::traits::ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}
