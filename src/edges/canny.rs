//! Canny edge detector producing a binary [`EdgeMap`].
//!
//! Stages:
//! 1. RGBA → luminance (`0.299R + 0.587G + 0.114B`), skipped for gray input.
//! 2. Optional contrast normalisation through the cumulative histogram.
//! 3. Separable derivative-of-Gaussian gradients ([`super::grad`]).
//! 4. Non-maximum suppression with a magnitude cap ([`super::nms`]).
//! 5. Hysteresis between `low_threshold` and `high_threshold`
//!    ([`super::hysteresis`]), binarised to foreground/background.
//!
//! The output has the input's dimensions. A frame of roughly the kernel width
//! along the border never produces edges; a kernel wider than half the image
//! yields an all-background map rather than an error.
use crate::diagnostics::TimingBreakdown;
use crate::edges::edge_map::EdgeMap;
use crate::edges::grad::smoothed_gradients;
use crate::edges::hysteresis::hysteresis;
use crate::edges::kernel::GaussianKernel;
use crate::edges::nms::suppress;
use crate::error::{DetectorError, Result};
use crate::image::{ImageF32, ImageRgba, ImageU8};
use log::debug;
use serde::Deserialize;
use std::time::Instant;

/// Canny parameters. Thresholds are in gradient-magnitude units.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CannyParams {
    /// Weak-edge threshold used while growing from seeds.
    pub low_threshold: f32,
    /// Seed threshold; must be `>= low_threshold`.
    pub high_threshold: f32,
    /// Gaussian standard deviation in pixels.
    pub sigma: f32,
    /// Tail value that fixes the maximum mask size.
    pub mask_threshold: f32,
    /// Gaussian value below which no further taps are generated.
    pub gaussian_cut_off: f32,
    /// Upper clamp on stored magnitudes.
    pub magnitude_limit: f32,
    /// Remap luminance through the cumulative histogram before filtering.
    pub contrast_normalized: bool,
}

impl Default for CannyParams {
    fn default() -> Self {
        Self {
            low_threshold: 2.5,
            high_threshold: 7.5,
            sigma: 1.5,
            mask_threshold: 0.1,
            gaussian_cut_off: 0.005,
            magnitude_limit: 1000.0,
            contrast_normalized: false,
        }
    }
}

impl CannyParams {
    pub fn validate(&self) -> Result<()> {
        let invalid = |name: &'static str, reason: String| {
            Err(DetectorError::InvalidParameter { name, reason })
        };
        if !(self.low_threshold >= 0.0) {
            return invalid("low_threshold", format!("must be >= 0, got {}", self.low_threshold));
        }
        if !(self.high_threshold >= self.low_threshold) {
            return invalid(
                "high_threshold",
                format!(
                    "must be >= low_threshold ({}), got {}",
                    self.low_threshold, self.high_threshold
                ),
            );
        }
        if !(self.sigma > 0.0) {
            return invalid("sigma", format!("must be > 0, got {}", self.sigma));
        }
        if !(self.mask_threshold > 0.0 && self.mask_threshold < 1.0) {
            return invalid(
                "mask_threshold",
                format!("must lie in (0, 1), got {}", self.mask_threshold),
            );
        }
        Ok(())
    }
}

/// Everything computed on the way to the edge map.
#[derive(Clone, Debug)]
pub struct CannyOutput {
    pub edge_map: EdgeMap,
    /// Suppressed, capped gradient magnitude
    pub magnitude: ImageF32,
    /// Direction bins in degrees (0, 45, 90, 135)
    pub direction: Vec<u8>,
    pub timings: TimingBreakdown,
}

#[derive(Clone, Debug, Default)]
pub struct CannyDetector {
    params: CannyParams,
}

impl CannyDetector {
    pub fn new(params: CannyParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CannyParams {
        &self.params
    }

    /// Detect edges in an RGBA image.
    pub fn detect(&self, image: &ImageRgba<'_>) -> Result<EdgeMap> {
        Ok(self.detect_with_diagnostics(image)?.edge_map)
    }

    /// Detect edges in an 8-bit gray image.
    pub fn detect_luma(&self, image: &ImageU8<'_>) -> Result<EdgeMap> {
        image.validate()?;
        self.params.validate()?;
        let out = self.run(image.w, image.h, image.to_packed(), TimingBreakdown::default());
        Ok(out.edge_map)
    }

    pub fn detect_with_diagnostics(&self, image: &ImageRgba<'_>) -> Result<CannyOutput> {
        image.validate()?;
        self.params.validate()?;
        let mut timings = TimingBreakdown::default();
        let t0 = Instant::now();
        let lum = image.luminance();
        timings.push("luminance", t0.elapsed().as_secs_f64() * 1000.0);
        Ok(self.run(image.w, image.h, lum, timings))
    }

    fn run(&self, w: usize, h: usize, mut lum: Vec<u8>, mut timings: TimingBreakdown) -> CannyOutput {
        let p = &self.params;
        let total_start = Instant::now();

        if p.contrast_normalized {
            let t = Instant::now();
            normalize_contrast(&mut lum);
            timings.push("contrast", t.elapsed().as_secs_f64() * 1000.0);
        }

        let t = Instant::now();
        let kernel = GaussianKernel::new(p.sigma, p.mask_threshold, p.gaussian_cut_off);
        let plane = ImageF32::from_samples(w, h, &lum);
        let grad = smoothed_gradients(&plane, &kernel);
        timings.push("gradients", t.elapsed().as_secs_f64() * 1000.0);

        let t = Instant::now();
        let suppressed = suppress(&grad, kernel.width(), p.magnitude_limit);
        timings.push("nms", t.elapsed().as_secs_f64() * 1000.0);

        let t = Instant::now();
        let edge_map = hysteresis(&suppressed.magnitude, p.low_threshold, p.high_threshold);
        timings.push("hysteresis", t.elapsed().as_secs_f64() * 1000.0);

        let stages_ms: f64 = timings.stages.iter().map(|s| s.elapsed_ms).sum();
        timings.total_ms = stages_ms.max(total_start.elapsed().as_secs_f64() * 1000.0);
        debug!(
            "Canny: {}x{} kernel_taps={} edge_px={} total_ms={:.2}",
            w,
            h,
            kernel.width(),
            edge_map.foreground_count(),
            timings.total_ms
        );

        CannyOutput {
            edge_map,
            magnitude: suppressed.magnitude,
            direction: suppressed.direction,
            timings,
        }
    }
}

/// Histogram equalisation: every gray level maps to its cumulative share of
/// the pixel count scaled onto 0..=255.
pub fn normalize_contrast(lum: &mut [u8]) {
    let n = lum.len();
    if n == 0 {
        return;
    }
    let mut histogram = [0usize; 256];
    for &v in lum.iter() {
        histogram[v as usize] += 1;
    }
    let mut remap = [0u8; 256];
    let mut sum = 0usize;
    for (slot, &count) in remap.iter_mut().zip(histogram.iter()) {
        sum += count;
        *slot = (sum * 255 / n) as u8;
    }
    for v in lum.iter_mut() {
        *v = remap[*v as usize];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_scene(w: usize, h: usize) -> Vec<u8> {
        let mut data = vec![255u8; w * h * 4];
        for y in 12..h - 12 {
            for x in 12..w - 12 {
                let i = (y * w + x) * 4;
                data[i..i + 3].copy_from_slice(&[0, 0, 0]);
            }
        }
        data
    }

    #[test]
    fn dark_square_produces_closed_ring_of_edges() {
        let (w, h) = (48, 40);
        let data = square_scene(w, h);
        let image = ImageRgba::packed(w, h, &data);
        let out = CannyDetector::default()
            .detect_with_diagnostics(&image)
            .unwrap();
        let fg = out.edge_map.foreground_count();
        assert!(fg > 60, "expected an edge ring, got {fg} pixels");
        assert!(!out.edge_map.is_foreground(24, 20), "interior must stay background");
        assert!(!out.edge_map.is_foreground(2, 2), "border frame must stay background");
        assert_eq!(out.timings.stages.len(), 4);
        assert!(out.magnitude.max_value() <= 1000.0);
    }

    #[test]
    fn rejects_bad_input() {
        let data: [u8; 0] = [];
        let empty = ImageRgba::packed(0, 0, &data);
        assert!(matches!(
            CannyDetector::default().detect(&empty),
            Err(DetectorError::EmptyImage { .. })
        ));

        let pixels = vec![0u8; 16 * 16 * 4];
        let image = ImageRgba::packed(16, 16, &pixels);
        let params = CannyParams {
            low_threshold: 8.0,
            high_threshold: 2.0,
            ..CannyParams::default()
        };
        assert!(matches!(
            CannyDetector::new(params).detect(&image),
            Err(DetectorError::InvalidParameter { name: "high_threshold", .. })
        ));
    }

    #[test]
    fn contrast_normalisation_spreads_levels() {
        let mut lum = vec![100u8, 100, 101, 101];
        normalize_contrast(&mut lum);
        assert!(lum[2] > lum[0] + 50, "got {:?}", lum);
    }

    #[test]
    fn flat_gray_image_has_no_edges() {
        let gray = vec![128u8; 32 * 32];
        let view = ImageU8 {
            w: 32,
            h: 32,
            stride: 32,
            data: &gray,
        };
        let edges = CannyDetector::default().detect_luma(&view).unwrap();
        assert_eq!(edges.foreground_count(), 0);
    }
}
