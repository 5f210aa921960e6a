//! Image moments over a pixel set.
//!
//! Raw moments `M_pq = Σ x^p y^q`, central moments about the centroid and
//! scale-normalised moments `η_pq = μ_pq / m00^((p+q)/2 + 1)` with `m00` the
//! pixel count. [`CentralMoments`] caches every moment up to third order so
//! the seven Hu invariants, orientation and the covariance eigenvalues come
//! from one pass over the points.
use crate::types::Point;
use nalgebra::{Matrix2, SymmetricEigen};

/// `Σ x^p y^q` over `points`.
pub fn raw_moment<'a, I>(points: I, p: u32, q: u32) -> f64
where
    I: IntoIterator<Item = &'a Point>,
{
    points
        .into_iter()
        .map(|pt| (pt.x as f64).powi(p as i32) * (pt.y as f64).powi(q as i32))
        .sum()
}

/// `Σ (x - cx)^p (y - cy)^q` over `points`.
pub fn central_moment<'a, I>(points: I, centroid: (f64, f64), p: u32, q: u32) -> f64
where
    I: IntoIterator<Item = &'a Point>,
{
    let (cx, cy) = centroid;
    points
        .into_iter()
        .map(|pt| (pt.x as f64 - cx).powi(p as i32) * (pt.y as f64 - cy).powi(q as i32))
        .sum()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CentralMoments {
    pub m00: f64,
    pub cx: f64,
    pub cy: f64,
    pub mu11: f64,
    pub mu20: f64,
    pub mu02: f64,
    pub mu30: f64,
    pub mu03: f64,
    pub mu21: f64,
    pub mu12: f64,
}

impl CentralMoments {
    /// `None` for an empty point set.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point> + Clone,
    {
        let mut m00 = 0.0;
        let mut m10 = 0.0;
        let mut m01 = 0.0;
        for p in points.clone() {
            m00 += 1.0;
            m10 += p.x as f64;
            m01 += p.y as f64;
        }
        if m00 == 0.0 {
            return None;
        }
        let cx = m10 / m00;
        let cy = m01 / m00;
        let mut m = Self {
            m00,
            cx,
            cy,
            mu11: 0.0,
            mu20: 0.0,
            mu02: 0.0,
            mu30: 0.0,
            mu03: 0.0,
            mu21: 0.0,
            mu12: 0.0,
        };
        for p in points {
            let dx = p.x as f64 - cx;
            let dy = p.y as f64 - cy;
            m.mu11 += dx * dy;
            m.mu20 += dx * dx;
            m.mu02 += dy * dy;
            m.mu30 += dx * dx * dx;
            m.mu03 += dy * dy * dy;
            m.mu21 += dx * dx * dy;
            m.mu12 += dx * dy * dy;
        }
        Some(m)
    }

    /// Cached central moment up to third order, `None` above that.
    pub fn get(&self, p: u32, q: u32) -> Option<f64> {
        match (p, q) {
            (0, 0) => Some(self.m00),
            (1, 0) | (0, 1) => Some(0.0),
            (1, 1) => Some(self.mu11),
            (2, 0) => Some(self.mu20),
            (0, 2) => Some(self.mu02),
            (3, 0) => Some(self.mu30),
            (0, 3) => Some(self.mu03),
            (2, 1) => Some(self.mu21),
            (1, 2) => Some(self.mu12),
            _ => None,
        }
    }

    #[inline]
    fn eta(&self, mu: f64, p: u32, q: u32) -> f64 {
        let exponent = (p + q) as f64 / 2.0 + 1.0;
        mu / self.m00.powf(exponent)
    }

    /// Seven Hu invariants, absolute values.
    pub fn hu(&self) -> [f64; 7] {
        let n20 = self.eta(self.mu20, 2, 0);
        let n02 = self.eta(self.mu02, 0, 2);
        let n11 = self.eta(self.mu11, 1, 1);
        let n30 = self.eta(self.mu30, 3, 0);
        let n03 = self.eta(self.mu03, 0, 3);
        let n21 = self.eta(self.mu21, 2, 1);
        let n12 = self.eta(self.mu12, 1, 2);

        let a = n30 + n12;
        let b = n21 + n03;
        let c = n30 - 3.0 * n12;
        let d = 3.0 * n21 - n03;

        let phi1 = n20 + n02;
        let phi2 = (n20 - n02).powi(2) + 4.0 * n11 * n11;
        let phi3 = c * c + d * d;
        let phi4 = a * a + b * b;
        let phi5 = c * a * (a * a - 3.0 * b * b) + d * b * (3.0 * a * a - b * b);
        let phi6 = (n20 - n02) * (a * a - b * b) + 4.0 * n11 * a * b;
        let phi7 = d * a * (a * a - 3.0 * b * b) - c * b * (3.0 * a * a - b * b);

        [phi1, phi2, phi3, phi4, phi5, phi6, phi7].map(f64::abs)
    }

    /// Principal-axis angle `0.5·atan2(2μ11, μ20 - μ02)` in radians.
    pub fn orientation(&self) -> f64 {
        0.5 * (2.0 * self.mu11).atan2(self.mu20 - self.mu02)
    }

    /// Eigenvalues of `[[μ20, μ11], [μ11, μ02]]`, major first.
    pub fn eigenvalues(&self) -> (f64, f64) {
        let cov = Matrix2::new(self.mu20, self.mu11, self.mu11, self.mu02);
        let eig = SymmetricEigen::new(cov);
        let (e0, e1) = (eig.eigenvalues[0], eig.eigenvalues[1]);
        if e0 >= e1 {
            (e0, e1)
        } else {
            (e1, e0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(x0: i32, y0: i32, w: i32, h: i32) -> Vec<Point> {
        let mut pts = Vec::new();
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                pts.push(Point::new(x, y));
            }
        }
        pts
    }

    #[test]
    fn centroid_and_second_moments_of_block() {
        let pts = block(2, 4, 5, 3);
        let m = CentralMoments::from_points(&pts).unwrap();
        assert_eq!(m.m00, 15.0);
        assert!((m.cx - 4.0).abs() < 1e-12);
        assert!((m.cy - 5.0).abs() < 1e-12);
        // Σ dx² = 3 · (4+1+0+1+4)
        assert!((m.mu20 - 30.0).abs() < 1e-9);
        assert!(m.mu11.abs() < 1e-9);
        assert!((raw_moment(&pts, 1, 0) / m.m00 - m.cx).abs() < 1e-12);
        assert!((central_moment(&pts, (m.cx, m.cy), 2, 0) - m.mu20).abs() < 1e-9);
        let (major, minor) = m.eigenvalues();
        assert!(major >= minor);
        assert!((major - 30.0).abs() < 1e-9);
        assert!(m.orientation().abs() < 1e-12);
    }

    #[test]
    fn hu_invariants_ignore_translation() {
        let mut pts = block(0, 0, 9, 4);
        pts.extend(block(0, 4, 3, 6));
        let moved: Vec<Point> = pts.iter().map(|p| p.offset(37, -11)).collect();
        let a = CentralMoments::from_points(&pts).unwrap().hu();
        let b = CentralMoments::from_points(&moved).unwrap().hu();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-9, "{x} vs {y}");
        }
    }
}
