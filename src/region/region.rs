use crate::contour::Contour;
use crate::error::Result;
use crate::region::features::FeatureVector;
use crate::region::moments::{central_moment, raw_moment, CentralMoments};
use crate::types::{BoundingBox, Point};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::collections::HashSet;
use std::fmt;

/// Identifier of a traced region, assigned in tracing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub usize);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether the point set and moments are materialised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RegionState {
    Built,
    Partial,
}

#[derive(Clone, Debug)]
struct Geometry {
    points: HashSet<Point>,
    moments: Option<CentralMoments>,
}

/// A traced contour plus the regions nested inside it.
///
/// The pixel set (contour fill minus the fills of inner regions) and its
/// moments are computed on first use and cached. Changing the inner regions
/// drops both caches, returning the region to [`RegionState::Partial`].
#[derive(Clone, Debug)]
pub struct Region {
    id: RegionId,
    contour: Contour,
    inner: Vec<Region>,
    empty: bool,
    geometry: OnceCell<Geometry>,
    features: OnceCell<FeatureVector>,
}

impl Region {
    pub fn new(id: RegionId, contour: Contour) -> Self {
        Self {
            id,
            contour,
            inner: Vec::new(),
            empty: false,
            geometry: OnceCell::new(),
            features: OnceCell::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> RegionId {
        self.id
    }

    #[inline]
    pub fn contour(&self) -> &Contour {
        &self.contour
    }

    #[inline]
    pub fn bounds(&self) -> BoundingBox {
        self.contour.bounds()
    }

    pub fn inner_regions(&self) -> &[Region] {
        &self.inner
    }

    /// True when this region marks a hole rather than a filled shape.
    pub fn is_empty_region(&self) -> bool {
        self.empty
    }

    pub fn set_empty_region(&mut self, empty: bool) {
        self.empty = empty;
    }

    pub fn add_inner_region(&mut self, region: Region) {
        self.inner.push(region);
        self.invalidate();
    }

    pub fn set_inner_regions(&mut self, regions: Vec<Region>) {
        self.inner = regions;
        self.invalidate();
    }

    pub fn remove_inner_region(&mut self, id: RegionId) -> Option<Region> {
        let pos = self.inner.iter().position(|r| r.id == id)?;
        let removed = self.inner.remove(pos);
        self.invalidate();
        Some(removed)
    }

    fn invalidate(&mut self) {
        self.geometry = OnceCell::new();
        self.features = OnceCell::new();
    }

    pub fn state(&self) -> RegionState {
        if self.geometry.get().is_some() {
            RegionState::Built
        } else {
            RegionState::Partial
        }
    }

    /// Materialise the point set and moments now.
    pub fn build(&mut self) {
        let _ = self.geometry();
    }

    fn geometry(&self) -> &Geometry {
        self.geometry.get_or_init(|| {
            let mut points = self.contour.filled_points();
            for inner in &self.inner {
                for p in inner.contour.filled_points() {
                    points.remove(&p);
                }
            }
            let moments = CentralMoments::from_points(&points);
            Geometry { points, moments }
        })
    }

    /// Pixels belonging to this region.
    pub fn points(&self) -> &HashSet<Point> {
        &self.geometry().points
    }

    pub fn moments(&self) -> Option<&CentralMoments> {
        self.geometry().moments.as_ref()
    }

    /// Filled pixel count, less the area of nested holes.
    pub fn area(&self) -> f64 {
        let holes: f64 = self
            .inner
            .iter()
            .filter(|r| r.empty)
            .map(|r| r.area())
            .sum();
        self.contour.area() as f64 - holes
    }

    pub fn perimeter(&self) -> f64 {
        self.contour.perimeter()
    }

    /// Raw moment `Σ x^p y^q`.
    pub fn moment(&self, p: u32, q: u32) -> f64 {
        raw_moment(self.points(), p, q)
    }

    pub fn central_moment(&self, p: u32, q: u32) -> f64 {
        match self.moments() {
            Some(m) => m
                .get(p, q)
                .unwrap_or_else(|| central_moment(self.points(), (m.cx, m.cy), p, q)),
            None => 0.0,
        }
    }

    /// `μ_pq / m00^((p+q)/2 + 1)`.
    pub fn normalized_central_moment(&self, p: u32, q: u32) -> f64 {
        match self.moments() {
            Some(m) => {
                let exponent = (p + q) as f64 / 2.0 + 1.0;
                self.central_moment(p, q) / m.m00.powf(exponent)
            }
            None => 0.0,
        }
    }

    pub fn hu_moments(&self) -> [f64; 7] {
        self.moments().map(|m| m.hu()).unwrap_or([0.0; 7])
    }

    /// Centre of mass of the region's pixels.
    pub fn centroid_f64(&self) -> (f64, f64) {
        match self.moments() {
            Some(m) => (m.cx, m.cy),
            None => {
                let s = self.contour.start_point();
                (s.x as f64, s.y as f64)
            }
        }
    }

    /// Centroid truncated to integer pixel coordinates.
    pub fn centroid(&self) -> Point {
        let (cx, cy) = self.centroid_f64();
        Point::new(cx as i32, cy as i32)
    }

    /// Principal-axis angle in radians.
    pub fn orientation(&self) -> f64 {
        self.moments().map(|m| m.orientation()).unwrap_or(0.0)
    }

    /// `perimeter² / area`.
    pub fn compactness(&self) -> f64 {
        let a = self.area();
        if a <= 0.0 {
            return f64::INFINITY;
        }
        self.perimeter().powi(2) / a
    }

    /// `4π·area / perimeter²`; 1 for an ideal disc.
    pub fn circularity(&self) -> f64 {
        let p = self.perimeter();
        if p <= 0.0 {
            return 0.0;
        }
        4.0 * std::f64::consts::PI * self.area() / (p * p)
    }

    /// Ratio of the covariance eigenvalues, major over minor.
    pub fn eccentricity(&self) -> f64 {
        let Some(m) = self.moments() else {
            return 1.0;
        };
        let (major, minor) = m.eigenvalues();
        if minor.abs() <= f64::EPSILON {
            return f64::INFINITY;
        }
        major / minor
    }

    /// Principal axis lengths `2·sqrt(eig / area)`, major first.
    pub fn axes(&self) -> (f64, f64) {
        let a = self.area();
        match self.moments() {
            Some(m) if a > 0.0 => {
                let (major, minor) = m.eigenvalues();
                (
                    2.0 * (major.max(0.0) / a).sqrt(),
                    2.0 * (minor.max(0.0) / a).sqrt(),
                )
            }
            _ => (0.0, 0.0),
        }
    }

    /// Largest distance from the centroid to a boundary pixel.
    pub fn max_radius(&self) -> f64 {
        let (cx, cy) = self.centroid_f64();
        self.contour
            .points()
            .iter()
            .map(|p| (p.x as f64 - cx).hypot(p.y as f64 - cy))
            .fold(0.0, f64::max)
    }

    pub fn number_of_holes(&self) -> usize {
        self.inner.iter().filter(|r| r.empty).count()
    }

    /// `1 - holes`.
    pub fn euler_number(&self) -> i32 {
        1 - self.number_of_holes() as i32
    }

    /// Bounds of the pixel set after rotating it by `-orientation()`.
    pub fn rotated_bounds(&self) -> BoundingBox {
        let angle = -self.orientation();
        let (sin, cos) = angle.sin_cos();
        let rotated = self.points().iter().map(|p| {
            let (x, y) = (p.x as f64, p.y as f64);
            Point::new(
                (x * cos - y * sin).round() as i32,
                (x * sin + y * cos).round() as i32,
            )
        });
        BoundingBox::enclosing(rotated).unwrap_or_else(|| self.bounds())
    }

    /// Area over the rotated bounding-box area.
    pub fn filling_ratio(&self) -> f64 {
        let rb = self.rotated_bounds();
        let box_area = rb.area() as f64;
        if box_area <= 0.0 {
            return 0.0;
        }
        self.area() / box_area
    }

    /// Cached descriptor with the default layout.
    pub fn feature_vector(&self) -> &FeatureVector {
        self.features.get_or_init(|| {
            self.feature_vector_with(FeatureVector::DEFAULT_TRACKS, FeatureVector::DEFAULT_SECTORS)
        })
    }

    pub fn feature_vector_with(&self, tracks: usize, sectors: usize) -> FeatureVector {
        FeatureVector::extract(
            self.points(),
            self.centroid_f64(),
            self.max_radius(),
            tracks,
            sectors,
        )
    }

    /// Euclidean distance between the two regions' default descriptors.
    pub fn feature_distance(&self, other: &Region) -> Result<f64> {
        self.feature_vector().distance(other.feature_vector())
    }

    /// Bounding-box containment of `inner` in `outer`.
    pub fn is_contained(outer: &Region, inner: &Region) -> bool {
        Contour::is_contained(&outer.contour, &inner.contour)
    }

    /// Copy without nested regions, used when a region is listed as another
    /// region's decoration.
    pub fn shallow_clone(&self) -> Region {
        let mut r = Region::new(self.id, self.contour.clone());
        r.empty = self.empty;
        r
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Region {} bounds {} codes {} inner {}",
            self.id,
            self.bounds(),
            self.contour.len(),
            self.inner.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::{ChainCode, MarchDirection};

    /// Boundary of a `w × h` block at `(x0, y0)`, walked down the left side.
    fn rect_contour(x0: i32, y0: i32, w: i32, h: i32) -> Contour {
        use ChainCode::*;
        let mut codes = vec![West];
        codes.extend(std::iter::repeat(South).take((h - 1) as usize));
        codes.extend(std::iter::repeat(East).take((w - 1) as usize));
        codes.extend(std::iter::repeat(North).take((h - 1) as usize));
        codes.extend(std::iter::repeat(West).take((w - 2) as usize));
        Contour::new(Point::new(x0, y0), codes, MarchDirection::CounterClockwise)
    }

    #[test]
    fn block_geometry() {
        let mut r = Region::new(RegionId(0), rect_contour(10, 20, 8, 5));
        assert_eq!(r.state(), RegionState::Partial);
        r.build();
        assert_eq!(r.state(), RegionState::Built);
        assert_eq!(r.area(), 40.0);
        assert_eq!(r.points().len(), 40);
        assert_eq!(r.centroid(), Point::new(13, 22));
        let (cx, cy) = r.centroid_f64();
        assert!((cx - 13.5).abs() < 1e-9 && (cy - 22.0).abs() < 1e-9);
        assert!(r.orientation().abs() < 1e-9);
        assert!(r.eccentricity() > 1.0);
        assert_eq!(r.euler_number(), 1);
        assert!((r.filling_ratio() - 1.0).abs() < 1e-9);
        let (major, minor) = r.axes();
        assert!(major > minor);
    }

    #[test]
    fn inner_regions_cut_points_and_holes_cut_area() {
        let mut outer = Region::new(RegionId(0), rect_contour(0, 0, 10, 10));
        let mut hole = Region::new(RegionId(1), rect_contour(3, 3, 4, 4));
        hole.set_empty_region(true);
        outer.build();
        outer.add_inner_region(hole.shallow_clone());
        assert_eq!(outer.state(), RegionState::Partial);
        assert_eq!(outer.points().len(), 100 - 16);
        assert_eq!(outer.area(), 100.0 - 16.0);
        assert_eq!(outer.number_of_holes(), 1);
        assert_eq!(outer.euler_number(), 0);

        hole.set_empty_region(false);
        outer.set_inner_regions(vec![hole]);
        assert_eq!(outer.area(), 100.0);
        assert_eq!(outer.points().len(), 84);
        assert!(outer.remove_inner_region(RegionId(1)).is_some());
        assert_eq!(outer.points().len(), 100);
    }

    #[test]
    fn moments_agree_with_cached_values() {
        let r = Region::new(RegionId(3), rect_contour(2, 2, 6, 3));
        assert_eq!(r.moment(0, 0), 18.0);
        assert!((r.central_moment(1, 0)).abs() < 1e-9);
        let eta = r.normalized_central_moment(2, 0);
        let hu = r.hu_moments();
        assert!((hu[0] - (eta + r.normalized_central_moment(0, 2))).abs() < 1e-12);
        // fourth order is computed on demand
        assert!(r.central_moment(4, 0) > 0.0);
        assert!(r.feature_vector().total() > 0);
        assert_eq!(r.feature_distance(&r.clone()).unwrap(), 0.0);
    }
}
