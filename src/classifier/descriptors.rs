//! Named scalar features of a region.
//!
//! Names match the keys of trained statistics records:
//! `compactness`, `circularity`, `phi1`..`phi7`, `centroid_x`, `centroid_y`,
//! `radius`, `filling`, `eccentricity`.
use crate::region::Region;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionDescriptors {
    pub compactness: f64,
    pub circularity: f64,
    pub hu: [f64; 7],
    /// `(right - cx) / width` of the contour bounds.
    pub centroid_x: f64,
    /// `(bottom - cy) / height` of the contour bounds.
    pub centroid_y: f64,
    /// Max boundary radius over perimeter.
    pub radius: f64,
    pub filling: f64,
    pub eccentricity: f64,
}

impl RegionDescriptors {
    pub fn of(region: &Region) -> Self {
        let bounds = region.bounds();
        let (cx, cy) = region.centroid_f64();
        let perimeter = region.perimeter();
        Self {
            compactness: region.compactness(),
            circularity: region.circularity(),
            hu: region.hu_moments(),
            centroid_x: (bounds.right as f64 - cx) / bounds.width() as f64,
            centroid_y: (bounds.bottom as f64 - cy) / bounds.height() as f64,
            radius: if perimeter > 0.0 {
                region.max_radius() / perimeter
            } else {
                0.0
            },
            filling: region.filling_ratio(),
            eccentricity: region.eccentricity(),
        }
    }

    /// Value of a named feature, `None` if the name is unknown.
    pub fn value(&self, name: &str) -> Option<f64> {
        let v = match name {
            "compactness" => self.compactness,
            "circularity" => self.circularity,
            "phi1" => self.hu[0],
            "phi2" => self.hu[1],
            "phi3" => self.hu[2],
            "phi4" => self.hu[3],
            "phi5" => self.hu[4],
            "phi6" => self.hu[5],
            "phi7" => self.hu[6],
            "centroid_x" => self.centroid_x,
            "centroid_y" => self.centroid_y,
            "radius" => self.radius,
            "filling" => self.filling,
            "eccentricity" => self.eccentricity,
            _ => return None,
        };
        Some(v)
    }
}
