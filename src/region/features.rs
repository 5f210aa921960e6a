//! Polar boundary descriptor.
//!
//! The disc of radius `max_radius` around the centroid is split into
//! `tracks` concentric rings and `sectors` equal angular wedges. Each cell
//! keeps an 8-bin histogram of boundary pixels by exposure: the index of the
//! first missing neighbour in the order N, NE, E, SE, S, SW, W, NW. Pixels
//! with all eight neighbours present are not counted.
use crate::error::{DetectorError, Result};
use crate::types::Point;
use serde::Serialize;
use std::collections::HashSet;

/// Neighbour visit order for the exposure histogram.
const EXPOSURE_ORDER: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    tracks: usize,
    sectors: usize,
    cells: Vec<[u32; 8]>,
}

/// Ring index of a pixel at distance `d`; the outermost ring also takes
/// `d == max_radius`.
pub fn track_index(d: f64, max_radius: f64, tracks: usize) -> usize {
    if max_radius <= 0.0 {
        return 0;
    }
    let step = max_radius / tracks as f64;
    ((d / step).floor().max(0.0) as usize).min(tracks - 1)
}

/// Wedge index for an offset from the centroid. Angles grow from +x towards
/// +y (downwards in the image).
pub fn sector_index(dx: f64, dy: f64, sectors: usize) -> usize {
    let theta = dy.atan2(dx).to_degrees().rem_euclid(360.0);
    let step = 360.0 / sectors as f64;
    ((theta / step).floor() as usize).min(sectors - 1)
}

/// First missing neighbour of `p` in `points`, `None` for interior pixels.
pub fn exposure(p: Point, points: &HashSet<Point>) -> Option<u8> {
    EXPOSURE_ORDER
        .iter()
        .position(|&(dx, dy)| !points.contains(&p.offset(dx, dy)))
        .map(|i| i as u8)
}

impl FeatureVector {
    pub const DEFAULT_TRACKS: usize = 6;
    pub const DEFAULT_SECTORS: usize = 4;

    /// Empty descriptor; zero counts are raised to one.
    pub fn new(tracks: usize, sectors: usize) -> Self {
        let tracks = tracks.max(1);
        let sectors = sectors.max(1);
        Self {
            tracks,
            sectors,
            cells: vec![[0; 8]; tracks * sectors],
        }
    }

    pub fn extract(
        points: &HashSet<Point>,
        centroid: (f64, f64),
        max_radius: f64,
        tracks: usize,
        sectors: usize,
    ) -> Self {
        let mut fv = Self::new(tracks, sectors);
        for &p in points {
            let Some(rel) = exposure(p, points) else {
                continue;
            };
            let dx = p.x as f64 - centroid.0;
            let dy = p.y as f64 - centroid.1;
            let t = track_index(dx.hypot(dy), max_radius, fv.tracks);
            let s = sector_index(dx, dy, fv.sectors);
            fv.cells[t * fv.sectors + s][rel as usize] += 1;
        }
        fv
    }

    /// `(tracks, sectors)`.
    pub fn layout(&self) -> (usize, usize) {
        (self.tracks, self.sectors)
    }

    pub fn cell(&self, track: usize, sector: usize) -> Option<&[u32; 8]> {
        if track >= self.tracks || sector >= self.sectors {
            return None;
        }
        self.cells.get(track * self.sectors + sector)
    }

    /// Number of boundary pixels binned.
    pub fn total(&self) -> u32 {
        self.cells.iter().flat_map(|c| c.iter()).sum()
    }

    /// Euclidean distance between the two histograms.
    pub fn distance(&self, other: &FeatureVector) -> Result<f64> {
        if self.layout() != other.layout() {
            return Err(DetectorError::FeatureShapeMismatch {
                left: self.layout(),
                right: other.layout(),
            });
        }
        let sum: f64 = self
            .cells
            .iter()
            .zip(&other.cells)
            .flat_map(|(a, b)| a.iter().zip(b.iter()))
            .map(|(&a, &b)| {
                let d = a as f64 - b as f64;
                d * d
            })
            .sum();
        Ok(sum.sqrt())
    }
}
