use super::descriptors::RegionDescriptors;
use super::hypothesis::{test_all, test_features, Hypothesis};
use super::objects::{GeometricObject, ObjectType};
use crate::region::{FeatureVector, Region};
use crate::statistics::{class_ids, ObjectStatistics, StatisticsProvider};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shape tests the classifier can run, in the order given by
/// [`ClassifierParams::priority`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Ellipse,
    Rectangle,
    Bar,
    Character,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    /// Order of shape tests; the first accepted wins.
    pub priority: Vec<ShapeKind>,
    /// Regions with area at or below this many pixels are noise.
    pub noise_area_threshold: f64,
    /// Feature vector rings for [`ShapeClassifier::feature_vector`].
    pub feature_tracks: usize,
    /// Feature vector wedges for [`ShapeClassifier::feature_vector`].
    pub feature_sectors: usize,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            priority: vec![
                ShapeKind::Ellipse,
                ShapeKind::Rectangle,
                ShapeKind::Bar,
                ShapeKind::Character,
            ],
            noise_area_threshold: 10.0,
            feature_tracks: 6,
            feature_sectors: 4,
        }
    }
}

/// Statistical recogniser for region shapes.
///
/// Stateless apart from its statistics handle, so one instance may classify
/// regions from several threads.
#[derive(Clone)]
pub struct ShapeClassifier {
    stats: Arc<dyn StatisticsProvider>,
    params: ClassifierParams,
}

impl ShapeClassifier {
    pub fn new(stats: Arc<dyn StatisticsProvider>, params: ClassifierParams) -> Self {
        Self { stats, params }
    }

    pub fn params(&self) -> &ClassifierParams {
        &self.params
    }

    pub fn statistics(&self) -> &dyn StatisticsProvider {
        self.stats.as_ref()
    }

    fn class(&self, id: &str) -> Option<&ObjectStatistics> {
        let stats = self.stats.class_statistics(id);
        if stats.is_none() {
            debug!("ShapeClassifier: no statistics for class `{id}`, test skipped");
        }
        stats
    }

    /// Runs the shape tests in priority order.
    pub fn classify(&self, region: &Region) -> Option<GeometricObject> {
        let d = RegionDescriptors::of(region);
        self.params
            .priority
            .iter()
            .find_map(|&kind| self.try_kind(kind, region, &d))
    }

    pub fn try_kind(
        &self,
        kind: ShapeKind,
        region: &Region,
        d: &RegionDescriptors,
    ) -> Option<GeometricObject> {
        let bounds = region.bounds();
        match kind {
            ShapeKind::Ellipse => self
                .accepts(class_ids::ELLIPSE, &[("circularity", d.circularity)])
                .then_some(GeometricObject::Ellipse { bounds }),
            ShapeKind::Rectangle => self
                .accepts(
                    class_ids::RECTANGLE,
                    &[("compactness", d.compactness), ("phi1", d.hu[0])],
                )
                .then_some(GeometricObject::Rectangle { bounds }),
            ShapeKind::Bar => self
                .accepts(
                    class_ids::BAR,
                    &[("compactness", d.compactness), ("phi1", d.hu[0])],
                )
                .then_some(GeometricObject::Bar { bounds }),
            ShapeKind::Character => self.recognize_character(region, d),
        }
    }

    fn accepts(&self, class_id: &str, features: &[(&str, f64)]) -> bool {
        self.class(class_id)
            .map(|stats| test_features(stats, self.stats.threshold(), features).accepted())
            .unwrap_or(false)
    }

    pub fn recognize_ellipse(&self, region: &Region) -> Option<GeometricObject> {
        self.try_kind(ShapeKind::Ellipse, region, &RegionDescriptors::of(region))
    }

    pub fn recognize_rectangle(&self, region: &Region) -> Option<GeometricObject> {
        self.try_kind(ShapeKind::Rectangle, region, &RegionDescriptors::of(region))
    }

    pub fn recognize_bar(&self, region: &Region) -> Option<GeometricObject> {
        self.try_kind(ShapeKind::Bar, region, &RegionDescriptors::of(region))
    }

    /// Tests every trained character. Several passing classes are ranked by
    /// their summed squared z-scores.
    pub fn recognize_character(
        &self,
        region: &Region,
        d: &RegionDescriptors,
    ) -> Option<GeometricObject> {
        let threshold = self.stats.threshold();
        let best = self
            .stats
            .character_statistics()
            .iter()
            .filter_map(|stats| {
                let glyph = stats.text.as_deref().and_then(|t| t.chars().next())?;
                let h: Hypothesis = test_all(stats, threshold, |name| d.value(name));
                h.accepted().then_some((glyph, h.score()))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))?;
        debug!(
            "ShapeClassifier: region {} recognised as '{}' (score {:.3})",
            region.id(),
            best.0,
            best.1
        );
        Some(GeometricObject::Character {
            bounds: region.bounds(),
            glyph: best.0,
            centroid: region.centroid(),
        })
    }

    /// Boundary descriptor laid out by `feature_tracks` × `feature_sectors`.
    pub fn feature_vector(&self, region: &Region) -> FeatureVector {
        region.feature_vector_with(self.params.feature_tracks, self.params.feature_sectors)
    }

    /// Area at or below the noise threshold.
    pub fn is_noise(&self, region: &Region) -> bool {
        region.area() <= self.params.noise_area_threshold
    }

    /// A bar centred in its parent box.
    pub fn is_division_symbol(&self, outer: &Region, inner: &Region) -> bool {
        let bounds = outer.bounds();
        let (ox, oy) = outer.centroid_f64();
        let (ix, iy) = inner.centroid_f64();
        let dx = (ox - ix).abs() / bounds.width() as f64;
        let dy = (oy - iy).abs() / bounds.height() as f64;
        self.accepts(
            class_ids::DIVISION_SYMBOL,
            &[("centroid_x", dx), ("centroid_y", dy)],
        )
    }

    /// A second outline traced just inside its parent's stroke.
    pub fn is_inner_contour_region(&self, outer: &Region, inner: &Region) -> bool {
        let outer_area = outer.area();
        let outer_perimeter = outer.perimeter();
        if outer_area <= 0.0 || outer_perimeter <= 0.0 {
            return false;
        }
        let area_diff = ((outer_area - inner.area()) / outer_area).abs();
        let perimeter_diff = ((outer_perimeter - inner.perimeter()) / outer_perimeter).abs();
        self.accepts(
            class_ids::INNER_CONTOUR_REGION,
            &[
                ("filling_area", area_diff),
                ("filling_perimeter", perimeter_diff),
            ],
        )
    }

    /// Object for a manual recognition; `None` for noise.
    pub fn create_object(region: &Region, object_type: ObjectType) -> Option<GeometricObject> {
        let bounds = region.bounds();
        match object_type {
            ObjectType::Noise => None,
            ObjectType::Rectangle => Some(GeometricObject::Rectangle { bounds }),
            ObjectType::Ellipse => Some(GeometricObject::Ellipse { bounds }),
            ObjectType::Bar => Some(GeometricObject::Bar { bounds }),
            ObjectType::Arrow(direction) => Some(GeometricObject::arrow(direction, &bounds)),
            ObjectType::Character(glyph) => Some(GeometricObject::Character {
                bounds,
                glyph,
                centroid: region.centroid(),
            }),
        }
    }
}
