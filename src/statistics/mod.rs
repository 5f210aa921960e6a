//! Trained shape statistics.
//!
//! The classifier only reads statistics. Each class is an
//! [`ObjectStatistics`] record: an id, an optional glyph text, and a map of
//! feature name to `{mean, stdev}`. A global `threshold` gives the accepted
//! z-score half-width.
//!
//! Class ids looked up by the classifier live in [`class_ids`]. Character
//! classes are listed separately and carry their glyph in `text`.
//!
//! See also: [`crate::classifier::hypothesis`].
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Ids of the non-character classes.
pub mod class_ids {
    pub const RECTANGLE: &str = "rectangle";
    pub const ELLIPSE: &str = "ellipse";
    pub const BAR: &str = "bar";
    /// Centroid offsets of a bar nested in a box, relative to the box size.
    pub const DIVISION_SYMBOL: &str = "division_symbol";
    /// Relative area/perimeter differences of a double-traced outline.
    pub const INNER_CONTOUR_REGION: &str = "inner_contour_region";
}

/// Threshold used when a statistics file does not set one.
pub const DEFAULT_THRESHOLD: f64 = 2.0;

/// Mean and standard deviation of one trained feature.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub mean: f64,
    pub stdev: f64,
}

impl Statistics {
    pub const fn new(mean: f64, stdev: f64) -> Self {
        Self { mean, stdev }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectStatistics {
    pub id: String,
    /// Glyph for character classes.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub random_vars: BTreeMap<String, Statistics>,
}

impl ObjectStatistics {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: None,
            random_vars: BTreeMap::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_var(mut self, name: impl Into<String>, mean: f64, stdev: f64) -> Self {
        self.random_vars
            .insert(name.into(), Statistics::new(mean, stdev));
        self
    }

    pub fn var(&self, name: &str) -> Option<&Statistics> {
        self.random_vars.get(name)
    }
}

/// Read-only access to trained statistics, shared across threads.
pub trait StatisticsProvider: Send + Sync {
    fn class_statistics(&self, class_id: &str) -> Option<&ObjectStatistics>;
    fn character_statistics(&self) -> &[ObjectStatistics];
    fn threshold(&self) -> f64;
}

/// In-memory statistics table, loadable from JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsTable {
    pub threshold: f64,
    pub objects: Vec<ObjectStatistics>,
    pub characters: Vec<ObjectStatistics>,
}

impl Default for StatisticsTable {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            objects: Vec::new(),
            characters: Vec::new(),
        }
    }
}

impl StatisticsTable {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Adds a class, replacing any existing class with the same id.
    pub fn with_object(mut self, stats: ObjectStatistics) -> Self {
        self.objects.retain(|o| o.id != stats.id);
        self.objects.push(stats);
        self
    }

    pub fn with_character(mut self, stats: ObjectStatistics) -> Self {
        self.characters.push(stats);
        self
    }
}

impl StatisticsProvider for StatisticsTable {
    fn class_statistics(&self, class_id: &str) -> Option<&ObjectStatistics> {
        self.objects.iter().find(|o| o.id == class_id)
    }

    fn character_statistics(&self) -> &[ObjectStatistics] {
        &self.characters
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }
}

pub fn load_statistics(path: &Path) -> Result<StatisticsTable, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read statistics {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse statistics {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_records() {
        let json = r#"{
            "threshold": 3.0,
            "objects": [
                {"id": "ellipse", "randomVars": {"circularity": {"mean": 0.9, "stdev": 0.05}}}
            ],
            "characters": [
                {"id": "minus", "text": "-", "randomVars": {"phi1": {"mean": 0.4, "stdev": 0.1}}}
            ]
        }"#;
        let table: StatisticsTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.threshold(), 3.0);
        let ellipse = table.class_statistics(class_ids::ELLIPSE).unwrap();
        assert_eq!(ellipse.var("circularity"), Some(&Statistics::new(0.9, 0.05)));
        assert!(table.class_statistics(class_ids::BAR).is_none());
        assert_eq!(table.character_statistics()[0].text.as_deref(), Some("-"));
    }

    #[test]
    fn builder_replaces_classes_by_id() {
        let table = StatisticsTable::new(1.5)
            .with_object(ObjectStatistics::new("bar").with_var("phi1", 1.0, 0.1))
            .with_object(ObjectStatistics::new("bar").with_var("phi1", 2.0, 0.1));
        assert_eq!(table.objects.len(), 1);
        assert_eq!(
            table.class_statistics("bar").and_then(|b| b.var("phi1")).map(|s| s.mean),
            Some(2.0)
        );
        let empty: StatisticsTable = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.threshold, DEFAULT_THRESHOLD);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_statistics(Path::new("/nonexistent/stats.json")).unwrap_err();
        assert!(err.starts_with("Failed to read statistics /nonexistent/stats.json"));
    }

    #[test]
    fn shipped_table_covers_every_class() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/statistics.json");
        let table = load_statistics(&path).unwrap();
        for id in [
            class_ids::RECTANGLE,
            class_ids::ELLIPSE,
            class_ids::BAR,
            class_ids::DIVISION_SYMBOL,
            class_ids::INNER_CONTOUR_REGION,
        ] {
            assert!(table.class_statistics(id).is_some(), "missing {id}");
        }
        assert!(table.character_statistics().iter().all(|c| c.text.is_some()));
    }
}
