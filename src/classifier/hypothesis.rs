//! Z-score hypothesis tests against trained statistics.
//!
//! A feature passes when `|(observed - mean) / stdev| <= threshold`. A class
//! is accepted when every evaluated feature passes and at least one feature
//! was evaluated. A zero or negative stdev accepts only an exact match (up to
//! [`DEGENERATE_TOLERANCE`]).
use crate::statistics::{ObjectStatistics, Statistics};
use log::warn;

pub const DEGENERATE_TOLERANCE: f64 = 1e-6;

/// Z-score of `observed`, infinite when the stdev is degenerate and the value
/// is off the mean.
pub fn z_score(observed: f64, stats: &Statistics) -> f64 {
    let diff = observed - stats.mean;
    if stats.stdev > 0.0 {
        diff / stats.stdev
    } else if diff.abs() <= DEGENERATE_TOLERANCE {
        0.0
    } else {
        f64::INFINITY
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Hypothesis {
    threshold: f64,
    evaluated: usize,
    rejected: usize,
    /// Sum of squared z-scores, used to rank competing classes.
    score: f64,
}

impl Hypothesis {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn observe(&mut self, observed: f64, stats: &Statistics) {
        let z = z_score(observed, stats);
        self.evaluated += 1;
        // NaN never passes
        let passed = z.abs() <= self.threshold;
        if !passed {
            self.rejected += 1;
        }
        self.score += z * z;
    }

    pub fn accepted(&self) -> bool {
        self.evaluated > 0 && self.rejected == 0
    }

    pub fn evaluated(&self) -> usize {
        self.evaluated
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

/// Tests the listed features; names absent from `stats` are skipped.
pub fn test_features(stats: &ObjectStatistics, threshold: f64, features: &[(&str, f64)]) -> Hypothesis {
    let mut h = Hypothesis::new(threshold);
    for (name, observed) in features {
        if let Some(s) = stats.var(name) {
            h.observe(*observed, s);
        }
    }
    h
}

/// Tests every trained feature of `stats`, resolving values through `lookup`.
/// Features `lookup` does not know are logged and skipped.
pub fn test_all<F>(stats: &ObjectStatistics, threshold: f64, lookup: F) -> Hypothesis
where
    F: Fn(&str) -> Option<f64>,
{
    let mut h = Hypothesis::new(threshold);
    for (name, s) in &stats.random_vars {
        match lookup(name) {
            Some(observed) => h.observe(observed, s),
            None => warn!("class {}: unknown feature `{}` ignored", stats.id, name),
        }
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_feature_must_pass() {
        let stats = ObjectStatistics::new("rectangle")
            .with_var("compactness", 16.0, 1.0)
            .with_var("phi1", 0.2, 0.01);
        // compactness fails, phi1 passes
        let h = test_features(&stats, 2.0, &[("compactness", 25.0), ("phi1", 0.2)]);
        assert_eq!(h.evaluated(), 2);
        assert!(!h.accepted());
        // compactness passes, phi1 fails
        let h = test_features(&stats, 2.0, &[("compactness", 16.5), ("phi1", 0.5)]);
        assert!(!h.accepted());
        let h = test_features(&stats, 2.0, &[("compactness", 16.5), ("phi1", 0.21)]);
        assert!(h.accepted());
        assert!((h.score() - (0.25 + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn nothing_evaluated_is_not_acceptance() {
        let stats = ObjectStatistics::new("ellipse");
        let h = test_features(&stats, 2.0, &[("circularity", 1.0)]);
        assert_eq!(h.evaluated(), 0);
        assert!(!h.accepted());
    }

    #[test]
    fn degenerate_stdev_needs_exact_match() {
        let s = Statistics::new(1.0, 0.0);
        assert_eq!(z_score(1.0, &s), 0.0);
        assert!(z_score(1.1, &s).is_infinite());
        let mut h = Hypothesis::new(3.0);
        h.observe(f64::NAN, &Statistics::new(0.0, 1.0));
        assert!(!h.accepted());
    }

    #[test]
    fn lookup_skips_unknown_names() {
        let stats = ObjectStatistics::new("seven")
            .with_var("phi1", 0.3, 0.1)
            .with_var("weight", 1.0, 1.0);
        let h = test_all(&stats, 2.0, |name| (name == "phi1").then_some(0.35));
        assert_eq!(h.evaluated(), 1);
        assert!(h.accepted());
    }
}
