use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Wall time of one named stage (`"gradients"`, `"tracing"`, ...).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Stage timings of an edge detection or parse, in execution order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn with_total(total_ms: f64) -> Self {
        Self {
            total_ms,
            stages: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }

    /// Pushes the time since `start` and restarts it.
    pub fn lap(&mut self, label: impl Into<String>, start: &mut Instant) {
        self.push(label, start.elapsed().as_secs_f64() * 1000.0);
        *start = Instant::now();
    }

    pub fn stage(&self, label: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.elapsed_ms)
    }

    /// Appends another breakdown's stages and adds its total.
    pub fn merge(&mut self, other: &TimingBreakdown) {
        self.total_ms += other.total_ms;
        self.stages.extend(other.stages.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_keep_order_and_serialize_camel_case() {
        let mut t = TimingBreakdown::with_total(3.0);
        t.push("luminance", 1.0);
        t.push("gradients", 2.0);
        let mut other = TimingBreakdown::with_total(0.5);
        other.push("tracing", 0.5);
        t.merge(&other);
        assert_eq!(t.stage("tracing"), Some(0.5));
        assert_eq!(t.total_ms, 3.5);
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("\"totalMs\":3.5"), "{json}");
        assert!(json.contains("\"elapsedMs\":1.0"), "{json}");
    }
}
