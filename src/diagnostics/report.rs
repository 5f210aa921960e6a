use super::timing::TimingBreakdown;
use crate::classifier::ObjectType;
use crate::parser::{DetectionResult, DiagramAst, ParserState};
use crate::region::{FeatureVector, RegionId};
use crate::types::BoundingBox;
use serde::Serialize;
use std::fmt;

/// Geometry and recognition status of one traced region.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    pub id: RegionId,
    pub bounds: BoundingBox,
    pub area: f64,
    pub perimeter: f64,
    pub codes: usize,
    pub inner: Vec<RegionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<ObjectType>,
    /// Waiting for a manual recognition.
    pub pending: bool,
    pub features: FeatureVector,
}

/// Snapshot produced by [`DiagramParser::report`](crate::parser::DiagramParser::report).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub width: usize,
    pub height: usize,
    pub state: ParserState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<DetectionResult>,
    pub regions: Vec<RegionSummary>,
    pub unrecognized: Vec<RegionId>,
    pub ast: DiagramAst,
    pub timings: TimingBreakdown,
}

impl fmt::Display for DetectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self
            .result
            .map(|r| format!("{r:?}"))
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            f,
            "{}x{} state={} result={} regions={} pending={} nodes={} ({:.2} ms)",
            self.width,
            self.height,
            self.state,
            result,
            self.regions.len(),
            self.unrecognized.len(),
            self.ast.node_count(),
            self.timings.total_ms
        )?;
        for r in &self.regions {
            let object = r
                .object
                .map(|o| o.to_string())
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                f,
                "  {} {} area={:.0} perimeter={:.1} object={}{}",
                r.id,
                r.bounds,
                r.area,
                r.perimeter,
                object,
                if r.pending { " (pending)" } else { "" }
            )?;
        }
        Ok(())
    }
}
