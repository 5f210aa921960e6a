use crate::classifier::ClassifierParams;
use crate::tracer::TracerKind;
use crate::types::BoundingBox;
use serde::Deserialize;

/// Number of past parser states kept for inspection.
pub const DEFAULT_HISTORY_LEN: usize = 15;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParserParams {
    /// Boundary follower used for every trace.
    pub tracer: TracerKind,
    /// Restricts the start-point scan; the whole map when `None`.
    pub search_bounds: Option<BoundingBox>,
    /// Capacity of the state history.
    pub history_len: usize,
    pub classifier: ClassifierParams,
}

impl Default for ParserParams {
    fn default() -> Self {
        Self {
            tracer: TracerKind::default(),
            search_bounds: None,
            history_len: DEFAULT_HISTORY_LEN,
            classifier: ClassifierParams::default(),
        }
    }
}
