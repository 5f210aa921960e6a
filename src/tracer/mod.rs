//! Contour tracing over an [`EdgeMap`].
//!
//! Both tracers share one protocol:
//! 1. Scan the search bounds column by column for the first edge pixel no
//!    earlier trace has claimed. None left ⇒
//!    [`TracingOutcome::NotAbleToFindStartPoint`], the natural end of a pass.
//! 2. Walk the boundary, collecting Freeman codes and tagging visited pixels
//!    on the [`ExploredMap`] with this trace's tag.
//! 3. On closing, claim the 8-connected edge component the boundary touches,
//!    so filled blobs yield one contour, and replace the placeholder first
//!    code with the closing step. Shapes nested inside but not touching stay
//!    open for later traces.
//!
//! The explored map must be owned by a single trace at a time; the `&mut`
//! borrow enforces that.
//!
//! See also: [`MooreNeighborTracer`], [`SquareTracingTracer`].
pub mod cancel;
pub mod moore;
pub mod square;
pub mod walker;

pub use cancel::CancellationToken;
pub use moore::MooreNeighborTracer;
pub use square::SquareTracingTracer;

use crate::contour::Contour;
use crate::edges::{EdgeMap, ExploredMap};
use crate::error::{DetectorError, Result};
use crate::image::ImageView;
use crate::types::{BoundingBox, Point};
use serde::{Deserialize, Serialize};

/// Result of one tracing call. None of these are errors.
#[derive(Clone, Debug, PartialEq)]
pub enum TracingOutcome {
    /// A closed boundary was found.
    Successful(Contour),
    /// The walk from `start` stalled or exceeded its budget.
    NotAbleToContour { start: Point, codes: usize },
    /// Every edge pixel inside the search bounds is already explored.
    NotAbleToFindStartPoint,
}

pub trait ContourTracer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Trace the next contour inside `bounds`.
    ///
    /// Errors only on mismatched map sizes or cancellation.
    fn trace(
        &self,
        edge_map: &EdgeMap,
        explored: &mut ExploredMap,
        bounds: BoundingBox,
        cancel: &CancellationToken,
    ) -> Result<TracingOutcome>;
}

/// Selects a tracer implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TracerKind {
    #[default]
    Moore,
    Square,
}

impl TracerKind {
    pub fn tracer(self) -> Box<dyn ContourTracer> {
        match self {
            TracerKind::Moore => Box::new(MooreNeighborTracer),
            TracerKind::Square => Box::new(SquareTracingTracer),
        }
    }
}

pub(crate) fn check_dimensions(edge_map: &EdgeMap, explored: &ExploredMap) -> Result<()> {
    if edge_map.is_empty() {
        return Err(DetectorError::EmptyImage {
            width: edge_map.width(),
            height: edge_map.height(),
        });
    }
    if edge_map.width() != explored.width() || edge_map.height() != explored.height() {
        return Err(DetectorError::SizeMismatch {
            expected: edge_map.area(),
            actual: explored.area(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_explored_map_is_rejected() {
        let edges = EdgeMap::new(8, 8);
        let mut explored = ExploredMap::new(4, 4);
        let err = TracerKind::Square
            .tracer()
            .trace(&edges, &mut explored, edges.bounds(), &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, DetectorError::SizeMismatch { expected: 64, actual: 16 }));
    }
}
