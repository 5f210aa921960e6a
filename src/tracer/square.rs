//! Square tracing.
//!
//! On an edge pixel the walker records the step and turns right; on
//! background it turns left. Each turn also moves into the neighbour on that
//! side, so only 4-connected neighbours are examined directly and diagonal
//! steps appear as two moves folded into one code. The walk closes on
//! re-entering the start pixel with the start heading; it is abandoned after
//! `4 × area` moves or once the codes reach the raster area.
//!
//! Only 4-connected boundaries are followed reliably. On a thin 8-connected
//! curve the walker closes on a fragment of it; the rest of the curve is
//! claimed with that fragment's component, so one curve yields one short
//! contour. Use [`MooreNeighborTracer`](crate::tracer::MooreNeighborTracer) for such input.
use crate::edges::{EdgeMap, ExploredMap};
use crate::error::Result;
use crate::tracer::cancel::CancellationToken;
use crate::tracer::walker::{find_start, TraceRun};
use crate::tracer::{check_dimensions, ContourTracer, TracingOutcome};
use crate::types::BoundingBox;

#[derive(Clone, Copy, Debug, Default)]
pub struct SquareTracingTracer;

impl SquareTracingTracer {
    pub fn new() -> Self {
        Self
    }
}

impl ContourTracer for SquareTracingTracer {
    fn name(&self) -> &'static str {
        "SquareTracingTracer"
    }

    fn trace(
        &self,
        edge_map: &EdgeMap,
        explored: &mut ExploredMap,
        bounds: BoundingBox,
        cancel: &CancellationToken,
    ) -> Result<TracingOutcome> {
        check_dimensions(edge_map, explored)?;
        let Some((start, heading)) = find_start(edge_map, explored, bounds) else {
            return Ok(TracingOutcome::NotAbleToFindStartPoint);
        };

        let mut run = TraceRun::new(edge_map, explored, start, heading, cancel);
        let budget = run.code_budget();
        let max_moves = budget.saturating_mul(4);
        let mut from = start;
        run.walker.turn_right();

        for _ in 0..max_moves {
            run.check_cancelled()?;
            if run.here_passable() {
                if run.walker.pos != from {
                    run.step_to_here(from);
                    from = run.walker.pos;
                }
                run.walker.turn_right();
            } else {
                run.walker.turn_left();
            }

            if run.closed() {
                return Ok(run.finish(from, self.name()));
            }
            if run.codes.len() >= budget {
                break;
            }
        }
        Ok(run.abandon(self.name()))
    }
}
