//! Moore-neighbour boundary tracing.
//!
//! From each boundary pixel the walker steps back to where it came from and
//! sweeps the eight neighbours counter-clockwise; the first edge pixel hit is
//! the next boundary pixel. The walk closes when it re-enters the start pixel
//! with the start heading, and fails when the sweep finds nothing but the
//! pixel it started from or the code count reaches the raster area.
//!
//! Complexity: O(B) sweeps of at most nine neighbour checks for a boundary of B pixels.
use crate::edges::{EdgeMap, ExploredMap};
use crate::error::Result;
use crate::tracer::cancel::CancellationToken;
use crate::tracer::walker::{find_start, TraceRun};
use crate::tracer::{check_dimensions, ContourTracer, TracingOutcome};
use crate::types::BoundingBox;

#[derive(Clone, Copy)]
enum Op {
    Left,
    Forward,
}

const SWEEP: [Op; 9] = [
    Op::Left,
    Op::Left,
    Op::Forward,
    Op::Left,
    Op::Forward,
    Op::Left,
    Op::Forward,
    Op::Left,
    Op::Left,
];

#[derive(Clone, Copy, Debug, Default)]
pub struct MooreNeighborTracer;

impl MooreNeighborTracer {
    pub fn new() -> Self {
        Self
    }
}

/// Rotate counter-clockwise around the previous pixel until an edge pixel
/// is under the walker.
fn sweep(run: &mut TraceRun<'_>) {
    if run.here_passable() {
        return;
    }
    for op in SWEEP {
        match op {
            Op::Left => run.walker.turn_left(),
            Op::Forward => run.walker.forward(),
        }
        if run.here_passable() {
            return;
        }
    }
}

impl ContourTracer for MooreNeighborTracer {
    fn name(&self) -> &'static str {
        "MooreNeighborTracer"
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
        loop {
            run.check_cancelled()?;
            let from = run.walker.pos;
            run.walker.back();
            sweep(&mut run);

            if run.closed() {
                return Ok(run.finish(from, self.name()));
            }
            if run.walker.pos == from || run.codes.len() >= budget {
                return Ok(run.abandon(self.name()));
            }
            run.step_to_here(from);
        }
    }
}
