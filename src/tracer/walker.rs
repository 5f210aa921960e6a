//! State shared by the boundary-following tracers.
//!
//! A [`Walker`] is a position plus a heading. Turning sidesteps into the
//! neighbour on that side and faces it, so one Moore sweep is a fixed
//! sequence of turns and forward steps around the previous boundary pixel.
//! Coordinates are not clamped; anything off the raster reads as background.
use crate::contour::{ChainCode, Contour, MarchDirection};
use crate::edges::{EdgeMap, ExploredMap, TraceTag};
use crate::error::Result;
use crate::tracer::cancel::CancellationToken;
use crate::tracer::TracingOutcome;
use crate::types::{BoundingBox, Point};
use log::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    East,
    North,
    West,
    South,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Walker {
    pub pos: Point,
    pub heading: Heading,
}

impl Walker {
    pub fn new(pos: Point, heading: Heading) -> Self {
        Self { pos, heading }
    }

    pub fn forward(&mut self) {
        self.pos = match self.heading {
            Heading::East => self.pos.offset(1, 0),
            Heading::North => self.pos.offset(0, -1),
            Heading::West => self.pos.offset(-1, 0),
            Heading::South => self.pos.offset(0, 1),
        };
    }

    /// Step backwards and face the way we came from.
    pub fn back(&mut self) {
        let (pos, heading) = match self.heading {
            Heading::East => (self.pos.offset(-1, 0), Heading::West),
            Heading::North => (self.pos.offset(0, 1), Heading::South),
            Heading::West => (self.pos.offset(1, 0), Heading::East),
            Heading::South => (self.pos.offset(0, -1), Heading::North),
        };
        self.pos = pos;
        self.heading = heading;
    }

    pub fn turn_left(&mut self) {
        let (pos, heading) = match self.heading {
            Heading::East => (self.pos.offset(0, -1), Heading::North),
            Heading::North => (self.pos.offset(-1, 0), Heading::West),
            Heading::West => (self.pos.offset(0, 1), Heading::South),
            Heading::South => (self.pos.offset(1, 0), Heading::East),
        };
        self.pos = pos;
        self.heading = heading;
    }

    pub fn turn_right(&mut self) {
        let (pos, heading) = match self.heading {
            Heading::East => (self.pos.offset(0, 1), Heading::South),
            Heading::North => (self.pos.offset(1, 0), Heading::East),
            Heading::West => (self.pos.offset(0, -1), Heading::North),
            Heading::South => (self.pos.offset(-1, 0), Heading::West),
        };
        self.pos = pos;
        self.heading = heading;
    }
}

/// First unexplored edge pixel in column-major order over `bounds`, with the
/// heading the walk starts from: south inside a column, east when the pixel
/// opens a new column.
pub fn find_start(
    edges: &EdgeMap,
    explored: &ExploredMap,
    bounds: BoundingBox,
) -> Option<(Point, Heading)> {
    let mut heading = Heading::South;
    for x in bounds.left..=bounds.right {
        for y in bounds.top..=bounds.bottom {
            let (xi, yi) = (x as i64, y as i64);
            if edges.is_foreground(xi, yi) && !explored.is_explored(xi, yi) {
                return Some((Point::new(x, y), heading));
            }
            heading = Heading::South;
        }
        heading = Heading::East;
    }
    None
}

/// One trace in progress: the walker, the accumulated codes and the tag it
/// writes to the explored map.
pub struct TraceRun<'a> {
    pub edges: &'a EdgeMap,
    pub explored: &'a mut ExploredMap,
    pub tag: TraceTag,
    pub start: Point,
    pub start_heading: Heading,
    pub walker: Walker,
    pub codes: Vec<ChainCode>,
    cancel: &'a CancellationToken,
}

impl<'a> TraceRun<'a> {
    pub fn new(
        edges: &'a EdgeMap,
        explored: &'a mut ExploredMap,
        start: Point,
        start_heading: Heading,
        cancel: &'a CancellationToken,
    ) -> Self {
        let tag = explored.begin_trace();
        Self {
            edges,
            explored,
            tag,
            start,
            start_heading,
            walker: Walker::new(start, start_heading),
            // placeholder for the closing step
            codes: vec![ChainCode::Datum],
            cancel,
        }
    }

    /// Edge pixel not claimed by another trace.
    #[inline]
    pub fn passable(&self, p: Point) -> bool {
        let (x, y) = (p.x as i64, p.y as i64);
        self.edges.is_foreground(x, y) && self.explored.is_open_for(x, y, self.tag)
    }

    #[inline]
    pub fn here_passable(&self) -> bool {
        self.passable(self.walker.pos)
    }

    #[inline]
    pub fn closed(&self) -> bool {
        self.walker.pos == self.start && self.walker.heading == self.start_heading
    }

    /// Upper bound on the number of codes a contour may collect.
    #[inline]
    pub fn code_budget(&self) -> usize {
        self.edges.area()
    }

    #[inline]
    pub fn check_cancelled(&self) -> Result<()> {
        self.cancel.check()
    }

    /// Record a move from `from` to the walker's position.
    pub fn step_to_here(&mut self, from: Point) {
        let here = self.walker.pos;
        self.explored.mark(here.x as i64, here.y as i64, self.tag);
        self.codes.push(ChainCode::between(from, here));
    }

    /// Close the contour and claim its edge component so later scans skip it.
    pub fn finish(mut self, last_from: Point, name: &str) -> TracingOutcome {
        let start = self.start;
        self.explored.mark(start.x as i64, start.y as i64, self.tag);
        self.codes[0] = ChainCode::between(last_from, start);
        let contour = Contour::new(start, self.codes, MarchDirection::CounterClockwise);
        self.explored
            .claim_component(contour.points(), self.tag, self.edges);
        debug!(
            "{}: contour from {} with {} codes, bounds {}",
            name,
            start,
            contour.len(),
            contour.bounds()
        );
        TracingOutcome::Successful(contour)
    }

    /// Give up on this start point. Visited pixels keep the tag so the next
    /// scan moves on.
    pub fn abandon(self, name: &str) -> TracingOutcome {
        let start = self.start;
        self.explored.mark(start.x as i64, start.y as i64, self.tag);
        debug!(
            "{}: not able to contour from {} after {} codes",
            name,
            start,
            self.codes.len()
        );
        TracingOutcome::NotAbleToContour {
            start,
            codes: self.codes.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_sweep_circles_counterclockwise() {
        // Behind (0,-1) facing north: the fixed Moore op sequence visits the
        // eight neighbours of the origin and ends on the origin itself.
        let mut w = Walker::new(Point::new(0, -1), Heading::North);
        let mut seen = vec![w.pos];
        for op in 0..9 {
            match op {
                2 | 4 | 6 => w.forward(),
                _ => w.turn_left(),
            }
            seen.push(w.pos);
        }
        let expected = [
            (0, -1),
            (-1, -1),
            (-1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
            (1, 0),
            (1, -1),
            (0, -1),
            (0, 0),
        ];
        let expected: Vec<Point> = expected.iter().map(|&(x, y)| Point::new(x, y)).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn start_scan_is_column_major() {
        let mut edges = EdgeMap::new(4, 4);
        edges.set(2, 0, true);
        edges.set(1, 3, true);
        let explored = edges.explored_copy();
        let (p, heading) = find_start(&edges, &explored, edges.bounds()).unwrap();
        assert_eq!(p, Point::new(1, 3));
        assert_eq!(heading, Heading::South);

        let mut explored = explored;
        let tag = explored.begin_trace();
        explored.mark(1, 3, tag);
        let (p, heading) = find_start(&edges, &explored, edges.bounds()).unwrap();
        assert_eq!(p, Point::new(2, 0));
        assert_eq!(heading, Heading::East);
    }
}
