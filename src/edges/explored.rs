//! Exploration labels for contour tracing.
//!
//! Every trace draws a fresh [`TraceTag`]. Pixels a trace walks over, and
//! after success the whole edge component it bounds, carry its tag; the raster scan only starts new traces
//! on untagged foreground, and a running trace treats pixels tagged by other
//! traces as background.
use crate::edges::edge_map::EdgeMap;
use crate::image::ImageView;
use crate::types::Point;

/// Label identifying one trace on an [`ExploredMap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TraceTag(u32);

impl TraceTag {
    pub fn get(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExploredMap {
    w: usize,
    h: usize,
    labels: Vec<u32>,
    next_tag: u32,
}

const UNEXPLORED: u32 = 0;

impl ExploredMap {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            labels: vec![UNEXPLORED; w * h],
            next_tag: 1,
        }
    }

    /// Allocate the tag for the next trace.
    pub fn begin_trace(&mut self) -> TraceTag {
        let tag = TraceTag(self.next_tag);
        self.next_tag = self.next_tag.wrapping_add(1).max(1);
        tag
    }

    #[inline]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| y as usize * self.w + x as usize)
    }

    /// Tag stored at `(x, y)`, `None` when unexplored or outside the raster.
    pub fn label(&self, x: i64, y: i64) -> Option<TraceTag> {
        let i = self.index(x, y)?;
        let v = self.labels[i];
        (v != UNEXPLORED).then_some(TraceTag(v))
    }

    #[inline]
    pub fn is_explored(&self, x: i64, y: i64) -> bool {
        self.label(x, y).is_some()
    }

    /// True when `(x, y)` is unexplored or already carries `tag`.
    #[inline]
    pub fn is_open_for(&self, x: i64, y: i64, tag: TraceTag) -> bool {
        match self.index(x, y) {
            Some(i) => self.labels[i] == UNEXPLORED || self.labels[i] == tag.0,
            None => false,
        }
    }

    /// Tag `(x, y)` unconditionally. Out-of-range coordinates are ignored.
    pub fn mark(&mut self, x: i64, y: i64, tag: TraceTag) {
        if let Some(i) = self.index(x, y) {
            self.labels[i] = tag.0;
        }
    }

    /// Tag `(x, y)` only if no trace has claimed it yet. Returns whether the
    /// tag was written.
    pub fn claim(&mut self, x: i64, y: i64, tag: TraceTag) -> bool {
        match self.index(x, y) {
            Some(i) if self.labels[i] == UNEXPLORED => {
                self.labels[i] = tag.0;
                true
            }
            _ => false,
        }
    }

    /// Tag every unexplored edge pixel 8-connected to `seeds`, including the
    /// interior of filled blobs. Returns the number of pixels newly tagged.
    pub fn claim_component(&mut self, seeds: &[Point], tag: TraceTag, edges: &EdgeMap) -> usize {
        let mut stack: Vec<Point> = seeds.to_vec();
        let mut claimed = 0;
        while let Some(p) = stack.pop() {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let (x, y) = (p.x as i64 + dx, p.y as i64 + dy);
                    if edges.is_foreground(x, y) && self.claim(x, y, tag) {
                        claimed += 1;
                        stack.push(Point::new(x as i32, y as i32));
                    }
                }
            }
        }
        claimed
    }

    pub fn explored_count(&self) -> usize {
        self.labels.iter().filter(|&&v| v != UNEXPLORED).count()
    }

    pub fn area(&self) -> usize {
        self.w * self.h
    }
}

impl ImageView for ExploredMap {
    type Pixel = u32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.w
    }
    #[inline]
    fn row(&self, y: usize) -> &[u32] {
        let start = y * self.w;
        &self.labels[start..start + self.w]
    }
}
