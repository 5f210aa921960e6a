//! Diagram parser driving tracing, nesting and classification.
//!
//! Typical usage:
//! ```no_run
//! use block_diagram_detector::prelude::*;
//! use block_diagram_detector::tracer::CancellationToken;
//! use std::sync::Arc;
//!
//! # fn example(edges: EdgeMap, stats: StatisticsTable) -> block_diagram_detector::Result<()> {
//! let mut parser = DiagramParser::new(edges, Arc::new(stats), ParserParams::default())?;
//! parser.run(&CancellationToken::new())?;
//! if parser.state() == ParserState::PartialRecognized {
//!     for region in parser.unrecognized_regions()? {
//!         println!("needs a label: {region}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
use super::ast::{AstNode, DiagramAst};
use super::params::ParserParams;
use super::state::{DetectionResult, ParserState, StateHistory};
use crate::classifier::{GeometricObject, ObjectType, RegionDescriptors, ShapeClassifier};
use crate::diagnostics::{DetectionReport, RegionSummary, TimingBreakdown};
use crate::edges::{EdgeMap, ExploredMap};
use crate::error::{DetectorError, Result};
use crate::image::ImageView;
use crate::region::{Region, RegionId};
use crate::statistics::StatisticsProvider;
use crate::tracer::{CancellationToken, TracingOutcome};
use crate::types::BoundingBox;
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::debug;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Sent to every subscriber when parsing ends, and again when the last
/// manual recognition completes the tree.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishEvent {
    pub result: DetectionResult,
    pub state: ParserState,
    pub regions: Vec<RegionId>,
    pub unrecognized: Vec<RegionId>,
    pub ast: DiagramAst,
}

/// Turns one edge map into a diagram tree.
///
/// `Undetected → Tracing → Traced → Parsing → Parsed | PartialRecognized`,
/// then `PartialRecognized → Parsed` once every pending region has been
/// resolved with [`DiagramParser::set_recognition`].
pub struct DiagramParser {
    params: ParserParams,
    classifier: ShapeClassifier,
    edge_map: EdgeMap,
    explored: ExploredMap,
    history: StateHistory,
    result: Option<DetectionResult>,
    tracing_degraded: bool,
    regions: Vec<Region>,
    unrecognized: Vec<RegionId>,
    ast: DiagramAst,
    timings: TimingBreakdown,
    subscribers: Vec<Sender<FinishEvent>>,
}

impl DiagramParser {
    /// Fails on an empty edge map.
    pub fn new(
        edge_map: EdgeMap,
        stats: Arc<dyn StatisticsProvider>,
        params: ParserParams,
    ) -> Result<Self> {
        if edge_map.is_empty() {
            return Err(DetectorError::EmptyImage {
                width: edge_map.width(),
                height: edge_map.height(),
            });
        }
        let explored = edge_map.explored_copy();
        let classifier = ShapeClassifier::new(stats, params.classifier.clone());
        let mut history = StateHistory::new(params.history_len);
        history.push(ParserState::Undetected);
        Ok(Self {
            params,
            classifier,
            edge_map,
            explored,
            history,
            result: None,
            tracing_degraded: false,
            regions: Vec::new(),
            unrecognized: Vec::new(),
            ast: DiagramAst::new(),
            timings: TimingBreakdown::default(),
            subscribers: Vec::new(),
        })
    }

    pub fn state(&self) -> ParserState {
        self.history.current().unwrap_or(ParserState::Undetected)
    }

    /// Recent states, oldest first.
    pub fn history(&self) -> impl Iterator<Item = ParserState> + '_ {
        self.history.iter()
    }

    pub fn result(&self) -> Option<DetectionResult> {
        self.result
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.0)
    }

    pub fn ast(&self) -> &DiagramAst {
        &self.ast
    }

    pub fn edge_map(&self) -> &EdgeMap {
        &self.edge_map
    }

    pub fn explored_map(&self) -> &ExploredMap {
        &self.explored
    }

    pub fn classifier(&self) -> &ShapeClassifier {
        &self.classifier
    }

    pub fn timings(&self) -> &TimingBreakdown {
        &self.timings
    }

    /// New receiver for [`FinishEvent`]s.
    pub fn subscribe(&mut self) -> Receiver<FinishEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    fn set_state(&mut self, next: ParserState) {
        debug!("DiagramParser: {} -> {}", self.state(), next);
        self.history.push(next);
    }

    fn expect_state(&self, expected: ParserState) -> Result<()> {
        let actual = self.state();
        if actual != expected {
            return Err(DetectorError::InvalidState { expected, actual });
        }
        Ok(())
    }

    /// Trace then parse, starting from whichever of the two is due.
    pub fn run(&mut self, cancel: &CancellationToken) -> Result<DetectionResult> {
        if self.state() == ParserState::Undetected {
            self.trace(cancel)?;
        }
        self.parse()
    }

    fn search_bounds(&self) -> Option<BoundingBox> {
        let raster = self.edge_map.bounds();
        match self.params.search_bounds {
            Some(b) => raster.clip(&b),
            None => Some(raster),
        }
    }

    /// Traces every contour in the search bounds and nests the regions.
    ///
    /// An open contour degrades the result but tracing continues. On
    /// cancellation the parser stays in `Tracing`.
    pub fn trace(&mut self, cancel: &CancellationToken) -> Result<DetectionResult> {
        self.expect_state(ParserState::Undetected)?;
        self.set_state(ParserState::Tracing);
        let t0 = Instant::now();

        let tracer = self.params.tracer.tracer();
        let mut open = 0usize;
        let mut noise = 0usize;
        if let Some(bounds) = self.search_bounds() {
            loop {
                match tracer.trace(&self.edge_map, &mut self.explored, bounds, cancel)? {
                    TracingOutcome::Successful(contour) => {
                        let region = Region::new(RegionId(self.regions.len()), contour);
                        if self.classifier.is_noise(&region) {
                            noise += 1;
                            continue;
                        }
                        self.regions.push(region);
                    }
                    TracingOutcome::NotAbleToContour { start, codes } => {
                        debug!(
                            "DiagramParser: open contour at {} after {} codes",
                            start, codes
                        );
                        open += 1;
                    }
                    TracingOutcome::NotAbleToFindStartPoint => break,
                }
            }
        }
        let trace_ms = t0.elapsed().as_secs_f64() * 1000.0;
        let mut stage = t0;
        self.timings.lap("tracing", &mut stage);
        self.build_inner_regions();
        self.timings.lap("inner_regions", &mut stage);
        build_geometry(&mut self.regions);
        self.timings.lap("geometry", &mut stage);

        self.tracing_degraded = open > 0;
        let result = if self.regions.is_empty() {
            DetectionResult::Unsuccessful
        } else if self.tracing_degraded {
            DetectionResult::PartialSuccessful
        } else {
            DetectionResult::Successful
        };
        debug!(
            "DiagramParser: traced {} regions ({} open, {} noise) in {:.2} ms",
            self.regions.len(),
            open,
            noise,
            trace_ms
        );
        self.result = Some(result);
        self.set_state(ParserState::Traced);
        Ok(result)
    }

    /// Gives each region its directly nested successors. A later region `j`
    /// is nested in `i` when its box lies inside `i`'s and no region traced
    /// between them sits in `i` and encloses `j`.
    fn build_inner_regions(&mut self) {
        let n = self.regions.len();
        for i in 0..n {
            let inner: Vec<Region> = {
                let regions = &self.regions;
                let outer = &regions[i];
                (i + 1..n)
                    .filter(|&j| Region::is_contained(outer, &regions[j]))
                    .filter(|&j| {
                        !(i + 1..j).any(|k| {
                            Region::is_contained(outer, &regions[k])
                                && Region::is_contained(&regions[k], &regions[j])
                        })
                    })
                    .map(|j| regions[j].shallow_clone())
                    .collect()
            };
            if !inner.is_empty() {
                self.regions[i].set_inner_regions(inner);
            }
        }
    }

    /// Classifies outer regions and their direct decorations.
    pub fn parse(&mut self) -> Result<DetectionResult> {
        self.expect_state(ParserState::Traced)?;
        self.set_state(ParserState::Parsing);
        let t0 = Instant::now();

        let nested: Vec<RegionId> = self
            .regions
            .iter()
            .flat_map(|r| r.inner_regions().iter().map(Region::id))
            .collect();
        let mut ast = DiagramAst::new();
        let mut unrecognized = Vec::new();
        for region in self.regions.iter().filter(|r| !nested.contains(&r.id())) {
            let object = self.classifier.classify(region);
            let mut node = AstNode::new(region.id(), region.bounds(), object);
            match node.object.as_ref().map(GeometricObject::object_type) {
                Some(ObjectType::Rectangle) | Some(ObjectType::Ellipse) => {
                    self.parse_inner_regions(region, &mut node, &mut unrecognized);
                }
                Some(_) => {}
                None => unrecognized.push(region.id()),
            }
            ast.children.push(node);
        }
        let classified = ast.node_count();
        self.ast = ast;
        self.unrecognized = unrecognized;
        self.timings.push("parsing", t0.elapsed().as_secs_f64() * 1000.0);

        let (result, next) = if classified == 0 {
            (DetectionResult::Unsuccessful, ParserState::Parsed)
        } else if self.unrecognized.len() == classified {
            (DetectionResult::Unsuccessful, ParserState::PartialRecognized)
        } else if self.unrecognized.is_empty() {
            (self.completed_result(), ParserState::Parsed)
        } else {
            (
                DetectionResult::PartialSuccessful,
                ParserState::PartialRecognized,
            )
        };
        self.result = Some(result);
        self.set_state(next);
        self.emit_finish();
        Ok(result)
    }

    fn parse_inner_regions(
        &self,
        parent: &Region,
        node: &mut AstNode,
        unrecognized: &mut Vec<RegionId>,
    ) {
        let parent_type = node.object.as_ref().map(GeometricObject::object_type);
        for id in parent.inner_regions().iter().map(Region::id) {
            let Some(inner) = self.regions.get(id.0) else {
                continue;
            };
            let mut object = self.classifier.classify(inner);
            let inner_type = object.as_ref().map(GeometricObject::object_type);
            if inner_type == Some(ObjectType::Bar) {
                if !self.classifier.is_division_symbol(parent, inner) {
                    object = self
                        .classifier
                        .recognize_character(inner, &RegionDescriptors::of(inner));
                }
            } else if inner_type.is_some() && inner_type == parent_type {
                if self.classifier.is_inner_contour_region(parent, inner) {
                    debug!("DiagramParser: dropped duplicate outline {}", id);
                    continue;
                }
                if inner_type == Some(ObjectType::Ellipse) {
                    object = self
                        .classifier
                        .recognize_character(inner, &RegionDescriptors::of(inner));
                }
            }
            if object.is_none() {
                unrecognized.push(id);
            }
            node.children.push(AstNode::new(id, inner.bounds(), object));
        }
    }

    fn completed_result(&self) -> DetectionResult {
        if self.tracing_degraded {
            DetectionResult::PartialSuccessful
        } else {
            DetectionResult::Successful
        }
    }

    /// Regions waiting for a manual recognition.
    pub fn unrecognized_regions(&self) -> Result<Vec<&Region>> {
        self.expect_state(ParserState::PartialRecognized)?;
        Ok(self
            .unrecognized
            .iter()
            .filter_map(|id| self.regions.get(id.0))
            .collect())
    }

    /// Resolves a pending region. `ObjectType::Noise` discards it. Resolving
    /// the last one prunes unrecognised nodes and finishes the parse.
    pub fn set_recognition(&mut self, id: RegionId, object_type: ObjectType) -> Result<()> {
        self.expect_state(ParserState::PartialRecognized)?;
        let pos = self
            .unrecognized
            .iter()
            .position(|pending| *pending == id)
            .ok_or(DetectorError::RegionNotPending(id))?;
        let region = self
            .regions
            .get(id.0)
            .ok_or(DetectorError::RegionNotPending(id))?;
        let object = ShapeClassifier::create_object(region, object_type);
        debug!("DiagramParser: region {} set to {}", id, object_type);
        if let Some(node) = self.ast.find_mut(id) {
            node.object = object;
        }
        self.unrecognized.remove(pos);

        if self.unrecognized.is_empty() {
            self.ast.prune();
            self.result = Some(self.completed_result());
            self.set_state(ParserState::Parsed);
            self.emit_finish();
        }
        Ok(())
    }

    fn emit_finish(&mut self) {
        let Some(result) = self.result else {
            return;
        };
        let event = FinishEvent {
            result,
            state: self.state(),
            regions: self.regions.iter().map(Region::id).collect(),
            unrecognized: self.unrecognized.clone(),
            ast: self.ast.clone(),
        };
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Serializable snapshot of the current state.
    pub fn report(&self) -> DetectionReport {
        let regions = self
            .regions
            .iter()
            .map(|r| {
                let node = self.ast.find(r.id());
                RegionSummary {
                    id: r.id(),
                    bounds: r.bounds(),
                    area: r.area(),
                    perimeter: r.perimeter(),
                    codes: r.contour().len(),
                    inner: r.inner_regions().iter().map(Region::id).collect(),
                    object: node
                        .and_then(|n| n.object.as_ref())
                        .map(GeometricObject::object_type),
                    pending: self.unrecognized.contains(&r.id()),
                    features: self.classifier.feature_vector(r),
                }
            })
            .collect();
        let mut timings = self.timings.clone();
        timings.total_ms = timings.stages.iter().map(|s| s.elapsed_ms).sum();
        DetectionReport {
            width: self.edge_map.width(),
            height: self.edge_map.height(),
            state: self.state(),
            result: self.result,
            regions,
            unrecognized: self.unrecognized.clone(),
            ast: self.ast.clone(),
            timings,
        }
    }
}

/// Fills point sets and moments ahead of classification.
fn build_geometry(regions: &mut [Region]) {
    #[cfg(feature = "parallel")]
    {
        regions.par_iter_mut().for_each(Region::build);
    }
    #[cfg(not(feature = "parallel"))]
    {
        regions.iter_mut().for_each(Region::build);
    }
}
