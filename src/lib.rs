#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod classifier;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod parser;
pub mod statistics;
pub mod types;

// Stage internals, public for tools and tests.
pub mod contour;
pub mod edges;
pub mod region;
pub mod tracer;

// --- High-level re-exports -------------------------------------------------

pub use crate::edges::{CannyDetector, CannyParams, EdgeMap};
pub use crate::error::{DetectorError, Result};
pub use crate::parser::{DetectionResult, DiagramAst, DiagramParser, ParserParams, ParserState};
pub use crate::statistics::{StatisticsProvider, StatisticsTable};

pub use crate::diagnostics::DetectionReport;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use block_diagram_detector::prelude::*;
/// use block_diagram_detector::tracer::CancellationToken;
/// use std::sync::Arc;
///
/// # fn main() -> block_diagram_detector::Result<()> {
/// let (w, h) = (64usize, 48usize);
/// let gray = vec![255u8; w * h];
/// let img = ImageU8 { w, h, stride: w, data: &gray };
///
/// let edges = CannyDetector::new(CannyParams::default()).detect_luma(&img)?;
/// let mut parser = DiagramParser::new(
///     edges,
///     Arc::new(StatisticsTable::default()),
///     ParserParams::default(),
/// )?;
/// let result = parser.run(&CancellationToken::new())?;
/// println!("{result:?} in state {}", parser.state());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::classifier::{GeometricObject, ObjectType};
    pub use crate::edges::{CannyDetector, CannyParams, EdgeMap};
    pub use crate::image::{ImageRgba, ImageU8};
    pub use crate::parser::{DetectionResult, DiagramParser, ParserParams, ParserState};
    pub use crate::region::{Region, RegionId};
    pub use crate::statistics::{StatisticsProvider, StatisticsTable};
}
