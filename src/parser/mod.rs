//! From an edge map to a diagram tree.
//!
//! Stages:
//! 1. Tracing: repeat the configured tracer over the explored copy until no
//!    start point is left. Closed contours above the noise area become
//!    regions; open ones degrade the result.
//! 2. Nesting: each region takes the later regions whose boxes it directly
//!    encloses.
//! 3. Parsing: outer regions are classified. Rectangles and ellipses then
//!    classify their direct inner regions, turning centred bars into
//!    division symbols and dropping duplicate outlines.
//! 4. Regions nobody recognised wait in a queue for
//!    [`DiagramParser::set_recognition`]; the last one prunes the tree.
//!
//! See also: [`crate::classifier`], [`ParserTask`].
pub mod ast;
pub mod params;
pub mod pipeline;
pub mod state;
pub mod task;

pub use ast::{AstNode, DiagramAst};
pub use params::ParserParams;
pub use pipeline::{DiagramParser, FinishEvent};
pub use state::{DetectionResult, ParserState, StateHistory};
pub use task::ParserTask;
