//! Statistical shape classification.
//!
//! Stages per region:
//! 1. Measure named descriptors ([`RegionDescriptors`]).
//! 2. Run the shape tests in [`ClassifierParams::priority`] order. Ellipse
//!    uses circularity; rectangle and bar use compactness and `phi1`;
//!    characters use every feature their trained record lists.
//! 3. Among several accepted characters pick the lowest summed squared
//!    z-score.
//!
//! Nested-region helpers decide whether an inner region is a centred
//! division bar or a duplicate outline of its parent.
//!
//! See also: [`crate::statistics`], [`crate::parser`].
pub mod descriptors;
pub mod hypothesis;
pub mod objects;
pub mod recognizer;

pub use descriptors::RegionDescriptors;
pub use objects::{ArrowDirection, GeometricObject, ObjectType};
pub use recognizer::{ClassifierParams, ShapeClassifier, ShapeKind};
