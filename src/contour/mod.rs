//! Chain-coded contours.
//!
//! - [`ChainCode`]: Freeman 8-direction alphabet with a sentinel.
//! - [`Contour`]: start point plus codes, with replayed boundary points,
//!   perimeter, several area estimates and point containment.
//! - [`fill`]: even-odd scanline fill used to materialise interiors.
pub mod chain;
#[allow(clippy::module_inception)]
pub mod contour;
pub mod fill;

pub use chain::ChainCode;
pub use contour::{Contour, MarchDirection, PERIMETER_FACTOR};
