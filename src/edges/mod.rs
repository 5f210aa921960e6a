//! Edge extraction: binary edge maps and the Canny detector that produces them.
//!
//! - [`EdgeMap`]: foreground/background raster, the input to contour tracing.
//! - [`ExploredMap`]: per-pixel trace labels layered over an edge map so a
//!   pixel consumed by one trace is never a start point again.
//! - [`CannyDetector`]: luminance, optional contrast normalisation,
//!   derivative-of-Gaussian gradients, algebraic non-maximum suppression and
//!   double-threshold hysteresis.
//!
//! Design goals
//! - Output dimensions always equal input dimensions; borders the kernel cannot
//!   reach stay background.
//! - Keep every intermediate plane available for diagnostics.
//!
//! Complexity
//! - Canny is `O(w·h·k)` for a kernel of `k` taps; hysteresis is linear in the
//!   number of candidate pixels.

pub mod canny;
pub mod edge_map;
pub mod explored;
pub mod grad;
pub mod hysteresis;
pub mod kernel;
pub mod nms;

pub use canny::{CannyDetector, CannyOutput, CannyParams};
pub use edge_map::EdgeMap;
pub use explored::{ExploredMap, TraceTag};
pub use kernel::GaussianKernel;
