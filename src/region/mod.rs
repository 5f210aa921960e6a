//! Regions and their shape descriptors.
//!
//! - [`Region`]: a contour plus nested regions, with area, perimeter,
//!   moments, Hu invariants, orientation, compactness, circularity,
//!   eccentricity and a polar [`FeatureVector`].
//! - [`moments`]: raw, central and normalised moments over pixel sets.
//! - [`features`]: the track/sector exposure histogram.
pub mod features;
pub mod moments;
#[allow(clippy::module_inception)]
pub mod region;

pub use features::FeatureVector;
pub use moments::CentralMoments;
pub use region::{Region, RegionId, RegionState};
