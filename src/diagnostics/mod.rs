//! Serializable diagnostics: stage timings and the parser report.
//!
//! [`DetectionReport`] is what the CLI writes as JSON. Timings are collected
//! by the edge detector and the parser as they run.

pub mod report;
pub mod timing;

pub use report::{DetectionReport, RegionSummary};
pub use timing::{StageTiming, TimingBreakdown};
