//! Error type shared by the library.
//!
//! Expected algorithmic outcomes (no start point left, an open contour, a
//! region nobody recognised) are modelled as result enums next to the code
//! that produces them. `DetectorError` only covers bad input, protocol
//! misuse and cancellation.

use crate::parser::ParserState;
use crate::region::RegionId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectorError {
    /// The source image or map has no pixels.
    #[error("empty image ({width}x{height})")]
    EmptyImage { width: usize, height: usize },

    /// A buffer does not match the dimensions it claims.
    #[error("buffer size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A parameter is outside its valid domain.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The parser was asked for something its current state does not allow.
    #[error("operation requires parser state {expected:?}, current state is {actual:?}")]
    InvalidState {
        expected: ParserState,
        actual: ParserState,
    },

    /// A manual recognition named a region that is not waiting for one.
    #[error("region {0} is not awaiting recognition")]
    RegionNotPending(RegionId),

    /// Two feature vectors with different track/sector layouts were compared.
    #[error("feature vector layouts differ: {left:?} vs {right:?}")]
    FeatureShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    /// A cancellation token fired while tracing.
    #[error("operation cancelled")]
    Cancelled,

    /// The background parser thread stopped without handing back its state.
    #[error("background task failed: {0}")]
    TaskFailed(String),
}

pub type Result<T, E = DetectorError> = std::result::Result<T, E>;
