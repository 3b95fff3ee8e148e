//! Error Types for the Height-Fusion Engine
//!
//! ## Design Philosophy
//!
//! AltFuse processes fleets of recorded flights in batch, so errors are
//! signals to the surrounding pipeline, not exceptions to die on:
//!
//! 1. **Small and Copy**: Every variant keeps its data inline (indices and
//!    sample counts, no String), so errors can be collected per flight
//!    interval and reported without allocation.
//!
//! 2. **Scoped blast radius**: A quality fault condemns one Flight-Active
//!    interval, never the whole flight and never the engine. The engine
//!    entry points collect faults alongside their output rather than
//!    returning early.
//!
//! 3. **Actionable Information**: Each variant carries enough context for
//!    the caller to decide between "skip and log", "flag the flight for
//!    review", and "fix the upstream alignment bug".
//!
//! ## Error Categories
//!
//! ### Data-quality faults (unrecoverable for one interval)
//! - `CycleFault`: the altitude trace produced a peak where the segmenter
//!   expected a trough. The recording is internally inconsistent and no
//!   trustworthy height signal can be built for that interval.
//!
//! ### Recoverable conditions
//! - `InsufficientData`: not enough extrema or valid samples; the interval
//!   is skipped and its output left at zero/masked.
//!
//! ### Contract violations
//! - `LengthMismatch`: input signals were not aligned by the caller.
//! - `UnstableFilter`: a filter time constant is too short for the sample
//!   rate; the discretized filter would be numerically unstable.

use thiserror_no_std::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine errors - kept small and Copy so they can be collected per interval
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum EngineError {
    /// The altitude trace peaked where the cycle segmenter expected a dip.
    ///
    /// This indicates corrupt or mis-sampled pressure-altitude data; the
    /// affected Flight-Active interval cannot produce a height signal.
    #[error("altitude data should dip but has a peak at sample {index}")]
    CycleFault {
        /// Sample index (within the flight) where the shape fault was found
        index: usize,
    },

    /// Not enough usable data to segment or filter the interval
    #[error("insufficient data: need {required}, have {available}")]
    InsufficientData {
        /// Minimum number of samples or extrema needed
        required: usize,
        /// Actual number available
        available: usize,
    },

    /// Input signals that must share a timebase have different lengths
    #[error("signal length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Length of the reference signal
        expected: usize,
        /// Length of the offending signal
        actual: usize,
    },

    /// Filter time constant too small for the sample rate.
    ///
    /// The bilinear discretization needs `time_constant * rate >= 0.5`;
    /// below that the recursion coefficients change sign and the filter
    /// rings instead of smoothing.
    #[error("filter time constant {tc_samples} samples is below the stability limit")]
    UnstableFilter {
        /// Time constant expressed in samples (`tc_seconds * rate_hz`)
        tc_samples: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_are_copy_and_comparable() {
        let a = EngineError::CycleFault { index: 12 };
        let b = a;
        assert_eq!(a, b);
    }

    #[cfg(feature = "std")]
    #[test]
    fn display_names_the_condition() {
        let err = EngineError::InsufficientData { required: 2, available: 1 };
        let text = std::format!("{}", err);
        assert!(text.contains("insufficient data"));
    }
}
