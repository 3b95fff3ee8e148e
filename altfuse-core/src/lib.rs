//! Height-above-ground fusion engine for recorded flight data
//!
//! Fuses pressure altitude, radio altitude and vertical acceleration into
//! two derived signals: altitude above the aerodrome landing surface (AAL)
//! and inertially smoothed vertical speed. Designed for batch analysis of
//! complete recordings, not live streams.
//!
//! Key constraints:
//! - Pure computation over in-memory signals, no I/O
//! - Radio altitude is optional; every path degrades to pressure-only
//! - A fault in one flight segment never poisons the others
//!
//! ```
//! use altfuse_core::{derive_altitude_aal, AalConfig, Signal};
//!
//! let alt_std = Signal::from_samples(vec![0.0; 64], 1.0);
//! let alt_rad = Signal::from_samples(vec![0.0; 64], 1.0);
//!
//! let out = derive_altitude_aal(&alt_std, Some(&alt_rad), &[0..64], &AalConfig::default());
//! match out {
//!     Ok(aal) => assert_eq!(aal.height.len(), 64),
//!     Err(e) => panic!("{e}"),
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Optional logging, compiled out entirely without the `log` feature.
#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

pub mod aal;
pub mod constants;
pub mod cycles;
pub mod dips;
pub mod errors;
pub mod filters;
pub mod repair;
pub mod signal;
pub mod vertical_speed;

// Public API
pub use aal::{derive_altitude_aal, AalConfig, AalOutput, IntervalFault};
pub use errors::{EngineError, EngineResult};
pub use repair::{repair_mask, RepairOptions};
pub use signal::Signal;
pub use vertical_speed::{derive_vertical_speed_inertial, VerticalSpeedConfig};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
