//! Constants for the AltFuse Engine
//!
//! Centralized, documented constants used throughout the height-fusion
//! engine. Every numeric value the algorithms depend on is defined here with
//! its purpose and provenance, so nothing in the computation code is a magic
//! number.
//!
//! ## Organization
//!
//! - **Physics**: unit conversions and physical constants
//! - **Tuning**: empirically tuned thresholds carried over from operational
//!   flight-data-monitoring experience
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Tuned values are preserved as-is; a behavioral difference surfaced by
//!    the property tests is a tuning question, not a correctness bug
//! 3. Use descriptive names that include units

/// Physical constants and unit conversion factors.
pub mod physics;

/// Empirically tuned thresholds for segmentation, stitching, and filtering.
pub mod tuning;
