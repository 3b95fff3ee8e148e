//! Physical Constants for AltFuse
//!
//! Fundamental physical constants and unit conversions used by the
//! height-fusion and vertical-speed algorithms. Flight-recorded data uses
//! imperial aviation units throughout: feet, feet/second², feet/minute.

// ===== GRAVITY =====

/// Standard gravitational acceleration in imperial units (ft/s²).
///
/// Used as the gain when converting normalized vertical acceleration
/// (recorded in g) into a rate-of-climb contribution.
///
/// Source: standard gravity 9.80665 m/s² expressed in feet
pub const GRAVITY_IMPERIAL_FT_PER_S2: f32 = 32.2;

// ===== UNIT CONVERSIONS =====

/// Seconds per minute.
///
/// Vertical speed is computed internally in ft/s and published in ft/min,
/// the conventional rate-of-climb unit on flight decks.
///
/// Source: definition
pub const SECONDS_PER_MINUTE: f32 = 60.0;
