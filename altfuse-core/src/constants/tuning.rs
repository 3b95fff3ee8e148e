//! Tuned Thresholds for Segmentation, Stitching, and Filtering
//!
//! These values were tuned against large volumes of recorded airline data.
//! None of them has a closed-form derivation; they are preserved as named
//! constants rather than re-derived, and any behavioral difference surfaced
//! by the property tests should be treated as a tuning question.

// ===== CYCLE SEGMENTATION =====

/// Minimum altitude step for a climb or descent to count as a cycle (ft).
///
/// Below this, pressure-altitude changes are treated as noise or taxi
/// manoeuvring rather than a flight segment. Low-altitude "hops" smaller
/// than this are still handled, as whole flights with a single dip.
///
/// Source: empirically tuned on operational flight data
pub const ALTITUDE_MIN_STEP_FT: f32 = 500.0;

// ===== RADIO ALTIMETER BAND =====

/// Ceiling of the trustworthy radio-altimeter band (ft).
///
/// Below this height the radio altimeter is the better sensor and the
/// barometric reading is corrupted by ground effect; above it the pressure
/// altitude takes over.
///
/// Source: ground-effect extent, roughly one wingspan
pub const RADIO_BAND_CEILING_FT: f32 = 100.0;

/// Floor of the radio band used for stitching (ft).
///
/// Readings below this are "on the ground" for segmentation purposes;
/// many altimeters read small positive values while taxiing.
///
/// Source: empirically tuned
pub const RADIO_BAND_FLOOR_FT: f32 = 0.1;

/// Radio-altitude height above which a landing is considered bounced (ft).
///
/// Contiguous radio sections peaking above this within a landing dip mark
/// real airborne time; lower blips are altimeter noise on the runway and
/// are forced to zero height.
///
/// Source: empirically tuned bounced-landing studies
pub const BOUNCED_LANDING_THRESHOLD_FT: f32 = 35.0;

// ===== BARO/RADIO STITCHING =====

/// Maximum samples scanned past a handover point for a valid offset.
///
/// At each radio/baro boundary the stitcher looks this far into the
/// pressure-only segment for the first valid `pressure - radio` sample;
/// if none is found the relative offset is taken as zero.
///
/// Source: empirically tuned
pub const STITCH_SCAN_SAMPLES: usize = 60;

/// Mean pressure/radio disagreement treated as a sensor fault (ft).
///
/// When the mean difference across a low-altitude radio section exceeds
/// this, the radio data is assumed spurious and the pressure-only path is
/// used for that dip.
///
/// Source: empirically tuned fault heuristic
pub const SENSOR_DISAGREEMENT_LIMIT_FT: f32 = 10_000.0;

// ===== HIGH-DIP GROUND RESOLUTION =====

/// Minimum clearance assumed between a high dip's trough and the ground (ft).
///
/// For dips with no radio evidence, the ground estimate is capped at the
/// trough pressure altitude minus this clearance, biasing toward the most
/// conservative terrain estimate.
///
/// Source: empirically tuned after cases where interior dips sat below the
/// takeoff and landing airfields
pub const HIGH_DIP_MIN_CLEARANCE_FT: f32 = 1000.0;

/// Arbitrary peak offset for a flight consisting of a single no-radio dip (ft).
///
/// With no neighbors and no radio data the ground reference is
/// indeterminate; the dip's peak is placed this far above its ground.
///
/// Source: arbitrary, matches downstream expectations
pub const SOLO_DIP_OFFSET_FT: f32 = 1000.0;

// ===== LIFTOFF CURVATURE ANALYSIS =====

/// Climb band scanned for the liftoff curvature break (ft).
///
/// Without radio altitude, liftoff is found in the first few hundred feet
/// of climb where wing lift first reduces local static pressure.
///
/// Source: empirically tuned
pub const LIFTOFF_SCAN_BAND_FT: f32 = 500.0;

/// Seconds of data before the curvature break included in the rotation window.
///
/// The liftoff most probably arose within this period before the altitude
/// first curves upward.
///
/// Source: typical rotation duration
pub const ROTATION_LOOKBACK_S: f32 = 10.0;

/// Seconds of data after the curvature break included in the rotation window.
///
/// Source: empirically tuned margin
pub const ROTATION_LOOKAHEAD_S: f32 = 3.0;

/// Gap in samples between the two limbs of the curvature detector.
///
/// Source: empirically tuned
pub const CURVATURE_GAP_SAMPLES: usize = 7;

/// Length in samples of each limb of the curvature detector.
///
/// Source: empirically tuned
pub const CURVATURE_LIMB_SAMPLES: usize = 10;

// ===== COMPLEMENTARY FILTER =====

/// Washout time constant for vertical acceleration (s).
///
/// Long enough to remove accelerometer bias without eating real climb
/// dynamics. A consequence of the washout is that sustained accelerations
/// are very slightly underscaled.
///
/// Source: empirically tuned
pub const AZ_WASHOUT_TC_S: f32 = 60.0;

/// Shared time constant for the complementary pair (s).
///
/// The lag on the inertial term and the washout on the barometric term use
/// the same constant so their transfer functions sum to unity.
///
/// Source: complementary filter design
pub const VERTICAL_SPEED_LAG_TC_S: f32 = 3.0;

/// Samples averaged to seed the acceleration washout.
///
/// Seeding the washout with the mean of the leading samples prevents a
/// large transient at the start of each valid data run.
///
/// Source: empirically tuned
pub const WASHOUT_SEED_SAMPLES: usize = 40;

/// Seconds of pure inertial data taken before a climb-out band.
///
/// The ground-effect override starts this long before the radio altimeter
/// first leaves the ground.
///
/// Source: empirically tuned
pub const LIFTOFF_LEAD_S: f32 = 5.0;

/// Seconds of pure inertial data kept after a touchdown band.
///
/// Source: empirically tuned
pub const TOUCHDOWN_TAIL_S: f32 = 5.0;

// ===== SIGNAL REPAIR =====

/// Default maximum gap duration repaired by interpolation (s).
///
/// Masked runs longer than this stay masked; shorter dropouts are bridged.
///
/// Source: empirically tuned dropout statistics
pub const REPAIR_DURATION_S: f32 = 10.0;
