//! Inertial Vertical Speed: Complementary Sensor Fusion
//!
//! ## Overview
//!
//! Neither sensor gives a good rate of climb on its own. Differentiating
//! pressure altitude is stable long-term but noisy, lagged, and corrupted
//! by ground effect below roughly 100 ft; integrating vertical acceleration
//! is crisp but drifts with accelerometer bias. The complementary filter
//! takes the best of both:
//!
//! ```text
//! vertical speed = lag(washout(az) · g) + washout(alt_std) / T
//! ```
//!
//! A long washout removes the accelerometer bias before integration (the
//! cost: sustained accelerations are underscaled slightly), and the shared
//! time constant on the lag/washout pair makes the two transfer functions
//! sum to unity, so the combined signal is neither over- nor under-scaled
//! at any frequency.
//!
//! ## Ground-Effect Override
//!
//! Within the lowest 100 ft on climb-out and landing, the barometric term
//! is poisoned by ground effect, so each band where the radio altitude
//! rises 0→100 ft (or falls 100→0 ft) is replaced by a pure integration of
//! the washed-out acceleration. The replacement is blended linearly so the
//! junction with the complementary signal carries zero error by
//! construction: a climb band matches the nominal value exactly at its top,
//! a descent band exactly at its start. Climb bands begin a few seconds
//! before lift; descent bands run a few seconds past touchdown, after which
//! the output is zero; the aircraft is on the ground.
//!
//! ## Validity
//!
//! The filter runs independently over every maximal sub-run where both
//! acceleration and pressure altitude are valid (after short-gap repair).
//! Where no samples are jointly valid the output stays masked; no value is
//! fabricated.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use core::ops::Range;

use crate::constants::physics::{GRAVITY_IMPERIAL_FT_PER_S2, SECONDS_PER_MINUTE};
use crate::constants::tuning::{
    AZ_WASHOUT_TC_S, LIFTOFF_LEAD_S, RADIO_BAND_CEILING_FT, RADIO_BAND_FLOOR_FT,
    TOUCHDOWN_TAIL_S, VERTICAL_SPEED_LAG_TC_S, WASHOUT_SEED_SAMPLES,
};
use crate::errors::{EngineError, EngineResult};
use crate::filters::{first_order_lag, first_order_washout, integrate};
use crate::repair::{repair_mask, RepairOptions};
use crate::signal::{clump_unmasked, clump_within, Signal};

/// Tunable parameters for the inertial vertical-speed estimator
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerticalSpeedConfig {
    /// Accelerometer washout time constant (s)
    pub az_washout_tc_s: f32,
    /// Shared complementary time constant (s)
    pub lag_tc_s: f32,
    /// Acceleration gain, g expressed in ft/s²
    pub gravity_ft_per_s2: f32,
    /// Samples averaged to seed the washout
    pub seed_samples: usize,
    /// Ceiling of the ground-effect override band (ft radio)
    pub ground_effect_ceiling_ft: f32,
    /// Pure-inertial lead before a climb band (s)
    pub liftoff_lead_s: f32,
    /// Pure-inertial tail after a descent band (s)
    pub touchdown_tail_s: f32,
}

impl Default for VerticalSpeedConfig {
    fn default() -> Self {
        Self {
            az_washout_tc_s: AZ_WASHOUT_TC_S,
            lag_tc_s: VERTICAL_SPEED_LAG_TC_S,
            gravity_ft_per_s2: GRAVITY_IMPERIAL_FT_PER_S2,
            seed_samples: WASHOUT_SEED_SAMPLES,
            ground_effect_ceiling_ft: RADIO_BAND_CEILING_FT,
            liftoff_lead_s: LIFTOFF_LEAD_S,
            touchdown_tail_s: TOUCHDOWN_TAIL_S,
        }
    }
}

/// Derive inertially smoothed vertical speed in ft/min.
///
/// `az` is normalized vertical acceleration in g; `alt_rad` may be absent,
/// which simply disables the ground-effect override. The output holds one
/// sample per acceleration sample and stays masked wherever acceleration
/// and pressure altitude are not jointly valid.
pub fn derive_vertical_speed_inertial(
    az: &Signal,
    alt_std: &Signal,
    alt_rad: Option<&Signal>,
    fast: &[Range<usize>],
    config: &VerticalSpeedConfig,
) -> EngineResult<Signal> {
    if alt_std.len() != az.len() {
        return Err(EngineError::LengthMismatch {
            expected: az.len(),
            actual: alt_std.len(),
        });
    }
    if let Some(rad) = alt_rad {
        if rad.len() != az.len() {
            return Err(EngineError::LengthMismatch {
                expected: az.len(),
                actual: rad.len(),
            });
        }
    }

    for quick in fast {
        if quick.end > az.len() {
            return Err(EngineError::LengthMismatch {
                expected: az.len(),
                actual: quick.end,
            });
        }
    }

    let hz = az.rate_hz();
    let mut out = Signal::masked_zeros(az.len(), hz);

    for quick in fast {
        // Fix minor dropouts. The radio altimeter is repaired without a
        // duration bound: its mask at altitude is saturation, not dropout,
        // and only the sub-100 ft band is ever consumed.
        let az_rep = repair_windowed(az, quick, &RepairOptions::default());
        let std_rep = repair_windowed(alt_std, quick, &RepairOptions::default());
        let rad_rep = alt_rad.map(|rad| repair_windowed(rad, quick, &RepairOptions::unlimited()));

        // Only ranges where both required inputs are valid are computed.
        let joint_mask: Vec<bool> = az_rep
            .mask()
            .iter()
            .zip(std_rep.mask())
            .map(|(&a, &s)| a || s)
            .collect();

        for clump in clump_unmasked(&joint_mask) {
            let az_run = &az_rep.data()[clump.clone()];
            let std_run = &std_rep.data()[clump.clone()];
            let rad_run = rad_rep
                .as_ref()
                .map(|r| (&r.data()[clump.clone()], &r.mask()[clump.clone()]));

            let roc = inertial_vertical_speed(std_run, rad_run, az_run, hz, config)?;
            for (j, v) in roc.into_iter().enumerate() {
                out.set(quick.start + clump.start + j, v);
            }
        }
    }

    Ok(out)
}

/// Repair one Flight-Active window of a signal
fn repair_windowed(signal: &Signal, quick: &Range<usize>, options: &RepairOptions) -> Signal {
    let (data, mask) = signal.window(quick.clone());
    let windowed = Signal::new(data, mask, signal.rate_hz(), signal.offset_s())
        .unwrap_or_else(|_| Signal::masked_zeros(quick.len(), signal.rate_hz()));
    repair_mask(&windowed, options)
}

/// The complementary smoothing core, over one jointly valid run
fn inertial_vertical_speed(
    alt_std: &[f32],
    alt_rad: Option<(&[f32], &[bool])>,
    az: &[f32],
    hz: f32,
    config: &VerticalSpeedConfig,
) -> EngineResult<Vec<f32>> {
    let n = az.len();

    // Seeding with the leading mean is essential: without it the washout
    // produces a huge spike at the start of every data period.
    let seed_len = config.seed_samples.min(n).max(1);
    let seed = az[..seed_len].iter().sum::<f32>() / seed_len as f32;

    let az_washout = first_order_washout(
        az,
        config.az_washout_tc_s,
        hz,
        config.gravity_ft_per_s2,
        Some(seed),
    )?;
    let inertial_roc = first_order_lag(&az_washout, config.lag_tc_s, hz, config.lag_tc_s, None)?;

    // Only the pressure altitude is differentiated.
    let roc_alt_std =
        first_order_washout(alt_std, config.lag_tc_s, hz, 1.0 / config.lag_tc_s, None)?;

    let mut roc: Vec<f32> = roc_alt_std
        .iter()
        .zip(&inertial_roc)
        .map(|(&baro, &inertial)| baro + inertial)
        .collect();

    if let Some((rad_data, rad_mask)) = alt_rad {
        let lead = (config.liftoff_lead_s * hz) as usize;
        let tail = (config.touchdown_tail_s * hz) as usize;
        // End of the last override written; the leading zero fill of a climb
        // band must not reach back over an earlier touchdown.
        let mut last_end = 0usize;

        let bands = override_bands(rad_data, rad_mask, config.ground_effect_ceiling_ft);
        for (b, (band, rising)) in bands.iter().cloned().enumerate() {
            if rising {
                // From a few seconds before lift to 100 ft: pure inertial,
                // blended to meet the complementary value at the band top.
                let lift = band.start.saturating_sub(lead);
                let up_slope = integrate(&az_washout[lift..band.end], hz, 0.0, 1.0);
                let end_error = roc[band.end - 1] - up_slope[up_slope.len() - 1];
                for item in roc.iter_mut().take(lift).skip(last_end) {
                    *item = 0.0;
                }
                for i in lift..band.start {
                    roc[i] = up_slope[i - lift];
                }
                let blend = linspace(0.0, end_error, band.len());
                for (k, i) in band.clone().enumerate() {
                    roc[i] = up_slope[i - lift] + blend[k];
                }
                last_end = band.end;
            } else {
                // From 100 ft to a few seconds past touchdown: blended at
                // the start, driven to rest by the end.
                let down = band.start..(band.end + tail).min(n);
                let down_slope = integrate(&az_washout[down.clone()], hz, 0.0, 1.0);
                let start_error = roc[down.start] - down_slope[0];
                let blend = linspace(
                    start_error,
                    -down_slope[down_slope.len() - 1],
                    down.len(),
                );
                for (k, i) in down.clone().enumerate() {
                    roc[i] = down_slope[k] + blend[k];
                }
                // After a final landing the aircraft is at rest; after a
                // touch-and-go the next climb band owns the ground roll.
                if b + 1 == bands.len() {
                    for item in roc.iter_mut().skip(down.end) {
                        *item = 0.0;
                    }
                }
                last_end = down.end;
            }
        }
    }

    for v in roc.iter_mut() {
        *v *= SECONDS_PER_MINUTE;
    }
    Ok(roc)
}

/// Split in-band radio runs into their override bands.
///
/// Only a band that actually leaves the ground (rising) or reaches it
/// (falling) replaces the complementary signal; a run that stays airborne
/// throughout, such as a low go-around, is no override at all. A
/// touch-and-go run splits at the ground contact into a falling band
/// followed by a rising one.
fn override_bands(rad: &[f32], mask: &[bool], ceiling: f32) -> Vec<(Range<usize>, bool)> {
    let mut bands = Vec::new();
    for run in clump_within(rad, mask, 0.0, ceiling) {
        if run.len() < 2 {
            continue;
        }
        let on_ground = |i: usize| rad[i] <= RADIO_BAND_FLOOR_FT;
        let Some(first_ground) = run.clone().find(|&i| on_ground(i)) else {
            continue;
        };
        let last_ground = run.clone().rev().find(|&i| on_ground(i)).unwrap_or(first_ground);
        if !on_ground(run.start) {
            bands.push((run.start..first_ground + 1, false));
        }
        if !on_ground(run.end - 1) {
            bands.push((last_ground..run.end, true));
        }
    }
    bands
}

/// `count` evenly spaced values from `from` to `to` inclusive
fn linspace(from: f32, to: f32, count: usize) -> Vec<f32> {
    match count {
        0 => Vec::new(),
        1 => vec![from],
        _ => (0..count)
            .map(|i| from + (to - from) * i as f32 / (count - 1) as f32)
            .collect(),
    }
}
