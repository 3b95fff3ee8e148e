//! Ground-Relative Compositor: Height Above the Airfield
//!
//! ## Overview
//!
//! This module produces the engine's principal output: a continuous "height
//! above the airfield" (AAL) signal covering an entire flight: taxi,
//! multiple climbs and descents, go-arounds, bounced landings. Radio
//! altitude is the prime reference below 100 ft, where it is accurate and
//! the barometric reading is corrupted by ground effect; above 100 ft the
//! pressure altitude takes over, shifted by the local ground estimate and
//! stitched to the radio segment so no step discontinuity survives at any
//! handover. Downstream consumers treat the output as a physical height
//! signal, so continuity is not optional.
//!
//! ## Per-Dip Composition
//!
//! The dip classifier carves the Flight-Active interval into dips; the
//! compositor handles each one according to its evidence:
//!
//! - `Land` with usable radio: clipped radio altitude inside the 0.1-100 ft
//!   band, with bounce rejection: only the span from the first to the last
//!   section that peaks above the bounced-landing threshold counts, and
//!   height is forced to zero before that window so a transient bounce is
//!   not read as a stable landing height.
//! - `Land` without radio: pressure altitude shifted down by the liftoff
//!   pressure found via curvature analysis (wing lift reduces the local
//!   static pressure just as the trace curves upward), falling back to the
//!   signal minimum when the analysis fails.
//! - `OverGnd`/`High`: pressure altitude minus the estimated ground, unless
//!   radio data in band is usable and agrees with pressure to within the
//!   sensor-disagreement limit.
//!
//! ## Fault Isolation
//!
//! A data-quality fault aborts the single affected Flight-Active interval;
//! every other interval in the flight is still computed. Faults are
//! collected on the output (and logged) rather than thrown, so one bad
//! recording never takes the engine down.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use core::ops::Range;

use crate::constants::tuning::{
    ALTITUDE_MIN_STEP_FT, BOUNCED_LANDING_THRESHOLD_FT, CURVATURE_GAP_SAMPLES,
    CURVATURE_LIMB_SAMPLES, LIFTOFF_SCAN_BAND_FT, RADIO_BAND_CEILING_FT, RADIO_BAND_FLOOR_FT,
    ROTATION_LOOKAHEAD_S, ROTATION_LOOKBACK_S, SENSOR_DISAGREEMENT_LIMIT_FT,
    STITCH_SCAN_SAMPLES,
};
use crate::cycles::{cycle_finder, Extremum};
use crate::dips::{build_dips, resolve_high_grounds, Dip, DipKind};
use crate::errors::{EngineError, EngineResult};
use crate::filters::{linear_fit, peak_curvature, CurveSense};
use crate::repair::{repair_mask, RepairOptions};
use crate::signal::{
    clump_within, complement_ranges, first_valid_sample, index_at_value, max_valid, min_valid,
    Signal,
};

/// Tunable thresholds for the AAL computation.
///
/// Defaults carry the operationally tuned values; see `constants::tuning`
/// for their provenance.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AalConfig {
    /// Minimum altitude step for cycle segmentation (ft)
    pub min_step_ft: f32,
    /// Radio height above which a landing section counts as a bounce (ft)
    pub bounce_threshold_ft: f32,
    /// Floor of the trusted radio band (ft)
    pub radio_floor_ft: f32,
    /// Ceiling of the trusted radio band (ft)
    pub radio_ceiling_ft: f32,
    /// Samples scanned past a handover for a valid stitch offset
    pub stitch_scan_samples: usize,
    /// Mean pressure/radio disagreement treated as a sensor fault (ft)
    pub disagreement_limit_ft: f32,
}

impl Default for AalConfig {
    fn default() -> Self {
        Self {
            min_step_ft: ALTITUDE_MIN_STEP_FT,
            bounce_threshold_ft: BOUNCED_LANDING_THRESHOLD_FT,
            radio_floor_ft: RADIO_BAND_FLOOR_FT,
            radio_ceiling_ft: RADIO_BAND_CEILING_FT,
            stitch_scan_samples: STITCH_SCAN_SAMPLES,
            disagreement_limit_ft: SENSOR_DISAGREEMENT_LIMIT_FT,
        }
    }
}

/// A quality fault that condemned one Flight-Active interval
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalFault {
    /// The interval whose output was left at zero
    pub interval: Range<usize>,
    /// What went wrong
    pub error: EngineError,
}

/// Result of the AAL derivation
#[derive(Debug, Clone, PartialEq)]
pub struct AalOutput {
    /// Height above the airfield, one sample per pressure-altitude sample.
    /// Non-negative everywhere, zero outside Flight-Active intervals and at
    /// their first and last samples.
    pub height: Signal,
    /// Intervals abandoned due to data-quality faults
    pub faults: Vec<IntervalFault>,
}

/// Derive height above the airfield for a whole flight.
///
/// `fast` lists the Flight-Active intervals from upstream phase detection;
/// `alt_rad` may be absent entirely, in which case every landing falls back
/// to curvature-based liftoff detection. Signals must already be aligned to
/// a common rate and offset.
pub fn derive_altitude_aal(
    alt_std: &Signal,
    alt_rad: Option<&Signal>,
    fast: &[Range<usize>],
    config: &AalConfig,
) -> EngineResult<AalOutput> {
    if let Some(rad) = alt_rad {
        if rad.len() != alt_std.len() {
            return Err(EngineError::LengthMismatch {
                expected: alt_std.len(),
                actual: rad.len(),
            });
        }
    }

    for quick in fast {
        if quick.end > alt_std.len() {
            return Err(EngineError::LengthMismatch {
                expected: alt_std.len(),
                actual: quick.end,
            });
        }
    }

    let mut height = Signal::zeros(alt_std.len(), alt_std.rate_hz());
    let mut faults = Vec::new();

    for quick in fast {
        let (window, window_mask) = alt_std.window(quick.clone());
        let Some(local) = cycle_finder(&window, &window_mask, config.min_step_ft) else {
            log_info!(
                "altitude aal: interval {}..{} has no {}ft cycle, skipped",
                quick.start,
                quick.end,
                config.min_step_ft
            );
            continue;
        };
        let extrema: Vec<Extremum> = local
            .into_iter()
            .map(|e| Extremum { index: e.index + quick.start, value: e.value })
            .collect();

        let mut dips = match build_dips(alt_std, alt_rad, quick, &extrema) {
            Ok(dips) => dips,
            Err(error) => {
                log_warn!(
                    "altitude aal: interval {}..{} abandoned: {:?}",
                    quick.start,
                    quick.end,
                    error
                );
                faults.push(IntervalFault { interval: quick.clone(), error });
                continue;
            }
        };
        resolve_high_grounds(&mut dips);

        for dip in &dips {
            compose_dip(&mut height, alt_std, alt_rad, dip, config);
        }

        // The aircraft is on the airfield outside the first and last
        // extremum; force those ends to exactly zero.
        let first = extrema[0].index;
        let last = extrema[extrema.len() - 1].index;
        for i in quick.start..(first + 1).min(quick.end) {
            height.set(i, 0.0);
        }
        for i in (last + 1).max(quick.start)..quick.end {
            height.set(i, 0.0);
        }

        // Height above ground is never negative. Masked samples are left
        // alone; clamping would fabricate a valid reading.
        for i in quick.clone() {
            if !height.mask()[i] && height.data()[i] < 0.0 {
                height.set(i, 0.0);
            }
        }
    }

    Ok(AalOutput { height, faults })
}

/// Compute one dip and write it into the output at its absolute range
fn compose_dip(
    height: &mut Signal,
    alt_std: &Signal,
    alt_rad: Option<&Signal>,
    dip: &Dip,
    config: &AalConfig,
) {
    let range = dip.range.clone();
    let (std_data, std_mask) = if dip.reversed {
        alt_std.window_reversed(range.clone())
    } else {
        alt_std.window(range.clone())
    };
    let rad_window = alt_rad.map(|rad| {
        if dip.reversed {
            rad.window_reversed(range.clone())
        } else {
            rad.window(range.clone())
        }
    });

    let (data, mask) = compute_aal(
        dip.kind,
        &std_data,
        &std_mask,
        dip.alt_std,
        dip.highest_ground,
        rad_window.as_ref().map(|(d, m)| (d.as_slice(), m.as_slice())),
        alt_std.rate_hz(),
        config,
    );

    for (j, (&v, &m)) in data.iter().zip(mask.iter()).enumerate() {
        let i = if dip.reversed { range.end - 1 - j } else { range.start + j };
        if m {
            height.set_masked(i);
        } else {
            height.set(i, v);
        }
    }
}

/// Height-above-ground array for one dip's slice.
///
/// `low_hb` is the dip's reference pressure altitude and `high_gnd` its
/// estimated ground; see [`Dip`]. Reversed dips must be presented already
/// reversed, so the takeoff-oriented code serves landings unchanged.
#[allow(clippy::too_many_arguments)]
fn compute_aal(
    kind: DipKind,
    alt_std: &[f32],
    std_mask: &[bool],
    low_hb: f32,
    high_gnd: f32,
    alt_rad: Option<(&[f32], &[bool])>,
    rate_hz: f32,
    config: &AalConfig,
) -> (Vec<f32>, Vec<bool>) {
    let n = alt_std.len();

    let radio_usable = alt_rad
        .map(|(_, m)| m.iter().any(|&masked| !masked))
        .unwrap_or(false);
    if !radio_usable {
        // Aircraft without radio altimeters indicate negative pressure
        // heights as they land, so landings get the curvature treatment.
        if kind != DipKind::Land {
            return shift_by_ground(alt_std, std_mask, high_gnd);
        }
        return shift_pressure_to_ground(alt_std, std_mask, rate_hz);
    }
    let (rad_data, rad_mask) = alt_rad.unwrap_or((&[], &[]));

    if kind == DipKind::OverGnd && (low_hb - high_gnd) > config.radio_ceiling_ft {
        return shift_by_ground(alt_std, std_mask, high_gnd);
    }

    // Height above ground cannot be negative.
    let rad_clipped: Vec<f32> = rad_data.iter().map(|&v| if v < 0.0 { 0.0 } else { v }).collect();

    let mut ralt_sections = clump_within(
        &rad_clipped,
        rad_mask,
        config.radio_floor_ft,
        config.radio_ceiling_ft,
    );
    if ralt_sections.is_empty() {
        // The radio either never dropped below the ceiling or never rose
        // above the floor; the pressure signal alone does better.
        return shift_pressure_to_ground(alt_std, std_mask, rate_hz);
    }

    let mut out = vec![0.0f32; n];
    let mut out_mask = vec![false; n];
    // Samples before this index are on the ground and stay at exactly zero.
    let mut zero_before = 0usize;

    if kind == DipKind::Land {
        // Bounce rejection: only sections that climb above the bounce
        // threshold are real airborne time; the span from the first such
        // section to the end of the last one is the valid 0-100 ft radio
        // segment, and everything before it is ground.
        let bounce_sections: Vec<Range<usize>> = ralt_sections
            .iter()
            .filter(|sec| {
                rad_data[(*sec).clone()]
                    .iter()
                    .zip(&rad_mask[(*sec).clone()])
                    .any(|(&v, &m)| !m && v > config.bounce_threshold_ft)
            })
            .cloned()
            .collect();
        let (Some(first), Some(last)) = (bounce_sections.first(), bounce_sections.last()) else {
            // Radio never cleared the bounce threshold inside the band;
            // nothing to anchor on, use pressure only.
            return shift_pressure_to_ground(alt_std, std_mask, rate_hz);
        };
        let bounce_end = first.start;
        let hundred_feet = last.end;

        for i in bounce_end..hundred_feet {
            out[i] = rad_clipped[i];
            out_mask[i] = rad_mask[i];
        }
        zero_before = bounce_end;
        ralt_sections = vec![0..hundred_feet];
    }

    let baro_sections = complement_ranges(&ralt_sections, n);

    for ralt in &ralt_sections {
        if let Some(mean_diff) = mean_difference(alt_std, std_mask, &rad_clipped, rad_mask, ralt) {
            if mean_diff > config.disagreement_limit_ft {
                // Pressure and radio should not disagree by this much with
                // the radio reading below the band ceiling; the radio data
                // is spurious here.
                continue;
            }
        }
        for i in ralt.clone() {
            if i < zero_before {
                continue;
            }
            out[i] = rad_clipped[i];
            out_mask[i] = rad_mask[i];
        }
        for baro in &baro_sections {
            link_baro_rad_fwd(
                baro, ralt, &rad_clipped, rad_mask, alt_std, std_mask, &mut out, &mut out_mask,
                config,
            );
            link_baro_rad_rev(
                baro, ralt, &rad_clipped, rad_mask, alt_std, std_mask, &mut out, &mut out_mask,
                config,
            );
        }
    }

    (out, out_mask)
}

/// Pressure altitude referenced to a known ground estimate
fn shift_by_ground(alt_std: &[f32], std_mask: &[bool], high_gnd: f32) -> (Vec<f32>, Vec<bool>) {
    let data = alt_std.iter().map(|&v| v - high_gnd).collect();
    (data, std_mask.to_vec())
}

/// Pressure altitude shifted so the liftoff point reads zero.
///
/// The liftoff pressure is found by curvature analysis of the first few
/// hundred feet of climb; when the data defeats that, the signal minimum is
/// the most robust substitute (at the cost of accuracy on sloping runways).
fn shift_pressure_to_ground(
    alt_std: &[f32],
    std_mask: &[bool],
    rate_hz: f32,
) -> (Vec<f32>, Vec<bool>) {
    let pit = liftoff_pressure(alt_std, std_mask, rate_hz)
        .or_else(|| min_valid(alt_std, std_mask));
    let Some(pit) = pit else {
        // Entirely invalid dip; stay masked.
        return (vec![0.0; alt_std.len()], vec![true; alt_std.len()]);
    };
    let data = alt_std
        .iter()
        .map(|&v| {
            let shifted = v - pit;
            if shifted < 0.0 {
                0.0
            } else {
                shifted
            }
        })
        .collect();
    (data, std_mask.to_vec())
}

/// Locate the liftoff pressure altitude by curvature analysis.
///
/// Looks over the first few hundred feet of climb for the point where the
/// altitude first curves upward, draws a regression line across the
/// rotation window around it, and takes the sample furthest *below* that
/// line: wing lift increases the local static pressure reading's apparent
/// dip right at liftoff.
fn liftoff_pressure(alt_std: &[f32], std_mask: &[bool], rate_hz: f32) -> Option<f32> {
    let (_, first_val) = first_valid_sample(alt_std, std_mask)?;
    let top = max_valid(alt_std, std_mask)?;
    let band_top = (first_val + LIFTOFF_SCAN_BAND_FT).min(top);
    let to = index_at_value(alt_std, std_mask, band_top)?;

    // Bridge any short dropouts so the curvature scan sees a continuous
    // climb trace.
    let scan = repair_mask(
        &Signal::new(alt_std[..to].to_vec(), std_mask[..to].to_vec(), rate_hz, 0.0).ok()?,
        &RepairOptions::default(),
    );
    let idx = peak_curvature(
        scan.data(),
        scan.mask(),
        CurveSense::Concave,
        CURVATURE_GAP_SAMPLES,
        CURVATURE_LIMB_SAMPLES,
    )?;

    // The liftoff most probably arose in the preceding seconds; allow a
    // short margin afterwards.
    let lookback = (ROTATION_LOOKBACK_S * rate_hz) as usize;
    let lookahead = (ROTATION_LOOKAHEAD_S * rate_hz) as usize;
    let rotate = idx.saturating_sub(lookback)..(idx + lookahead).min(alt_std.len());
    if rotate.len() < 2 {
        return None;
    }

    let (slope, intercept) = linear_fit(&alt_std[rotate.clone()], &std_mask[rotate.clone()])?;

    // Greatest gap below the ruler marks where lift first moved the
    // static pressure.
    let mut best: Option<(usize, f32)> = None;
    for (k, i) in rotate.clone().enumerate() {
        if std_mask[i] {
            continue;
        }
        let ruler = slope * k as f32 + intercept;
        let delta = alt_std[i] - ruler;
        match best {
            None => best = Some((i, delta)),
            Some((_, b)) if delta < b => best = Some((i, delta)),
            _ => {}
        }
    }
    best.map(|(i, _)| alt_std[i])
}

/// Mean of `alt_std - rad` over jointly valid samples of `range`
fn mean_difference(
    alt_std: &[f32],
    std_mask: &[bool],
    rad: &[f32],
    rad_mask: &[bool],
    range: &Range<usize>,
) -> Option<f32> {
    let mut sum = 0.0f32;
    let mut count = 0usize;
    for i in range.clone() {
        if std_mask[i] || rad_mask[i] {
            continue;
        }
        sum += alt_std[i] - rad[i];
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f32)
    }
}

/// Stitch a pressure-only section that *follows* a radio section.
///
/// Scans a bounded window into the pressure section for the first valid
/// `pressure - radio` sample and uses that offset to align the pressure
/// data to the radio value at the junction; the radio signal is stretched
/// over any leading invalid samples. No valid sample in the window means
/// the relative offset is taken as zero.
#[allow(clippy::too_many_arguments)]
fn link_baro_rad_fwd(
    baro: &Range<usize>,
    ralt: &Range<usize>,
    rad: &[f32],
    rad_mask: &[bool],
    alt_std: &[f32],
    std_mask: &[bool],
    out: &mut [f32],
    out_mask: &mut [bool],
    config: &AalConfig,
) {
    let mut begin = baro.start;
    if ralt.end != begin {
        return;
    }
    let scan_end = (begin + config.stitch_scan_samples).min(alt_std.len());

    let mut offset = 0.0f32;
    for i in begin..scan_end {
        if !std_mask[i] && !rad_mask[i] {
            offset = alt_std[i] - rad[i];
            // Pressure (or radio) is invalid at the handover itself, so the
            // radio signal carries until the first sample both agree on.
            for j in begin..i {
                out[j] = rad[j];
                out_mask[j] = rad_mask[j];
            }
            begin = i;
            break;
        }
    }

    for i in begin..alt_std.len() {
        out[i] = alt_std[i] - offset;
        out_mask[i] = std_mask[i];
    }
}

/// Stitch a pressure-only section that *precedes* a radio section.
///
/// Mirror image of [`link_baro_rad_fwd`], scanning backwards from the
/// junction.
#[allow(clippy::too_many_arguments)]
fn link_baro_rad_rev(
    baro: &Range<usize>,
    ralt: &Range<usize>,
    rad: &[f32],
    rad_mask: &[bool],
    alt_std: &[f32],
    std_mask: &[bool],
    out: &mut [f32],
    out_mask: &mut [bool],
    config: &AalConfig,
) {
    let mut end = baro.end;
    if ralt.start != end {
        return;
    }
    let scan_start = end.saturating_sub(config.stitch_scan_samples);

    let mut offset = 0.0f32;
    for i in (scan_start..end).rev() {
        if !std_mask[i] && !rad_mask[i] {
            offset = alt_std[i] - rad[i];
            for j in (i + 1)..end {
                out[j] = rad[j];
                out_mask[j] = rad_mask[j];
            }
            end = i + 1;
            break;
        }
    }

    for i in 0..end {
        out[i] = alt_std[i] - offset;
        out_mask[i] = std_mask[i];
    }
}
