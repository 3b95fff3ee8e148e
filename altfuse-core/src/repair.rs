//! Signal Repair: Bounded-Duration Gap Filling
//!
//! ## Overview
//!
//! Recorded sensor signals arrive with dropouts: a few masked samples from
//! a corrupt frame, or long masked stretches where a sensor saturated. The
//! repair pass bridges the short dropouts by linear interpolation so the
//! downstream filters and segmenters see continuous data, while leaving
//! long gaps masked because fabricating minutes of flight data would be
//! worse than admitting ignorance.
//!
//! ## Contract
//!
//! - Masked runs shorter than the configured gap duration are replaced with
//!   values interpolated between the bounding valid samples.
//! - Runs longer than the duration remain masked.
//! - An unbounded duration (`max_gap: None`) repairs any interior gap; this
//!   is how the radio altimeter is prepared for the vertical-speed
//!   estimator, where only the sub-100 ft band is ever consumed and the
//!   masked saturation at altitude is irrelevant.
//! - Leading and trailing runs have no second anchor to interpolate from;
//!   they are filled with the nearest valid value only when `extrapolate`
//!   is set, and otherwise stay masked.
//! - A fully invalid signal returns a fully masked copy, never an error.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::ops::Range;

use crate::constants::tuning::REPAIR_DURATION_S;
use crate::signal::Signal;

/// Gap-filling configuration
#[derive(Debug, Clone, Copy)]
pub struct RepairOptions {
    /// Longest gap bridged, in seconds; `None` repairs any interior gap
    pub max_gap_s: Option<f32>,
    /// Fill leading/trailing gaps with the nearest valid value
    pub extrapolate: bool,
    /// After repair, substitute 0.0 for anything still masked
    pub zero_if_masked: bool,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            max_gap_s: Some(REPAIR_DURATION_S),
            extrapolate: false,
            zero_if_masked: false,
        }
    }
}

impl RepairOptions {
    /// Repair gaps of any length (interior gaps only, unless extrapolating)
    pub fn unlimited() -> Self {
        Self {
            max_gap_s: None,
            ..Self::default()
        }
    }
}

/// Fill short masked runs in `signal` by interpolation.
///
/// Returns a repaired copy; the input is never modified. See the module
/// docs for the exact contract.
pub fn repair_mask(signal: &Signal, options: &RepairOptions) -> Signal {
    let mut out = signal.clone();
    if signal.is_empty() {
        return out;
    }
    if signal.valid_count() == 0 {
        // Nothing to anchor an interpolation on.
        log_info!("repair_mask: signal entirely invalid, returning masked copy");
        return out;
    }

    let limit = options
        .max_gap_s
        .map(|s| (s * signal.rate_hz()) as usize)
        .unwrap_or(usize::MAX);

    for gap in masked_runs(signal.mask()) {
        if gap.len() > limit {
            continue;
        }
        let before = gap.start.checked_sub(1);
        let after = if gap.end < signal.len() { Some(gap.end) } else { None };
        match (before, after) {
            (Some(b), Some(a)) => {
                // Interior gap: straight line between the anchors.
                let v0 = signal.data()[b];
                let v1 = signal.data()[a];
                let span = (a - b) as f32;
                for i in gap.clone() {
                    let frac = (i - b) as f32 / span;
                    out.set(i, v0 + (v1 - v0) * frac);
                }
            }
            (None, Some(a)) if options.extrapolate => {
                let v = signal.data()[a];
                for i in gap.clone() {
                    out.set(i, v);
                }
            }
            (Some(b), None) if options.extrapolate => {
                let v = signal.data()[b];
                for i in gap.clone() {
                    out.set(i, v);
                }
            }
            _ => {}
        }
    }

    if options.zero_if_masked {
        for i in 0..out.len() {
            if out.mask()[i] {
                out.set(i, 0.0);
            }
        }
    }

    out
}

/// Contiguous runs of masked samples
fn masked_runs(mask: &[bool]) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &masked) in mask.iter().enumerate() {
        match (masked, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(s..mask.len());
    }
    runs
}
