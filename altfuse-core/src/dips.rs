//! Dip Classifier: Flight-Segment Typing and Ground Estimation
//!
//! ## Overview
//!
//! The cycle segmenter reduces a flight to alternating altitude extrema.
//! This module walks consecutive triples of those extrema and carves the
//! Flight-Active interval into *dips*, the unit the compositor works on:
//!
//! - `Land`: a climb out of, or descent onto, an airfield. The ground
//!   pressure altitude is read directly off the trace. Trailing descents
//!   are flagged `reversed` so one stitching algorithm serves both the
//!   takeoff and the final landing.
//! - `OverGnd`: a down-and-up excursion that descends into the radio
//!   altimeter's trusted band; the local ground is `pressure − radio` at
//!   the closest approach to terrain.
//! - `High`: a down-and-up excursion where the radio altimeter never saw
//!   the ground; the ground is provisional and resolved from neighboring
//!   dips afterwards.
//!
//! ## Two-Pass Structure
//!
//! The classification is two explicit passes over an owned `Vec<Dip>`:
//! pass one builds raw dips left to right (merging adjacent `High` dips as
//! it goes), pass two resolves `High` ground estimates purely by index
//! lookup into the same vector. No back-references, no shared mutation.
//!
//! ## Invariants
//!
//! Dip slices partition the Flight-Active interval: the takeoff dip opens
//! at the interval start, the landing dip closes at its end, and adjacent
//! dips share a boundary index. A peak where a trough is expected is a
//! data-quality fault ([`EngineError::CycleFault`]) that condemns the whole
//! interval; there is no safe way to reference heights to the ground from
//! an inconsistent trace.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::ops::Range;

use crate::constants::tuning::{
    HIGH_DIP_MIN_CLEARANCE_FT, RADIO_BAND_CEILING_FT, SOLO_DIP_OFFSET_FT,
};
use crate::cycles::Extremum;
use crate::errors::{EngineError, EngineResult};
use crate::signal::{argmin_valid, Signal};

/// Semantic type of a dip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DipKind {
    /// Touches an airfield: a takeoff climb or a final descent
    Land,
    /// Airborne excursion with radio-altimeter ground evidence
    OverGnd,
    /// Airborne excursion too high for the radio altimeter
    High,
}

/// One classified segment of a Flight-Active interval
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dip {
    /// Classification of this segment
    pub kind: DipKind,
    /// Absolute index range within the flight arrays
    pub range: Range<usize>,
    /// Traverse the range back to front (trailing descents)
    pub reversed: bool,
    /// Reference pressure altitude: the ground value for `Land`, the value
    /// at closest terrain approach for `OverGnd`, the trough for `High`
    pub alt_std: f32,
    /// Estimated local ground pressure altitude
    pub highest_ground: f32,
}

/// Pass one: build raw dips from consecutive extrema triples.
///
/// `extrema` carries absolute indices; `quick` is the Flight-Active
/// interval the extrema were found in. `High` ground estimates are
/// provisional until [`resolve_high_grounds`] runs.
pub fn build_dips(
    alt_std: &Signal,
    alt_rad: Option<&Signal>,
    quick: &Range<usize>,
    extrema: &[Extremum],
) -> EngineResult<Vec<Dip>> {
    if extrema.len() < 2 {
        return Err(EngineError::InsufficientData {
            required: 2,
            available: extrema.len(),
        });
    }

    let mut dips: Vec<Dip> = Vec::new();
    let n_vals = extrema.len();
    let mut n = 0;

    while n < n_vals.saturating_sub(1) {
        let this = extrema[n];
        let next = extrema[n + 1];

        if next.value > this.value {
            // Rising section: a takeoff (or the climb after a touch-and-go).
            // The dip opens at the interval start so the ground reference
            // covers the taxi-out as well.
            dips.push(Dip {
                kind: DipKind::Land,
                range: quick.start..next.index,
                reversed: false,
                alt_std: this.value,
                highest_ground: this.value,
            });
            n += 1;
            continue;
        }

        if n + 2 >= n_vals {
            // Falling tail: the final landing, traversed backwards so the
            // takeoff stitching code applies unchanged.
            dips.push(Dip {
                kind: DipKind::Land,
                range: this.index..quick.end,
                reversed: true,
                alt_std: next.value,
                highest_ground: next.value,
            });
            n += 1;
            continue;
        }

        if extrema[n + 2].value > next.value {
            // A down-and-up "V". Prefer radio evidence for the ground.
            let down_up = this.index..extrema[n + 2].index;
            let mut classified = false;

            if let Some(rad) = alt_rad {
                let rad_window = &rad.data()[down_up.clone()];
                let rad_mask = &rad.mask()[down_up.clone()];
                if let Some(local_arg) = argmin_valid(rad_window, rad_mask) {
                    // Closest approach to terrain; not necessarily the
                    // highest ground, but the point of highest concern.
                    let arg = down_up.start + local_arg;
                    let rad_at_arg = rad.data()[arg];
                    if rad_at_arg <= RADIO_BAND_CEILING_FT {
                        if let Some(std_at_arg) = alt_std.get(arg) {
                            dips.push(Dip {
                                kind: DipKind::OverGnd,
                                range: down_up.clone(),
                                reversed: false,
                                alt_std: std_at_arg,
                                highest_ground: std_at_arg - rad_at_arg,
                            });
                            classified = true;
                        }
                    }
                    // Radio stayed above its trusted band, or pressure is
                    // masked at the closest approach: the dip never saw
                    // the ground, so it falls through to High.
                }
            }

            if !classified {
                match dips.last_mut() {
                    Some(prev) if prev.kind == DipKind::High => {
                        // Join onto the previous high dip.
                        prev.range.end = down_up.end;
                        if next.value < prev.alt_std {
                            prev.alt_std = next.value;
                        }
                    }
                    _ => {
                        dips.push(Dip {
                            kind: DipKind::High,
                            range: down_up,
                            reversed: false,
                            alt_std: next.value,
                            highest_ground: next.value,
                        });
                    }
                }
            }
            n += 2;
        } else {
            // Two falls in a row: the segmenter guarantees alternation, so
            // the data itself is inconsistent here.
            return Err(EngineError::CycleFault { index: next.index });
        }
    }

    Ok(dips)
}

/// Pass two: resolve provisional `High` ground estimates from neighbors.
///
/// - the first dip projects the next dip's ground through the altitude
///   difference (or, when it is the only dip, places its peak an arbitrary
///   offset above the provisional ground);
/// - the last dip is symmetric with its predecessor;
/// - interior dips take the most conservative of the neighboring grounds,
///   capped a minimum clearance below the dip's own trough.
///
/// Running this pass again over an already-finalized list leaves the
/// estimates unchanged.
pub fn resolve_high_grounds(dips: &mut [Dip]) {
    let len = dips.len();
    for n in 0..len {
        if dips[n].kind != DipKind::High {
            continue;
        }
        if n == 0 {
            if len == 1 {
                // Indeterminate case: nothing to reference against.
                dips[n].alt_std = dips[n].highest_ground + SOLO_DIP_OFFSET_FT;
            } else {
                let next = dips[n + 1].clone();
                dips[n].highest_ground = dips[n].alt_std - next.alt_std + next.highest_ground;
            }
        } else if n == len - 1 {
            let prev = dips[n - 1].clone();
            dips[n].highest_ground = dips[n].alt_std - prev.alt_std + prev.highest_ground;
        } else {
            // The lowest neighboring ground is a little optimistic but
            // workable; the clearance cap covers dips lower than both
            // airfields.
            let prev_hg = dips[n - 1].highest_ground;
            let next_hg = dips[n + 1].highest_ground;
            let capped = dips[n].alt_std - HIGH_DIP_MIN_CLEARANCE_FT;
            dips[n].highest_ground = prev_hg.min(capped).min(next_hg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycles::cycle_finder;

    #[cfg(not(feature = "std"))]
    use alloc::vec;

    fn extrema_of(signal: &Signal, quick: &Range<usize>) -> Vec<Extremum> {
        let (data, mask) = signal.window(quick.clone());
        cycle_finder(&data, &mask, 500.0)
            .unwrap()
            .into_iter()
            .map(|e| Extremum { index: e.index + quick.start, value: e.value })
            .collect()
    }

    fn trapezoid_flight() -> Signal {
        // Taxi, climb to 3000 ft, cruise, descend, taxi.
        let mut data = vec![0.0f32; 5];
        data.extend((1..=30).map(|i| i as f32 * 100.0));
        data.extend(core::iter::repeat(3000.0).take(10));
        data.extend((0..30).rev().map(|i| i as f32 * 100.0));
        data.extend(core::iter::repeat(0.0).take(5));
        Signal::from_samples(data, 1.0)
    }

    #[test]
    fn takeoff_and_landing_partition_the_interval() {
        let alt_std = trapezoid_flight();
        let quick = 0..alt_std.len();
        let extrema = extrema_of(&alt_std, &quick);
        let dips = build_dips(&alt_std, None, &quick, &extrema).unwrap();

        assert_eq!(dips.len(), 2);
        assert_eq!(dips[0].kind, DipKind::Land);
        assert!(!dips[0].reversed);
        assert_eq!(dips[0].range.start, quick.start);
        assert_eq!(dips[1].kind, DipKind::Land);
        assert!(dips[1].reversed);
        assert_eq!(dips[1].range.end, quick.end);
        // Adjacent dips share a boundary index.
        assert_eq!(dips[0].range.end, dips[1].range.start);
        assert_eq!(dips[0].highest_ground, 0.0);
        assert_eq!(dips[1].highest_ground, 0.0);
    }

    #[test]
    fn go_around_with_radio_is_over_gnd() {
        // 0 -> 3000 -> 1000 -> 3000 -> 0 with radio valid at the trough.
        let mut data = vec![0.0f32];
        data.extend((1..=30).map(|i| i as f32 * 100.0));
        data.extend((10..30).rev().map(|i| i as f32 * 100.0));
        data.extend((11..=30).map(|i| i as f32 * 100.0));
        data.extend((0..30).rev().map(|i| i as f32 * 100.0));
        let alt_std = Signal::from_samples(data.clone(), 1.0);

        // Radio reads 80 ft over a 920 ft ridge at the trough, masked
        // (saturated) outside its operating range.
        let rad: Vec<f32> = data.iter().map(|&v| v - 920.0).collect();
        let rad_mask: Vec<bool> = rad.iter().map(|&v| !(0.0..=2500.0).contains(&v)).collect();
        let alt_rad = Signal::new(rad, rad_mask, 1.0, 0.0).unwrap();

        let quick = 0..alt_std.len();
        let extrema = extrema_of(&alt_std, &quick);
        let dips = build_dips(&alt_std, Some(&alt_rad), &quick, &extrema).unwrap();

        assert_eq!(dips.len(), 3);
        assert_eq!(dips[1].kind, DipKind::OverGnd);
        assert_eq!(dips[1].alt_std, 1000.0);
        assert_eq!(dips[1].highest_ground, 920.0);
    }

    #[test]
    fn trough_above_radio_band_stays_high() {
        // The radio altimeter is valid at the trough but never within its
        // trusted band, so it is no evidence of ground contact.
        let mut data = vec![0.0f32];
        data.extend((1..=30).map(|i| i as f32 * 100.0));
        data.extend((25..30).rev().map(|i| i as f32 * 100.0));
        data.extend((26..=32).map(|i| i as f32 * 100.0));
        data.extend((0..32).rev().map(|i| i as f32 * 100.0));
        let alt_std = Signal::from_samples(data.clone(), 1.0);

        // 150 ft radio at the 2500 ft trough.
        let rad: Vec<f32> = data.iter().map(|&v| v - 2350.0).collect();
        let rad_mask: Vec<bool> = rad.iter().map(|&v| !(0.0..=2500.0).contains(&v)).collect();
        let alt_rad = Signal::new(rad, rad_mask, 1.0, 0.0).unwrap();

        let quick = 0..alt_std.len();
        let extrema = extrema_of(&alt_std, &quick);
        let dips = build_dips(&alt_std, Some(&alt_rad), &quick, &extrema).unwrap();

        assert_eq!(dips.len(), 3);
        assert_eq!(dips[1].kind, DipKind::High);
    }

    #[test]
    fn go_around_without_radio_is_high_and_resolved() {
        let mut data = vec![0.0f32];
        data.extend((1..=30).map(|i| i as f32 * 100.0));
        data.extend((25..30).rev().map(|i| i as f32 * 100.0));
        data.extend((26..=32).map(|i| i as f32 * 100.0));
        data.extend((0..32).rev().map(|i| i as f32 * 100.0));
        let alt_std = Signal::from_samples(data, 1.0);

        let quick = 0..alt_std.len();
        let extrema = extrema_of(&alt_std, &quick);
        let mut dips = build_dips(&alt_std, None, &quick, &extrema).unwrap();

        assert_eq!(dips.len(), 3);
        assert_eq!(dips[1].kind, DipKind::High);

        resolve_high_grounds(&mut dips);
        // Interior dip: min(prev ground, trough - 1000, next ground).
        assert_eq!(dips[1].highest_ground, 0.0);
    }

    #[test]
    fn adjacent_high_dips_merge() {
        // Two consecutive no-radio dips: 0 -> 3000 -> 2400 -> 3100 -> 2300 -> 3200 -> 0.
        let profile = [
            (0.0, 3000.0),
            (3000.0, 2400.0),
            (2400.0, 3100.0),
            (3100.0, 2300.0),
            (2300.0, 3200.0),
            (3200.0, 0.0),
        ];
        let mut data = Vec::new();
        for (from, to) in profile {
            let steps = 20;
            for s in 0..steps {
                data.push(from + (to - from) * s as f32 / steps as f32);
            }
        }
        data.push(0.0);
        let alt_std = Signal::from_samples(data, 1.0);

        let quick = 0..alt_std.len();
        let extrema = extrema_of(&alt_std, &quick);
        let dips = build_dips(&alt_std, None, &quick, &extrema).unwrap();

        // takeoff land, one merged high, landing land
        assert_eq!(dips.len(), 3);
        assert_eq!(dips[1].kind, DipKind::High);
        assert_eq!(dips[1].alt_std, 2300.0);
        assert_eq!(dips[0].range.end, dips[1].range.start);
        assert_eq!(dips[1].range.end, dips[2].range.start);
    }

    #[test]
    fn resolve_is_idempotent_on_finalized_dips() {
        let mut data = vec![0.0f32];
        data.extend((1..=30).map(|i| i as f32 * 100.0));
        data.extend((25..30).rev().map(|i| i as f32 * 100.0));
        data.extend((26..=32).map(|i| i as f32 * 100.0));
        data.extend((0..32).rev().map(|i| i as f32 * 100.0));
        let alt_std = Signal::from_samples(data, 1.0);

        let quick = 0..alt_std.len();
        let extrema = extrema_of(&alt_std, &quick);
        let mut dips = build_dips(&alt_std, None, &quick, &extrema).unwrap();
        resolve_high_grounds(&mut dips);
        let finalized = dips.clone();
        resolve_high_grounds(&mut dips);
        assert_eq!(dips, finalized);
    }

    #[test]
    fn fewer_than_two_extrema_is_insufficient() {
        let extrema = [Extremum { index: 0, value: 520.0 }];
        let alt_std = Signal::from_samples(vec![520.0; 10], 1.0);
        let err = build_dips(&alt_std, None, &(0..10), &extrema);
        assert_eq!(
            err,
            Err(EngineError::InsufficientData { required: 2, available: 1 })
        );
    }

    #[test]
    fn double_fall_is_a_cycle_fault() {
        let extrema = [
            Extremum { index: 0, value: 3000.0 },
            Extremum { index: 10, value: 2000.0 },
            Extremum { index: 20, value: 1000.0 },
            Extremum { index: 30, value: 2500.0 },
        ];
        let alt_std = Signal::from_samples(vec![0.0; 40], 1.0);
        let err = build_dips(&alt_std, None, &(0..40), &extrema);
        assert_eq!(err, Err(EngineError::CycleFault { index: 10 }));
    }
}
