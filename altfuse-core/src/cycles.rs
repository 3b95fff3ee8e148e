//! Cycle Segmenter: Hysteresis Scan for Altitude Extrema
//!
//! ## Overview
//!
//! A flight's pressure-altitude trace is a multi-valued, noisy signal: one
//! recording can hold several climbs and descents, go-arounds, and training
//! circuits. Before any height can be referenced to the ground, the trace
//! is segmented into alternating peaks and troughs whose amplitude clears a
//! minimum step; smaller wiggles are noise or taxi manoeuvring, not flight
//! segments.
//!
//! ## Algorithm
//!
//! A single left-to-right scan with hysteresis:
//!
//! - the first valid sample is pinned as the opening extremum, so a takeoff
//!   dip always has the pre-flight ground pressure as its datum;
//! - while trending, the running extreme is tracked; when the signal
//!   retreats from it by at least `min_step`, the running extreme is
//!   confirmed and the trend flips;
//! - the final running extreme closes the list.
//!
//! Ties resolve to the first qualifying sample, making the scan fully
//! deterministic. Fewer than two confirmed extrema means the interval holds
//! no usable cycle (typical for short hops below the step threshold) and
//! `None` is returned so the caller can skip it.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// One confirmed peak or trough
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extremum {
    /// Sample index within the scanned slice
    pub index: usize,
    /// Signal value at that index
    pub value: f32,
}

/// Scan `data` for alternating extrema at least `min_step` apart.
///
/// Masked samples are skipped. Returns `None` when fewer than two extrema
/// qualify.
pub fn cycle_finder(data: &[f32], mask: &[bool], min_step: f32) -> Option<Vec<Extremum>> {
    let (first_idx, first_val) = crate::signal::first_valid_sample(data, mask)?;

    let mut extrema = vec![Extremum { index: first_idx, value: first_val }];
    // 0 until the signal first departs min_step from the opening sample,
    // then +1 while seeking a peak, -1 while seeking a trough.
    let mut trend: i8 = 0;
    let mut cand = Extremum { index: first_idx, value: first_val };

    for i in (first_idx + 1)..data.len() {
        if mask[i] {
            continue;
        }
        let v = data[i];
        match trend {
            0 => {
                if v - first_val >= min_step {
                    trend = 1;
                    cand = Extremum { index: i, value: v };
                } else if first_val - v >= min_step {
                    trend = -1;
                    cand = Extremum { index: i, value: v };
                }
            }
            1 => {
                if v > cand.value {
                    cand = Extremum { index: i, value: v };
                } else if cand.value - v >= min_step {
                    extrema.push(cand);
                    trend = -1;
                    cand = Extremum { index: i, value: v };
                }
            }
            _ => {
                if v < cand.value {
                    cand = Extremum { index: i, value: v };
                } else if v - cand.value >= min_step {
                    extrema.push(cand);
                    trend = 1;
                    cand = Extremum { index: i, value: v };
                }
            }
        }
    }

    if trend == 0 {
        // Never moved a full step from the opening sample.
        return None;
    }
    extrema.push(cand);

    if extrema.len() < 2 {
        None
    } else {
        Some(extrema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_mask(n: usize) -> Vec<bool> {
        vec![false; n]
    }

    fn values(extrema: &[Extremum]) -> Vec<f32> {
        extrema.iter().map(|e| e.value).collect()
    }

    #[test]
    fn simple_climb_and_descent() {
        // 0 -> 2000 -> 0 in 100 ft steps.
        let mut data: Vec<f32> = (0..=20).map(|i| i as f32 * 100.0).collect();
        data.extend((0..20).rev().map(|i| i as f32 * 100.0));
        let ext = cycle_finder(&data, &no_mask(data.len()), 500.0).unwrap();
        assert_eq!(values(&ext), vec![0.0, 2000.0, 0.0]);
        assert_eq!(ext[0].index, 0);
        assert_eq!(ext[1].index, 20);
    }

    #[test]
    fn small_wiggles_are_ignored() {
        // A 300 ft dip inside a climb does not split the cycle.
        let data = [
            0.0, 400.0, 800.0, 1200.0, 900.0, 1300.0, 1800.0, 2400.0, 1500.0, 600.0, 0.0,
        ];
        let ext = cycle_finder(&data, &no_mask(data.len()), 500.0).unwrap();
        assert_eq!(values(&ext), vec![0.0, 2400.0, 0.0]);
    }

    #[test]
    fn go_around_produces_interior_extrema() {
        let data = [
            0.0, 1500.0, 3000.0, 2000.0, 1200.0, 2500.0, 3200.0, 1500.0, 100.0,
        ];
        let ext = cycle_finder(&data, &no_mask(data.len()), 500.0).unwrap();
        assert_eq!(values(&ext), vec![0.0, 3000.0, 1200.0, 3200.0, 100.0]);
    }

    #[test]
    fn short_hop_yields_none() {
        let data = [0.0, 200.0, 400.0, 300.0, 100.0, 0.0];
        assert_eq!(cycle_finder(&data, &no_mask(data.len()), 500.0), None);
    }

    #[test]
    fn plateau_tie_takes_first_sample() {
        let data = [0.0, 1000.0, 1000.0, 1000.0, 0.0];
        let ext = cycle_finder(&data, &no_mask(data.len()), 500.0).unwrap();
        assert_eq!(ext[1].index, 1);
    }

    #[test]
    fn masked_samples_are_skipped() {
        let data = [0.0, 9999.0, 1000.0, 0.0];
        let mask = [false, true, false, false];
        let ext = cycle_finder(&data, &mask, 500.0).unwrap();
        assert_eq!(values(&ext), vec![0.0, 1000.0, 0.0]);
    }

    #[test]
    fn fully_masked_yields_none() {
        let data = [0.0, 1000.0];
        let mask = [true, true];
        assert_eq!(cycle_finder(&data, &mask, 500.0), None);
    }
}
