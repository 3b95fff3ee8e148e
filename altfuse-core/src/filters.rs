//! First-Order Filters and Regression Primitives
//!
//! ## Overview
//!
//! The vertical-speed estimator is a complementary filter: a washed-out
//! (high-pass) double integration of vertical acceleration summed with a
//! washed-out derivative of pressure altitude. This module provides the
//! discrete first-order lag and washout those terms are built from, plus
//! trapezoidal integration and the small regression helpers used by the
//! liftoff curvature analysis.
//!
//! ## Discretization
//!
//! Both filters are bilinear (Tustin) discretizations of the continuous
//! transfer functions:
//!
//! ```text
//! lag:      y/x = G / (1 + T·s)
//! washout:  y/x = G·T·s / (1 + T·s)
//! ```
//!
//! realized as the recursion `y[n] = b0·x[n] + b1·x[n-1] - a1·y[n-1]`.
//!
//! ## Seeding
//!
//! Each filter is seeded as if its input had been held at `initial` forever
//! (the steady-state internal state for that input level). Without this the
//! washout produces a huge transient at the start of every data run; the
//! vertical-speed estimator seeds with the mean of the first 40 samples.
//!
//! ## Stability
//!
//! The recursion is only stable for `time_constant × rate ≥ 0.5`; shorter
//! constants are rejected with [`EngineError::UnstableFilter`] rather than
//! silently ringing.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::errors::{EngineError, EngineResult};

/// Minimum `time_constant * rate` product for a stable discretization
const MIN_TC_SAMPLES: f32 = 0.5;

/// First-order low-pass (lag) filter.
///
/// `gain` scales the DC response; `initial` seeds the filter state
/// (defaults to the first sample).
pub fn first_order_lag(
    data: &[f32],
    time_constant_s: f32,
    rate_hz: f32,
    gain: f32,
    initial: Option<f32>,
) -> EngineResult<Vec<f32>> {
    let tc2 = 2.0 * time_constant_s * rate_hz;
    check_stability(time_constant_s * rate_hz)?;
    let denom = 1.0 + tc2;
    let b0 = gain / denom;
    let b1 = gain / denom;
    let a1 = (1.0 - tc2) / denom;
    Ok(iir_first_order(data, b0, b1, a1, initial))
}

/// First-order high-pass (washout) filter.
///
/// Removes long-term drift from the input; the response to a held input
/// decays to zero with the given time constant.
pub fn first_order_washout(
    data: &[f32],
    time_constant_s: f32,
    rate_hz: f32,
    gain: f32,
    initial: Option<f32>,
) -> EngineResult<Vec<f32>> {
    let tc2 = 2.0 * time_constant_s * rate_hz;
    check_stability(time_constant_s * rate_hz)?;
    let denom = 1.0 + tc2;
    let b0 = gain * tc2 / denom;
    let b1 = -b0;
    let a1 = (1.0 - tc2) / denom;
    Ok(iir_first_order(data, b0, b1, a1, initial))
}

fn check_stability(tc_samples: f32) -> EngineResult<()> {
    if tc_samples < MIN_TC_SAMPLES {
        return Err(EngineError::UnstableFilter { tc_samples });
    }
    Ok(())
}

/// Direct-form-II-transposed recursion with steady-state seeding.
///
/// The internal state starts at the value it would hold after an infinitely
/// long input at `initial`, so a run beginning at that level produces no
/// startup transient.
fn iir_first_order(data: &[f32], b0: f32, b1: f32, a1: f32, initial: Option<f32>) -> Vec<f32> {
    let mut out = Vec::with_capacity(data.len());
    if data.is_empty() {
        return out;
    }
    let seed = initial.unwrap_or(data[0]);
    let y_ss = (b0 + b1) / (1.0 + a1);
    let mut z = seed * (b1 - a1 * y_ss);
    for &x in data {
        let y = b0 * x + z;
        z = b1 * x - a1 * y;
        out.push(y);
    }
    out
}

/// Trapezoidal integration.
///
/// `out[0] = initial`, then each step adds the mean of the bracketing
/// samples over the sample period, scaled by `scale`.
pub fn integrate(data: &[f32], rate_hz: f32, initial: f32, scale: f32) -> Vec<f32> {
    let mut out = Vec::with_capacity(data.len());
    if data.is_empty() {
        return out;
    }
    let k = scale / (2.0 * rate_hz);
    let mut acc = initial;
    out.push(acc);
    for i in 1..data.len() {
        acc += (data[i] + data[i - 1]) * k;
        out.push(acc);
    }
    out
}

/// Least-squares line fit over the valid samples of a window.
///
/// The x axis is the sample index within the window. Returns `None` with
/// fewer than two valid samples or a degenerate spread.
pub fn linear_fit(data: &[f32], mask: &[bool]) -> Option<(f32, f32)> {
    let mut n = 0.0f32;
    let (mut sx, mut sy, mut sxx, mut sxy) = (0.0f32, 0.0f32, 0.0f32, 0.0f32);
    for i in 0..data.len() {
        if mask[i] {
            continue;
        }
        let x = i as f32;
        let y = data[i];
        n += 1.0;
        sx += x;
        sy += y;
        sxx += x * x;
        sxy += x * y;
    }
    if n < 2.0 {
        return None;
    }
    let det = n * sxx - sx * sx;
    if det == 0.0 {
        return None;
    }
    let slope = (n * sxy - sx * sy) / det;
    let intercept = (sy - slope * sx) / n;
    Some((slope, intercept))
}

/// Direction of curvature sought by [`peak_curvature`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveSense {
    /// Slope increasing left to right (a climb curving upward)
    Concave,
    /// Slope decreasing left to right
    Convex,
}

/// Index of strongest curvature in a window.
///
/// Two short line fits ("limbs") are slid along the data with a gap between
/// them; the candidate index is scored by the slope change from the left
/// limb to the right limb. The first index with the strongest qualifying
/// change wins, which keeps the scan deterministic on plateaus.
///
/// Used to locate the liftoff point: the concave break where the altitude
/// trace first curves upward out of the runway pressure profile.
pub fn peak_curvature(
    data: &[f32],
    mask: &[bool],
    sense: CurveSense,
    gap: usize,
    limb: usize,
) -> Option<usize> {
    let n = data.len();
    if n < 2 * limb + gap + 1 {
        return None;
    }
    let mut best: Option<(usize, f32)> = None;
    for i in limb..(n - gap - limb) {
        let left = linear_fit(&data[i - limb..i], &mask[i - limb..i]);
        let right = linear_fit(&data[i + gap..i + gap + limb], &mask[i + gap..i + gap + limb]);
        let (Some((ls, _)), Some((rs, _))) = (left, right) else {
            continue;
        };
        let score = match sense {
            CurveSense::Concave => rs - ls,
            CurveSense::Convex => ls - rs,
        };
        match best {
            None => best = Some((i, score)),
            Some((_, b)) if score > b => best = Some((i, score)),
            _ => {}
        }
    }
    match best {
        Some((i, score)) if score > 0.0 => Some(i),
        _ => None,
    }
}
