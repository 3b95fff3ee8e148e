//! Masked Sampled Signals and Mask Utilities
//!
//! ## Overview
//!
//! Every input to the engine is a recorded time series in which individual
//! samples may be invalid: sensor dropouts, recorder frame corruption, or
//! saturation (a radio altimeter above its ceiling records garbage). This
//! module provides [`Signal`], an owned sample array with a parallel
//! validity mask, plus the scan/clump utilities the algorithms are built
//! from.
//!
//! ## Design Rationale
//!
//! The mask is a plain `Vec<bool>` (`true` = invalid) rather than a bitset
//! or `Option<f32>` per sample:
//!
//! 1. **Slice-friendly**: the algorithms run over index ranges of whole
//!    flights; parallel slices keep those loops branch-light and make the
//!    data/mask relationship obvious at call sites.
//! 2. **Masked data is still data**: repaired or saturated samples keep
//!    their last written value under the mask, which the repair and
//!    stitching code relies on when it extends or re-validates runs.
//! 3. **No in-band sentinels**: NaN-as-missing breaks comparisons and
//!    propagates silently; an explicit mask fails loudly in tests.
//!
//! ## Alignment Contract
//!
//! Signals consumed together must already share a sample rate and phase
//! offset; alignment is the upstream framework's job. The engine checks
//! only that lengths agree and surfaces `EngineError::LengthMismatch`
//! instead of panicking on a misaligned input.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use core::ops::Range;

use crate::errors::{EngineError, EngineResult};

/// An ordered sequence of float samples with an explicit validity mask.
///
/// `mask[i] == true` means sample `i` is invalid. The sample rate and phase
/// offset ride along so that second-based parameters (gap durations, filter
/// time constants) can be converted to sample counts where they are used.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signal {
    data: Vec<f32>,
    mask: Vec<bool>,
    rate_hz: f32,
    offset_s: f32,
}

impl Signal {
    /// Create a signal from samples and a mask of equal length
    pub fn new(data: Vec<f32>, mask: Vec<bool>, rate_hz: f32, offset_s: f32) -> EngineResult<Self> {
        if data.len() != mask.len() {
            return Err(EngineError::LengthMismatch {
                expected: data.len(),
                actual: mask.len(),
            });
        }
        Ok(Self { data, mask, rate_hz, offset_s })
    }

    /// Create a fully valid signal from raw samples
    pub fn from_samples(data: Vec<f32>, rate_hz: f32) -> Self {
        let mask = vec![false; data.len()];
        Self { data, mask, rate_hz, offset_s: 0.0 }
    }

    /// Create an all-zero, fully valid signal (the AAL output starts here)
    pub fn zeros(len: usize, rate_hz: f32) -> Self {
        Self {
            data: vec![0.0; len],
            mask: vec![false; len],
            rate_hz,
            offset_s: 0.0,
        }
    }

    /// Create an all-zero, fully masked signal (the vertical-speed output
    /// starts here; samples stay masked unless a valid run writes them)
    pub fn masked_zeros(len: usize, rate_hz: f32) -> Self {
        Self {
            data: vec![0.0; len],
            mask: vec![true; len],
            rate_hz,
            offset_s: 0.0,
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the signal holds no samples
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample rate in Hz
    pub fn rate_hz(&self) -> f32 {
        self.rate_hz
    }

    /// Phase offset in seconds from the common epoch
    pub fn offset_s(&self) -> f32 {
        self.offset_s
    }

    /// Set the phase offset
    pub fn with_offset(mut self, offset_s: f32) -> Self {
        self.offset_s = offset_s;
        self
    }

    /// Raw sample values, including values hidden under the mask
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Validity mask; `true` marks an invalid sample
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// Value at `index`, or `None` when masked or out of range
    pub fn get(&self, index: usize) -> Option<f32> {
        if index < self.len() && !self.mask[index] {
            Some(self.data[index])
        } else {
            None
        }
    }

    /// Write a valid sample
    pub fn set(&mut self, index: usize, value: f32) {
        self.data[index] = value;
        self.mask[index] = false;
    }

    /// Mark a sample invalid without touching its value
    pub fn set_masked(&mut self, index: usize) {
        self.mask[index] = true;
    }

    /// Number of valid (unmasked) samples
    pub fn valid_count(&self) -> usize {
        self.mask.iter().filter(|&&m| !m).count()
    }

    /// Copy of the samples and mask over `range`
    pub fn window(&self, range: Range<usize>) -> (Vec<f32>, Vec<bool>) {
        (self.data[range.clone()].to_vec(), self.mask[range].to_vec())
    }

    /// Copy of the samples and mask over `range`, reversed in place.
    ///
    /// Trailing-descent dips are processed back to front so the same
    /// stitching code serves takeoff and landing.
    pub fn window_reversed(&self, range: Range<usize>) -> (Vec<f32>, Vec<bool>) {
        let (mut data, mut mask) = self.window(range);
        data.reverse();
        mask.reverse();
        (data, mask)
    }
}

/// Contiguous runs of valid samples, in index order.
///
/// The engine's per-run processing (filter runs, radio bands) is built on
/// this; an all-masked input yields an empty list rather than an error.
pub fn clump_unmasked(mask: &[bool]) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &masked) in mask.iter().enumerate() {
        match (masked, start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
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

/// Contiguous runs of valid samples whose values lie within `[lo, hi]`.
///
/// Samples outside the band count as gaps, so a signal that leaves the band
/// and returns produces two runs. Used for the 0.1-100 ft radio band and
/// the ground-effect override bands.
pub fn clump_within(data: &[f32], mask: &[bool], lo: f32, hi: f32) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = None;
    for i in 0..data.len() {
        let inside = !mask[i] && data[i] >= lo && data[i] <= hi;
        match (inside, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(s..data.len());
    }
    runs
}

/// The gaps between `ranges` over `0..len`.
///
/// `ranges` must be sorted and non-overlapping (as produced by the clump
/// functions). The complement of the radio sections gives the baro sections
/// to be stitched.
pub fn complement_ranges(ranges: &[Range<usize>], len: usize) -> Vec<Range<usize>> {
    let mut gaps = Vec::new();
    let mut cursor = 0;
    for r in ranges {
        if r.start > cursor {
            gaps.push(cursor..r.start);
        }
        cursor = cursor.max(r.end);
    }
    if cursor < len {
        gaps.push(cursor..len);
    }
    gaps
}

/// First valid sample as `(index, value)`
pub fn first_valid_sample(data: &[f32], mask: &[bool]) -> Option<(usize, f32)> {
    mask.iter()
        .position(|&m| !m)
        .map(|i| (i, data[i]))
}

/// Minimum over valid samples
pub fn min_valid(data: &[f32], mask: &[bool]) -> Option<f32> {
    valid_iter(data, mask).fold(None, |acc, v| {
        Some(match acc {
            None => v,
            Some(a) => {
                if v < a {
                    v
                } else {
                    a
                }
            }
        })
    })
}

/// Maximum over valid samples
pub fn max_valid(data: &[f32], mask: &[bool]) -> Option<f32> {
    valid_iter(data, mask).fold(None, |acc, v| {
        Some(match acc {
            None => v,
            Some(a) => {
                if v > a {
                    v
                } else {
                    a
                }
            }
        })
    })
}

/// Mean over valid samples
pub fn mean_valid(data: &[f32], mask: &[bool]) -> Option<f32> {
    let mut sum = 0.0f32;
    let mut count = 0usize;
    for v in valid_iter(data, mask) {
        sum += v;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f32)
    }
}

/// Index of the minimum valid sample; ties go to the first occurrence
pub fn argmin_valid(data: &[f32], mask: &[bool]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for i in 0..data.len() {
        if mask[i] {
            continue;
        }
        match best {
            None => best = Some((i, data[i])),
            Some((_, bv)) if data[i] < bv => best = Some((i, data[i])),
            _ => {}
        }
    }
    best.map(|(i, _)| i)
}

/// First index at which the signal reaches or crosses `value`.
///
/// Scans consecutive valid samples; a bracketing pair `(d[i-1], d[i])`
/// containing `value` reports index `i`. Used to bound the liftoff
/// curvature scan at the first 500 ft of climb.
pub fn index_at_value(data: &[f32], mask: &[bool], value: f32) -> Option<usize> {
    let mut prev: Option<f32> = None;
    for i in 0..data.len() {
        if mask[i] {
            continue;
        }
        let v = data[i];
        if v == value {
            return Some(i);
        }
        if let Some(p) = prev {
            if (p < value && v > value) || (p > value && v < value) {
                return Some(i);
            }
        }
        prev = Some(v);
    }
    None
}

fn valid_iter<'a>(data: &'a [f32], mask: &'a [bool]) -> impl Iterator<Item = f32> + 'a {
    data.iter()
        .zip(mask.iter())
        .filter(|(_, &m)| !m)
        .map(|(&v, _)| v)
}
