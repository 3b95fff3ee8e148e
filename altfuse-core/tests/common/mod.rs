//! Shared flight-profile builders for the integration tests.
//!
//! Profiles are piecewise-linear pressure-altitude traces assembled from
//! level and ramp segments; radio altitude is derived from them assuming
//! flat terrain and a saturating altimeter, which matches how the two
//! sensors relate on real recordings closely enough for these tests.

#![allow(dead_code)]

use altfuse_core::Signal;

/// Piecewise-linear pressure-altitude profile
pub struct ProfileBuilder {
    data: Vec<f32>,
    rate_hz: f32,
}

impl ProfileBuilder {
    pub fn new(rate_hz: f32) -> Self {
        Self { data: Vec::new(), rate_hz }
    }

    /// Hold `value` for `samples` samples
    pub fn level(mut self, value: f32, samples: usize) -> Self {
        self.data.extend(core::iter::repeat(value).take(samples));
        self
    }

    /// Ramp from just past `from` to exactly `to` over `samples` samples
    pub fn ramp(mut self, from: f32, to: f32, samples: usize) -> Self {
        for s in 1..=samples {
            self.data.push(from + (to - from) * s as f32 / samples as f32);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn build(self) -> Signal {
        Signal::from_samples(self.data, self.rate_hz)
    }
}

/// Radio altitude over flat terrain at `field_elevation`, masked above the
/// altimeter's saturation ceiling.
pub fn radio_over_flat_terrain(
    alt_std: &Signal,
    field_elevation: f32,
    saturation_ft: f32,
) -> Signal {
    let data: Vec<f32> = alt_std.data().iter().map(|&v| v - field_elevation).collect();
    let mask: Vec<bool> = data.iter().map(|&v| v > saturation_ft).collect();
    Signal::new(data, mask, alt_std.rate_hz(), alt_std.offset_s())
        .unwrap_or_else(|_| Signal::masked_zeros(alt_std.len(), alt_std.rate_hz()))
}

/// Largest adjacent-sample step over the valid samples of a signal
pub fn max_step(signal: &Signal) -> f32 {
    let mut worst = 0.0f32;
    for i in 1..signal.len() {
        if let (Some(a), Some(b)) = (signal.get(i - 1), signal.get(i)) {
            let step = (b - a).abs();
            if step > worst {
                worst = step;
            }
        }
    }
    worst
}
