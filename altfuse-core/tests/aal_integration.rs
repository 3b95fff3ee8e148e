//! Integration tests for the height-above-airfield derivation
//!
//! Each test drives `derive_altitude_aal` (or the classifier underneath it)
//! with a synthetic but physically plausible flight profile and checks the
//! engine-level guarantees: non-negative output, zeroed interval ends,
//! continuity at every radio/baro handover, and graceful degradation when
//! the radio altimeter is absent or untrustworthy.

mod common;

use altfuse_core::{
    cycles::{cycle_finder, Extremum},
    dips::{build_dips, resolve_high_grounds, DipKind},
    derive_altitude_aal, AalConfig, Signal,
};
use proptest::prelude::*;

use common::{max_step, radio_over_flat_terrain, ProfileBuilder};

/// Radio altimeters typically saturate around 2500 ft
const RADIO_SATURATION_FT: f32 = 2500.0;

fn assert_engine_invariants(height: &Signal, fast: &std::ops::Range<usize>) {
    for i in fast.clone() {
        let v = height.get(i).unwrap_or(0.0);
        assert!(v >= 0.0, "negative height {} at {}", v, i);
    }
    assert_eq!(height.get(fast.start), Some(0.0), "nonzero at interval start");
    assert_eq!(height.get(fast.end - 1), Some(0.0), "nonzero at interval end");
}

#[test]
fn monotonic_climb_without_radio_shifts_to_first_sample() {
    // Airfield at 520 ft pressure altitude, climb straight out to 2520 ft.
    let profile = ProfileBuilder::new(1.0).level(520.0, 5).ramp(520.0, 2520.0, 40);
    let n = profile.len();
    let data = profile.data().to_vec();
    let alt_std = profile.build();

    let out = derive_altitude_aal(&alt_std, None, &[0..n], &AalConfig::default()).unwrap();
    assert!(out.faults.is_empty());
    assert_engine_invariants(&out.height, &(0..n));

    // One takeoff dip referenced to the ground pressure altitude.
    for i in 1..(n - 1) {
        assert_eq!(out.height.get(i), Some(data[i] - 520.0), "index {}", i);
    }
}

#[test]
fn trough_outside_radio_band_takes_neighbor_ground() {
    // 0 -> 3000 -> 2500 -> 3200 -> 0, radio valid at the middle trough but
    // reading 150 ft: never inside the trusted band, so no ground evidence.
    let profile = ProfileBuilder::new(1.0)
        .level(0.0, 5)
        .ramp(0.0, 3000.0, 30)
        .ramp(3000.0, 2500.0, 10)
        .ramp(2500.0, 3200.0, 10)
        .ramp(3200.0, 0.0, 32)
        .level(0.0, 5);
    let n = profile.len();
    let alt_std = profile.build();
    let alt_rad = radio_over_flat_terrain(&alt_std, 2350.0, RADIO_SATURATION_FT);

    let (window, window_mask) = alt_std.window(0..n);
    let extrema: Vec<Extremum> = cycle_finder(&window, &window_mask, 500.0).unwrap();
    let mut dips = build_dips(&alt_std, Some(&alt_rad), &(0..n), &extrema).unwrap();

    assert_eq!(dips.len(), 3);
    assert_eq!(dips[0].kind, DipKind::Land);
    assert_eq!(dips[1].kind, DipKind::High);
    assert_eq!(dips[2].kind, DipKind::Land);

    resolve_high_grounds(&mut dips);
    // Both neighboring airfields sit at 0 ft; the interior minimum rule
    // takes their ground, not the spurious radio-derived 2350 ft ridge.
    assert_eq!(dips[1].highest_ground, 0.0);
}

#[test]
fn masked_pressure_sample_stays_masked_in_the_output() {
    // A dropout inside the interior dip, with garbage under the mask that
    // would come out negative after the ground shift. The clamp must not
    // resurrect it as a fabricated 0 ft reading.
    let profile = ProfileBuilder::new(1.0)
        .level(0.0, 5)
        .ramp(0.0, 3000.0, 30)
        .ramp(3000.0, 2500.0, 10)
        .ramp(2500.0, 3200.0, 10)
        .ramp(3200.0, 0.0, 32)
        .level(0.0, 5);
    let n = profile.len();
    let mut data = profile.data().to_vec();
    let mut mask = vec![false; n];
    data[40] = -50.0;
    mask[40] = true;
    let alt_std = Signal::new(data, mask, 1.0, 0.0).unwrap();

    let out = derive_altitude_aal(&alt_std, None, &[0..n], &AalConfig::default()).unwrap();
    assert!(out.faults.is_empty());

    assert_eq!(out.height.get(40), None, "masked sample was revalidated");
    // Its valid neighbors are still shifted and non-negative.
    assert!(out.height.get(39).unwrap() >= 0.0);
    assert!(out.height.get(41).unwrap() >= 0.0);
}

#[test]
fn absent_radio_falls_back_to_curvature_everywhere() {
    // Long, slow climb so the curvature analysis has enough samples.
    let profile = ProfileBuilder::new(1.0)
        .level(520.0, 30)
        .ramp(520.0, 3020.0, 300)
        .level(3020.0, 50)
        .ramp(3020.0, 520.0, 300)
        .level(520.0, 30);
    let n = profile.len();
    let alt_std = profile.build();

    let out = derive_altitude_aal(&alt_std, None, &[0..n], &AalConfig::default()).unwrap();
    assert!(out.faults.is_empty());
    assert_engine_invariants(&out.height, &(0..n));

    // Cruise height referenced close to the 520 ft airfield.
    let cruise = out.height.get(360).unwrap();
    assert!(
        (2300.0..=2510.0).contains(&cruise),
        "cruise height {} not referenced to the airfield",
        cruise
    );
}

#[test]
fn bounced_landing_is_forced_to_zero_after_touchdown() {
    // Land at idx 134, bounce to 40 ft (above the 35 ft threshold), settle.
    let profile = ProfileBuilder::new(1.0)
        .level(0.0, 5)
        .ramp(0.0, 3000.0, 60)
        .level(3000.0, 10)
        .ramp(3000.0, 0.0, 60)
        .ramp(0.0, 40.0, 2)
        .ramp(40.0, 0.0, 2)
        .level(0.0, 6);
    let n = profile.len();
    let alt_std = profile.build();
    let alt_rad = radio_over_flat_terrain(&alt_std, 0.0, RADIO_SATURATION_FT);

    let out =
        derive_altitude_aal(&alt_std, Some(&alt_rad), &[0..n], &AalConfig::default()).unwrap();
    assert!(out.faults.is_empty());
    assert_engine_invariants(&out.height, &(0..n));

    // Nothing after touchdown survives, least of all the bounce.
    for i in 134..n {
        assert_eq!(out.height.get(i), Some(0.0), "index {}", i);
    }
    // The approach itself is radio altitude, untouched.
    assert_eq!(out.height.get(133), Some(50.0));
    assert_eq!(out.height.get(132), Some(100.0));
}

#[test]
fn radio_baro_handover_is_continuous() {
    // Full flight over a sea-level airfield; the radio and pressure signals
    // agree exactly, so any step at a handover is the stitcher's fault.
    let profile = ProfileBuilder::new(1.0)
        .level(0.0, 5)
        .ramp(0.0, 3000.0, 150)
        .level(3000.0, 20)
        .ramp(3000.0, 0.0, 150)
        .level(0.0, 5);
    let n = profile.len();
    let alt_std = profile.build();
    let alt_rad = radio_over_flat_terrain(&alt_std, 0.0, RADIO_SATURATION_FT);

    let out =
        derive_altitude_aal(&alt_std, Some(&alt_rad), &[0..n], &AalConfig::default()).unwrap();
    assert!(out.faults.is_empty());
    assert_engine_invariants(&out.height, &(0..n));

    // The profile moves 20 ft per sample; a handover step would exceed it.
    assert!(max_step(&out.height) <= 20.0 + 1e-3);

    // In the 0.1-100 ft band the output is the radio altitude verbatim.
    assert_eq!(out.height.get(7), Some(60.0));
    assert_eq!(out.height.get(9), Some(100.0));
    // Above the band, pressure carries with zero offset error.
    assert_eq!(out.height.get(160), Some(3000.0));
}

#[test]
fn short_hop_interval_is_skipped_without_fault() {
    // First interval never clears the 500 ft step; the second is a real
    // departure and must be unaffected by the skip.
    let profile = ProfileBuilder::new(1.0)
        .level(0.0, 3)
        .ramp(0.0, 300.0, 5)
        .ramp(300.0, 0.0, 5)
        .level(0.0, 2)
        .level(520.0, 5)
        .ramp(520.0, 2520.0, 40);
    let n = profile.len();
    let data = profile.data().to_vec();
    let alt_std = profile.build();

    let out =
        derive_altitude_aal(&alt_std, None, &[0..15, 15..n], &AalConfig::default()).unwrap();
    assert!(out.faults.is_empty());

    for i in 0..15 {
        assert_eq!(out.height.get(i), Some(0.0), "hop index {}", i);
    }
    assert_eq!(out.height.get(30), Some(data[30] - 520.0));
}

proptest! {
    #[test]
    fn height_is_never_negative_and_ends_at_zero(
        field_elevation in 0.0f32..2000.0,
        climb_ft in 600.0f32..3000.0,
        climb_samples in 20usize..60,
        descent_samples in 20usize..60,
    ) {
        let cruise = field_elevation + climb_ft;
        let profile = ProfileBuilder::new(1.0)
            .level(field_elevation, 5)
            .ramp(field_elevation, cruise, climb_samples)
            .level(cruise, 10)
            .ramp(cruise, field_elevation, descent_samples)
            .level(field_elevation, 5);
        let n = profile.len();
        let alt_std = profile.build();
        let alt_rad = radio_over_flat_terrain(&alt_std, field_elevation, RADIO_SATURATION_FT);

        let out = derive_altitude_aal(
            &alt_std,
            Some(&alt_rad),
            &[0..n],
            &AalConfig::default(),
        );
        prop_assert!(out.is_ok());
        let out = out.unwrap();
        prop_assert!(out.faults.is_empty());

        for i in 0..n {
            let v = out.height.get(i).unwrap_or(0.0);
            prop_assert!(v >= 0.0, "negative height {} at {}", v, i);
        }
        prop_assert_eq!(out.height.get(0), Some(0.0));
        prop_assert_eq!(out.height.get(n - 1), Some(0.0));
    }
}
