use approx::assert_relative_eq;
use ndarray::Array3;

use perfuse_core::consts::{
    CBF_CEILING, CBF_UNIT_SCALE, LABELING_EFFICIENCY, PARTITION_COEFFICIENT, T1_BLOOD,
};
use perfuse_core::error::PerfuseError;
use perfuse_core::quant::{model_cbf, quantify, sanitize, PerfusionParams};

#[test]
fn effective_pld_walks_up_the_slice_stack() {
    let params = PerfusionParams {
        post_label_delay: 1.60,
        slice_delay: 0.039,
        label_duration: 1.65,
    };
    assert_relative_eq!(params.effective_pld(0), 1.60);
    assert_relative_eq!(params.effective_pld(4), 1.60 + 4.0 * 0.039);
}

#[test]
fn model_matches_hand_computation() {
    let (diff, m0, e_pld, tau) = (50.0, 10_000.0, 1.60, 1.65);
    let expected = CBF_UNIT_SCALE * PARTITION_COEFFICIENT * diff * (e_pld / T1_BLOOD).exp()
        / (2.0 * LABELING_EFFICIENCY * T1_BLOOD * m0 * (1.0 - (-tau / T1_BLOOD).exp()));
    assert_relative_eq!(model_cbf(diff, m0, e_pld, tau), expected);
    // Sanity: this operating point sits well inside the physiological range.
    assert!(expected > 30.0 && expected < 50.0);
}

#[test]
fn quantify_applies_a_per_slice_delay() {
    let params = PerfusionParams::default();
    let diff = Array3::from_elem((2, 2, 3), 50.0);
    let m0 = Array3::from_elem((2, 2, 3), 10_000.0);

    let cbf = quantify(&diff, &m0, &params).unwrap();
    for slice in 0..3 {
        let expected = model_cbf(50.0, 10_000.0, params.effective_pld(slice), params.label_duration);
        assert_relative_eq!(cbf[[0, 0, slice]], expected, max_relative = 1e-12);
        assert_relative_eq!(cbf[[1, 1, slice]], expected, max_relative = 1e-12);
    }
    // Later slices see a longer delay, so the model compensates upward.
    assert!(cbf[[0, 0, 2]] > cbf[[0, 0, 0]]);
}

#[test]
fn implausibly_high_values_saturate_at_the_ceiling() {
    // diff 50 against M0 1000 puts the raw model near 400.
    let params = PerfusionParams::default();
    let diff = Array3::from_elem((2, 2, 2), 50.0);
    let m0 = Array3::from_elem((2, 2, 2), 1000.0);

    let cbf = quantify(&diff, &m0, &params).unwrap();
    assert!(cbf.iter().all(|&v| v == CBF_CEILING));
}

#[test]
fn negative_differences_floor_at_zero() {
    let params = PerfusionParams::default();
    let diff = Array3::from_elem((2, 2, 2), -5.0);
    let m0 = Array3::from_elem((2, 2, 2), 10_000.0);

    let cbf = quantify(&diff, &m0, &params).unwrap();
    assert!(cbf.iter().all(|&v| v == 0.0));
}

#[test]
fn zero_m0_voxels_become_zero() {
    let params = PerfusionParams::default();
    let diff = Array3::from_elem((2, 2, 2), 50.0);
    let mut m0 = Array3::from_elem((2, 2, 2), 10_000.0);
    m0[[0, 0, 0]] = 0.0;

    let cbf = quantify(&diff, &m0, &params).unwrap();
    assert_eq!(cbf[[0, 0, 0]], 0.0);
    assert!(cbf[[1, 1, 1]] > 0.0);
}

#[test]
fn sanitize_is_idempotent() {
    let mut cbf = Array3::from_shape_vec(
        (1, 1, 5),
        vec![f64::NAN, f64::INFINITY, -3.0, 500.0, 42.0],
    )
    .unwrap();
    sanitize(&mut cbf);
    let once = cbf.clone();
    sanitize(&mut cbf);

    assert_eq!(cbf, once);
    assert_eq!(once[[0, 0, 0]], 0.0);
    assert_eq!(once[[0, 0, 1]], 0.0);
    assert_eq!(once[[0, 0, 2]], 0.0);
    assert_eq!(once[[0, 0, 3]], CBF_CEILING);
    assert_eq!(once[[0, 0, 4]], 42.0);
}

#[test]
fn mismatched_grids_are_rejected() {
    let params = PerfusionParams::default();
    let diff = Array3::from_elem((2, 2, 2), 50.0);
    let m0 = Array3::from_elem((3, 3, 3), 1000.0);

    let err = quantify(&diff, &m0, &params).unwrap_err();
    assert!(matches!(err, PerfuseError::GridMismatch { .. }));
}
