//! Slice-wise kinetic quantification: invert the single-compartment pCASL
//! perfusion model to turn a difference volume and an M0 calibration volume
//! into absolute CBF, in mL/100g/min.

use ndarray::{Array2, Array3, Axis, Zip};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::consts::{
    CBF_CEILING, CBF_UNIT_SCALE, DEFAULT_LABEL_DURATION, DEFAULT_POST_LABEL_DELAY,
    DEFAULT_SLICE_DELAY, LABELING_EFFICIENCY, PARTITION_COEFFICIENT, T1_BLOOD,
};
use crate::error::{PerfuseError, Result};

/// Caller-supplied acquisition timing, in seconds. The physiological
/// constants of the model live in [`crate::consts`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerfusionParams {
    pub post_label_delay: f64,
    pub slice_delay: f64,
    pub label_duration: f64,
}

impl Default for PerfusionParams {
    fn default() -> Self {
        Self {
            post_label_delay: DEFAULT_POST_LABEL_DELAY,
            slice_delay: DEFAULT_SLICE_DELAY,
            label_duration: DEFAULT_LABEL_DURATION,
        }
    }
}

impl PerfusionParams {
    /// Post-label delay seen by slice `k`: acquisition walks up the slice
    /// stack, accruing `slice_delay` per slice.
    pub fn effective_pld(&self, slice: usize) -> f64 {
        self.post_label_delay + slice as f64 * self.slice_delay
    }
}

/// The raw (unclamped) single-compartment model for one voxel.
pub fn model_cbf(diff: f64, m0: f64, e_pld: f64, label_duration: f64) -> f64 {
    let numerator = CBF_UNIT_SCALE * PARTITION_COEFFICIENT * diff * (e_pld / T1_BLOOD).exp();
    let denominator = 2.0
        * LABELING_EFFICIENCY
        * T1_BLOOD
        * m0
        * (1.0 - (-label_duration / T1_BLOOD).exp());
    numerator / denominator
}

/// Physiological sanity filter, applied in this exact order: non-finite
/// values (zero or near-zero M0) become 0, then negatives floor at 0, then
/// values above the ceiling saturate at 300. The sequence is idempotent.
pub fn sanitize(cbf: &mut Array3<f64>) {
    cbf.mapv_inplace(|v| {
        let v = if v.is_finite() { v } else { 0.0 };
        let v = if v < 0.0 { 0.0 } else { v };
        if v > CBF_CEILING {
            CBF_CEILING
        } else {
            v
        }
    });
}

fn quantify_slice(
    diff: &Array3<f64>,
    m0: &Array3<f64>,
    params: &PerfusionParams,
    slice: usize,
) -> Array2<f64> {
    let e_pld = params.effective_pld(slice);
    Zip::from(&diff.index_axis(Axis(2), slice))
        .and(&m0.index_axis(Axis(2), slice))
        .map_collect(|&d, &m| model_cbf(d, m, e_pld, params.label_duration))
}

/// Quantify a whole volume: the per-slice model, then the sanity filter.
///
/// Slices are independent (disjoint reads, disjoint writes), so they are
/// computed in parallel.
pub fn quantify(
    diff: &Array3<f64>,
    m0: &Array3<f64>,
    params: &PerfusionParams,
) -> Result<Array3<f64>> {
    if diff.dim() != m0.dim() {
        return Err(PerfuseError::GridMismatch {
            left: diff.dim(),
            right: m0.dim(),
        });
    }

    let (nx, ny, nz) = diff.dim();
    let slices: Vec<Array2<f64>> = (0..nz)
        .into_par_iter()
        .map(|k| quantify_slice(diff, m0, params, k))
        .collect();

    let mut cbf = Array3::<f64>::zeros((nx, ny, nz));
    for (k, slice) in slices.into_iter().enumerate() {
        cbf.index_axis_mut(Axis(2), k).assign(&slice);
    }

    sanitize(&mut cbf);
    Ok(cbf)
}
