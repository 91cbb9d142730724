//! Label/control differencing: collapse an interleaved 4D pCASL series into
//! one averaged 3D perfusion-weighted difference volume.

use ndarray::{Array3, Array4, Axis, Zip};

use crate::error::{PerfuseError, Result};

/// Compute the averaged label-minus-control difference of an interleaved
/// series (even indices = label, odd = control).
///
/// A pair's contribution at a voxel is zeroed when either the label or the
/// control value there is exactly 0.0 — the sensor-dropout convention of the
/// acquisition. Masked entries still count toward the mean's divisor, so a
/// voxel masked in every pair averages to 0.
pub fn label_control_difference(series: &Array4<f64>) -> Result<Array3<f64>> {
    let n_frames = series.len_of(Axis(3));
    if n_frames == 0 {
        return Err(PerfuseError::EmptySeries);
    }
    if n_frames % 2 != 0 {
        return Err(PerfuseError::OddFrameCount { frames: n_frames });
    }
    let n_pairs = n_frames / 2;

    let (nx, ny, nz, _) = series.dim();
    let mut sum = Array3::<f64>::zeros((nx, ny, nz));
    for pair in 0..n_pairs {
        let label = series.index_axis(Axis(3), 2 * pair);
        let control = series.index_axis(Axis(3), 2 * pair + 1);
        Zip::from(&mut sum)
            .and(&label)
            .and(&control)
            .for_each(|acc, &l, &c| {
                if l != 0.0 && c != 0.0 {
                    *acc += l - c;
                }
            });
    }
    sum /= n_pairs as f64;
    Ok(sum)
}
