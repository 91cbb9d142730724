//! NIfTI file I/O.
//!
//! Volumes are read and written as f64 so that intermediates persisted
//! between pipeline stages survive a save/reload round trip exactly. The
//! affine travels in the sform rows; gzip is handled by the `nifti` crate
//! from the `.nii.gz` extension.

use std::path::Path;

use ndarray::{ArrayD, Axis, Ix3, Ix4};
use nifti::volume::ndarray::IntoNdArray;
use nifti::writer::WriterOptions;
use nifti::{NiftiHeader, NiftiObject, ReaderOptions};

use crate::error::{PerfuseError, Result};
use crate::scaling::FrameScaling;
use crate::volume::{Affine, Series, Volume};

fn read_dyn(path: &Path) -> Result<(ArrayD<f64>, NiftiHeader)> {
    let obj = ReaderOptions::new().read_file(path)?;
    let header = obj.header().clone();
    let data = obj.into_volume().into_ndarray::<f64>()?;
    Ok((data, header))
}

/// Drop trailing singleton axes until at most `ndim` remain. Scanners
/// commonly pad a 3D volume out to dim[0] = 4 with a single time point.
fn squeeze_to(mut data: ArrayD<f64>, ndim: usize) -> ArrayD<f64> {
    while data.ndim() > ndim && data.shape()[data.ndim() - 1] == 1 {
        let last = data.ndim() - 1;
        data = data.index_axis_move(Axis(last), 0);
    }
    data
}

/// The per-frame scaling record a NIfTI header amounts to. The header pair
/// applies to every frame alike, so frames replicate it; a zero slope means
/// "no scaling" by NIfTI convention.
fn header_scaling(header: &NiftiHeader) -> FrameScaling {
    FrameScaling {
        scale_slope: 1.0,
        rescale_slope: if header.scl_slope == 0.0 {
            1.0
        } else {
            header.scl_slope as f64
        },
        rescale_intercept: header.scl_inter as f64,
    }
}

/// Load a 3D volume. Voxel values arrive in physical units (the `nifti`
/// crate applies header scaling during conversion).
pub fn load_volume(path: &Path) -> Result<Volume> {
    let (data, header) = read_dyn(path)?;
    let data = squeeze_to(data, 3);
    let actual = data.ndim();
    let data = data
        .into_dimensionality::<Ix3>()
        .map_err(|_| PerfuseError::WrongDimensionality {
            path: path.display().to_string(),
            expected: 3,
            actual,
        })?;
    Ok(Volume {
        data,
        affine: Affine::from_header(&header),
        scaling: vec![header_scaling(&header)],
    })
}

/// Load a 4D series, time as the last axis.
pub fn load_series(path: &Path) -> Result<Series> {
    let (data, header) = read_dyn(path)?;
    let data = squeeze_to(data, 4);
    let actual = data.ndim();
    let data = data
        .into_dimensionality::<Ix4>()
        .map_err(|_| PerfuseError::WrongDimensionality {
            path: path.display().to_string(),
            expected: 4,
            actual,
        })?;
    let n_frames = data.len_of(Axis(3));
    Ok(Series {
        data,
        affine: Affine::from_header(&header),
        scaling: vec![header_scaling(&header); n_frames],
    })
}

/// A fresh output header: neutral scaling, affine in the sform rows.
fn header_for(affine: &Affine) -> NiftiHeader {
    let mut header = NiftiHeader::default();
    let vs = affine.voxel_sizes();
    header.pixdim = [1.0, vs[0], vs[1], vs[2], 1.0, 1.0, 1.0, 1.0];
    header.scl_slope = 1.0;
    header.scl_inter = 0.0;
    header.sform_code = 1;
    header.qform_code = 0;
    let rows = affine.srows();
    header.srow_x = rows[0];
    header.srow_y = rows[1];
    header.srow_z = rows[2];
    header
}

pub fn save_volume(volume: &Volume, path: &Path) -> Result<()> {
    let header = header_for(&volume.affine);
    WriterOptions::new(path)
        .reference_header(&header)
        .write_nifti(&volume.data)?;
    Ok(())
}

pub fn save_series(series: &Series, path: &Path) -> Result<()> {
    let header = header_for(&series.affine);
    WriterOptions::new(path)
        .reference_header(&header)
        .write_nifti(&series.data)?;
    Ok(())
}
