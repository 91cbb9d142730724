use ndarray::{Array3, Array4, Axis};
use nifti::NiftiHeader;

use crate::error::{PerfuseError, Result};
use crate::scaling::FrameScaling;

/// A 4x4 voxel-to-world spatial transform, row-major.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine(pub [[f64; 4]; 4]);

impl Affine {
    pub fn identity() -> Self {
        let mut m = [[0.0; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        Self(m)
    }

    /// Extract the affine from a NIfTI header: the sform rows when
    /// `sform_code > 0`, otherwise a pixdim diagonal.
    pub fn from_header(header: &NiftiHeader) -> Self {
        if header.sform_code > 0 {
            let rows = [header.srow_x, header.srow_y, header.srow_z];
            let mut m = [[0.0; 4]; 4];
            for (i, row) in rows.iter().enumerate() {
                for (j, v) in row.iter().enumerate() {
                    m[i][j] = *v as f64;
                }
            }
            m[3] = [0.0, 0.0, 0.0, 1.0];
            Self(m)
        } else {
            let mut m = [[0.0; 4]; 4];
            for (i, row) in m.iter_mut().enumerate().take(3) {
                row[i] = header.pixdim[i + 1] as f64;
            }
            m[3][3] = 1.0;
            Self(m)
        }
    }

    /// The three sform rows, as stored in a NIfTI header.
    pub fn srows(&self) -> [[f32; 4]; 3] {
        let mut rows = [[0.0f32; 4]; 3];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = self.0[i][j] as f32;
            }
        }
        rows
    }

    /// Voxel edge lengths: euclidean norms of the first three columns.
    pub fn voxel_sizes(&self) -> [f32; 3] {
        let mut sizes = [0.0f32; 3];
        for (j, size) in sizes.iter_mut().enumerate() {
            let norm_sq: f64 = (0..3).map(|i| self.0[i][j] * self.0[i][j]).sum();
            *size = norm_sq.sqrt() as f32;
        }
        sizes
    }
}

/// A single 3D image volume with its spatial transform and the scanner
/// scaling metadata it was loaded with.
#[derive(Clone, Debug)]
pub struct Volume {
    /// Voxel data, shape = (x, y, z), in physical intensity units.
    pub data: Array3<f64>,
    pub affine: Affine,
    pub scaling: Vec<FrameScaling>,
}

impl Volume {
    pub fn new(data: Array3<f64>, affine: Affine) -> Self {
        Self {
            data,
            affine,
            scaling: vec![FrameScaling::default()],
        }
    }

    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }
}

/// A 4D image series, time as the last axis. All frames share one affine.
#[derive(Clone, Debug)]
pub struct Series {
    /// Voxel data, shape = (x, y, z, t), in physical intensity units.
    pub data: Array4<f64>,
    pub affine: Affine,
    /// One scaling record per frame.
    pub scaling: Vec<FrameScaling>,
}

impl Series {
    pub fn new(data: Array4<f64>, affine: Affine) -> Self {
        let n_frames = data.len_of(Axis(3));
        Self {
            data,
            affine,
            scaling: vec![FrameScaling::default(); n_frames],
        }
    }

    pub fn n_frames(&self) -> usize {
        self.data.len_of(Axis(3))
    }

    /// Mean over the time axis, keeping the series' affine.
    pub fn temporal_mean(&self) -> Result<Volume> {
        let mean = self
            .data
            .mean_axis(Axis(3))
            .ok_or(PerfuseError::EmptySeries)?;
        Ok(Volume::new(mean, self.affine))
    }
}
