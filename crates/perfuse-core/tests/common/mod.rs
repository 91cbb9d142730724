use ndarray::{Array3, Array4, Axis};

use perfuse_core::volume::{Affine, Series, Volume};

/// A 3D volume filled with one value, identity affine.
pub fn uniform_volume(dim: (usize, usize, usize), value: f64) -> Volume {
    Volume::new(Array3::from_elem(dim, value), Affine::identity())
}

/// A 4D series where frame `t` is uniformly `frames[t]`, identity affine.
pub fn uniform_series(dim: (usize, usize, usize), frames: &[f64]) -> Series {
    let (nx, ny, nz) = dim;
    let mut data = Array4::zeros((nx, ny, nz, frames.len()));
    for (t, &value) in frames.iter().enumerate() {
        data.index_axis_mut(Axis(3), t).fill(value);
    }
    Series::new(data, Affine::identity())
}
