mod common;

use ndarray::Array3;
use tempfile::TempDir;

use common::{uniform_series, uniform_volume};
use perfuse_core::error::PerfuseError;
use perfuse_core::io::nifti_io::{load_series, load_volume, save_series, save_volume};
use perfuse_core::volume::{Affine, Volume};

fn anisotropic_affine() -> Affine {
    Affine([
        [2.0, 0.0, 0.0, -10.0],
        [0.0, 2.5, 0.0, -12.0],
        [0.0, 0.0, 3.0, 8.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

#[test]
fn volume_roundtrip_preserves_data_and_affine() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vol.nii.gz");

    let mut data = Array3::from_elem((4, 3, 2), 1.5);
    data[[2, 1, 0]] = 42.0;
    let volume = Volume::new(data.clone(), anisotropic_affine());

    save_volume(&volume, &path).unwrap();
    let loaded = load_volume(&path).unwrap();

    assert_eq!(loaded.data, data);
    assert_eq!(loaded.affine, anisotropic_affine());
}

#[test]
fn series_roundtrip_preserves_frames() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("series.nii.gz");

    let series = uniform_series((3, 3, 2), &[100.0, 40.0, 90.0, 50.0]);
    save_series(&series, &path).unwrap();
    let loaded = load_series(&path).unwrap();

    assert_eq!(loaded.n_frames(), 4);
    assert_eq!(loaded.data, series.data);
}

#[test]
fn a_4d_file_is_not_a_volume() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("series.nii.gz");
    save_series(&uniform_series((2, 2, 2), &[1.0, 2.0]), &path).unwrap();

    let err = load_volume(&path).unwrap_err();
    assert!(matches!(
        err,
        PerfuseError::WrongDimensionality {
            expected: 3,
            actual: 4,
            ..
        }
    ));
}

#[test]
fn trailing_singleton_time_axis_is_squeezed() {
    // Scanners often export a 3D volume padded to 4D with one time point.
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("padded.nii.gz");
    save_series(&uniform_series((4, 3, 2), &[7.0]), &path).unwrap();

    let loaded = load_volume(&path).unwrap();
    assert_eq!(loaded.dim(), (4, 3, 2));
    assert!(loaded.data.iter().all(|&v| v == 7.0));
}

#[test]
fn a_3d_file_is_not_a_series() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vol.nii.gz");
    save_volume(&uniform_volume((2, 2, 2), 5.0), &path).unwrap();

    let err = load_series(&path).unwrap_err();
    assert!(matches!(
        err,
        PerfuseError::WrongDimensionality {
            expected: 4,
            actual: 3,
            ..
        }
    ));
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(load_volume(&dir.path().join("absent.nii.gz")).is_err());
}

#[test]
fn loaded_headers_carry_neutral_scaling() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vol.nii.gz");
    save_volume(&uniform_volume((2, 2, 2), 5.0), &path).unwrap();

    let loaded = load_volume(&path).unwrap();
    assert_eq!(loaded.scaling.len(), 1);
    assert_eq!(loaded.scaling[0].rescale_slope, 1.0);
    assert_eq!(loaded.scaling[0].rescale_intercept, 0.0);
}
