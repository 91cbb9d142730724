//! Deterministic no-op collaborators: motion correction that returns the
//! input unchanged and a registration that assumes the moving volume is
//! already on the reference grid. They let the quantification pipeline be
//! exercised without FSL installed and without the real tools'
//! nondeterminism.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

use super::{MotionCorrection, Registered, Registration};

#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityMotion;

impl MotionCorrection for IdentityMotion {
    fn realign(&self, series: &Path, work_dir: &Path) -> Result<PathBuf> {
        let out = work_dir.join("realigned.nii.gz");
        fs::copy(series, &out)?;
        Ok(out)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityRegistration;

impl Registration for IdentityRegistration {
    fn register(&self, moving: &Path, _reference: &Path, work_dir: &Path) -> Result<Registered> {
        let volume = work_dir.join("m0_registered.nii.gz");
        let transform = work_dir.join("m0_registered.mat");
        fs::copy(moving, &volume)?;
        // FLIRT's text matrix format: four whitespace-separated rows.
        fs::write(
            &transform,
            "1 0 0 0\n0 1 0 0\n0 0 1 0\n0 0 0 1\n",
        )?;
        Ok(Registered { volume, transform })
    }
}
