//! Capability interfaces for the two irreversible external collaborators
//! the pipeline depends on. Production adapters shell out to FSL; the
//! identity implementations are deterministic stand-ins for tests and dry
//! runs.

pub mod fsl;
pub mod identity;

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Output of a cross-modal registration: the resampled volume and the
/// transform that produced it, kept for audit/reuse.
#[derive(Clone, Debug)]
pub struct Registered {
    pub volume: PathBuf,
    pub transform: PathBuf,
}

/// Aligns every frame of a 4D series to a common reference frame. The
/// collaborator chooses the reference; output dimensions match the input.
pub trait MotionCorrection {
    fn realign(&self, series: &Path, work_dir: &Path) -> Result<PathBuf>;
}

/// Resamples a moving 3D volume onto a fixed reference's voxel grid by
/// rigid/affine registration. The cost function is the collaborator's.
pub trait Registration {
    fn register(&self, moving: &Path, reference: &Path, work_dir: &Path) -> Result<Registered>;
}
