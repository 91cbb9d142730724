use thiserror::Error;

#[derive(Error, Debug)]
pub enum PerfuseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("NIfTI error: {0}")]
    Nifti(#[from] nifti::NiftiError),

    #[error("{path}: expected a {expected}D volume, got {actual} dimensions")]
    WrongDimensionality {
        path: String,
        expected: usize,
        actual: usize,
    },

    #[error("label/control series has an odd number of frames ({frames})")]
    OddFrameCount { frames: usize },

    #[error("empty image series")]
    EmptySeries,

    #[error("voxel grid mismatch: {left:?} vs {right:?}")]
    GridMismatch {
        left: (usize, usize, usize),
        right: (usize, usize, usize),
    },

    #[error("{tool} failed: {detail}")]
    ExternalTool { tool: String, detail: String },
}

pub type Result<T> = std::result::Result<T, PerfuseError>;
