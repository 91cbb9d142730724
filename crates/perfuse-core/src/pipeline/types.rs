use std::path::PathBuf;

use crate::scaling::{ScalingDiagnostic, ScalingParameters};
use crate::volume::Volume;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Loading,
    ResolvingScaling,
    MotionCorrection,
    Registration,
    Differencing,
    Quantification,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading inputs"),
            Self::ResolvingScaling => write!(f, "Resolving scanner scaling"),
            Self::MotionCorrection => write!(f, "Correcting motion"),
            Self::Registration => write!(f, "Registering M0"),
            Self::Differencing => write!(f, "Differencing label/control pairs"),
            Self::Quantification => write!(f, "Quantifying CBF"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// What a pipeline run produces, beyond the file written to disk.
#[derive(Clone, Debug)]
pub struct CbfResult {
    /// The sanitized CBF map, on the motion-corrected series' grid.
    pub cbf: Volume,
    /// Registration transform, copied next to the output for audit.
    pub transform: PathBuf,
    pub m0_scaling: ScalingParameters,
    pub pcasl_scaling: ScalingParameters,
    /// Scaling inconsistencies encountered; the run completed despite them.
    pub diagnostics: Vec<ScalingDiagnostic>,
}
