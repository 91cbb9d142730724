use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::quant::PerfusionParams;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// M0 calibration volume (3D NIfTI).
    pub m0: PathBuf,
    /// Interleaved label/control pCASL series (4D NIfTI).
    pub pcasl: PathBuf,
    /// Destination for the CBF map; its registration transform lands next
    /// to it with a `.mat` extension.
    pub output: PathBuf,
    #[serde(default)]
    pub params: PerfusionParams,
    /// Wall-clock bound for each external tool invocation, applied by the
    /// caller when constructing the collaborator adapters.
    #[serde(default)]
    pub tool_timeout_secs: Option<u64>,
    /// Keep the intermediate work directory instead of deleting it.
    #[serde(default)]
    pub keep_workdir: bool,
}
