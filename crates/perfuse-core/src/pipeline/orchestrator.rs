use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{info, warn};

use crate::difference::label_control_difference;
use crate::error::{PerfuseError, Result};
use crate::external::{MotionCorrection, Registration};
use crate::io::nifti_io::{load_series, load_volume, save_series, save_volume};
use crate::quant::quantify;
use crate::scaling::resolve_scaling;
use crate::volume::Volume;

use super::config::PipelineConfig;
use super::types::{CbfResult, PipelineStage};

/// Where the registration transform is kept after the work directory is
/// gone: next to the output, `.mat` in place of the NIfTI extension.
fn transform_destination(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("cbf");
    let stem = name
        .strip_suffix(".nii.gz")
        .or_else(|| name.strip_suffix(".nii"))
        .unwrap_or(name);
    output.with_file_name(format!("{stem}.mat"))
}

/// Run the full quantification pipeline, notifying `observe` as each stage
/// begins.
///
/// Intermediates are persisted to a temporary work directory and reloaded
/// between stages, so each stage sees exactly what the external tools saw.
/// The directory is deleted on completion unless `config.keep_workdir` is
/// set.
pub fn run_pipeline_observed<F>(
    config: &PipelineConfig,
    motion: &dyn MotionCorrection,
    registration: &dyn Registration,
    mut observe: F,
) -> Result<CbfResult>
where
    F: FnMut(PipelineStage),
{
    let work = TempDir::new()?;
    let work_dir = work.path();

    observe(PipelineStage::Loading);
    let m0 = load_volume(&config.m0)?;
    let pcasl = load_series(&config.pcasl)?;
    info!(
        m0 = %config.m0.display(),
        pcasl = %config.pcasl.display(),
        frames = pcasl.n_frames(),
        "Inputs loaded"
    );

    // Reject malformed series up front, before any external tool runs.
    if pcasl.n_frames() == 0 {
        return Err(PerfuseError::EmptySeries);
    }
    if pcasl.n_frames() % 2 != 0 {
        return Err(PerfuseError::OddFrameCount {
            frames: pcasl.n_frames(),
        });
    }

    observe(PipelineStage::ResolvingScaling);
    let (m0_scaling, m0_diags) = resolve_scaling("M0", &m0.scaling);
    let (pcasl_scaling, pcasl_diags) = resolve_scaling("pCASL", &pcasl.scaling);
    let diagnostics = [m0_diags, pcasl_diags].concat();
    for diagnostic in &diagnostics {
        warn!(%diagnostic, "Inconsistent scanner scaling");
    }

    observe(PipelineStage::MotionCorrection);
    let raw_series_path = work_dir.join("asl4d.nii.gz");
    save_series(&pcasl, &raw_series_path)?;
    let realigned_path = motion.realign(&raw_series_path, work_dir)?;
    let realigned = load_series(&realigned_path)?;

    observe(PipelineStage::Registration);
    let m0_path = work_dir.join("m0.nii.gz");
    save_volume(&m0, &m0_path)?;
    let reference = realigned.temporal_mean()?;
    let reference_path = work_dir.join("asl3d.nii.gz");
    save_volume(&reference, &reference_path)?;
    let registered = registration.register(&m0_path, &reference_path, work_dir)?;
    let m0_registered = load_volume(&registered.volume)?;

    observe(PipelineStage::Differencing);
    let diff = label_control_difference(&realigned.data)?;

    observe(PipelineStage::Quantification);
    let cbf_data = quantify(&diff, &m0_registered.data, &config.params)?;
    let cbf = Volume::new(cbf_data, realigned.affine);

    observe(PipelineStage::Writing);
    save_volume(&cbf, &config.output)?;
    let transform = transform_destination(&config.output);
    fs::copy(&registered.transform, &transform)?;
    info!(
        output = %config.output.display(),
        transform = %transform.display(),
        "CBF map written"
    );

    if config.keep_workdir {
        let kept = work.into_path();
        info!(path = %kept.display(), "Keeping intermediate work directory");
    }

    Ok(CbfResult {
        cbf,
        transform,
        m0_scaling,
        pcasl_scaling,
        diagnostics,
    })
}

/// Run the full quantification pipeline without stage notifications.
pub fn run_pipeline(
    config: &PipelineConfig,
    motion: &dyn MotionCorrection,
    registration: &dyn Registration,
) -> Result<CbfResult> {
    run_pipeline_observed(config, motion, registration, |_stage| {})
}
