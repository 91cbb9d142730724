//! Production adapters shelling out to FSL's MCFLIRT (motion correction)
//! and FLIRT (cross-modal registration).
//!
//! Any failure — launch error, non-zero exit, timeout — is fatal and never
//! retried; partial outputs of a failed invocation are never consumed.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::consts::TOOL_POLL_INTERVAL_MS;
use crate::error::{PerfuseError, Result};

use super::{MotionCorrection, Registered, Registration};

/// Run a command to completion, enforcing an optional wall-clock bound.
/// These tools can dominate the pipeline's latency, so the bound is
/// explicit rather than implied.
fn run_checked(mut cmd: Command, tool: &str, timeout: Option<Duration>) -> Result<()> {
    debug!(?cmd, tool, "invoking external tool");
    let start = Instant::now();
    let mut child = cmd.spawn().map_err(|e| PerfuseError::ExternalTool {
        tool: tool.to_string(),
        detail: format!("failed to launch: {e}"),
    })?;
    loop {
        match child.try_wait()? {
            Some(status) if status.success() => return Ok(()),
            Some(status) => {
                return Err(PerfuseError::ExternalTool {
                    tool: tool.to_string(),
                    detail: format!("exited with {status}"),
                })
            }
            None => {
                if let Some(limit) = timeout {
                    if start.elapsed() > limit {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(PerfuseError::ExternalTool {
                            tool: tool.to_string(),
                            detail: format!("timed out after {}s", limit.as_secs()),
                        });
                    }
                }
                std::thread::sleep(Duration::from_millis(TOOL_POLL_INTERVAL_MS));
            }
        }
    }
}

/// MCFLIRT motion correction, run with its default rigid-alignment policy.
#[derive(Clone, Debug)]
pub struct Mcflirt {
    pub binary: PathBuf,
    pub timeout: Option<Duration>,
}

impl Default for Mcflirt {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("mcflirt"),
            timeout: None,
        }
    }
}

impl MotionCorrection for Mcflirt {
    fn realign(&self, series: &Path, work_dir: &Path) -> Result<PathBuf> {
        let out_base = work_dir.join("realigned");
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-in").arg(series).arg("-out").arg(&out_base);
        run_checked(cmd, "mcflirt", self.timeout)?;
        Ok(out_base.with_extension("nii.gz"))
    }
}

/// FLIRT rigid/affine registration of a moving volume onto a reference.
#[derive(Clone, Debug)]
pub struct Flirt {
    pub binary: PathBuf,
    pub timeout: Option<Duration>,
}

impl Default for Flirt {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("flirt"),
            timeout: None,
        }
    }
}

impl Registration for Flirt {
    fn register(&self, moving: &Path, reference: &Path, work_dir: &Path) -> Result<Registered> {
        let volume = work_dir.join("m0_registered.nii.gz");
        let transform = work_dir.join("m0_registered.mat");
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-in")
            .arg(moving)
            .arg("-ref")
            .arg(reference)
            .arg("-out")
            .arg(&volume)
            .arg("-omat")
            .arg(&transform);
        run_checked(cmd, "flirt", self.timeout)?;
        Ok(Registered { volume, transform })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    #[test]
    fn success_passes_through() {
        assert!(run_checked(sh("true"), "true", None).is_ok());
    }

    #[test]
    fn nonzero_exit_is_fatal() {
        let err = run_checked(sh("false"), "false", None).unwrap_err();
        match err {
            PerfuseError::ExternalTool { tool, .. } => assert_eq!(tool, "false"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_binary_is_fatal() {
        let cmd = Command::new("definitely-not-a-real-binary-7f3a");
        let err = run_checked(cmd, "phantom", None).unwrap_err();
        assert!(matches!(err, PerfuseError::ExternalTool { .. }));
    }

    #[test]
    fn timeout_kills_and_reports() {
        let err = run_checked(sh("sleep 30"), "sleeper", Some(Duration::from_millis(300)))
            .unwrap_err();
        match err {
            PerfuseError::ExternalTool { detail, .. } => {
                assert!(detail.contains("timed out"), "detail: {detail}")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
