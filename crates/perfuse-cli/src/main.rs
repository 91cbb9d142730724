use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use perfuse_core::consts::{
    DEFAULT_LABEL_DURATION, DEFAULT_POST_LABEL_DELAY, DEFAULT_SLICE_DELAY,
};
use perfuse_core::external::fsl::{Flirt, Mcflirt};
use perfuse_core::pipeline::{run_pipeline_observed, PipelineConfig};
use perfuse_core::quant::PerfusionParams;

#[derive(Parser)]
#[command(name = "perfuse", about = "pCASL cerebral blood flow quantification")]
#[command(version)]
struct Cli {
    /// M0 calibration volume (3D NIfTI)
    m0: PathBuf,

    /// Interleaved label/control pCASL series (4D NIfTI)
    pcasl: PathBuf,

    /// Post-label delay in seconds
    #[arg(short = 'p', long = "pld", default_value_t = DEFAULT_POST_LABEL_DELAY)]
    post_label_delay: f64,

    /// Per-slice acquisition delay in seconds
    #[arg(short = 's', long = "slice-delay", default_value_t = DEFAULT_SLICE_DELAY)]
    slice_delay: f64,

    /// Labeling duration in seconds
    #[arg(short = 'l', long = "label-duration", default_value_t = DEFAULT_LABEL_DURATION)]
    label_duration: f64,

    /// Output CBF map path
    #[arg(short, long, default_value = "cbf.nii.gz")]
    output: PathBuf,

    /// Per-invocation timeout for mcflirt/flirt, in seconds
    #[arg(long)]
    tool_timeout: Option<u64>,

    /// Keep the intermediate work directory for inspection
    #[arg(long)]
    keep_workdir: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = PipelineConfig {
        m0: cli.m0.clone(),
        pcasl: cli.pcasl.clone(),
        output: cli.output.clone(),
        params: PerfusionParams {
            post_label_delay: cli.post_label_delay,
            slice_delay: cli.slice_delay,
            label_duration: cli.label_duration,
        },
        tool_timeout_secs: cli.tool_timeout,
        keep_workdir: cli.keep_workdir,
    };

    println!("Perfuse CBF Quantification");
    println!("  M0:             {}", config.m0.display());
    println!("  pCASL:          {}", config.pcasl.display());
    println!("  Output:         {}", config.output.display());
    println!("  PLD:            {:.3} s", config.params.post_label_delay);
    println!("  Slice delay:    {:.3} s", config.params.slice_delay);
    println!("  Label duration: {:.3} s", config.params.label_duration);
    if let Some(secs) = config.tool_timeout_secs {
        println!("  Tool timeout:   {secs} s");
    }
    println!();

    let timeout = config.tool_timeout_secs.map(Duration::from_secs);
    let motion = Mcflirt {
        timeout,
        ..Default::default()
    };
    let registration = Flirt {
        timeout,
        ..Default::default()
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = run_pipeline_observed(&config, &motion, &registration, |stage| {
        pb.set_message(stage.to_string());
    })?;

    pb.finish_with_message("Done");

    if !result.diagnostics.is_empty() {
        println!(
            "\n{} scaling inconsistenc{} detected; first-frame values were used",
            result.diagnostics.len(),
            if result.diagnostics.len() == 1 { "y" } else { "ies" }
        );
    }
    println!("\nCBF map saved to {}", config.output.display());
    println!("Transform saved to {}", result.transform.display());

    Ok(())
}
