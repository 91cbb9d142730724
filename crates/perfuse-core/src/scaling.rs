//! Scanner scaling metadata and the resolver that picks one representative
//! value per series when per-frame records disagree.

use serde::{Deserialize, Serialize};

/// Per-frame scanner scaling record: the triple some formats store once per
/// acquired frame. NIfTI inputs carry one header-wide pair, which the loader
/// replicates per frame (scale slope 1.0).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameScaling {
    pub scale_slope: f64,
    pub rescale_slope: f64,
    pub rescale_intercept: f64,
}

impl Default for FrameScaling {
    fn default() -> Self {
        Self {
            scale_slope: 1.0,
            rescale_slope: 1.0,
            rescale_intercept: 0.0,
        }
    }
}

/// The representative scaling selected for a whole series.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScalingParameters {
    pub scale_slope: f64,
    pub rescale_slope: f64,
    pub rescale_intercept: f64,
}

/// A per-field inconsistency found while resolving scaling. Informational:
/// the first frame's value was used, the run continues.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalingDiagnostic {
    /// Which input series the record came from ("M0", "pCASL").
    pub series: String,
    /// The disagreeing field.
    pub field: &'static str,
    /// How many distinct values were seen.
    pub distinct: usize,
}

impl std::fmt::Display for ScalingDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} distinct {} values for {}; using the first frame's",
            self.distinct, self.field, self.series
        )
    }
}

/// Count distinct values by exact bit pattern. Scanner metadata is either
/// copied verbatim across frames or genuinely different; no tolerance.
fn distinct_count(values: impl Iterator<Item = f64>) -> usize {
    let mut seen: Vec<u64> = Vec::new();
    for v in values {
        let bits = v.to_bits();
        if !seen.contains(&bits) {
            seen.push(bits);
        }
    }
    seen.len()
}

/// Select one `ScalingParameters` for a series from its per-frame records.
///
/// Never fails: if a field has more than one distinct value across frames,
/// the first frame's value is selected and a diagnostic is returned for the
/// caller to surface. An empty record list yields neutral scaling.
pub fn resolve_scaling(
    series: &str,
    frames: &[FrameScaling],
) -> (ScalingParameters, Vec<ScalingDiagnostic>) {
    let first = frames.first().copied().unwrap_or_default();
    let selected = ScalingParameters {
        scale_slope: first.scale_slope,
        rescale_slope: first.rescale_slope,
        rescale_intercept: first.rescale_intercept,
    };

    let fields: [(&'static str, fn(&FrameScaling) -> f64); 3] = [
        ("scale slope", |f| f.scale_slope),
        ("rescale slope", |f| f.rescale_slope),
        ("rescale intercept", |f| f.rescale_intercept),
    ];

    let mut diagnostics = Vec::new();
    for (name, get) in fields {
        let distinct = distinct_count(frames.iter().map(get));
        if distinct > 1 {
            diagnostics.push(ScalingDiagnostic {
                series: series.to_string(),
                field: name,
                distinct,
            });
        }
    }

    (selected, diagnostics)
}
