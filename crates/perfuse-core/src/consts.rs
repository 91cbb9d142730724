/// Blood-brain partition coefficient (lambda), in mL/g.
pub const PARTITION_COEFFICIENT: f64 = 0.9;

/// T1 relaxation time of arterial blood at 3T, in seconds.
pub const T1_BLOOD: f64 = 1.65;

/// Labeling efficiency (alpha) of a pCASL sequence.
pub const LABELING_EFFICIENCY: f64 = 0.85;

/// Unit conversion factor: mL/g/s to mL/100g/min.
pub const CBF_UNIT_SCALE: f64 = 6000.0;

/// Upper physiological bound for a CBF value, in mL/100g/min.
pub const CBF_CEILING: f64 = 300.0;

/// Default post-label delay, in seconds.
pub const DEFAULT_POST_LABEL_DELAY: f64 = 1.60;

/// Default per-slice acquisition delay, in seconds.
pub const DEFAULT_SLICE_DELAY: f64 = 0.039;

/// Default label duration, in seconds.
pub const DEFAULT_LABEL_DURATION: f64 = 1.65;

/// Polling interval while waiting on an external tool, in milliseconds.
pub const TOOL_POLL_INTERVAL_MS: u64 = 100;
