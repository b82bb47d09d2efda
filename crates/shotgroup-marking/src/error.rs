use shotgroup_core::CalibrationError;

/// Errors returned by marking-session edits.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MarkingError {
    #[error("scale distance must be a positive number, got {0}")]
    InvalidScaleDistance(f64),
    #[error("no group selected")]
    NoGroupSelected,
    #[error("group {index} out of range ({len} groups)")]
    GroupOutOfRange { index: usize, len: usize },
    #[error("impact {index} out of range in group {group}")]
    ImpactOutOfRange { group: usize, index: usize },
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
}

/// Errors reading or writing session records.
#[derive(thiserror::Error, Debug)]
pub enum RecordIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
