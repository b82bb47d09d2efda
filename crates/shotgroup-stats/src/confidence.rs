use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative trust in a group's mean radius, from the bootstrap CI width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Relative CI width above which confidence is `Low`.
    pub const LOW_ABOVE: f64 = 0.75;
    /// Relative CI width below which confidence is `High`.
    pub const HIGH_BELOW: f64 = 0.35;

    /// Classify `(ci.upper - ci.lower) / mean_radius`.
    ///
    /// A NaN width (zero mean radius) lands on `Medium`.
    pub fn classify(relative_width: f64) -> Self {
        if relative_width > Self::LOW_ABOVE {
            Self::Low
        } else if relative_width < Self::HIGH_BELOW {
            Self::High
        } else {
            Self::Medium
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Presentation hint carried with the tier (red / yellow / green).
    pub fn color(self) -> &'static str {
        match self {
            Self::Low => "#ef4444",
            Self::Medium => "#eab308",
            Self::High => "#22c55e",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
