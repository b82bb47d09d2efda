use serde::Serialize;
use std::fmt;

use crate::SessionStats;

/// Vertical stringing whose R² on velocity exceeds this is attributed to
/// velocity spread.
const VELOCITY_CORRELATED_R2: f64 = 0.4;

/// Reading of a group's vertical dispersion against its velocity data.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DispersionDiagnosis {
    /// No vertical stringing.
    Nominal,
    VelocityCorrelated { r2: f64 },
    Uncorrelated { r2: f64 },
    /// Vertical stringing without enough velocities to correlate.
    NeedsVelocityData,
}

impl DispersionDiagnosis {
    pub fn from_stats(stats: &SessionStats) -> Self {
        if !stats.has_vertical_dispersion {
            return Self::Nominal;
        }
        match stats.vel_vert_r2 {
            Some(r2) if r2 > VELOCITY_CORRELATED_R2 => Self::VelocityCorrelated { r2 },
            Some(r2) => Self::Uncorrelated { r2 },
            None => Self::NeedsVelocityData,
        }
    }
}

impl fmt::Display for DispersionDiagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nominal => f.write_str("Nominal"),
            Self::VelocityCorrelated { r2 } => write!(
                f,
                "Vertical stringing correlates with velocity (R² = {:.1}%)",
                r2 * 100.0
            ),
            Self::Uncorrelated { r2 } => write!(
                f,
                "Vertical stringing present, but not strongly correlated to velocity (R² = {:.1}%)",
                r2 * 100.0
            ),
            Self::NeedsVelocityData => {
                f.write_str("Vertical stringing detected. Add velocity data to diagnose.")
            }
        }
    }
}
