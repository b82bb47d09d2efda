use serde::{Deserialize, Serialize};

use crate::serde_util::lenient_f64;
use crate::LinearUnit;

/// One recorded impact, as an offset from the group's point of aim.
///
/// `x`/`y` are in `units`. Y grows downward (image convention); it is only
/// flipped when plotting.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub x: f64,
    pub y: f64,
    /// Measured velocity, if any. Non-numeric values in stored records read
    /// back as `None`.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub velocity: Option<f64>,
    #[serde(default = "fallback_units")]
    pub units: LinearUnit,
}

fn fallback_units() -> LinearUnit {
    LinearUnit::Units
}

impl Shot {
    pub fn new(x: f64, y: f64, units: LinearUnit) -> Self {
        Self {
            x,
            y,
            velocity: None,
            units,
        }
    }

    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// Velocity usable for statistics: present and finite.
    #[inline]
    pub fn valid_velocity(&self) -> Option<f64> {
        self.velocity.filter(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_velocities_are_not_valid() {
        let shot = Shot::new(0.0, 0.0, LinearUnit::Inches).with_velocity(f64::NAN);
        assert_eq!(shot.valid_velocity(), None);
        let shot = shot.with_velocity(2710.0);
        assert_eq!(shot.valid_velocity(), Some(2710.0));
    }

    #[test]
    fn stored_shot_tolerates_junk_velocity() {
        let shots: Vec<Shot> = serde_json::from_str(
            r#"[
                {"x": 0.1, "y": -0.2, "velocity": null, "units": "in"},
                {"x": 0.3, "y": 0.4, "velocity": "fast", "units": "in"},
                {"x": 0.5, "y": 0.6, "velocity": 2650.5, "units": "in"},
                {"x": 0.7, "y": 0.8}
            ]"#,
        )
        .expect("parse shots");

        let velocities: Vec<_> = shots.iter().map(|s| s.velocity).collect();
        assert_eq!(velocities, vec![None, None, Some(2650.5), None]);
        assert_eq!(shots[3].units, LinearUnit::Units);
    }
}
