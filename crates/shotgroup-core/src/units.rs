use serde::{Deserialize, Serialize};
use std::fmt;

/// Linear unit a shot offset is measured in.
///
/// Unknown labels fall back to [`LinearUnit::Units`], which converts to
/// metres with a factor of 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LinearUnit {
    #[default]
    Inches,
    Millimeters,
    Units,
}

impl LinearUnit {
    pub const METERS_PER_INCH: f64 = 0.0254;
    pub const METERS_PER_MILLIMETER: f64 = 0.001;

    /// Parse a unit label (`"in"`, `"mm"`, anything else is `Units`).
    pub fn from_label(label: &str) -> Self {
        match label {
            "in" => Self::Inches,
            "mm" => Self::Millimeters,
            _ => Self::Units,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Inches => "in",
            Self::Millimeters => "mm",
            Self::Units => "units",
        }
    }

    /// Size of one unit in metres.
    #[inline]
    pub fn meters_per_unit(self) -> f64 {
        match self {
            Self::Inches => Self::METERS_PER_INCH,
            Self::Millimeters => Self::METERS_PER_MILLIMETER,
            Self::Units => 1.0,
        }
    }

    #[inline]
    pub fn to_meters(self, value: f64) -> f64 {
        value * self.meters_per_unit()
    }
}

impl fmt::Display for LinearUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for LinearUnit {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<LinearUnit> for String {
    fn from(value: LinearUnit) -> Self {
        value.label().to_owned()
    }
}

/// Unit of the shooter-to-target distance.
///
/// Anything that is not `"yards"` is read as metres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DistanceUnit {
    Yards,
    #[default]
    Meters,
}

impl DistanceUnit {
    pub const METERS_PER_YARD: f64 = 0.9144;

    pub fn from_label(label: &str) -> Self {
        match label {
            "yards" => Self::Yards,
            _ => Self::Meters,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Yards => "yards",
            Self::Meters => "meters",
        }
    }

    #[inline]
    pub fn to_meters(self, value: f64) -> f64 {
        match self {
            Self::Yards => value * Self::METERS_PER_YARD,
            Self::Meters => value,
        }
    }

    #[inline]
    pub fn from_meters(self, meters: f64) -> f64 {
        match self {
            Self::Yards => meters / Self::METERS_PER_YARD,
            Self::Meters => meters,
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for DistanceUnit {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<DistanceUnit> for String {
    fn from(value: DistanceUnit) -> Self {
        value.label().to_owned()
    }
}
