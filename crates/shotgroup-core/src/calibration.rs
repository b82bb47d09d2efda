//! Two-point scale calibration for target photos.
//!
//! The user clicks two points on the photo and types the real distance
//! between them. That fixes an isotropic scale, `pixels_per_unit`, which
//! turns pixel offsets from a point of aim into real-world offsets.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::serde_util::{lenient_f64, option_point_xy};
use crate::LinearUnit;

/// Pixel coordinates in image space (x right, y down).
pub type PixelPoint = Point2<f64>;

/// Signed offset from a point of aim, in calibrated units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitOffset {
    pub x: f64,
    pub y: f64,
}

/// Reasons a calibration attempt is rejected.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum CalibrationError {
    #[error("calibration points coincide (zero pixel distance)")]
    ZeroPixelDistance,
    #[error("real distance must be a positive number, got {0}")]
    InvalidRealDistance(f64),
    #[error("stored scale has neither a positive pixelsPerUnit nor two points and a distance")]
    MissingScale,
}

/// Session-scoped pixel-to-unit scale.
///
/// `pixels_per_unit` is always strictly positive. The reference points and
/// real distance are kept when known; stored sessions may carry a scale whose
/// points were cleared or overwritten by a later, abandoned attempt.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredCalibration", rename_all = "camelCase")]
pub struct Calibration {
    #[serde(with = "option_point_xy")]
    p1: Option<PixelPoint>,
    #[serde(with = "option_point_xy")]
    p2: Option<PixelPoint>,
    distance: Option<f64>,
    units: LinearUnit,
    pixels_per_unit: f64,
}

impl Calibration {
    pub fn p1(&self) -> Option<PixelPoint> {
        self.p1
    }

    pub fn p2(&self) -> Option<PixelPoint> {
        self.p2
    }

    /// Real-world length between `p1` and `p2`.
    pub fn distance(&self) -> Option<f64> {
        self.distance
    }

    pub fn units(&self) -> LinearUnit {
        self.units
    }

    #[inline]
    pub fn pixels_per_unit(&self) -> f64 {
        self.pixels_per_unit
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCalibration {
    #[serde(default, with = "option_point_xy")]
    p1: Option<PixelPoint>,
    #[serde(default, with = "option_point_xy")]
    p2: Option<PixelPoint>,
    #[serde(default, deserialize_with = "lenient_f64")]
    distance: Option<f64>,
    #[serde(default)]
    units: LinearUnit,
    #[serde(default, deserialize_with = "lenient_f64")]
    pixels_per_unit: Option<f64>,
}

impl TryFrom<StoredCalibration> for Calibration {
    type Error = CalibrationError;

    /// A positive stored `pixelsPerUnit` is authoritative; otherwise the
    /// scale is rebuilt from the points.
    fn try_from(raw: StoredCalibration) -> Result<Self, Self::Error> {
        if let Some(pixels_per_unit) = raw.pixels_per_unit.filter(|s| *s > 0.0) {
            return Ok(Calibration {
                p1: raw.p1,
                p2: raw.p2,
                distance: raw.distance,
                units: raw.units,
                pixels_per_unit,
            });
        }
        match (raw.p1, raw.p2, raw.distance) {
            (Some(p1), Some(p2), Some(distance)) => calibrate(p1, p2, distance, raw.units),
            _ => Err(CalibrationError::MissingScale),
        }
    }
}

/// Build a calibration from two clicked points and the real distance
/// between them.
pub fn calibrate(
    p1: PixelPoint,
    p2: PixelPoint,
    real_distance: f64,
    units: LinearUnit,
) -> Result<Calibration, CalibrationError> {
    let d = (p2 - p1).norm();
    if !real_distance.is_finite() || real_distance <= 0.0 {
        return Err(CalibrationError::InvalidRealDistance(real_distance));
    }
    if d.is_nan() || d <= 0.0 {
        return Err(CalibrationError::ZeroPixelDistance);
    }

    let pixels_per_unit = d / real_distance;
    log::debug!(
        "calibrated {d:.2} px over {real_distance} {units}: {pixels_per_unit:.4} px/{units}"
    );
    Ok(Calibration {
        p1: Some(p1),
        p2: Some(p2),
        distance: Some(real_distance),
        units,
        pixels_per_unit,
    })
}

/// Offset of `point` from `poa` in calibrated units. Y is not flipped.
#[inline]
pub fn to_unit_offset(
    point: PixelPoint,
    poa: PixelPoint,
    calibration: &Calibration,
) -> UnitOffset {
    let s = calibration.pixels_per_unit;
    UnitOffset {
        x: (point.x - poa.x) / s,
        y: (point.y - poa.y) / s,
    }
}
