//! Linear-to-angular conversion (MOA / mrad) and the A-ZED distance.

use serde::{Deserialize, Serialize};
use shotgroup_core::{DistanceUnit, LinearUnit};

/// Width of the scoring zone used for A-ZED, in metres (IPSC A-zone).
pub const A_ZONE_WIDTH_M: f64 = 0.15;

const MOA_PER_RADIAN: f64 = (180.0 / std::f64::consts::PI) * 60.0;
const MRAD_PER_RADIAN: f64 = 1000.0;

/// Angle subtended by one linear unit at the target distance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngularFactors {
    pub moa: f64,
    pub mrad: f64,
}

/// A linear figure expressed in both angular units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Angle {
    pub moa: f64,
    pub mrad: f64,
}

/// A `[lower, upper]` interval expressed in both angular units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngularInterval {
    pub moa: [f64; 2],
    pub mrad: [f64; 2],
}

impl AngularFactors {
    #[inline]
    pub fn apply(&self, linear: f64) -> Angle {
        Angle {
            moa: linear * self.moa,
            mrad: linear * self.mrad,
        }
    }

    #[inline]
    pub fn apply_interval(&self, lower: f64, upper: f64) -> AngularInterval {
        AngularInterval {
            moa: [lower * self.moa, upper * self.moa],
            mrad: [lower * self.mrad, upper * self.mrad],
        }
    }
}

/// Per-unit angular factors, or `None` without a positive target distance.
///
/// A missing distance unit reads as metres.
pub fn angular_factors(
    data_units: LinearUnit,
    target_distance: Option<f64>,
    distance_units: Option<DistanceUnit>,
) -> Option<AngularFactors> {
    let distance = target_distance.filter(|d| *d > 0.0)?;
    let dist_meters = distance_units.unwrap_or_default().to_meters(distance);
    let rad = data_units.meters_per_unit() / dist_meters;
    Some(AngularFactors {
        moa: rad * MOA_PER_RADIAN,
        mrad: rad * MRAD_PER_RADIAN,
    })
}

/// Distance at which the R95 circle just fits inside the A-zone width,
/// reported in `distance_units` (metres when absent).
///
/// `None` when the target distance or R95 is not positive.
pub fn a_zed(
    r95: f64,
    data_units: LinearUnit,
    target_distance: f64,
    distance_units: Option<DistanceUnit>,
) -> Option<f64> {
    let units = distance_units.unwrap_or_default();
    let r95_meters = data_units.to_meters(r95);
    let target_meters = units.to_meters(target_distance);
    if !(target_meters > 0.0 && r95_meters > 0.0) {
        return None;
    }
    let r95_radians = r95_meters / target_meters;
    let a_zed_meters = A_ZONE_WIDTH_M / (2.0 * r95_radians);
    Some(units.from_meters(a_zed_meters))
}
