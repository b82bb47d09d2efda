//! Serde adapters for the stored session layout.
//!
//! Saved sessions write pixel points as `{"x": .., "y": ..}` objects and
//! may carry `null`, strings or `NaN` where a velocity is expected.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PixelPoint;

#[derive(Serialize, Deserialize)]
struct Xy {
    x: f64,
    y: f64,
}

/// `Option<PixelPoint>` as `{x, y}` or `null`.
pub mod option_point_xy {
    use super::*;

    pub fn serialize<S: Serializer>(p: &Option<PixelPoint>, s: S) -> Result<S::Ok, S::Error> {
        p.map(|p| Xy { x: p.x, y: p.y }).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<PixelPoint>, D::Error> {
        Ok(Option::<Xy>::deserialize(d)?.map(|Xy { x, y }| PixelPoint::new(x, y)))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Other(IgnoredAny),
}

/// Read a finite number, mapping anything else (null, strings, objects) to
/// `None`.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawNumber::deserialize(deserializer)? {
        RawNumber::Number(v) if v.is_finite() => Some(v),
        _ => None,
    })
}
