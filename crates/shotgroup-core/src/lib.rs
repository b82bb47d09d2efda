//! Core types and utilities for shot-group analysis.
//!
//! This crate is intentionally small and purely geometric. It knows how to
//! turn pixel clicks on a target photo into real-world offsets from a point
//! of aim, and which linear/distance units those offsets may carry. It does
//! *not* compute any statistics; see `shotgroup-stats` for that.

mod calibration;
mod logger;
pub mod serde_util;
mod shot;
mod units;

pub use calibration::{
    calibrate, to_unit_offset, Calibration, CalibrationError, PixelPoint, UnitOffset,
};
pub use shot::Shot;
pub use units::{DistanceUnit, LinearUnit};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
