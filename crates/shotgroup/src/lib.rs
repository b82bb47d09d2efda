//! Shot-group analysis toolkit.
//!
//! This crate ties the workspace together:
//! - re-exports of the calibration types (`core`), the statistics engine
//!   (`stats`) and the marking session model (`marking`),
//! - [`compare_sessions`] for ranking saved sessions side by side,
//! - [`PlotFrame`] for overlaying several groups around their own MPI,
//! - the `shotgroup` binary (feature `cli`).
//!
//! ## Quickstart
//!
//! ```no_run
//! use shotgroup::marking::SessionRecord;
//! use shotgroup::stats::StatsParams;
//! use shotgroup::{compare_sessions, PlotFrame};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let records = vec![SessionRecord::load_json("session.json")?];
//! let analyses = compare_sessions(&records, &StatsParams::default());
//! for a in &analyses {
//!     println!("{}: MR {:.3}", a.session_name, a.stats.linear.mean_radius);
//! }
//! let frame = PlotFrame::fit(&analyses);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `shotgroup::core`: pixel points, units, shots, two-point calibration.
//! - `shotgroup::stats`: dispersion statistics, bootstrap CI, angular figures.
//! - `shotgroup::marking`: interactive marking state and saved session records.

pub use shotgroup_core as core;
pub use shotgroup_marking as marking;
pub use shotgroup_stats as stats;

pub use shotgroup_core::{calibrate, to_unit_offset, Calibration, LinearUnit, Shot};
pub use shotgroup_stats::{compute_session_stats, SessionStats, StatsParams};

mod compare;
mod plot;

pub use compare::{compare_sessions, session_name, SessionAnalysis};
pub use plot::{session_color, PlotFrame, PlotPoint, PlotSeries, SESSION_COLORS};
