//! Shot-group dispersion statistics.
//!
//! The entry point is [`compute_session_stats`] (or a configured
//! [`StatsEngine`]): given the unit-space offsets of one session's shots and
//! an optional target distance, it reports
//!
//! - the mean point of impact and per-axis sample standard deviations,
//! - mean radius, extreme spread and the R95 estimate (`1.953 × MR`),
//! - a bootstrap 95% confidence interval on the mean radius together with a
//!   Low/Medium/High confidence tier,
//! - velocity extreme spread, SD and the R² of vertical position on velocity,
//! - MOA/mrad versions of the linear figures and the A-ZED distance.
//!
//! Everything here is a pure function of its inputs except the bootstrap
//! resampling, which draws from an injectable [`ResampleSource`].
//!
//! ```
//! use shotgroup_core::{DistanceUnit, LinearUnit, Shot};
//! use shotgroup_stats::{StatsEngine, StatsParams};
//!
//! let shots = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)]
//!     .map(|(x, y)| Shot::new(x, y, LinearUnit::Inches));
//! let engine = StatsEngine::new(StatsParams { seed: Some(7), ..StatsParams::default() });
//! let stats = engine
//!     .compute(&shots, Some(100.0), Some(DistanceUnit::Yards))
//!     .expect("two or more shots");
//! assert_eq!(stats.n, 5);
//! assert!(stats.has_distance);
//! ```

mod angular;
mod confidence;
mod diagnosis;
mod dispersion;
mod regression;
mod resample;
mod session;

pub use angular::{a_zed, angular_factors, Angle, AngularFactors, AngularInterval, A_ZONE_WIDTH_M};
pub use confidence::ConfidenceLevel;
pub use diagnosis::DispersionDiagnosis;
pub use dispersion::{
    centroid, extreme_spread, mean_radius, sample_std_dev, R95_FACTOR, VERTICAL_DISPERSION_RATIO,
};
pub use regression::{linear_regression, Regression};
pub use resample::{bootstrap_mean_radius_ci, MeanRadiusCi, ResampleSource};
pub use session::{
    compute_session_stats, compute_session_stats_seeded, compute_session_stats_with, AngularStats,
    LinearStats, Mpi, RawStats, SessionStats, StatsEngine, StatsParams,
};
