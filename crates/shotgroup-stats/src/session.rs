//! Per-session statistics report.

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use shotgroup_core::{DistanceUnit, LinearUnit, Shot};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::angular::{a_zed, angular_factors, Angle, AngularInterval};
use crate::confidence::ConfidenceLevel;
use crate::dispersion::{
    centroid, extreme_spread, mean_radius, sample_std_dev, R95_FACTOR, VERTICAL_DISPERSION_RATIO,
};
use crate::regression::linear_regression;
use crate::resample::{bootstrap_mean_radius_ci, MeanRadiusCi, ResampleSource};

fn default_bootstrap_samples() -> usize {
    1000
}

/// Configuration for the statistics engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatsParams {
    /// Number of bootstrap resamples for the mean-radius CI.
    #[serde(default = "default_bootstrap_samples")]
    pub bootstrap_samples: usize,
    /// Fixed seed for the bootstrap; entropy-seeded when `None`.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for StatsParams {
    fn default() -> Self {
        Self {
            bootstrap_samples: default_bootstrap_samples(),
            seed: None,
        }
    }
}

/// Mean point of impact.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mpi {
    pub x: f64,
    pub y: f64,
}

/// Linear-unit figures kept for plotting.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RawStats {
    #[serde(rename = "meanRadius")]
    pub mean_radius: f64,
    pub units: LinearUnit,
    pub mpi: Mpi,
}

/// All dispersion figures in the group's linear unit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LinearStats {
    pub mean_radius: f64,
    pub r95: f64,
    pub group_size: f64,
    pub sd_x: f64,
    pub sd_y: f64,
    pub ci: MeanRadiusCi,
}

/// Angular figures; every field is `None` without a target distance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct AngularStats {
    pub mr: Option<Angle>,
    pub r95: Option<Angle>,
    pub gs: Option<Angle>,
    pub sd_x: Option<Angle>,
    pub sd_y: Option<Angle>,
    pub ci: Option<AngularInterval>,
    /// A-ZED distance in the session's distance unit.
    pub a_zed: Option<f64>,
}

/// Velocity figures over shots carrying a finite velocity.
#[derive(Default)]
struct VelocityStats {
    es: Option<f64>,
    sd: Option<f64>,
    vert_r2: Option<f64>,
}

/// Statistics for one session's shots. Recomputed on demand, never stored.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionStats {
    pub n: usize,
    pub raw: RawStats,
    pub linear: LinearStats,
    pub ang: AngularStats,
    #[serde(rename = "hasDistance")]
    pub has_distance: bool,
    pub vel_es: Option<f64>,
    pub vel_sd: Option<f64>,
    pub vel_vert_r2: Option<f64>,
    #[serde(rename = "hasVerticalDispersion")]
    pub has_vertical_dispersion: bool,
    pub confidence_level: ConfidenceLevel,
    pub confidence_color: &'static str,
    #[serde(rename = "distanceUnits")]
    pub distance_units: Option<DistanceUnit>,
}

impl SessionStats {
    /// `(ci.upper - ci.lower) / mean_radius`.
    pub fn relative_ci_width(&self) -> f64 {
        self.linear.ci.width() / self.linear.mean_radius
    }
}

/// Statistics engine with fixed parameters.
#[derive(Clone, Debug, Default)]
pub struct StatsEngine {
    params: StatsParams,
}

impl StatsEngine {
    pub fn new(params: StatsParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &StatsParams {
        &self.params
    }

    /// Compute session statistics, seeding the bootstrap from `params.seed`
    /// or from OS entropy.
    pub fn compute(
        &self,
        shots: &[Shot],
        target_distance: Option<f64>,
        distance_units: Option<DistanceUnit>,
    ) -> Option<SessionStats> {
        match self.params.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                self.compute_with_source(shots, target_distance, distance_units, &mut rng)
            }
            None => {
                let mut rng = rand::rng();
                self.compute_with_source(shots, target_distance, distance_units, &mut rng)
            }
        }
    }

    /// Compute session statistics drawing bootstrap indices from `source`.
    ///
    /// Returns `None` for fewer than two shots.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, shots, source), fields(n = shots.len()))
    )]
    pub fn compute_with_source<R>(
        &self,
        shots: &[Shot],
        target_distance: Option<f64>,
        distance_units: Option<DistanceUnit>,
        source: &mut R,
    ) -> Option<SessionStats>
    where
        R: ResampleSource + ?Sized,
    {
        let n = shots.len();
        if n < 2 {
            log::debug!("skipping stats for {n} shot(s)");
            return None;
        }
        // Mixed units within a session are not reconciled.
        let units = shots[0].units;

        let (mean_x, mean_y) = centroid(shots);
        let sd_x = sample_std_dev(shots.iter().map(|s| s.x), mean_x);
        let sd_y = sample_std_dev(shots.iter().map(|s| s.y), mean_y);
        let mr = mean_radius(shots, (mean_x, mean_y));
        let gs = extreme_spread(shots);
        let r95 = mr * R95_FACTOR;
        let has_vertical_dispersion = sd_y > sd_x * VERTICAL_DISPERSION_RATIO;

        let velocity = velocity_stats(shots);

        let ci = bootstrap_mean_radius_ci(shots, self.params.bootstrap_samples, source);
        let relative_width = ci.width() / mr;
        let confidence_level = ConfidenceLevel::classify(relative_width);

        let factors = angular_factors(units, target_distance, distance_units);
        let ang = match (factors, target_distance) {
            (Some(f), Some(distance)) => AngularStats {
                mr: Some(f.apply(mr)),
                r95: Some(f.apply(r95)),
                gs: Some(f.apply(gs)),
                sd_x: Some(f.apply(sd_x)),
                sd_y: Some(f.apply(sd_y)),
                ci: Some(f.apply_interval(ci.lower, ci.upper)),
                a_zed: a_zed(r95, units, distance, distance_units),
            },
            _ => AngularStats::default(),
        };

        log::debug!(
            "n={n} mr={mr:.4}{units} gs={gs:.4}{units} ci=[{:.4}, {:.4}] confidence={confidence_level}",
            ci.lower,
            ci.upper
        );

        Some(SessionStats {
            n,
            raw: RawStats {
                mean_radius: mr,
                units,
                mpi: Mpi {
                    x: mean_x,
                    y: mean_y,
                },
            },
            linear: LinearStats {
                mean_radius: mr,
                r95,
                group_size: gs,
                sd_x,
                sd_y,
                ci,
            },
            ang,
            has_distance: factors.is_some(),
            vel_es: velocity.es,
            vel_sd: velocity.sd,
            vel_vert_r2: velocity.vert_r2,
            has_vertical_dispersion,
            confidence_level,
            confidence_color: confidence_level.color(),
            distance_units,
        })
    }
}

fn velocity_stats(shots: &[Shot]) -> VelocityStats {
    let samples: Vec<(f64, f64)> = shots
        .iter()
        .filter_map(|s| s.valid_velocity().map(|v| (v, s.y)))
        .collect();
    let count = samples.len();
    let mut out = VelocityStats::default();

    if count >= 2 {
        let (min, max) = samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(v, _)| {
                (lo.min(v), hi.max(v))
            });
        let mean = samples.iter().map(|&(v, _)| v).sum::<f64>() / count as f64;
        out.es = Some(max - min);
        out.sd = Some(sample_std_dev(samples.iter().map(|&(v, _)| v), mean));
    }
    if count >= 3 {
        out.vert_r2 = Some(linear_regression(&samples).r2);
    }
    out
}

/// Compute session statistics with default parameters (1000 bootstrap
/// resamples, entropy-seeded).
pub fn compute_session_stats(
    shots: &[Shot],
    target_distance: Option<f64>,
    distance_units: Option<DistanceUnit>,
) -> Option<SessionStats> {
    StatsEngine::default().compute(shots, target_distance, distance_units)
}

/// Compute session statistics with `params`, seeding the bootstrap from
/// `params.seed` when set.
pub fn compute_session_stats_seeded(
    shots: &[Shot],
    target_distance: Option<f64>,
    distance_units: Option<DistanceUnit>,
    params: &StatsParams,
) -> Option<SessionStats> {
    StatsEngine::new(params.clone()).compute(shots, target_distance, distance_units)
}

/// Compute session statistics with `params`, drawing bootstrap indices from
/// `source`. `params.seed` is ignored.
pub fn compute_session_stats_with<R>(
    shots: &[Shot],
    target_distance: Option<f64>,
    distance_units: Option<DistanceUnit>,
    params: &StatsParams,
    source: &mut R,
) -> Option<SessionStats>
where
    R: ResampleSource + ?Sized,
{
    StatsEngine::new(params.clone()).compute_with_source(
        shots,
        target_distance,
        distance_units,
        source,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn plus_pattern() -> Vec<Shot> {
        [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)]
            .iter()
            .map(|&(x, y)| Shot::new(x, y, LinearUnit::Inches))
            .collect()
    }

    fn seeded(seed: u64) -> StatsEngine {
        StatsEngine::new(StatsParams {
            seed: Some(seed),
            ..StatsParams::default()
        })
    }

    #[test]
    fn fewer_than_two_shots_has_no_stats() {
        assert!(compute_session_stats(&[], None, None).is_none());
        let one = [Shot::new(0.5, 0.5, LinearUnit::Inches)];
        assert!(compute_session_stats(&one, Some(100.0), Some(DistanceUnit::Yards)).is_none());
    }

    #[test]
    fn plus_pattern_linear_figures() {
        let stats = seeded(1).compute(&plus_pattern(), None, None).expect("stats");
        assert_eq!(stats.n, 5);
        assert_eq!(stats.raw.units, LinearUnit::Inches);
        assert_eq!(stats.raw.mpi, Mpi { x: 0.0, y: 0.0 });
        assert_relative_eq!(stats.linear.sd_x, 0.5_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(stats.linear.sd_y, 0.5_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(stats.raw.mean_radius, 0.8, epsilon = 1e-12);
        assert_relative_eq!(stats.linear.group_size, 2.0);
        assert!(!stats.has_vertical_dispersion);
        assert!(!stats.has_distance);
        assert_eq!(stats.ang, AngularStats::default());
        assert_eq!(stats.vel_es, None);
        assert_eq!(stats.vel_sd, None);
        assert_eq!(stats.vel_vert_r2, None);
    }

    #[test]
    fn r95_is_a_fixed_multiple_of_mean_radius() {
        let stats = seeded(3).compute(&plus_pattern(), None, None).expect("stats");
        assert_eq!(stats.linear.r95, stats.linear.mean_radius * 1.953);
    }

    #[test]
    fn plus_pattern_at_100_yards() {
        let stats = seeded(11)
            .compute(&plus_pattern(), Some(100.0), Some(DistanceUnit::Yards))
            .expect("stats");
        assert!(stats.has_distance);
        assert_eq!(stats.distance_units, Some(DistanceUnit::Yards));

        let moa_per_inch = 0.0254 / (100.0 * 0.9144) * (180.0 / std::f64::consts::PI) * 60.0;
        let mr = stats.ang.mr.expect("mr");
        assert_relative_eq!(mr.moa, stats.raw.mean_radius * moa_per_inch, epsilon = 1e-12);
        assert_relative_eq!(mr.mrad / mr.moa, 1000.0 / 3437.746770784939, epsilon = 1e-9);

        let ci = stats.ang.ci.expect("ci");
        assert_relative_eq!(ci.moa[0], stats.linear.ci.lower * moa_per_inch, epsilon = 1e-12);
        assert_relative_eq!(ci.moa[1], stats.linear.ci.upper * moa_per_inch, epsilon = 1e-12);

        let r95_m = stats.linear.r95 * 0.0254;
        let expected_yards = 0.15 / (2.0 * (r95_m / 91.44)) / 0.9144;
        assert_relative_eq!(stats.ang.a_zed.expect("a-zed"), expected_yards, epsilon = 1e-9);
    }

    #[test]
    fn vertical_stringing_is_flagged() {
        let shots: Vec<Shot> = [(0.0, -1.5), (0.1, -0.5), (-0.1, 0.5), (0.0, 1.5)]
            .iter()
            .map(|&(x, y)| Shot::new(x, y, LinearUnit::Inches))
            .collect();
        let stats = seeded(5).compute(&shots, None, None).expect("stats");
        assert!(stats.has_vertical_dispersion);
    }

    #[test]
    fn velocity_statistics_need_enough_samples() {
        let mut shots = plus_pattern();
        shots[0].velocity = Some(2700.0);
        let stats = seeded(2).compute(&shots, None, None).expect("stats");
        assert_eq!((stats.vel_es, stats.vel_sd, stats.vel_vert_r2), (None, None, None));

        shots[1].velocity = Some(2710.0);
        shots[2].velocity = Some(f64::NAN);
        let stats = seeded(2).compute(&shots, None, None).expect("stats");
        assert_relative_eq!(stats.vel_es.expect("es"), 10.0);
        assert_relative_eq!(stats.vel_sd.expect("sd"), 50.0_f64.sqrt(), epsilon = 1e-12);
        assert_eq!(stats.vel_vert_r2, None);

        shots[3].velocity = Some(2690.0);
        let stats = seeded(2).compute(&shots, None, None).expect("stats");
        assert_relative_eq!(stats.vel_es.expect("es"), 20.0);
        assert_relative_eq!(stats.vel_sd.expect("sd"), 10.0, epsilon = 1e-12);
        assert!(stats.vel_vert_r2.is_some());
    }

    #[test]
    fn velocity_driven_vertical_gives_unit_r2() {
        let shots: Vec<Shot> = [2650.0, 2670.0, 2690.0, 2710.0]
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                Shot::new(0.05 * i as f64, 2.0 * (v - 2680.0) / 100.0 + 0.01, LinearUnit::Inches)
                    .with_velocity(v)
            })
            .collect();
        let stats = seeded(9).compute(&shots, None, None).expect("stats");
        assert_relative_eq!(stats.vel_vert_r2.expect("r2"), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn seeded_engine_is_reproducible() {
        let a = seeded(77).compute(&plus_pattern(), None, None).expect("stats");
        let b = seeded(77).compute(&plus_pattern(), None, None).expect("stats");
        assert_eq!(a, b);
        assert!(a.linear.ci.lower <= a.linear.ci.upper);
        assert_eq!(a.confidence_color, a.confidence_level.color());
    }

    #[test]
    fn identical_shots_classify_medium() {
        let shots = vec![Shot::new(0.5, -0.25, LinearUnit::Millimeters); 4];
        let stats = seeded(4).compute(&shots, None, None).expect("stats");
        assert_eq!(stats.raw.mean_radius, 0.0);
        assert_eq!(stats.confidence_level, ConfidenceLevel::Medium);
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let params: StatsParams = serde_json::from_str("{}").expect("params");
        assert_eq!(params, StatsParams::default());
        let params: StatsParams =
            serde_json::from_str(r#"{"bootstrap_samples": 200, "seed": 5}"#).expect("params");
        assert_eq!(params.bootstrap_samples, 200);
        assert_eq!(params.seed, Some(5));
    }

    struct FirstShot;

    impl ResampleSource for FirstShot {
        fn next_index(&mut self, _n: usize) -> usize {
            0
        }
    }

    #[test]
    fn free_functions_match_the_engine() {
        let params = StatsParams {
            bootstrap_samples: 300,
            seed: Some(21),
        };
        let engine = StatsEngine::new(params.clone());
        let expected = engine.compute(&plus_pattern(), Some(100.0), Some(DistanceUnit::Yards));
        assert!(expected.is_some());
        let seeded = compute_session_stats_seeded(
            &plus_pattern(),
            Some(100.0),
            Some(DistanceUnit::Yards),
            &params,
        );
        assert_eq!(seeded, expected);

        let mut rng = StdRng::seed_from_u64(21);
        assert_eq!(
            compute_session_stats_with(
                &plus_pattern(),
                Some(100.0),
                Some(DistanceUnit::Yards),
                &params,
                &mut rng
            ),
            expected
        );
    }

    #[test]
    fn injected_source_drives_the_interval() {
        let params = StatsParams::default();
        let stats =
            compute_session_stats_with(&plus_pattern(), None, None, &params, &mut FirstShot)
                .expect("stats");
        assert_eq!(stats.linear.ci.lower, 0.0);
        assert_eq!(stats.linear.ci.upper, 0.0);
        assert_relative_eq!(stats.linear.mean_radius, 0.8, epsilon = 1e-12);

        let source: &mut dyn ResampleSource = &mut FirstShot;
        let again = compute_session_stats_with(&plus_pattern(), None, None, &params, source);
        assert_eq!(again, Some(stats));
        let shots = plus_pattern();
        assert!(compute_session_stats_with(&shots[..1], None, None, &params, &mut FirstShot).is_none());
    }
}
