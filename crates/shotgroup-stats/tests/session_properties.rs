use approx::assert_relative_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};
use shotgroup_core::{DistanceUnit, LinearUnit, Shot};
use shotgroup_stats::{
    compute_session_stats, ConfidenceLevel, ResampleSource, StatsEngine, StatsParams,
};

/// Replays a fixed index script, wrapping around.
struct Scripted {
    indices: Vec<usize>,
    calls: usize,
}

impl ResampleSource for Scripted {
    fn next_index(&mut self, n: usize) -> usize {
        let idx = self.indices[self.calls % self.indices.len()];
        self.calls += 1;
        assert!(idx < n, "scripted index {idx} out of range for n={n}");
        idx
    }
}

fn random_group(rng: &mut StdRng, n: usize, spread: f64) -> Vec<Shot> {
    (0..n)
        .map(|_| {
            let x = rng.random_range(-spread..spread);
            let y = rng.random_range(-spread..spread);
            Shot::new(x, y, LinearUnit::Millimeters).with_velocity(rng.random_range(780.0..800.0))
        })
        .collect()
}

#[test]
fn random_groups_satisfy_dispersion_invariants() {
    let mut rng = StdRng::seed_from_u64(2024);
    let engine = StatsEngine::new(StatsParams {
        bootstrap_samples: 300,
        seed: Some(99),
    });

    for n in 2..14 {
        let shots = random_group(&mut rng, n, 20.0);
        let stats = engine
            .compute(&shots, Some(100.0), Some(DistanceUnit::Meters))
            .expect("n >= 2");

        let lin = stats.linear;
        assert_eq!(stats.n, n);
        assert!(lin.mean_radius >= 0.0);
        assert!(lin.group_size >= 0.0);
        assert_eq!(lin.r95, lin.mean_radius * 1.953);

        let mpi = stats.raw.mpi;
        for s in &shots {
            assert!(lin.group_size + 1e-9 >= (s.x - mpi.x).hypot(s.y - mpi.y));
        }

        assert!(lin.ci.lower <= lin.ci.upper);
        assert!(lin.ci.lower >= 0.0);
        assert!(lin.ci.upper <= 2.0 * lin.group_size + 1e-9);

        for angle in [stats.ang.mr, stats.ang.r95, stats.ang.gs, stats.ang.sd_x, stats.ang.sd_y] {
            let angle = angle.expect("distance given");
            if angle.moa > 0.0 {
                assert_relative_eq!(
                    angle.mrad / angle.moa,
                    1000.0 / 3437.746770784939,
                    epsilon = 1e-9
                );
            }
        }
    }
}

#[test]
fn scripted_source_drives_the_interval() {
    // Every resample draws shots 0 and 1 only: the CI collapses onto their
    // half-distance.
    let shots = vec![
        Shot::new(0.0, 0.0, LinearUnit::Inches),
        Shot::new(2.0, 0.0, LinearUnit::Inches),
        Shot::new(5.0, 5.0, LinearUnit::Inches),
        Shot::new(-4.0, 1.0, LinearUnit::Inches),
    ];
    let mut src = Scripted {
        indices: vec![0, 1],
        calls: 0,
    };
    let engine = StatsEngine::new(StatsParams {
        bootstrap_samples: 25,
        seed: None,
    });
    let stats = engine
        .compute_with_source(&shots, None, None, &mut src)
        .expect("stats");

    assert_eq!(src.calls, 25 * shots.len());
    assert_relative_eq!(stats.linear.ci.lower, 1.0, epsilon = 1e-12);
    assert_relative_eq!(stats.linear.ci.upper, 1.0, epsilon = 1e-12);
    // Zero width: a tight interval reads as high confidence.
    assert_eq!(stats.confidence_level, ConfidenceLevel::High);
    assert_eq!(stats.confidence_color, "#22c55e");
}

#[test]
fn wide_interval_reads_as_low_confidence() {
    // Alternate between an all-same resample (MR 0) and the identity
    // resample (MR of the whole group): lower = 0, upper = full MR.
    let shots = vec![
        Shot::new(-1.0, 0.0, LinearUnit::Inches),
        Shot::new(1.0, 0.0, LinearUnit::Inches),
        Shot::new(0.0, 1.0, LinearUnit::Inches),
    ];
    let mut script = Vec::new();
    for _ in 0..10 {
        script.extend([0, 0, 0]);
        script.extend([0, 1, 2]);
    }
    let mut src = Scripted {
        indices: script,
        calls: 0,
    };
    let stats = StatsEngine::new(StatsParams {
        bootstrap_samples: 20,
        seed: None,
    })
    .compute_with_source(&shots, None, None, &mut src)
    .expect("stats");

    assert_eq!(stats.linear.ci.lower, 0.0);
    assert_relative_eq!(stats.linear.ci.upper, stats.raw.mean_radius, epsilon = 1e-12);
    assert!(stats.relative_ci_width() > 0.75);
    assert_eq!(stats.confidence_level, ConfidenceLevel::Low);
}

#[test]
fn report_serializes_with_stored_field_names() {
    let shots = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)]
        .map(|(x, y)| Shot::new(x, y, LinearUnit::Inches));
    let stats =
        compute_session_stats(&shots, Some(100.0), Some(DistanceUnit::Yards)).expect("stats");
    let json = serde_json::to_value(&stats).expect("serialize");

    assert_eq!(json["n"], 5);
    assert_eq!(json["raw"]["units"], "in");
    assert!(json["raw"]["meanRadius"].is_number());
    assert_eq!(json["hasDistance"], true);
    assert_eq!(json["hasVerticalDispersion"], false);
    assert_eq!(json["distanceUnits"], "yards");
    assert!(json["ang"]["ci"]["moa"].is_array());
    assert!(json["vel_sd"].is_null());
}
