//! Linear dispersion measures over unit-space shots.

use shotgroup_core::Shot;

/// Rayleigh-derived multiplier turning mean radius into a 95% radius.
///
/// This is a fixed approximation, not an empirical quantile of the radii.
pub const R95_FACTOR: f64 = 1.953;

/// Vertical dispersion is flagged when `sd_y > sd_x * VERTICAL_DISPERSION_RATIO`.
pub const VERTICAL_DISPERSION_RATIO: f64 = 1.5;

/// Arithmetic mean of shot positions. Returns `(0, 0)` for an empty slice.
pub fn centroid(shots: &[Shot]) -> (f64, f64) {
    if shots.is_empty() {
        return (0.0, 0.0);
    }
    let n = shots.len() as f64;
    let (sx, sy) = shots
        .iter()
        .fold((0.0, 0.0), |(sx, sy), s| (sx + s.x, sy + s.y));
    (sx / n, sy / n)
}

/// Sample standard deviation (denominator `n - 1`) of `values` around `mean`.
pub fn sample_std_dev(values: impl IntoIterator<Item = f64>, mean: f64) -> f64 {
    let (count, sum_sq) = values
        .into_iter()
        .fold((0usize, 0.0), |(c, acc), v| (c + 1, acc + (v - mean).powi(2)));
    if count < 2 {
        return 0.0;
    }
    (sum_sq / (count - 1) as f64).sqrt()
}

/// Average Euclidean distance of the shots from `center`.
pub fn mean_radius(shots: &[Shot], center: (f64, f64)) -> f64 {
    if shots.is_empty() {
        return 0.0;
    }
    let (cx, cy) = center;
    let total: f64 = shots.iter().map(|s| (s.x - cx).hypot(s.y - cy)).sum();
    total / shots.len() as f64
}

/// Largest center-to-center distance over all shot pairs (group size).
pub fn extreme_spread(shots: &[Shot]) -> f64 {
    let mut max_spread = 0.0_f64;
    for (i, a) in shots.iter().enumerate() {
        for b in &shots[i + 1..] {
            let d = (a.x - b.x).hypot(a.y - b.y);
            if d > max_spread {
                max_spread = d;
            }
        }
    }
    max_spread
}
