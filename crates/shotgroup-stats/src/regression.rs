use serde::{Deserialize, Serialize};

/// Pearson correlation of a least-squares line fit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Regression {
    pub r: f64,
    pub r2: f64,
}

/// Correlation of `y` on `x` over `(x, y)` pairs.
///
/// Fewer than three points, or no spread on either axis, gives `r = r2 = 0`.
/// Sums are taken about the means, so a narrow spread on a large offset
/// (velocities a few thousandths apart) still correlates.
pub fn linear_regression(points: &[(f64, f64)]) -> Regression {
    let n = points.len();
    if n < 3 {
        return Regression::default();
    }

    let nf = n as f64;
    let (sum_x, sum_y) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), &(x, y)| (sx + x, sy + y));
    let (mean_x, mean_y) = (sum_x / nf, sum_y / nf);

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    let (mut max_x, mut max_y) = (0.0_f64, 0.0_f64);
    for &(x, y) in points {
        let (dx, dy) = (x - mean_x, y - mean_y);
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
        max_x = max_x.max(x.abs());
        max_y = max_y.max(y.abs());
    }

    if no_spread(sxx, max_x, nf) || no_spread(syy, max_y, nf) {
        return Regression::default();
    }

    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
    Regression { r, r2: r * r }
}

/// A constant column leaves deviations no larger than the rounding error of
/// its mean.
fn no_spread(sum_sq: f64, max_abs: f64, nf: f64) -> bool {
    let tol = 4.0 * f64::EPSILON * nf * max_abs;
    sum_sq <= nf * tol * tol
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perfect_line_has_unit_r2() {
        let pts: Vec<(f64, f64)> = [2650.0, 2675.5, 2690.0, 2712.25]
            .iter()
            .map(|&v| (v, 2.0 * v + 1.0))
            .collect();
        let reg = linear_regression(&pts);
        assert_relative_eq!(reg.r, 1.0, epsilon = 1e-9);
        assert_relative_eq!(reg.r2, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn narrow_spread_on_large_offset_still_correlates() {
        let pts: Vec<(f64, f64)> = [3000.000, 3000.001, 3000.002, 3000.003]
            .iter()
            .map(|&v| (v, 2.0 * v + 1.0))
            .collect();
        let reg = linear_regression(&pts);
        assert_relative_eq!(reg.r, 1.0, epsilon = 1e-6);
        assert_relative_eq!(reg.r2, 1.0, epsilon = 1e-6);

        let pts = [(3000.000, 0.3), (3000.001, 0.1), (3000.002, -0.1), (3000.003, -0.3)];
        assert_relative_eq!(linear_regression(&pts).r, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn falling_line_has_negative_r() {
        let pts = [(1.0, 3.0), (2.0, 1.0), (3.0, -1.0)];
        let reg = linear_regression(&pts);
        assert_relative_eq!(reg.r, -1.0, epsilon = 1e-12);
        assert_relative_eq!(reg.r2, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn constant_velocity_is_degenerate() {
        let pts = [(2712.3, 0.4), (2712.3, -0.1), (2712.3, 0.9), (2712.3, 0.2)];
        assert_eq!(linear_regression(&pts), Regression { r: 0.0, r2: 0.0 });
    }

    #[test]
    fn long_constant_velocity_run_is_degenerate() {
        let pts: Vec<(f64, f64)> = (0..50).map(|i| (2987.65, f64::from(i) * 0.01)).collect();
        assert_eq!(linear_regression(&pts), Regression::default());
    }

    #[test]
    fn constant_height_is_degenerate() {
        let pts = [(2700.0, 0.5), (2710.0, 0.5), (2690.0, 0.5)];
        assert_eq!(linear_regression(&pts), Regression::default());
    }

    #[test]
    fn too_few_points() {
        assert_eq!(linear_regression(&[(1.0, 2.0), (2.0, 4.0)]), Regression::default());
    }
}
