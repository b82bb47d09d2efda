//! Bootstrap confidence interval on the mean radius.

use serde::{Deserialize, Serialize};
use shotgroup_core::Shot;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Source of uniform resampling indices.
///
/// Every [`rand::Rng`] is a source; tests can supply scripted sequences.
pub trait ResampleSource {
    /// Uniform index in `[0, n)`. Callers guarantee `n > 0`.
    fn next_index(&mut self, n: usize) -> usize;
}

impl<R: rand::Rng + ?Sized> ResampleSource for R {
    #[inline]
    fn next_index(&mut self, n: usize) -> usize {
        self.random_range(0..n)
    }
}

/// Empirical 95% interval of bootstrap mean radii.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeanRadiusCi {
    pub lower: f64,
    pub upper: f64,
}

impl MeanRadiusCi {
    #[inline]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Resample `shots` with replacement `samples` times and take the 2.5th and
/// 97.5th percentiles of the resampled mean radii.
///
/// Each resample's mean and mean radius divide by the original shot count.
/// Fewer than two shots (or zero samples) yield `{0, 0}`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(shots, rng), fields(n = shots.len()))
)]
pub fn bootstrap_mean_radius_ci<R>(shots: &[Shot], samples: usize, rng: &mut R) -> MeanRadiusCi
where
    R: ResampleSource + ?Sized,
{
    let n = shots.len();
    if n < 2 || samples == 0 {
        return MeanRadiusCi::default();
    }

    let nf = n as f64;
    let mut picks = vec![0usize; n];
    let mut radii = Vec::with_capacity(samples);

    for _ in 0..samples {
        for slot in picks.iter_mut() {
            *slot = rng.next_index(n);
        }

        let (sx, sy) = picks
            .iter()
            .fold((0.0, 0.0), |(sx, sy), &i| (sx + shots[i].x, sy + shots[i].y));
        let (mx, my) = (sx / nf, sy / nf);
        let total: f64 = picks
            .iter()
            .map(|&i| (shots[i].x - mx).hypot(shots[i].y - my))
            .sum();
        radii.push(total / nf);
    }

    radii.sort_by(f64::total_cmp);
    let lower_index = (samples as f64 * 0.025).floor() as usize;
    let upper_index = (samples as f64 * 0.975).floor() as usize;

    MeanRadiusCi {
        lower: radii[lower_index],
        upper: radii[upper_index],
    }
}
