//! Overlay frame for plotting several sessions around their own MPI.

use serde::Serialize;
use shotgroup_core::{LinearUnit, Shot};
use shotgroup_stats::Mpi;

use crate::compare::SessionAnalysis;

/// Colors assigned to compared sessions, cycling.
pub const SESSION_COLORS: [&str; 6] = [
    "#22c55e", "#3b82f6", "#ef4444", "#eab308", "#a855f7", "#f97316",
];

const INCH_GRID: f64 = 1.0;
const METRIC_GRID: f64 = 25.0;
const VIEW_MARGIN: f64 = 1.2;

pub fn session_color(index: usize) -> &'static str {
    SESSION_COLORS[index % SESSION_COLORS.len()]
}

/// A point in plot space: centred on the MPI, Y up.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

/// One session's layer on the overlay.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotSeries {
    pub color: &'static str,
    pub mean_radius: f64,
    pub points: Vec<PlotPoint>,
}

/// Square view shared by all compared sessions, in the first session's
/// linear unit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotFrame {
    pub units: LinearUnit,
    pub grid_spacing: f64,
    /// Full width of the view.
    pub view_span: f64,
}

impl PlotFrame {
    /// Fit a frame around every shot's offset from its own session MPI.
    /// `None` when there is nothing to plot.
    pub fn fit(analyses: &[SessionAnalysis]) -> Option<Self> {
        let units = analyses.first()?.stats.raw.units;
        let grid_spacing = match units {
            LinearUnit::Inches => INCH_GRID,
            _ => METRIC_GRID,
        };

        let max_offset = analyses
            .iter()
            .flat_map(|a| {
                let mpi = a.stats.raw.mpi;
                a.shots
                    .iter()
                    .map(move |s| (s.x - mpi.x).hypot(s.y - mpi.y))
            })
            .fold(0.0_f64, f64::max);

        let mut view_span = (max_offset * 2.0 * VIEW_MARGIN / grid_spacing).ceil() * grid_spacing;
        if view_span == 0.0 {
            view_span = grid_spacing * 4.0;
        }

        Some(Self {
            units,
            grid_spacing,
            view_span,
        })
    }

    /// Scale for drawing the frame into `width` pixels.
    #[inline]
    pub fn pixels_per_unit(&self, width: f64) -> f64 {
        width / self.view_span
    }

    /// Grid line offsets from the centre on one side, excluding the axis.
    pub fn grid_offsets(&self) -> Vec<f64> {
        let half = self.view_span / 2.0;
        (1..)
            .map(|i| i as f64 * self.grid_spacing)
            .take_while(|&d| d < half)
            .collect()
    }

    /// Shot position relative to `mpi`, Y flipped to point up.
    #[inline]
    pub fn to_plot(shot: &Shot, mpi: Mpi) -> PlotPoint {
        PlotPoint {
            x: shot.x - mpi.x,
            y: -(shot.y - mpi.y),
        }
    }

    pub fn series(analyses: &[SessionAnalysis]) -> Vec<PlotSeries> {
        analyses
            .iter()
            .enumerate()
            .map(|(i, a)| PlotSeries {
                color: session_color(i),
                mean_radius: a.stats.raw.mean_radius,
                points: a
                    .shots
                    .iter()
                    .map(|s| Self::to_plot(s, a.stats.raw.mpi))
                    .collect(),
            })
            .collect()
    }
}
