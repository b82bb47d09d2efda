use serde::{Deserialize, Serialize};
use shotgroup_core::serde_util::{lenient_f64, option_point_xy};
use shotgroup_core::PixelPoint;

/// Colors assigned to new groups, cycling.
pub const GROUP_COLORS: [&str; 6] = [
    "#36A2EB", "#FFCE56", "#9966FF", "#FF9F40", "#f472b6", "#6b7280",
];

/// One clicked point of impact, in image pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkedImpact {
    pub x: f64,
    pub y: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub velocity: Option<f64>,
}

impl MarkedImpact {
    pub fn new(position: PixelPoint) -> Self {
        Self {
            x: position.x,
            y: position.y,
            velocity: None,
        }
    }

    #[inline]
    pub fn position(&self) -> PixelPoint {
        PixelPoint::new(self.x, self.y)
    }
}

/// A shot string fired at one point of aim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, with = "option_point_xy")]
    pub poa: Option<PixelPoint>,
    #[serde(default)]
    pub pois: Vec<MarkedImpact>,
    #[serde(default)]
    pub color: String,
}

/// Pixel-space summary shown while marking.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupSummary {
    pub shot_count: usize,
    /// Mean of the impacts; `None` for an empty group.
    pub mpi: Option<PixelPoint>,
}

impl Group {
    /// New empty group with the palette color for position `index`.
    pub fn with_palette_index(index: usize) -> Self {
        Self {
            poa: None,
            pois: Vec::new(),
            color: GROUP_COLORS[index % GROUP_COLORS.len()].to_owned(),
        }
    }

    pub fn summary(&self) -> GroupSummary {
        let shot_count = self.pois.len();
        let mpi = (shot_count > 0).then(|| {
            let n = shot_count as f64;
            let (sx, sy) = self
                .pois
                .iter()
                .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
            PixelPoint::new(sx / n, sy / n)
        });
        GroupSummary { shot_count, mpi }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_cycles() {
        assert_eq!(Group::with_palette_index(0).color, "#36A2EB");
        assert_eq!(Group::with_palette_index(6).color, "#36A2EB");
        assert_eq!(Group::with_palette_index(5).color, "#6b7280");
    }

    #[test]
    fn summary_reports_pixel_mpi() {
        let mut g = Group::with_palette_index(0);
        assert_eq!(g.summary().mpi, None);
        g.pois.push(MarkedImpact::new(PixelPoint::new(10.0, 20.0)));
        g.pois.push(MarkedImpact::new(PixelPoint::new(30.0, 40.0)));
        let s = g.summary();
        assert_eq!(s.shot_count, 2);
        assert_eq!(s.mpi, Some(PixelPoint::new(20.0, 30.0)));
    }

    #[test]
    fn stored_group_layout() {
        let g: Group = serde_json::from_str(
            r##"{"pois":[{"x":5.0,"y":6.0,"velocity":null},{"x":7.0,"y":8.0,"velocity":2710}],
                "poa":{"x":1.0,"y":2.0},"color":"#FFCE56","stats":{}}"##,
        )
        .expect("parse group");
        assert_eq!(g.poa, Some(PixelPoint::new(1.0, 2.0)));
        assert_eq!(g.pois[1].velocity, Some(2710.0));
        assert_eq!(g.pois[0].position(), PixelPoint::new(5.0, 6.0));
    }
}
