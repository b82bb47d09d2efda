//! Interactive marking state.

use rand::Rng;
use shotgroup_core::{
    calibrate, to_unit_offset, Calibration, CalibrationError, LinearUnit, PixelPoint, Shot,
    UnitOffset,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::error::MarkingError;
use crate::group::{Group, GroupSummary, MarkedImpact};
use crate::record::AnalysisShot;

const ZOOM_STEP: f64 = 1.2;
const MIN_ZOOM: f64 = 0.1;
/// Click radius for deleting an impact, in screen pixels at zoom 1.
const DELETE_RADIUS_PX: f64 = 10.0;

/// What the next click on the image does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkingMode {
    ScaleFirstPoint,
    ScaleSecondPoint,
    Poa,
    Poi,
    DeletePoi,
}

/// Effect of a click.
#[derive(Clone, Debug, PartialEq)]
pub enum ClickOutcome {
    /// No tool active, or the tool needs a selected group.
    Ignored,
    ScaleFirstPoint,
    Calibrated(Calibration),
    /// The scale attempt was discarded; any earlier calibration is kept.
    CalibrationRejected(CalibrationError),
    PoaSet { group: usize },
    ImpactAdded { group: usize, index: usize },
    ImpactDeleted { group: usize, index: usize },
    NothingToDelete,
}

#[derive(Clone, Debug, Default)]
struct PendingScale {
    distance: f64,
    units: LinearUnit,
    p1: Option<PixelPoint>,
}

/// Marking state for one target photo.
#[derive(Clone, Debug)]
pub struct MarkingSession {
    id: String,
    calibration: Option<Calibration>,
    pending_scale: Option<PendingScale>,
    groups: Vec<Group>,
    current_group: Option<usize>,
    mode: Option<MarkingMode>,
    zoom: f64,
}

/// Random URL-safe session id (32 hex digits).
pub fn generate_session_id<R: Rng>(rng: &mut R) -> String {
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

impl MarkingSession {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            calibration: None,
            pending_scale: None,
            groups: Vec::new(),
            current_group: None,
            mode: None,
            zoom: 1.0,
        }
    }

    /// New session with a freshly generated id.
    pub fn start() -> Self {
        Self::new(generate_session_id(&mut rand::rng()))
    }

    /// Rebuild a session from stored parts, selecting the first group.
    pub fn restore(
        id: impl Into<String>,
        calibration: Option<Calibration>,
        groups: Vec<Group>,
    ) -> Self {
        let current_group = (!groups.is_empty()).then_some(0);
        Self {
            calibration,
            groups,
            current_group,
            ..Self::new(id)
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn current_group(&self) -> Option<usize> {
        self.current_group
    }

    pub fn mode(&self) -> Option<MarkingMode> {
        self.mode
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// First scale point clicked so far, while calibrating.
    pub fn pending_scale_point(&self) -> Option<PixelPoint> {
        self.pending_scale.as_ref().and_then(|p| p.p1)
    }

    /// Start the two-click scale tool, or cancel it when already active.
    pub fn begin_scale(&mut self, distance: f64, units: LinearUnit) -> Result<(), MarkingError> {
        if matches!(
            self.mode,
            Some(MarkingMode::ScaleFirstPoint | MarkingMode::ScaleSecondPoint)
        ) {
            self.mode = None;
            self.pending_scale = None;
            return Ok(());
        }
        if !distance.is_finite() || distance <= 0.0 {
            return Err(MarkingError::InvalidScaleDistance(distance));
        }
        self.pending_scale = Some(PendingScale {
            distance,
            units,
            p1: None,
        });
        self.mode = Some(MarkingMode::ScaleFirstPoint);
        Ok(())
    }

    /// Append a group, select it and arm the POA tool.
    pub fn add_group(&mut self) -> usize {
        let index = self.groups.len();
        self.groups.push(Group::with_palette_index(index));
        self.current_group = Some(index);
        self.mode = Some(MarkingMode::Poa);
        index
    }

    pub fn select_group(&mut self, index: usize) -> Result<(), MarkingError> {
        if index >= self.groups.len() {
            return Err(MarkingError::GroupOutOfRange {
                index,
                len: self.groups.len(),
            });
        }
        self.current_group = Some(index);
        Ok(())
    }

    /// Remove the selected group; the selection moves to the new last
    /// group when it falls off the end.
    pub fn delete_current_group(&mut self) -> Result<Group, MarkingError> {
        let index = self.current_group.ok_or(MarkingError::NoGroupSelected)?;
        let removed = self.groups.remove(index);
        if index >= self.groups.len() {
            self.current_group = self.groups.len().checked_sub(1);
        }
        if self.groups.is_empty() {
            self.mode = None;
        }
        Ok(removed)
    }

    /// Toggle the POA tool. Needs a selected group.
    pub fn toggle_poa(&mut self) -> Result<(), MarkingError> {
        if self.mode == Some(MarkingMode::Poa) {
            self.mode = None;
            return Ok(());
        }
        if self.current_group.is_none() {
            return Err(MarkingError::NoGroupSelected);
        }
        self.mode = Some(MarkingMode::Poa);
        Ok(())
    }

    /// Toggle the POI tool, creating a group first when none is selected.
    pub fn toggle_poi(&mut self) {
        if self.mode == Some(MarkingMode::Poi) {
            self.mode = None;
            return;
        }
        if self.current_group.is_none() {
            self.add_group();
        }
        self.mode = Some(MarkingMode::Poi);
    }

    /// Toggle a tool by mode. Scale modes only cancel an active scale
    /// tool; starting one goes through [`Self::begin_scale`].
    pub fn toggle_mode(&mut self, mode: MarkingMode) -> Result<(), MarkingError> {
        match mode {
            MarkingMode::ScaleFirstPoint | MarkingMode::ScaleSecondPoint => {
                if matches!(
                    self.mode,
                    Some(MarkingMode::ScaleFirstPoint | MarkingMode::ScaleSecondPoint)
                ) {
                    self.mode = None;
                    self.pending_scale = None;
                }
                Ok(())
            }
            MarkingMode::Poa => self.toggle_poa(),
            MarkingMode::Poi => {
                self.toggle_poi();
                Ok(())
            }
            MarkingMode::DeletePoi => {
                self.toggle_delete();
                Ok(())
            }
        }
    }

    pub fn toggle_delete(&mut self) {
        self.mode = match self.mode {
            Some(MarkingMode::DeletePoi) => None,
            _ => Some(MarkingMode::DeletePoi),
        };
    }

    /// Apply a click at `point` (image pixels) with the active tool.
    pub fn click(&mut self, point: PixelPoint) -> ClickOutcome {
        match self.mode {
            None => ClickOutcome::Ignored,
            Some(MarkingMode::ScaleFirstPoint) => match self.pending_scale.as_mut() {
                Some(pending) => {
                    pending.p1 = Some(point);
                    self.mode = Some(MarkingMode::ScaleSecondPoint);
                    ClickOutcome::ScaleFirstPoint
                }
                None => {
                    self.mode = None;
                    ClickOutcome::Ignored
                }
            },
            Some(MarkingMode::ScaleSecondPoint) => {
                self.mode = None;
                let Some(PendingScale {
                    distance,
                    units,
                    p1: Some(p1),
                }) = self.pending_scale.take()
                else {
                    return ClickOutcome::Ignored;
                };
                match calibrate(p1, point, distance, units) {
                    Ok(cal) => {
                        log::info!(
                            "scale set: {:.4} px/{}",
                            cal.pixels_per_unit(),
                            cal.units()
                        );
                        self.calibration = Some(cal);
                        ClickOutcome::Calibrated(cal)
                    }
                    Err(err) => {
                        log::warn!("scale rejected: {err}");
                        ClickOutcome::CalibrationRejected(err)
                    }
                }
            }
            Some(MarkingMode::Poa) => match self.current_group {
                Some(group) => {
                    self.groups[group].poa = Some(point);
                    self.mode = Some(MarkingMode::Poi);
                    ClickOutcome::PoaSet { group }
                }
                None => ClickOutcome::Ignored,
            },
            Some(MarkingMode::Poi) => match self.current_group {
                Some(group) => {
                    let pois = &mut self.groups[group].pois;
                    pois.push(MarkedImpact::new(point));
                    ClickOutcome::ImpactAdded {
                        group,
                        index: pois.len() - 1,
                    }
                }
                None => ClickOutcome::Ignored,
            },
            Some(MarkingMode::DeletePoi) => self.delete_near(point),
        }
    }

    /// Remove the first impact within the click radius, scanning groups in
    /// order and each group's impacts newest first.
    fn delete_near(&mut self, point: PixelPoint) -> ClickOutcome {
        let radius = DELETE_RADIUS_PX / self.zoom;
        for (group, g) in self.groups.iter_mut().enumerate() {
            let hit = g
                .pois
                .iter()
                .rposition(|p| (p.position() - point).norm() < radius);
            if let Some(index) = hit {
                g.pois.remove(index);
                return ClickOutcome::ImpactDeleted { group, index };
            }
        }
        ClickOutcome::NothingToDelete
    }

    /// Drop the newest impact of the selected group.
    pub fn delete_last_impact(&mut self) -> Option<MarkedImpact> {
        let group = self.current_group?;
        self.groups[group].pois.pop()
    }

    pub fn set_velocity(
        &mut self,
        group: usize,
        impact: usize,
        velocity: Option<f64>,
    ) -> Result<(), MarkingError> {
        let len = self.groups.len();
        let g = self
            .groups
            .get_mut(group)
            .ok_or(MarkingError::GroupOutOfRange { index: group, len })?;
        let p = g
            .pois
            .get_mut(impact)
            .ok_or(MarkingError::ImpactOutOfRange {
                group,
                index: impact,
            })?;
        p.velocity = velocity.filter(|v| v.is_finite());
        Ok(())
    }

    pub fn zoom_in(&mut self) {
        self.zoom *= ZOOM_STEP;
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(MIN_ZOOM);
    }

    pub fn group_summary(&self, index: usize) -> Option<GroupSummary> {
        self.groups.get(index).map(Group::summary)
    }

    /// Unit-space offset of one impact; `None` until the group has a POA and
    /// the session is calibrated.
    pub fn impact_offset(&self, group: usize, impact: usize) -> Option<UnitOffset> {
        let cal = self.calibration.as_ref()?;
        let g = self.groups.get(group)?;
        let poa = g.poa?;
        let p = g.pois.get(impact)?;
        Some(to_unit_offset(p.position(), poa, cal))
    }

    /// Every impact of every group with a POA, as unit-space shots rounded to
    /// 4 decimals. Shots are numbered across groups; both numbers are
    /// 1-based. Empty until calibrated.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self), fields(groups = self.groups.len()))
    )]
    pub fn shots_for_analysis(&self) -> Vec<AnalysisShot> {
        let Some(cal) = self.calibration.as_ref() else {
            return Vec::new();
        };

        let mut shots = Vec::new();
        for (group_index, group) in self.groups.iter().enumerate() {
            let Some(poa) = group.poa else {
                continue;
            };
            for poi in &group.pois {
                let off = to_unit_offset(poi.position(), poa, cal);
                shots.push(AnalysisShot {
                    shot_number: shots.len() + 1,
                    group: group_index + 1,
                    shot: Shot {
                        x: round4(off.x),
                        y: round4(off.y),
                        velocity: poi.velocity,
                        units: cal.units(),
                    },
                });
            }
        }
        shots
    }

}

fn round4(v: f64) -> f64 {
    (v * 1e4).round() / 1e4
}
