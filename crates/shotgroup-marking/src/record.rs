use std::fs;
use std::path::Path;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use shotgroup_core::{Calibration, DistanceUnit, Shot};
use shotgroup_stats::{SessionStats, StatsEngine, StatsParams};

use crate::error::RecordIoError;
use crate::group::Group;
use crate::session::MarkingSession;

/// A unit-space shot as stored in a session record.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisShot {
    /// Position across the whole session, from 1.
    pub shot_number: usize,
    /// Group position, from 1.
    pub group: usize,
    #[serde(flatten)]
    pub shot: Shot,
}

/// Session details supplied by the caller when saving.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMeta {
    /// RFC 3339 save time.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub target_image_id: Option<String>,
    #[serde(default)]
    pub firearm_id: Option<String>,
    #[serde(default)]
    pub load_id: Option<String>,
    #[serde(default)]
    pub target_distance: Option<f64>,
    #[serde(default)]
    pub distance_units: Option<DistanceUnit>,
}

/// A saved marking session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    #[serde(flatten)]
    pub meta: SessionMeta,
    #[serde(default)]
    pub groups: Vec<Group>,
    /// `None` when the session was saved before the scale was set.
    #[serde(default, deserialize_with = "lenient_scale")]
    pub scale: Option<Calibration>,
    #[serde(default)]
    pub shots: Vec<AnalysisShot>,
}

/// Unset scales are stored as an object of nulls; read anything that is
/// not a usable calibration as `None`.
fn lenient_scale<'de, D>(deserializer: D) -> Result<Option<Calibration>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Set(Calibration),
        Other(IgnoredAny),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Set(cal) => Some(cal),
        Raw::Other(_) => None,
    })
}

impl SessionRecord {
    /// Load a saved session from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, RecordIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this session to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), RecordIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn shots(&self) -> Vec<Shot> {
        self.shots.iter().map(|s| s.shot).collect()
    }

    /// Statistics for the stored shots; `None` below two shots.
    pub fn stats(&self, params: &StatsParams) -> Option<SessionStats> {
        StatsEngine::new(params.clone()).compute(
            &self.shots(),
            self.meta.target_distance,
            self.meta.distance_units,
        )
    }
}

impl MarkingSession {
    /// Snapshot the session for saving.
    pub fn to_record(&self, meta: SessionMeta) -> SessionRecord {
        SessionRecord {
            id: self.id().to_owned(),
            meta,
            groups: self.groups().to_vec(),
            scale: self.calibration().copied(),
            shots: self.shots_for_analysis(),
        }
    }

    /// Reopen a saved session with the first group selected and no tool
    /// active.
    pub fn from_record(record: &SessionRecord) -> Self {
        MarkingSession::restore(record.id.clone(), record.scale, record.groups.clone())
    }
}
