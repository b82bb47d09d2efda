//! Side-by-side analysis of saved sessions.

use serde::Serialize;
use shotgroup_core::Shot;
use shotgroup_marking::SessionRecord;
use shotgroup_stats::{DispersionDiagnosis, SessionStats, StatsEngine, StatsParams};

const TARGET_NAME_MAX: usize = 25;
const TARGET_NAME_KEEP: usize = 22;

/// One analysed session, ready for tabulation and plotting.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAnalysis {
    pub session_id: String,
    pub session_name: String,
    pub stats: SessionStats,
    pub diagnosis: DispersionDiagnosis,
    /// The session's shots, kept for plotting.
    pub shots: Vec<Shot>,
}

/// Display name `"<firearm> | <load> | <target> (<n> shots)"`.
///
/// Missing references read as `No Firearm`, `No Load` and `No Target`; target
/// names longer than 25 characters are cut to 22 plus `...`.
pub fn session_name(record: &SessionRecord) -> String {
    let present = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_owned);

    let firearm = present(&record.meta.firearm_id).unwrap_or_else(|| "No Firearm".into());
    let load = present(&record.meta.load_id).unwrap_or_else(|| "No Load".into());
    let target = present(&record.meta.target_image_id)
        .map(|name| {
            if name.chars().count() > TARGET_NAME_MAX {
                let head: String = name.chars().take(TARGET_NAME_KEEP).collect();
                format!("{head}...")
            } else {
                name
            }
        })
        .unwrap_or_else(|| "No Target".into());

    let n = record.shots.len();
    let shot_text = if n > 0 {
        format!("({n} shots)")
    } else {
        String::new()
    };

    format!("{firearm} | {load} | {target} {shot_text}")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Analyse every record with at least two shots, tightest group first.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "info", skip_all, fields(records = records.len()))
)]
pub fn compare_sessions(records: &[SessionRecord], params: &StatsParams) -> Vec<SessionAnalysis> {
    let engine = StatsEngine::new(params.clone());
    let mut out: Vec<SessionAnalysis> = records
        .iter()
        .filter_map(|record| {
            let shots = record.shots();
            let Some(stats) = engine.compute(
                &shots,
                record.meta.target_distance,
                record.meta.distance_units,
            ) else {
                log::info!("session {} skipped: {} shot(s)", record.id, shots.len());
                return None;
            };
            Some(SessionAnalysis {
                session_id: record.id.clone(),
                session_name: session_name(record),
                diagnosis: DispersionDiagnosis::from_stats(&stats),
                stats,
                shots,
            })
        })
        .collect();

    out.sort_by(|a, b| {
        a.stats
            .linear
            .mean_radius
            .total_cmp(&b.stats.linear.mean_radius)
    });
    out
}
