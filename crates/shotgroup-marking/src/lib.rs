//! Impact-marking session model.
//!
//! A [`MarkingSession`] holds everything the marking tool needs between
//! clicks: the two-point scale calibration, the shot groups with their
//! point of aim and pixel-space impacts, the active tool mode and the zoom
//! level. Front ends feed it clicks in image coordinates and read back
//! unit-space shots ready for `shotgroup-stats`.
//!
//! Saved sessions are [`SessionRecord`] values, stored as JSON.

mod error;
mod group;
mod record;
mod session;

pub use error::{MarkingError, RecordIoError};
pub use group::{Group, GroupSummary, MarkedImpact, GROUP_COLORS};
pub use record::{AnalysisShot, SessionMeta, SessionRecord};
pub use session::{generate_session_id, ClickOutcome, MarkingMode, MarkingSession};
