//! Domain models for the conversion pipeline.
//!
//! - [`SourceRecord`] - One `<anime>` entry of the MAL export
//! - [`TargetItem`] - One entry of the output JSON array
//! - [`Kind`] - Series or movie
//! - [`Status`] - Watch status in the target schema
//! - [`MalStatus`] - Watch status as MAL writes it

use serde::{Deserialize, Serialize};

// =============================================================================
// Source Record
// =============================================================================

/// One `<anime>` element of a MAL export, with numeric fields already coerced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRecord {
    /// `series_title`, empty when absent.
    pub title: String,
    /// `series_type` verbatim: TV, Movie, OVA, ONA, Special, TV Special...
    pub series_type: Option<String>,
    /// `my_status` verbatim: Watching, Completed, Plan to Watch, On-Hold, Dropped.
    pub status: Option<String>,
    /// `my_rewatching == 1`.
    pub rewatching: bool,
    /// `my_rewatching_ep`.
    pub rewatch_episode: i64,
    /// `my_watched_episodes`.
    pub watched_episodes: i64,
    /// `my_score`, 0 when unrated.
    pub score: i64,
    /// `my_tags`, comma-separated.
    pub tags: Option<String>,
    /// `series_animedb_id`.
    pub mal_id: Option<String>,
}

impl SourceRecord {
    /// Parsed MAL status, if any.
    pub fn mal_status(&self) -> Option<MalStatus> {
        self.status.as_deref().map(MalStatus::from_raw)
    }
}

// =============================================================================
// MAL Status
// =============================================================================

/// Watch status values used by MAL exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalStatus {
    Watching,
    Completed,
    PlanToWatch,
    OnHold,
    Dropped,
    /// Anything else, kept verbatim.
    Other(String),
}

impl MalStatus {
    /// Parse a raw status string (trimmed, case-insensitive).
    pub fn from_raw(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        match normalized.as_str() {
            "watching" => Self::Watching,
            "completed" => Self::Completed,
            "plan to watch" => Self::PlanToWatch,
            "on-hold" => Self::OnHold,
            "dropped" => Self::Dropped,
            _ => Self::Other(raw.to_string()),
        }
    }
}

// =============================================================================
// Kind
// =============================================================================

/// Kind of entry in the target schema.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Kind {
    #[default]
    Series,
    Movie,
}

impl Kind {
    /// `Movie` (trimmed, case-insensitive) maps to [`Kind::Movie`], anything
    /// else (including absent) to [`Kind::Series`].
    pub fn from_series_type(series_type: Option<&str>) -> Self {
        match series_type {
            Some(t) if t.trim().eq_ignore_ascii_case("movie") => Self::Movie,
            _ => Self::Series,
        }
    }
}

// =============================================================================
// Status
// =============================================================================

/// Watch status in the target schema. There is no dropped state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Watching,
    Completed,
    Plan,
    Waiting,
    Rewatch,
}

impl Status {
    /// Map a MAL status to the target schema.
    ///
    /// Rewatching overrides everything. Absent, dropped and unrecognized
    /// statuses become [`Status::Plan`].
    pub fn from_mal(status: Option<&MalStatus>, rewatching: bool) -> Self {
        if rewatching {
            return Self::Rewatch;
        }
        match status {
            None => Self::Plan,
            Some(MalStatus::Watching) => Self::Watching,
            Some(MalStatus::Completed) => Self::Completed,
            Some(MalStatus::PlanToWatch) => Self::Plan,
            Some(MalStatus::OnHold) => Self::Waiting,
            Some(MalStatus::Dropped) => Self::Plan,
            Some(MalStatus::Other(_)) => Self::Plan,
        }
    }

    /// Whether episode progress is tracked for this status.
    pub fn tracks_progress(&self) -> bool {
        matches!(self, Self::Watching | Self::Rewatch)
    }
}

// =============================================================================
// Target Item
// =============================================================================

/// One entry of the output JSON array.
///
/// Every field is always serialized; absent values are written as `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetItem {
    pub title: String,
    pub kind: Kind,
    pub status: Status,
    pub season: Option<u32>,
    pub episode: Option<i64>,
    /// Reserved, never populated.
    pub absolute_episode: Option<i64>,
    /// Fragments joined with `" | "`.
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub rating: Option<i64>,
    /// Reserved for downstream enrichment.
    pub cover_url: Option<String>,
    /// Reserved for downstream enrichment.
    pub banner_key: Option<String>,
    /// Reserved for downstream enrichment.
    pub image_url: Option<String>,
}

impl TargetItem {
    /// Create an item with only the required fields set.
    pub fn new(title: impl Into<String>, kind: Kind, status: Status) -> Self {
        Self {
            title: title.into(),
            kind,
            status,
            season: None,
            episode: None,
            absolute_episode: None,
            notes: None,
            tags: Vec::new(),
            rating: None,
            cover_url: None,
            banner_key: None,
            image_url: None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mal_status_from_raw() {
        assert_eq!(MalStatus::from_raw("Watching"), MalStatus::Watching);
        assert_eq!(MalStatus::from_raw("  COMPLETED "), MalStatus::Completed);
        assert_eq!(MalStatus::from_raw("plan to watch"), MalStatus::PlanToWatch);
        assert_eq!(MalStatus::from_raw("On-Hold"), MalStatus::OnHold);
        assert_eq!(MalStatus::from_raw("dropped"), MalStatus::Dropped);
        assert_eq!(
            MalStatus::from_raw("Paused"),
            MalStatus::Other("Paused".into())
        );
    }

    #[test]
    fn test_kind_from_series_type() {
        assert_eq!(Kind::from_series_type(Some("Movie")), Kind::Movie);
        assert_eq!(Kind::from_series_type(Some(" movie ")), Kind::Movie);
        assert_eq!(Kind::from_series_type(Some("TV")), Kind::Series);
        assert_eq!(Kind::from_series_type(Some("OVA")), Kind::Series);
        assert_eq!(Kind::from_series_type(None), Kind::Series);
    }

    #[test]
    fn test_status_rewatch_overrides() {
        for status in [
            None,
            Some(MalStatus::Completed),
            Some(MalStatus::Dropped),
            Some(MalStatus::OnHold),
        ] {
            assert_eq!(Status::from_mal(status.as_ref(), true), Status::Rewatch);
        }
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(Status::from_mal(None, false), Status::Plan);
        assert_eq!(
            Status::from_mal(Some(&MalStatus::Watching), false),
            Status::Watching
        );
        assert_eq!(
            Status::from_mal(Some(&MalStatus::Completed), false),
            Status::Completed
        );
        assert_eq!(
            Status::from_mal(Some(&MalStatus::OnHold), false),
            Status::Waiting
        );
        assert_eq!(Status::from_mal(Some(&MalStatus::Dropped), false), Status::Plan);
        assert_eq!(
            Status::from_mal(Some(&MalStatus::Other("??".into())), false),
            Status::Plan
        );
    }

    #[test]
    fn test_target_item_serializes_nulls() {
        let item = TargetItem::new("Mushishi", Kind::Series, Status::Plan);
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["kind"], "SERIES");
        assert_eq!(json["status"], "PLAN");
        assert!(json["season"].is_null());
        assert!(json["absolute_episode"].is_null());
        assert!(json["cover_url"].is_null());
        assert_eq!(json["tags"], serde_json::json!([]));
        assert_eq!(json.as_object().unwrap().len(), 12);
    }
}
