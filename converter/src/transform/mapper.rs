//! Field mapping from one MAL record to one target item.
//!
//! Each record is mapped independently. The only filtering point is the
//! dropped check at the top of [`map_record`].

use super::season::infer_season;
use crate::models::{Kind, MalStatus, SourceRecord, Status, TargetItem};

/// Separator between note fragments.
pub const NOTES_SEPARATOR: &str = " | ";

/// Options for the conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Keep `Dropped` entries (as PLAN with a note)
    pub include_dropped: bool,

    /// Infer season numbers from titles
    pub infer_season: bool,

    /// Append `MAL ID: <id>` to the notes
    pub mal_id_in_notes: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            include_dropped: false,
            infer_season: true,
            mal_id_in_notes: false,
        }
    }
}

/// Map one record, or `None` when it is filtered out.
pub fn map_record(record: &SourceRecord, options: &ConvertOptions) -> Option<TargetItem> {
    let mal_status = record.mal_status();

    if mal_status == Some(MalStatus::Dropped) && !options.include_dropped {
        return None;
    }

    let kind = Kind::from_series_type(record.series_type.as_deref());
    let status = Status::from_mal(mal_status.as_ref(), record.rewatching);

    let mut item = TargetItem::new(record.title.clone(), kind, status);
    item.episode = episode_progress(record, status);
    if options.infer_season {
        item.season = infer_season(&record.title);
    }
    item.notes = build_notes(record, mal_status.as_ref(), options);
    item.tags = split_tags(record.tags.as_deref());
    item.rating = map_rating(record.score);

    Some(item)
}

/// Episode progress for statuses that track it. Zero is absent.
pub fn episode_progress(record: &SourceRecord, status: Status) -> Option<i64> {
    let episode = match status {
        Status::Rewatch => record.rewatch_episode,
        Status::Watching => record.watched_episodes,
        _ => return None,
    };
    (episode != 0).then_some(episode)
}

/// Build the notes string, `None` when no fragment applies.
pub fn build_notes(
    record: &SourceRecord,
    mal_status: Option<&MalStatus>,
    options: &ConvertOptions,
) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();

    match mal_status {
        Some(MalStatus::OnHold) => parts.push("MAL: On-Hold".to_string()),
        Some(MalStatus::Dropped) => parts.push("MAL: Dropped".to_string()),
        _ => {}
    }

    // OVA, ONA, Special, TV Special... Exact match only.
    if let Some(ref series_type) = record.series_type {
        if series_type != "TV" && series_type != "Movie" {
            parts.push(format!("MAL type: {}", series_type));
        }
    }

    if options.mal_id_in_notes {
        if let Some(ref id) = record.mal_id {
            parts.push(format!("MAL ID: {}", id));
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(NOTES_SEPARATOR))
    }
}

/// Split comma-separated tags, dropping empty pieces.
pub fn split_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|r| {
        r.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// Score 0 means unrated.
pub fn map_rating(score: i64) -> Option<i64> {
    (score != 0).then_some(score)
}
