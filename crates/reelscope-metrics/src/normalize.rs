//! Normalization from raw scraper records to [`VideoRecord`].
//!
//! Scraper output comes in three recognizable shapes. Each shape only decides
//! *where* the video, stats and author fields live; the field lookup itself is
//! delegated to [`crate::resolver`]. Normalization never fails: unrecognized
//! or malformed input degrades to default values.

use chrono::DateTime;
use serde_json::{Map, Value};

use crate::resolver::{
    resolve_count, resolve_or, resolve_seconds, resolve_string, sub_object, Field,
};
use crate::types::VideoRecord;

/// Epoch values at or below this are not treated as real creation times.
const PLAUSIBLE_EPOCH_THRESHOLD: f64 = 1_000_000_000.0;

const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

type Object = Map<String, Value>;

/// Structural shape of a raw record. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordShape {
    /// Stats live on the record itself or in its `stats` object.
    FlatStats,
    /// Video fields and stats live under a `video` object.
    NestedVideo,
    /// Anything else. Every field is looked up on the record itself.
    Freeform,
}

impl RecordShape {
    #[must_use]
    pub fn classify(record: Option<&Object>) -> Self {
        let Some(record) = record else {
            return RecordShape::Freeform;
        };
        if record.contains_key("playCount") || record.contains_key("stats") {
            RecordShape::FlatStats
        } else if record.contains_key("video") {
            RecordShape::NestedVideo
        } else {
            RecordShape::Freeform
        }
    }
}

/// Where each group of fields is read from for a given record.
struct Sources<'a> {
    video: Option<&'a Object>,
    stats: Option<&'a Object>,
    author: Option<&'a Object>,
}

impl<'a> Sources<'a> {
    fn locate(shape: RecordShape, record: Option<&'a Object>) -> Self {
        match shape {
            RecordShape::FlatStats => Sources {
                video: record,
                // A `stats` key holding something other than an object is
                // ignored in favor of the record itself.
                stats: sub_object(record, "stats").or(record),
                author: sub_object(record, "author"),
            },
            RecordShape::NestedVideo => {
                let video = sub_object(record, "video");
                Sources {
                    video,
                    stats: sub_object(video, "stats"),
                    author: sub_object(record, "author"),
                }
            }
            RecordShape::Freeform => Sources {
                video: record,
                stats: record,
                author: sub_object(record, "author")
                    .or_else(|| sub_object(record, "authorStats")),
            },
        }
    }
}

/// Normalizes one raw record into a [`VideoRecord`].
///
/// Records that are not JSON objects, or that match none of the known key
/// names, yield a record of defaults.
#[must_use]
pub fn normalize(raw: &Value) -> VideoRecord {
    let record = raw.as_object();
    let shape = RecordShape::classify(record);
    let sources = Sources::locate(shape, record);

    tracing::trace!(?shape, "classified raw record");

    let created = resolve_or(sources.video, Field::CreateTime.candidates(), &Value::Null);
    let (create_time, create_date) = normalize_timestamp(created);

    VideoRecord {
        id: resolve_string(sources.video, Field::Id),
        text: resolve_string(sources.video, Field::Text),
        create_time,
        create_date,
        duration: resolve_seconds(sub_object(record, "video"), Field::Duration),
        play_count: resolve_count(sources.stats, Field::PlayCount),
        digg_count: resolve_count(sources.stats, Field::DiggCount),
        share_count: resolve_count(sources.stats, Field::ShareCount),
        comment_count: resolve_count(sources.stats, Field::CommentCount),
        collect_count: resolve_count(sources.stats, Field::CollectCount),
        author_username: resolve_string(sources.author, Field::AuthorUsername),
        author_nickname: resolve_string(sources.author, Field::AuthorNickname),
        author_followers: resolve_count(
            sub_object(sources.author, "stats"),
            Field::AuthorFollowers,
        ),
    }
}

/// Splits a raw creation time into `(epoch_seconds, display_date)`.
///
/// - numbers above [`PLAUSIBLE_EPOCH_THRESHOLD`] are formatted as a UTC
///   calendar date; if the value cannot be represented as a date the raw
///   number is used as the display string.
/// - non-empty strings are used verbatim and leave the epoch at `0`.
/// - everything else yields an empty display date.
fn normalize_timestamp(raw: &Value) -> (f64, String) {
    match raw {
        Value::Number(n) => {
            let epoch = n
                .as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .unwrap_or(0.0);
            let display = if epoch > PLAUSIBLE_EPOCH_THRESHOLD {
                format_epoch(epoch).unwrap_or_else(|| n.to_string())
            } else {
                String::new()
            };
            (epoch, display)
        }
        Value::String(s) if !s.is_empty() => (0.0, s.clone()),
        _ => (0.0, String::new()),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn format_epoch(epoch: f64) -> Option<String> {
    // i64::MAX as f64 rounds up, so compare with `<` to stay in range.
    #[allow(clippy::cast_precision_loss)]
    let in_range = epoch < i64::MAX as f64;
    if !in_range {
        return None;
    }
    DateTime::from_timestamp(epoch.trunc() as i64, 0)
        .map(|dt| dt.format(DISPLAY_DATE_FORMAT).to_string())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
