//! Schema-tolerant field lookup over untyped JSON records.
//!
//! Upstream scrapers disagree on key names (`playCount` vs `play_count` vs
//! `views`, ...). Each logical [`Field`] carries an ordered list of candidate
//! keys and [`resolve`] returns the first one that holds a non-null value.
//! Nothing in this module can fail: a non-object container, a missing key or
//! a value of the wrong type all resolve to the caller's default.

use serde_json::{Map, Value};

/// Logical fields extracted from a raw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Text,
    CreateTime,
    Duration,
    PlayCount,
    DiggCount,
    ShareCount,
    CommentCount,
    CollectCount,
    AuthorUsername,
    AuthorNickname,
    AuthorFollowers,
}

impl Field {
    /// Candidate keys in priority order.
    ///
    /// Dotted names such as `statsV2.playCount` are matched as literal keys.
    #[must_use]
    pub const fn candidates(self) -> &'static [&'static str] {
        match self {
            Field::Id => &["id", "videoId", "awemeId"],
            Field::Text => &["desc", "description", "text", "caption"],
            Field::CreateTime => &["createTime", "create_time", "createDate"],
            Field::Duration => &["duration"],
            Field::PlayCount => &[
                "playCount",
                "play_count",
                "viewCount",
                "views",
                "statsV2.playCount",
            ],
            Field::DiggCount => &[
                "diggCount",
                "digg_count",
                "likeCount",
                "likes",
                "statsV2.diggCount",
            ],
            Field::ShareCount => &[
                "shareCount",
                "share_count",
                "shares",
                "statsV2.shareCount",
            ],
            Field::CommentCount => &[
                "commentCount",
                "comment_count",
                "comments",
                "statsV2.commentCount",
            ],
            Field::CollectCount => &[
                "collectCount",
                "collect_count",
                "collects",
                "statsV2.collectCount",
            ],
            Field::AuthorUsername => &["uniqueId", "unique_id", "username", "nickname"],
            Field::AuthorNickname => &["nickname", "nickName", "displayName"],
            Field::AuthorFollowers => &["followerCount", "follower_count", "followers"],
        }
    }
}

/// Returns the value of the first candidate key present in `container` whose
/// value is not `null`.
///
/// Returns `None` when `container` is absent, is not a JSON object, or holds
/// none of the keys.
#[must_use]
pub fn resolve<'a>(container: Option<&'a Map<String, Value>>, keys: &[&str]) -> Option<&'a Value> {
    let map = container?;
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
}

/// Like [`resolve`], but falls back to `default` instead of `None`.
#[must_use]
pub fn resolve_or<'a>(
    container: Option<&'a Map<String, Value>>,
    keys: &[&str],
    default: &'a Value,
) -> &'a Value {
    resolve(container, keys).unwrap_or(default)
}

/// Treats `value[key]` as a nested object when it is one.
///
/// Any other type (string, number, array, null) counts as absent.
#[must_use]
pub fn sub_object<'a>(
    value: Option<&'a Map<String, Value>>,
    key: &str,
) -> Option<&'a Map<String, Value>> {
    value?.get(key).and_then(Value::as_object)
}

/// Resolves `field` as text. Numbers are stringified, other types yield an
/// empty string.
#[must_use]
pub fn resolve_string(container: Option<&Map<String, Value>>, field: Field) -> String {
    match resolve(container, field.candidates()) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Resolves `field` as a non-negative integer count.
///
/// Fractional values truncate, numeric strings are parsed, and negative or
/// non-numeric values yield `0`.
#[must_use]
pub fn resolve_count(container: Option<&Map<String, Value>>, field: Field) -> u64 {
    resolve(container, field.candidates()).map_or(0, count_from_value)
}

/// Resolves `field` as a non-negative number of seconds.
#[must_use]
pub fn resolve_seconds(container: Option<&Map<String, Value>>, field: Field) -> f64 {
    resolve(container, field.candidates()).map_or(0.0, seconds_from_value)
}

fn count_from_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().and_then(truncate_non_negative))
            .unwrap_or(0),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<u64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(truncate_non_negative))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn truncate_non_negative(f: f64) -> Option<u64> {
    // `as` saturates at u64::MAX for out-of-range floats.
    (f.is_finite() && f >= 0.0).then(|| f.trunc() as u64)
}

fn seconds_from_value(value: &Value) -> f64 {
    let seconds = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    seconds.filter(|s| s.is_finite() && *s >= 0.0).unwrap_or(0.0)
}
