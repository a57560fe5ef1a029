//! Per-video ratios and table-wide aggregates.
//!
//! All divisions are guarded: a zero denominator yields `0.0`, and an empty
//! table yields [`MetricsSummary::default`].

use std::cmp::Reverse;

use crate::types::{DerivedMetrics, MetricsSummary, VideoRecord, VideoTable};

/// Number of rows in each of the top/flop selections.
const PERFORMER_COUNT: usize = 3;

/// Rows averaged at each end of the table for the trend signal.
const TREND_WINDOW: usize = 10;

/// Below this many rows the trend is reported as `0`.
const TREND_MIN_ROWS: usize = 2 * TREND_WINDOW;

impl DerivedMetrics {
    /// Computes the row-local ratios for one video.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn of(video: &VideoRecord) -> Self {
        let plays = video.play_count as f64;
        let likes = video.digg_count as f64;
        let shares = video.share_count as f64;
        let comments = video.comment_count as f64;

        Self {
            viral_ratio: guarded_ratio(shares, likes),
            engagement_rate: guarded_ratio(likes + shares + comments, plays) * 100.0,
            conversion_potential: guarded_ratio(shares * 2.0 + comments, plays) * 100.0,
        }
    }
}

fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Computes aggregate statistics over `table`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_metrics(table: &VideoTable) -> MetricsSummary {
    if table.is_empty() {
        return MetricsSummary::default();
    }

    let rows = table.rows();
    let count = rows.len() as f64;
    let derived = table.derived();

    let total_views = saturating_total(rows, |v| v.play_count);
    let total_likes = saturating_total(rows, |v| v.digg_count);
    let total_shares = saturating_total(rows, |v| v.share_count);
    let total_comments = saturating_total(rows, |v| v.comment_count);
    let total_engagement = saturating_total(rows, VideoRecord::engagement);

    let summary = MetricsSummary {
        total_videos: rows.len(),
        avg_views: total_views as f64 / count,
        avg_likes: total_likes as f64 / count,
        avg_shares: total_shares as f64 / count,
        avg_comments: total_comments as f64 / count,
        total_views,
        total_engagement,
        avg_viral_ratio: derived.iter().map(|d| d.viral_ratio).sum::<f64>() / count,
        avg_engagement_rate: derived.iter().map(|d| d.engagement_rate).sum::<f64>() / count,
        avg_conversion_potential: derived
            .iter()
            .map(|d| d.conversion_potential)
            .sum::<f64>()
            / count,
        trend_percent: trend_percent(rows),
        top3: top_performers(rows),
        flop3: bottom_performers(rows),
    };

    tracing::debug!(
        total_videos = summary.total_videos,
        avg_views = summary.avg_views,
        trend_percent = summary.trend_percent,
        "computed metrics"
    );

    summary
}

/// Sums a count column, clamping at `u64::MAX`.
fn saturating_total(rows: &[VideoRecord], count: impl Fn(&VideoRecord) -> u64) -> u64 {
    rows.iter().map(count).fold(0, u64::saturating_add)
}

/// The most-viewed rows, best first. Ties keep table order.
fn top_performers(rows: &[VideoRecord]) -> Vec<VideoRecord> {
    let mut ranked: Vec<&VideoRecord> = rows.iter().collect();
    ranked.sort_by_key(|v| Reverse(v.play_count));
    ranked.into_iter().take(PERFORMER_COUNT).cloned().collect()
}

/// The least-viewed rows, worst first. Ties keep table order.
fn bottom_performers(rows: &[VideoRecord]) -> Vec<VideoRecord> {
    let mut ranked: Vec<&VideoRecord> = rows.iter().collect();
    ranked.sort_by_key(|v| v.play_count);
    ranked.into_iter().take(PERFORMER_COUNT).cloned().collect()
}

/// Percent change between the mean views of the newest and the oldest
/// [`TREND_WINDOW`] rows.
///
/// A coarse recency signal: a single outlier inside either window moves it
/// substantially.
fn trend_percent(rows: &[VideoRecord]) -> f64 {
    if rows.len() < TREND_MIN_ROWS {
        return 0.0;
    }
    let recent = mean_views(&rows[..TREND_WINDOW]);
    let older = mean_views(&rows[rows.len() - TREND_WINDOW..]);
    guarded_ratio(recent - older, older) * 100.0
}

#[allow(clippy::cast_precision_loss)]
fn mean_views(rows: &[VideoRecord]) -> f64 {
    let total = saturating_total(rows, |v| v.play_count);
    total as f64 / rows.len() as f64
}
