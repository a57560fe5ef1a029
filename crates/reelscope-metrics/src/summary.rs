//! Projection of a table and its metrics into the compact payload sent to the
//! report generator.
//!
//! The payload deliberately carries only rounded aggregates and a handful of
//! fields per top/flop video, never full records or upstream JSON.

use serde::Serialize;

use crate::types::{MetricsSummary, VideoRecord, VideoTable};

/// Characters of caption kept in [`CompactVideo::text_preview`].
const TEXT_PREVIEW_CHARS: usize = 100;

/// Input contract of the report generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRequest {
    pub username: String,
    pub total_videos_analyzed: usize,
    pub avg_views: f64,
    pub avg_likes: f64,
    pub avg_shares: f64,
    pub avg_comments: f64,
    pub avg_engagement_rate: f64,
    pub avg_viral_ratio: f64,
    pub avg_conversion_potential: f64,
    pub trend_percentage: f64,
    pub top3: Vec<CompactVideo>,
    pub flop3: Vec<CompactVideo>,
}

/// A top or flop video reduced to what the report needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompactVideo {
    /// 1-based position within its selection.
    pub rank: usize,
    pub views: u64,
    pub likes: u64,
    pub shares: u64,
    pub comments: u64,
    pub text_preview: String,
    pub duration_sec: f64,
    pub date: String,
}

impl CompactVideo {
    fn ranked(rank: usize, video: &VideoRecord) -> Self {
        Self {
            rank,
            views: video.play_count,
            likes: video.digg_count,
            shares: video.share_count,
            comments: video.comment_count,
            text_preview: video.text.chars().take(TEXT_PREVIEW_CHARS).collect(),
            duration_sec: video.duration,
            date: video.create_date.clone(),
        }
    }
}

/// Builds the [`ReportRequest`] for `identity`.
///
/// Means and rates are rounded to 2 decimal places, the viral ratio to 4.
/// `metrics` is expected to have been computed from `table`.
#[must_use]
pub fn project(table: &VideoTable, metrics: &MetricsSummary, identity: &str) -> ReportRequest {
    ReportRequest {
        username: identity.to_string(),
        total_videos_analyzed: table.len(),
        avg_views: round_to(metrics.avg_views, 2),
        avg_likes: round_to(metrics.avg_likes, 2),
        avg_shares: round_to(metrics.avg_shares, 2),
        avg_comments: round_to(metrics.avg_comments, 2),
        avg_engagement_rate: round_to(metrics.avg_engagement_rate, 2),
        avg_viral_ratio: round_to(metrics.avg_viral_ratio, 4),
        avg_conversion_potential: round_to(metrics.avg_conversion_potential, 2),
        trend_percentage: round_to(metrics.trend_percent, 2),
        top3: compact_all(&metrics.top3),
        flop3: compact_all(&metrics.flop3),
    }
}

fn compact_all(videos: &[VideoRecord]) -> Vec<CompactVideo> {
    videos
        .iter()
        .enumerate()
        .map(|(i, video)| CompactVideo::ranked(i + 1, video))
        .collect()
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}
