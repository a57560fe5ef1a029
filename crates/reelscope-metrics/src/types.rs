use serde::Serialize;

/// One video, normalized from whatever shape the upstream scraper returned.
///
/// Every numeric field defaults to `0` and every string to empty, so
/// downstream arithmetic never has to deal with missing values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VideoRecord {
    /// Upstream video id. Empty when absent.
    pub id: String,
    /// Caption text.
    pub text: String,
    /// Creation time in seconds since the Unix epoch. `0` when unknown or
    /// when upstream only supplied a date string.
    pub create_time: f64,
    /// Human-readable creation date, or the upstream string verbatim.
    pub create_date: String,
    /// Video length in seconds.
    pub duration: f64,
    pub play_count: u64,
    pub digg_count: u64,
    pub share_count: u64,
    pub comment_count: u64,
    pub collect_count: u64,
    pub author_username: String,
    pub author_nickname: String,
    pub author_followers: u64,
}

impl VideoRecord {
    /// Likes + shares + comments.
    #[must_use]
    pub fn engagement(&self) -> u64 {
        self.digg_count
            .saturating_add(self.share_count)
            .saturating_add(self.comment_count)
    }
}

/// Row-local ratios derived from a single [`VideoRecord`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DerivedMetrics {
    /// Shares per like.
    pub viral_ratio: f64,
    /// `(likes + shares + comments) / views * 100`.
    pub engagement_rate: f64,
    /// `(shares * 2 + comments) / views * 100`.
    pub conversion_potential: f64,
}

/// Normalized videos ordered by creation time, most recent first.
///
/// Built once per analysis run and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoTable {
    rows: Vec<VideoRecord>,
}

impl VideoTable {
    /// Orders `records` descending by `create_time`. The sort is stable, so
    /// records sharing a timestamp keep their input order.
    #[must_use]
    pub fn from_records(mut records: Vec<VideoRecord>) -> Self {
        records.sort_by(|a, b| b.create_time.total_cmp(&a.create_time));
        Self { rows: records }
    }

    #[must_use]
    pub fn rows(&self) -> &[VideoRecord] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VideoRecord> {
        self.rows.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Derived ratio columns, one entry per row in table order.
    #[must_use]
    pub fn derived(&self) -> Vec<DerivedMetrics> {
        self.rows.iter().map(DerivedMetrics::of).collect()
    }
}

impl<'a> IntoIterator for &'a VideoTable {
    type Item = &'a VideoRecord;
    type IntoIter = std::slice::Iter<'a, VideoRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Aggregate statistics over a [`VideoTable`].
///
/// An empty table yields the all-zero default.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub total_videos: usize,
    pub avg_views: f64,
    pub avg_likes: f64,
    pub avg_shares: f64,
    pub avg_comments: f64,
    pub total_views: u64,
    pub total_engagement: u64,
    pub avg_viral_ratio: f64,
    pub avg_engagement_rate: f64,
    pub avg_conversion_potential: f64,
    /// Percent change of the 10 most recent videos' mean views against the
    /// 10 oldest. `0` for tables shorter than 20 rows.
    pub trend_percent: f64,
    /// Up to three rows with the most views, best first.
    pub top3: Vec<VideoRecord>,
    /// Up to three rows with the fewest views, worst first.
    pub flop3: Vec<VideoRecord>,
}
