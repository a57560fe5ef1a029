//! End-to-end pipeline: raw records in, table + metrics out.

use serde_json::Value;

use crate::metrics::compute_metrics;
use crate::summary::{project, ReportRequest};
use crate::table::build_table;
use crate::types::{MetricsSummary, VideoTable};

/// The result of one analysis run for one identity.
///
/// Produced whole by [`analyze`] and replaced, never updated, on the next run.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub identity: String,
    pub table: VideoTable,
    pub metrics: MetricsSummary,
}

impl Analysis {
    /// Compact payload for the report generator.
    #[must_use]
    pub fn report_request(&self) -> ReportRequest {
        project(&self.table, &self.metrics, &self.identity)
    }
}

/// Runs normalization, table building and metrics for `identity`.
///
/// Never fails; an empty or unrecognizable batch yields an empty table and
/// zeroed metrics.
#[must_use]
pub fn analyze(identity: &str, raw: &[Value]) -> Analysis {
    let table = build_table(raw);
    let metrics = compute_metrics(&table);

    tracing::info!(
        identity,
        raw_records = raw.len(),
        videos = table.len(),
        "analysis complete"
    );

    Analysis {
        identity: identity.to_string(),
        table,
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn analyze_empty_batch() {
        let analysis = analyze("creator", &[]);
        assert!(analysis.table.is_empty());
        assert_eq!(analysis.metrics, MetricsSummary::default());
        assert_eq!(analysis.report_request().total_videos_analyzed, 0);
    }

    #[test]
    fn analyze_mixed_shapes() {
        let raw = vec![
            json!({"playCount": 100, "diggCount": 10, "createTime": 1_700_000_300}),
            json!({"video": {"createTime": 1_700_000_200, "stats": {"playCount": 300}}}),
            json!({"views": 200, "createTime": 1_700_000_100}),
            json!(null),
        ];
        let analysis = analyze("creator", &raw);
        assert_eq!(analysis.identity, "creator");
        assert_eq!(analysis.metrics.total_videos, 4);
        assert_eq!(analysis.metrics.total_views, 600);
        assert_eq!(analysis.metrics.top3[0].play_count, 300);
        assert_eq!(analysis.metrics.flop3[0].play_count, 0);

        let request = analysis.report_request();
        assert_eq!(request.username, "creator");
        assert!((request.avg_views - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn analyze_tolerates_oversized_counts() {
        let raw = vec![
            json!({"playCount": 1, "diggCount": "1e30"}),
            json!({"playCount": 1, "diggCount": 1}),
        ];
        let analysis = analyze("creator", &raw);
        assert_eq!(analysis.metrics.total_engagement, u64::MAX);
        assert!(analysis.report_request().avg_likes.is_finite());
    }
}
