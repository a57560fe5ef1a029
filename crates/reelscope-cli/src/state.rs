//! Per-run application state.

use reelscope_metrics::Analysis;
use serde_json::{json, Value};

/// The analysis of one run and its report.
///
/// Built whole from a finished run; fields are never patched individually,
/// so the table, metrics and report always belong to the same fetch.
#[derive(Debug, Default)]
pub(crate) struct AnalysisSession {
    analysis: Option<Analysis>,
    report: Option<String>,
}

impl AnalysisSession {
    pub(crate) fn new(analysis: Analysis, report: Option<String>) -> Self {
        Self {
            analysis: Some(analysis),
            report,
        }
    }

    pub(crate) fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    pub(crate) fn report(&self) -> Option<&str> {
        self.report.as_deref()
    }

    /// Machine-readable view: the compact summary plus the report text.
    pub(crate) fn to_json(&self) -> Value {
        json!({
            "summary": self.analysis.as_ref().map(Analysis::report_request),
            "report": self.report,
        })
    }
}

#[cfg(test)]
mod tests {
    use reelscope_metrics::analyze;
    use serde_json::json;

    use super::*;

    #[test]
    fn default_session_is_empty() {
        let session = AnalysisSession::default();
        assert!(session.analysis().is_none());
        assert!(session.report().is_none());
        assert_eq!(session.to_json(), json!({"summary": null, "report": null}));
    }

    #[test]
    fn new_session_holds_analysis_without_report() {
        let session = AnalysisSession::new(analyze("second", &[json!({"playCount": 5})]), None);

        assert_eq!(session.analysis().map(|a| a.identity.as_str()), Some("second"));
        assert!(session.report().is_none());
        assert_eq!(session.to_json()["report"], json!(null));
    }

    #[test]
    fn to_json_carries_summary_fields() {
        let session = AnalysisSession::new(
            analyze("creator", &[json!({"playCount": 1000, "diggCount": 100})]),
            Some("text".to_owned()),
        );
        let value = session.to_json();
        assert_eq!(value["summary"]["username"], json!("creator"));
        assert_eq!(value["summary"]["total_videos_analyzed"], json!(1));
        assert_eq!(value["report"], json!("text"));
    }
}
