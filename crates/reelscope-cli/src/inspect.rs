//! Offline commands: run the pipeline or render the prompt from a saved
//! payload, without calling any external service.

use std::path::Path;

use reelscope_metrics::analyze;
use reelscope_report::build_prompt;
use serde_json::Value;

use crate::analyze::sanitize_username;
use crate::output::{print_session, write_csv_file};
use crate::state::AnalysisSession;

/// Extracts raw records from a saved payload: either a bare array or an
/// object carrying an `items` array (the shape of an Apify dataset export).
pub(crate) fn records_from_json(payload: Value) -> anyhow::Result<Vec<Value>> {
    match payload {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(anyhow::anyhow!(
                "expected a JSON array or an object with an `items` array"
            )),
        },
        _ => Err(anyhow::anyhow!(
            "expected a JSON array or an object with an `items` array"
        )),
    }
}

pub(crate) fn load_raw_records(path: &Path) -> anyhow::Result<Vec<Value>> {
    let body = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let payload: Value = serde_json::from_str(&body)
        .map_err(|e| anyhow::anyhow!("{} is not valid JSON: {e}", path.display()))?;
    let records = records_from_json(payload)
        .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))?;
    tracing::debug!(path = %path.display(), records = records.len(), "loaded raw records");
    Ok(records)
}

pub(crate) fn run_inspect(
    input: &Path,
    username: &str,
    csv: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let identity = sanitize_username(username)?;
    let raw = load_raw_records(input)?;

    let session = AnalysisSession::new(analyze(&identity, &raw), None);

    if let (Some(path), Some(analysis)) = (csv, session.analysis()) {
        write_csv_file(&analysis.table, path)?;
    }
    print_session(&session, json)
}

pub(crate) fn run_prompt(input: &Path, username: &str) -> anyhow::Result<()> {
    let identity = sanitize_username(username)?;
    let raw = load_raw_records(input)?;
    let analysis = analyze(&identity, &raw);
    println!("{}", build_prompt(&analysis.report_request()));
    Ok(())
}
