//! Assembly of normalized records into a [`VideoTable`].

use serde_json::Value;

use crate::normalize::normalize;
use crate::types::VideoTable;

/// Normalizes every raw record and orders the result most recent first.
///
/// Input order is preserved among records with the same creation time.
/// Duplicates are not removed.
#[must_use]
pub fn build_table(raw: &[Value]) -> VideoTable {
    let records = raw.iter().map(normalize).collect::<Vec<_>>();
    tracing::debug!(records = records.len(), "built video table");
    VideoTable::from_records(records)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn build_table_empty_input() {
        assert!(build_table(&[]).is_empty());
    }

    #[test]
    fn build_table_sorts_most_recent_first() {
        let raw = vec![
            json!({"id": "old", "playCount": 1, "createTime": 1_600_000_000}),
            json!({"id": "new", "playCount": 1, "createTime": 1_700_000_000}),
            json!({"id": "mid", "playCount": 1, "createTime": 1_650_000_000}),
        ];
        let table = build_table(&raw);
        let ids: Vec<&str> = table.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["new", "mid", "old"]);
    }

    #[test]
    fn build_table_keeps_input_order_on_ties() {
        let raw = vec![
            json!({"id": "a", "playCount": 1, "createTime": 1_700_000_000}),
            json!({"id": "b", "playCount": 1}),
            json!({"id": "c", "playCount": 1, "createTime": 1_700_000_000}),
            json!({"id": "d", "playCount": 1}),
        ];
        let table = build_table(&raw);
        let ids: Vec<&str> = table.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["a", "c", "b", "d"]);
    }

    #[test]
    fn build_table_keeps_duplicates_and_malformed_rows() {
        let raw = vec![
            json!({"id": "dup", "playCount": 5}),
            json!({"id": "dup", "playCount": 5}),
            json!("garbage"),
        ];
        let table = build_table(&raw);
        assert_eq!(table.len(), 3);
        assert!(table.rows()[2].id.is_empty());
    }

    #[test]
    fn build_table_output_is_descending() {
        let raw: Vec<Value> = [5_u64, 1, 9, 3, 9, 0, 7]
            .iter()
            .map(|offset| json!({"playCount": 1, "createTime": 1_700_000_000 + offset * 60}))
            .collect();
        let table = build_table(&raw);
        assert!(table
            .rows()
            .windows(2)
            .all(|pair| pair[0].create_time >= pair[1].create_time));
    }
}
