//! Delimited-text export of a [`VideoTable`].
//!
//! Column order is fixed: the [`VideoRecord`] fields followed by the
//! `viralRatio` and `engagementRate` derived columns.

use std::io;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::types::{DerivedMetrics, VideoRecord, VideoTable};

/// One exported row. Field order defines the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvRow {
    pub id: String,
    pub text: String,
    pub create_time: f64,
    pub create_date: String,
    pub duration: f64,
    pub play_count: u64,
    pub digg_count: u64,
    pub share_count: u64,
    pub comment_count: u64,
    pub collect_count: u64,
    pub author_username: String,
    pub author_nickname: String,
    pub author_followers: u64,
    pub viral_ratio: f64,
    pub engagement_rate: f64,
}

impl CsvRow {
    #[must_use]
    pub fn new(video: &VideoRecord, derived: &DerivedMetrics) -> Self {
        Self {
            id: video.id.clone(),
            text: video.text.clone(),
            create_time: video.create_time,
            create_date: video.create_date.clone(),
            duration: video.duration,
            play_count: video.play_count,
            digg_count: video.digg_count,
            share_count: video.share_count,
            comment_count: video.comment_count,
            collect_count: video.collect_count,
            author_username: video.author_username.clone(),
            author_nickname: video.author_nickname.clone(),
            author_followers: video.author_followers,
            viral_ratio: derived.viral_ratio,
            engagement_rate: derived.engagement_rate,
        }
    }
}

/// Writes `table` as CSV with a header row.
///
/// An empty table still produces the header.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] if serialization fails and
/// [`ExportError::Io`] if flushing `writer` fails.
pub fn write_table_csv<W: io::Write>(table: &VideoTable, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(HEADER)?;
    for (video, derived) in table.iter().zip(table.derived()) {
        csv_writer.serialize(CsvRow::new(video, &derived))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Column names, kept explicit so that empty tables still get a header.
const HEADER: [&str; 15] = [
    "id",
    "text",
    "createTime",
    "createDate",
    "duration",
    "playCount",
    "diggCount",
    "shareCount",
    "commentCount",
    "collectCount",
    "authorUsername",
    "authorNickname",
    "authorFollowers",
    "viralRatio",
    "engagementRate",
];

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::table::build_table;

    fn export_to_string(table: &VideoTable) -> String {
        let mut buf = Vec::new();
        write_table_csv(table, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_table_exports_header_only() {
        let out = export_to_string(&VideoTable::default());
        assert_eq!(out.trim_end(), HEADER.join(","));
    }

    #[test]
    fn header_matches_serialized_field_order() {
        let table = build_table(&[json!({"playCount": 1})]);
        let out = export_to_string(&table);
        let mut reader = csv::Reader::from_reader(out.as_bytes());
        let headers: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_owned)
            .collect();
        assert_eq!(headers, HEADER);
    }

    #[test]
    fn counts_round_trip_exactly() {
        let table = build_table(&[
            json!({
                "id": "1",
                "desc": "caption, with \"quotes\"\nand a newline",
                "createTime": 1_700_000_000,
                "stats": {
                    "playCount": 9_007_199_254_740_993_u64,
                    "diggCount": 123_456_789,
                    "shareCount": 42,
                    "commentCount": 7,
                    "collectCount": 3
                },
                "author": {"uniqueId": "c", "stats": {"followerCount": 1_000_001}}
            }),
            json!({"id": "2", "createTime": 1_600_000_000, "playCount": 0}),
        ]);
        let out = export_to_string(&table);

        let mut reader = csv::Reader::from_reader(out.as_bytes());
        let rows: Vec<CsvRow> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 2);

        for (row, video) in rows.iter().zip(table.iter()) {
            assert_eq!(row.id, video.id);
            assert_eq!(row.text, video.text);
            assert_eq!(row.play_count, video.play_count);
            assert_eq!(row.digg_count, video.digg_count);
            assert_eq!(row.share_count, video.share_count);
            assert_eq!(row.comment_count, video.comment_count);
            assert_eq!(row.collect_count, video.collect_count);
            assert_eq!(row.author_followers, video.author_followers);
        }
        assert_eq!(rows[0].play_count, 9_007_199_254_740_993);
        assert!(rows[1].viral_ratio.abs() < f64::EPSILON);
    }

    #[test]
    fn saturated_counts_export_as_u64_max() {
        let table = build_table(&[json!({
            "id": "big",
            "playCount": 1e20,
            "diggCount": "1e30",
            "shareCount": 18_446_744_073_709_551_615_u64
        })]);
        let out = export_to_string(&table);

        let mut reader = csv::Reader::from_reader(out.as_bytes());
        let rows: Vec<CsvRow> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows[0].play_count, u64::MAX);
        assert_eq!(rows[0].digg_count, u64::MAX);
        assert_eq!(rows[0].share_count, u64::MAX);
        assert!(out.contains("18446744073709551615"));
    }
}
