//! Terminal rendering and file output for analysis results.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use reelscope_metrics::{write_table_csv, MetricsSummary, VideoRecord, VideoTable};

use crate::state::AnalysisSession;

/// Caption characters shown per top/flop entry.
const CAPTION_PREVIEW_CHARS: usize = 80;

/// Formats `n` with `,` thousands separators.
pub(crate) fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub(crate) fn render_overview(identity: &str, metrics: &MetricsSummary) -> String {
    format!(
        "@{identity}\n\
         videos analyzed   {}\n\
         avg views         {:.0}\n\
         engagement rate   {:.2}%\n\
         viral ratio       {:.4}\n\
         trend (last 10)   {:+.1}%\n\
         avg likes/shares/comments  {:.1} / {:.1} / {:.1}\n",
        metrics.total_videos,
        metrics.avg_views,
        metrics.avg_engagement_rate,
        metrics.avg_viral_ratio,
        metrics.trend_percent,
        metrics.avg_likes,
        metrics.avg_shares,
        metrics.avg_comments,
    )
}

pub(crate) fn render_videos(title: &str, videos: &[VideoRecord]) -> String {
    let mut out = format!("{title}\n");
    if videos.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }

    for (i, video) in videos.iter().enumerate() {
        let date = if video.create_date.is_empty() {
            "n/a"
        } else {
            video.create_date.as_str()
        };
        let caption: String = video.text.chars().take(CAPTION_PREVIEW_CHARS).collect();
        out.push_str(&format!(
            "  #{} {date}  views {}  likes {}  shares {}  {}s\n     {}\n",
            i + 1,
            group_thousands(video.play_count),
            group_thousands(video.digg_count),
            group_thousands(video.share_count),
            video.duration,
            if caption.is_empty() { "(no caption)" } else { caption.as_str() },
        ));
    }
    out
}

/// Prints the session to stdout, as text or as JSON.
pub(crate) fn print_session(session: &AnalysisSession, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        let body = serde_json::to_string_pretty(&session.to_json())
            .map_err(|e| anyhow::anyhow!("failed to serialize summary: {e}"))?;
        println!("{body}");
        return Ok(());
    }

    let Some(analysis) = session.analysis() else {
        println!("no analysis available");
        return Ok(());
    };

    println!("{}", render_overview(&analysis.identity, &analysis.metrics));
    println!("{}", render_videos("Top 3 videos", &analysis.metrics.top3));
    println!("{}", render_videos("Flop 3 videos", &analysis.metrics.flop3));
    if let Some(report) = session.report() {
        println!("Strategic report\n\n{report}");
    }
    Ok(())
}

/// Writes `table` as CSV to `path`, creating or truncating the file.
pub(crate) fn write_csv_file(table: &VideoTable, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .map_err(|e| anyhow::anyhow!("failed to create {}: {e}", path.display()))?;
    write_table_csv(table, BufWriter::new(file))
        .map_err(|e| anyhow::anyhow!("failed to write CSV to {}: {e}", path.display()))?;
    tracing::info!(path = %path.display(), rows = table.len(), "wrote CSV export");
    Ok(())
}

pub(crate) fn write_report_file(report: &str, path: &Path) -> anyhow::Result<()> {
    std::fs::write(path, report)
        .map_err(|e| anyhow::anyhow!("failed to write report to {}: {e}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote report");
    Ok(())
}
