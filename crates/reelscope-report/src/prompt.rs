//! Instruction prompt for the strategic report.

use reelscope_metrics::ReportRequest;
use serde::Serialize;

/// Scalar block of the prompt; `top3`/`flop3` get their own sections.
#[derive(Serialize)]
struct Aggregates<'a> {
    username: &'a str,
    total_videos_analyzed: usize,
    avg_views: f64,
    avg_likes: f64,
    avg_shares: f64,
    avg_comments: f64,
    avg_engagement_rate: f64,
    avg_viral_ratio: f64,
    avg_conversion_potential: f64,
    trend_percentage: f64,
}

impl<'a> From<&'a ReportRequest> for Aggregates<'a> {
    fn from(r: &'a ReportRequest) -> Self {
        Self {
            username: &r.username,
            total_videos_analyzed: r.total_videos_analyzed,
            avg_views: r.avg_views,
            avg_likes: r.avg_likes,
            avg_shares: r.avg_shares,
            avg_comments: r.avg_comments,
            avg_engagement_rate: r.avg_engagement_rate,
            avg_viral_ratio: r.avg_viral_ratio,
            avg_conversion_potential: r.avg_conversion_potential,
            trend_percentage: r.trend_percentage,
        }
    }
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Renders the report prompt for `request`.
///
/// Aggregates, top and flop videos are embedded as pretty-printed JSON; the
/// trend is repeated inline with one decimal so the shadowban question can
/// reference it directly.
#[must_use]
pub fn build_prompt(request: &ReportRequest) -> String {
    let aggregates = pretty(&Aggregates::from(request));
    let top3 = pretty(&request.top3);
    let flop3 = pretty(&request.flop3);
    let trend = request.trend_percentage;

    format!(
        "You are an experienced growth manager for short-form video creators. \
Analyze the data of this TikTok account.

## GOAL
Move qualified traffic from TikTok to the creator's link in bio and other profiles.

## AGGREGATE DATA
{aggregates}

## TOP 3 VIDEOS (best performance)
{top3}

## FLOP 3 VIDEOS (worst performance)
{flop3}

## REQUESTED ANALYSIS

1. **SHADOWBAN CHECK**: Is there a shadowban problem? Look for sudden drops in views \
(trend: {trend:.1}%).

2. **AUDIENCE QUALITY**: Are the videos attracting the intended audience or only going \
viral at random? Base this on the shares/likes ratio and on comments.

3. **CONTENT PATTERN**: What do the top 3 have in common compared with the flop 3? \
(length, hook, content type)

4. **3 OPERATIONAL TIPS**: Give 3 short, actionable tips for next week on:
   - Audio/trends to use
   - Optimal video length
   - Visual hooks that convert

Answer directly and professionally."
    )
}
