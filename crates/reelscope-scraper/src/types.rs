use serde::Serialize;

/// Input document for the TikTok profile-scraper actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileScrapeInput {
    pub profiles: Vec<String>,
    pub results_per_page: u32,
    pub should_download_videos: bool,
    pub should_download_covers: bool,
}

impl ProfileScrapeInput {
    /// Metadata-only scrape of the latest `limit` videos of one profile.
    #[must_use]
    pub fn for_profile(identity: &str, limit: u32) -> Self {
        Self {
            profiles: vec![identity.to_owned()],
            results_per_page: limit,
            should_download_videos: false,
            should_download_covers: false,
        }
    }
}
