//! Raw record source for reelscope: the Apify profile-scraper client and its
//! on-disk fetch cache.
//!
//! Records are returned as untyped JSON; interpreting them is the job of
//! `reelscope-metrics`.

pub mod cache;
pub mod client;
pub mod error;
mod rate_limit;
pub mod types;

pub use cache::{cache_key, RecordCache};
pub use client::ApifyClient;
pub use error::ScraperError;
pub use types::ProfileScrapeInput;
