//! `analyze` command: fetch, analyze, report.
//!
//! A failed fetch is not fatal: the run continues with no records and an
//! advisory on stderr.

use std::path::PathBuf;

use reelscope_core::AppConfig;
use reelscope_metrics::{analyze, Analysis};
use reelscope_report::{generate_report, GeminiClient};
use reelscope_scraper::{cache_key, ApifyClient, RecordCache};
use serde_json::Value;

use crate::output::{print_session, write_csv_file, write_report_file};
use crate::state::AnalysisSession;

#[derive(Debug)]
pub(crate) struct AnalyzeArgs {
    pub(crate) username: String,
    pub(crate) limit: Option<u32>,
    pub(crate) refresh: bool,
    pub(crate) csv: Option<PathBuf>,
    pub(crate) skip_report: bool,
    pub(crate) report_out: Option<PathBuf>,
    pub(crate) json: bool,
}

/// Trims whitespace and a leading `@` from a profile handle.
///
/// # Errors
///
/// Returns an error if nothing is left after trimming.
pub(crate) fn sanitize_username(raw: &str) -> anyhow::Result<String> {
    let identity = raw.trim().trim_start_matches('@').trim();
    if identity.is_empty() {
        return Err(anyhow::anyhow!("username must not be empty"));
    }
    Ok(identity.to_owned())
}

/// Resolves the effective record limit from the flag and the config.
pub(crate) fn effective_limit(flag: Option<u32>, configured: u32) -> anyhow::Result<u32> {
    match flag.unwrap_or(configured) {
        0 => Err(anyhow::anyhow!("--limit must be at least 1")),
        n => Ok(n),
    }
}

pub(crate) async fn run_analyze(config: &AppConfig, args: &AnalyzeArgs) -> anyhow::Result<()> {
    let identity = sanitize_username(&args.username)?;
    let limit = effective_limit(args.limit, config.results_per_page)?;

    let raw = fetch_records(config, &identity, limit, args.refresh).await?;
    let analysis = analyze(&identity, &raw);
    if analysis.table.is_empty() {
        eprintln!("no videos found for @{identity}");
    }

    let report = if args.skip_report {
        None
    } else {
        build_report(config, &analysis).await?
    };

    let session = AnalysisSession::new(analysis, report);

    if let (Some(path), Some(analysis)) = (args.csv.as_deref(), session.analysis()) {
        write_csv_file(&analysis.table, path)?;
    }
    if let (Some(path), Some(report)) = (args.report_out.as_deref(), session.report()) {
        write_report_file(report, path)?;
    }

    print_session(&session, args.json)
}

/// Returns raw records for `identity`, from the cache when fresh.
///
/// Fetch failures are logged, reported on stderr and turned into an empty
/// batch. Only client construction errors are returned.
async fn fetch_records(
    config: &AppConfig,
    identity: &str,
    limit: u32,
    refresh: bool,
) -> anyhow::Result<Vec<Value>> {
    let cache = RecordCache::new(config.cache_dir.clone(), config.cache_ttl_secs);
    let key = cache_key(&config.apify_api_token, identity, limit);

    if refresh {
        tracing::info!(identity, "refresh requested, bypassing fetch cache");
    } else if let Some(records) = cache.load(&key).await {
        return Ok(records);
    }

    let client = ApifyClient::with_base_url(
        &config.apify_api_token,
        &config.apify_actor,
        config.request_timeout_secs,
        &config.user_agent,
        &config.apify_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build Apify client: {e}"))?
    .with_retry_policy(config.max_retries, config.retry_backoff_base_secs);

    match client.fetch_profile_videos(identity, limit).await {
        Ok(records) => {
            if records.is_empty() {
                tracing::info!(identity, "fetch returned no records; not caching");
            } else if let Err(e) = cache.store(&key, identity, &records).await {
                tracing::warn!(identity, error = %e, "failed to store fetch in cache");
            }
            Ok(records)
        }
        Err(e) => {
            tracing::warn!(identity, error = %e, "profile fetch failed");
            eprintln!(
                "could not fetch videos for @{identity}: {e}\n\
                 check APIFY_API_TOKEN and the username; continuing with no data"
            );
            Ok(Vec::new())
        }
    }
}

/// Generates the report, or `None` when there is nothing to report on or no
/// Gemini key is configured.
async fn build_report(config: &AppConfig, analysis: &Analysis) -> anyhow::Result<Option<String>> {
    if analysis.table.is_empty() {
        tracing::info!(identity = %analysis.identity, "no videos; skipping report");
        return Ok(None);
    }
    let Some(api_key) = config.gemini_api_key.as_deref() else {
        tracing::info!("GEMINI_API_KEY not set; skipping report");
        return Ok(None);
    };

    let client = GeminiClient::with_base_url(
        api_key,
        &config.gemini_model,
        config.request_timeout_secs,
        &config.gemini_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build Gemini client: {e}"))?;

    Ok(Some(generate_report(&client, &analysis.report_request()).await))
}
