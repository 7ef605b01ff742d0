//! `yelpcrawl crawl`: seed a crawl from the search parameters and stream
//! records to a JSON-lines sink.
//!
//! Record-level failures are logged and counted; a page-level failure stops
//! the crawl and makes the command exit non-zero after the records already
//! produced have been written.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use futures::{Stream, StreamExt};
use yelpcrawl_core::{load_search_params, AppConfig, SearchParams};
use yelpcrawl_scraper::{
    build_search_url, BrowserProfile, BusinessRecord, CrawlSettings, Crawler, ProfileError,
    RequestProfile, ScraperError, YelpClient,
};

#[derive(Debug, Default)]
pub(crate) struct CrawlArgs {
    pub(crate) category: Option<String>,
    pub(crate) location: Option<String>,
    pub(crate) params: Option<PathBuf>,
    pub(crate) output: Option<PathBuf>,
    pub(crate) dry_run: bool,
}

/// Totals for one crawl run.
#[derive(Debug, Default)]
pub(crate) struct CrawlSummary {
    pub(crate) written: usize,
    pub(crate) failed_records: usize,
    pub(crate) aborted: Option<ScraperError>,
}

/// Explicit `--category`/`--location` win; otherwise the parameters file is
/// read from `--params` or the configured path.
pub(crate) fn resolve_search_params(
    config: &AppConfig,
    args: &CrawlArgs,
) -> anyhow::Result<SearchParams> {
    if let (Some(category), Some(location)) = (&args.category, &args.location) {
        return Ok(SearchParams::new(category, location)?);
    }
    let path: &Path = args
        .params
        .as_deref()
        .unwrap_or(config.params_path.as_path());
    load_search_params(path)
        .with_context(|| format!("loading search parameters from {}", path.display()))
}

fn build_profile(config: &AppConfig) -> Result<BrowserProfile, ProfileError> {
    match &config.user_agent {
        Some(agent) => BrowserProfile::with_user_agent(agent, &config.site_origin),
        None => BrowserProfile::rotate(&config.site_origin),
    }
}

pub(crate) fn crawl_settings(config: &AppConfig) -> CrawlSettings {
    let mut settings = CrawlSettings::new(&config.site_origin);
    settings.max_concurrent_details = config.max_concurrent_details;
    settings.max_pages = config.max_pages;
    settings
}

/// Runs a crawl end to end.
///
/// # Errors
///
/// Returns an error if the search parameters or client identity cannot be
/// established, the output cannot be written, or the crawl stopped on a
/// page-level failure.
pub(crate) async fn run_crawl(config: &AppConfig, args: CrawlArgs) -> anyhow::Result<()> {
    let params = resolve_search_params(config, &args)?;
    let seed = build_search_url(&config.site_origin, &params.category, &params.location);
    let profile = build_profile(config).context("choosing a client identity")?;

    if args.dry_run {
        println!("[dry-run] seed URL: {seed}");
        println!("[dry-run] user agent: {}", profile.user_agent());
        return Ok(());
    }

    tracing::info!(
        category = %params.category,
        location = %params.location,
        user_agent = profile.user_agent(),
        chrome_version = ?profile.chrome_version(),
        "starting crawl"
    );

    let client = YelpClient::new(config.request_timeout_secs, &profile)?;
    let crawler = Crawler::new(client, crawl_settings(config));

    let mut sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let summary = write_records(crawler.crawl(seed), &mut sink).await?;
    sink.flush().context("flushing output")?;

    tracing::info!(
        written = summary.written,
        failed_records = summary.failed_records,
        completed = summary.aborted.is_none(),
        "crawl finished"
    );

    match summary.aborted {
        Some(e) => Err(anyhow::Error::new(e).context("crawl stopped before the last results page")),
        None => Ok(()),
    }
}

/// Drains a crawl into `out`, one JSON object per line.
///
/// # Errors
///
/// Returns an error only if serializing or writing a record fails; crawl
/// errors are recorded in the summary.
pub(crate) async fn write_records<S, W>(records: S, out: &mut W) -> anyhow::Result<CrawlSummary>
where
    S: Stream<Item = Result<BusinessRecord, ScraperError>>,
    W: Write + ?Sized,
{
    let mut summary = CrawlSummary::default();
    futures::pin_mut!(records);

    while let Some(item) = records.next().await {
        match item {
            Ok(record) => {
                serde_json::to_writer(&mut *out, &record).context("serializing record")?;
                out.write_all(b"\n").context("writing record")?;
                summary.written += 1;
            }
            Err(e) if e.is_page_level() => {
                tracing::error!(error = %e, "crawl stopped");
                summary.aborted = Some(e);
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping record");
                summary.failed_records += 1;
            }
        }
    }

    Ok(summary)
}
