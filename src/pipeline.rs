//! Sequential fetch pipeline: list keys, select the month window, download.

use crate::config::ResolvedConfig;
use crate::downloader::{download_archives, DownloadSummary};
use crate::errors::AppResult;
use crate::store::{list_keys, ObjectLister};
use crate::window::PrefixWindow;
use chrono::NaiveDate;
use futures::TryStreamExt;
use tracing::info;
use url::Url;

/// Lists the bucket and returns the keys inside the month window preceding
/// `reference`, in listing order.
///
/// # Errors
///
/// Propagates listing failures and rejects an empty or out-of-range window.
pub async fn select_window_keys<L>(
    lister: &L,
    config: &ResolvedConfig,
    reference: NaiveDate,
) -> AppResult<Vec<String>>
where
    L: ObjectLister + ?Sized,
{
    let window = PrefixWindow::preceding(reference, config.window_months)?;

    let mut prefixes = window.prefixes();
    let oldest = prefixes.next().unwrap_or_default();
    let newest = prefixes.last().unwrap_or(oldest);

    info!(
        bucket = config.bucket.as_str(),
        prefix = config.prefix.as_str(),
        months = window.month_count(),
        oldest = oldest,
        newest = newest,
        "Listing bucket"
    );

    let keys: Vec<String> = window
        .select_stream(list_keys(lister, &config.bucket, &config.prefix))
        .try_collect()
        .await?;

    info!(selected = keys.len(), "Selected archives in window");
    Ok(keys)
}

/// Runs the full pipeline: select the window keys, then download and extract
/// each archive into the configured output directory.
pub async fn fetch_window<L>(
    lister: &L,
    client: &reqwest::Client,
    config: &ResolvedConfig,
    reference: NaiveDate,
) -> AppResult<DownloadSummary>
where
    L: ObjectLister + ?Sized,
{
    let keys = select_window_keys(lister, config, reference).await?;
    let base_url = Url::parse(&config.public_base_url())?;
    download_archives(client, &base_url, &keys, &config.output_dir).await
}
