use crate::errors::{AppError, AppResult};
use crate::extractor::extract_archive_blocking;
use crate::{ui, utils};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

/// Totals for a completed download run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Archives downloaded and extracted
    pub archives: usize,
    /// Files written into the output directory
    pub files: usize,
    /// Response bytes received
    pub bytes: u64,
}

/// Builds the public URL of `key` under `base_url`.
///
/// Each `/`-separated component of the key becomes a path segment and is
/// percent-encoded, so keys containing spaces or `:` stay inside the bucket
/// path.
///
/// # Errors
///
/// Returns `UrlError` if `base_url` cannot carry a path (e.g. `mailto:`).
pub fn object_url(base_url: &Url, key: &str) -> AppResult<Url> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| AppError::UrlError(format!("Cannot append a key to {base_url}")))?
        .pop_if_empty()
        .extend(key.split('/'));
    Ok(url)
}

/// Fetches the full body of one archive.
///
/// The status code is not used to reject the response: a non-success status is
/// logged and the body is still handed to the extractor, which reports the
/// failure as an archive error.
async fn fetch_archive(client: &reqwest::Client, url: &Url, key: &str) -> AppResult<Vec<u8>> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| AppError::NetworkError(format!("Failed to download {key}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        warn!(
            key = key,
            status = status.as_u16(),
            "Unexpected HTTP status, attempting extraction anyway"
        );
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| AppError::NetworkError(format!("Failed to read body of {key}: {e}")))?;

    debug!(key = key, bytes = body.len(), "Downloaded archive");
    Ok(body.to_vec())
}

/// Downloads each key from `base_url` and extracts it into `output_dir`.
///
/// Keys are processed strictly in order, one request at a time, and each
/// archive is fully extracted before the next request is sent.
///
/// # Behavior
///
/// - **Directory creation**: `output_dir` is created if it does not exist.
/// - **No timeout**: requests wait as long as the server does, unless the
///   caller configured one on `client`.
/// - **Fail fast**: the first download or extraction error stops the run;
///   files already extracted are left in place.
/// - **Progress tracking**: a progress bar is displayed while downloading.
///
/// # Arguments
///
/// * `client` - HTTP client for making requests
/// * `base_url` - Public bucket URL, e.g. `https://divvy-tripdata.s3.amazonaws.com/`
/// * `keys` - Object keys to fetch, typically the output of the month window
/// * `output_dir` - Directory the archives are extracted into
///
/// # Errors
///
/// Returns `NetworkError` if a request fails, `ArchiveError` if a body is not
/// a zip archive (including HTTP error documents), and `IoError` if the output
/// directory cannot be written.
pub async fn download_archives(
    client: &reqwest::Client,
    base_url: &Url,
    keys: &[String],
    output_dir: &Path,
) -> AppResult<DownloadSummary> {
    let mut summary = DownloadSummary::default();
    if keys.is_empty() {
        info!("No archives selected, nothing to download");
        return Ok(summary);
    }

    let pb = ui::create_progress_bar(keys.len() as u64)?;
    let started = Instant::now();

    info!(
        total = keys.len(),
        output_dir = %output_dir.display(),
        "Starting download"
    );

    for key in keys {
        let url = object_url(base_url, key)?;
        pb.set_message(format!("Downloading {key}"));

        let files = match fetch_archive(client, &url, key).await {
            Ok(body) => {
                summary.bytes += body.len() as u64;
                pb.set_message(format!("Extracting {key}"));
                extract_archive_blocking(body, output_dir.to_path_buf()).await
            }
            Err(e) => Err(e),
        };

        let files = match files {
            Ok(files) => files,
            Err(e) => {
                pb.abandon_with_message(format!("Failed {key}"));
                warn!(key = key.as_str(), url = %url, error = %e, "Failed to fetch archive");
                return Err(e);
            }
        };

        summary.archives += 1;
        summary.files += files;
        pb.inc(1);
        debug!(key = key.as_str(), files = files, "Archive extracted");
    }

    pb.finish_with_message(format!("Extracted {} archive(s)", summary.archives));
    info!(
        archives = summary.archives,
        files = summary.files,
        size_mb = utils::megabytes(summary.bytes),
        elapsed = %utils::format_duration(started.elapsed()),
        "Download completed"
    );

    Ok(summary)
}
