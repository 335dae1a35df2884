use crate::errors::{AppError, AppResult};
use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use zip::ZipArchive;

/// Extracts an in-memory zip archive into `output_dir`.
///
/// The whole body is treated as a zip archive; anything else (for example an
/// XML error document returned with a 403) fails with `ArchiveError` before a
/// single file is written.
///
/// # Behavior
///
/// - **Directory creation**: `output_dir` and any nested directories are
///   created as needed.
/// - **Overwrite**: existing files with the same name are truncated and
///   rewritten.
/// - **Unsafe names**: entries whose path would escape `output_dir` are
///   skipped with a warning.
/// - **No rollback**: files written before a failure are left in place.
///
/// # Returns
///
/// The number of files written.
///
/// # Errors
///
/// Returns `ArchiveError` if the bytes are not a readable zip archive or an
/// entry cannot be decompressed, and `IoError` if writing to disk fails.
pub fn extract_archive(bytes: &[u8], output_dir: &Path) -> AppResult<usize> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AppError::ArchiveError(format!("Failed to read ZIP archive: {e}")))?;

    std::fs::create_dir_all(output_dir).map_err(|e| {
        AppError::IoError(format!(
            "Failed to create output directory {}: {}",
            output_dir.display(),
            e
        ))
    })?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| {
            AppError::ArchiveError(format!("Failed to read entry {i} from ZIP: {e}"))
        })?;

        let out_path = match entry.enclosed_name() {
            Some(path) => output_dir.join(path),
            None => {
                warn!(entry = entry.name(), "Skipping ZIP entry with unsafe path");
                continue;
            }
        };

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path).map_err(|e| {
                AppError::IoError(format!(
                    "Failed to create directory {}: {}",
                    out_path.display(),
                    e
                ))
            })?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::IoError(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut out_file = File::create(&out_path).map_err(|e| {
            AppError::IoError(format!(
                "Failed to create file {}: {}",
                out_path.display(),
                e
            ))
        })?;

        std::io::copy(&mut entry, &mut out_file).map_err(|e| {
            AppError::ArchiveError(format!(
                "Failed to extract {} to {}: {}",
                entry.name(),
                out_path.display(),
                e
            ))
        })?;

        debug!(file = %out_path.display(), size = entry.size(), "Extracted file");
        written += 1;
    }

    Ok(written)
}

/// Runs [`extract_archive`] on the blocking thread pool and waits for it.
pub async fn extract_archive_blocking(bytes: Vec<u8>, output_dir: PathBuf) -> AppResult<usize> {
    tokio::task::spawn_blocking(move || extract_archive(&bytes, &output_dir))
        .await
        .map_err(|e| AppError::IoError(format!("Task join error: {e}")))?
}
