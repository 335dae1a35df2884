//! Download and extraction of the selected trip-data archives.
//!
//! Archives are fetched from the bucket's public HTTPS endpoint, one at a
//! time, and unpacked into the output directory. The main entry point is
//! [`download_archives`].

mod file_downloader;

// Re-export public API
pub use file_downloader::{download_archives, object_url, DownloadSummary};
