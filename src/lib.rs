//! divvy-tripdata library
//!
//! This crate provides the core functionality for the `divvy-tripdata` binary.
//! Keep the crate root minimal: implementation and tests live in their modules.
//!
//! ## Overview
//!
//! The library is organized into modules that handle the steps of the fetch pipeline:
//!
//! - [`credentials`] - Reads the access key pair from a credentials CSV
//! - [`store`] - Lists object keys in a bucket, following continuation tokens
//! - [`window`] - Computes the preceding months' `YYYYMM` prefixes and selects keys
//! - [`downloader`] - Downloads the selected archives from the public bucket URL
//! - [`extractor`] - Extracts in-memory zip archives into the output directory
//! - [`pipeline`] - Chains listing, selection and download
//! - [`cli`] - Command-line interface for running the pipeline
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use divvy_tripdata::{config::ResolvedConfig, credentials, pipeline, store, errors::AppResult};
//! use std::path::Path;
//!
//! # async fn example() -> AppResult<()> {
//! let config = ResolvedConfig::default();
//! let creds = credentials::read_credentials(Path::new("credentials.csv"))?;
//! let lister = store::S3Lister::new(store::s3_client(&creds, &config.region, None).await);
//! let today = chrono::Local::now().date_naive();
//!
//! let summary = pipeline::fetch_window(&lister, &reqwest::Client::new(), &config, today).await?;
//! println!("Extracted {} files", summary.files);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod downloader;
pub mod errors;
pub mod extractor;
pub mod pipeline;
pub mod store;
pub mod ui;
pub mod utils;
pub mod window;
