//! Integration tests for downloader module

#[path = "common/mod.rs"]
mod common;

use common::*;
use divvy_tripdata::downloader;
use divvy_tripdata::errors::AppError;
use std::collections::HashMap;
use tempfile::TempDir;
use url::Url;

#[tokio::test]
async fn test_download_archives_extracts_into_output_dir() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("data");

    let mut routes = HashMap::new();
    routes.insert(
        "/202401-divvy-tripdata.zip".to_string(),
        (
            200,
            create_zip_bytes(&[("202401-divvy-tripdata.csv", "ride_id\nA1\n")]),
        ),
    );
    routes.insert(
        "/202402-divvy-tripdata.zip".to_string(),
        (
            200,
            create_zip_bytes(&[("202402-divvy-tripdata.csv", "ride_id\nB2\n")]),
        ),
    );
    let (base, server) = serve(routes, 2).await;

    let keys = vec![
        "202401-divvy-tripdata.zip".to_string(),
        "202402-divvy-tripdata.zip".to_string(),
    ];
    let summary = downloader::download_archives(
        &reqwest::Client::new(),
        &Url::parse(&base).unwrap(),
        &keys,
        &output_dir,
    )
    .await
    .unwrap();

    assert_eq!(summary.archives, 2);
    assert_eq!(summary.files, 2);
    assert!(summary.bytes > 0);
    assert_eq!(
        std::fs::read_to_string(output_dir.join("202402-divvy-tripdata.csv")).unwrap(),
        "ride_id\nB2\n"
    );
    assert_eq!(
        server.await.unwrap(),
        vec!["/202401-divvy-tripdata.zip", "/202402-divvy-tripdata.zip"]
    );
}

#[tokio::test]
async fn test_download_archives_forbidden_xml_is_archive_error() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("data");

    let mut routes = HashMap::new();
    routes.insert(
        "/202401-divvy-tripdata.zip".to_string(),
        (403, ACCESS_DENIED_XML.as_bytes().to_vec()),
    );
    let (base, _server) = serve(routes, 1).await;

    let result = downloader::download_archives(
        &reqwest::Client::new(),
        &Url::parse(&base).unwrap(),
        &["202401-divvy-tripdata.zip".to_string()],
        &output_dir,
    )
    .await;

    assert!(matches!(result, Err(AppError::ArchiveError(_))));
    assert!(!output_dir.exists());
}

#[tokio::test]
async fn test_download_archives_output_path_is_a_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("data");
    std::fs::write(&output_dir, b"not a directory").unwrap();

    let mut routes = HashMap::new();
    routes.insert(
        "/202401-divvy-tripdata.zip".to_string(),
        (200, create_zip_bytes(&[("202401-divvy-tripdata.csv", "ride_id\n1\n")])),
    );
    let (base, _server) = serve(routes, 1).await;

    let result = downloader::download_archives(
        &reqwest::Client::new(),
        &Url::parse(&base).unwrap(),
        &["202401-divvy-tripdata.zip".to_string()],
        &output_dir,
    )
    .await;

    assert!(matches!(result, Err(AppError::IoError(_))));
}

#[tokio::test]
async fn test_download_archives_stops_at_first_failure() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("data");

    let mut routes = HashMap::new();
    routes.insert(
        "/202401-divvy-tripdata.zip".to_string(),
        (200, create_zip_bytes(&[("first.csv", "1")])),
    );
    routes.insert(
        "/202402-divvy-tripdata.zip".to_string(),
        (404, b"<Error><Code>NoSuchKey</Code></Error>".to_vec()),
    );
    let (base, server) = serve(routes, 2).await;

    let result = downloader::download_archives(
        &reqwest::Client::new(),
        &Url::parse(&base).unwrap(),
        &[
            "202401-divvy-tripdata.zip".to_string(),
            "202402-divvy-tripdata.zip".to_string(),
        ],
        &output_dir,
    )
    .await;

    assert!(matches!(result, Err(AppError::ArchiveError(_))));
    // Files extracted before the failure are kept
    assert!(output_dir.join("first.csv").exists());
    assert_eq!(server.await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_download_archives_connection_refused_is_network_error() {
    let temp_dir = TempDir::new().unwrap();
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = downloader::download_archives(
        &reqwest::Client::new(),
        &Url::parse(&format!("http://{addr}/")).unwrap(),
        &["202401-divvy-tripdata.zip".to_string()],
        temp_dir.path(),
    )
    .await;

    assert!(matches!(result, Err(AppError::NetworkError(_))));
}
