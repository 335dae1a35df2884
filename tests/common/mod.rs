//! Common test utilities for integration tests

use async_trait::async_trait;
use divvy_tripdata::errors::{AppError, AppResult};
use divvy_tripdata::store::{ListPage, ObjectLister};
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::sync::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Helper function to build an in-memory ZIP archive with the given files
#[allow(dead_code)]
pub fn create_zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    use zip::write::FileOptions;
    use zip::ZipWriter;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, content) in files {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

/// S3 error document returned for forbidden objects
#[allow(dead_code)]
pub const ACCESS_DENIED_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error><Code>AccessDenied</Code><Message>Access Denied</Message><RequestId>8E2C1A</RequestId></Error>"#;

/// In-memory lister serving fixed pages, optionally failing on one call
#[allow(dead_code)]
pub struct PagedLister {
    pages: Vec<ListPage>,
    fail_on_call: Option<usize>,
    calls: Mutex<Vec<Option<String>>>,
}

#[allow(dead_code)]
impl PagedLister {
    /// Builds pages from key lists; page `i` points to page `i + 1` with token `page-{i+1}`
    pub fn new(pages: &[&[&str]]) -> Self {
        let pages = pages
            .iter()
            .enumerate()
            .map(|(i, keys)| ListPage {
                keys: keys.iter().map(|k| k.to_string()).collect(),
                next_token: (i + 1 < pages.len()).then(|| format!("page-{}", i + 1)),
            })
            .collect();
        Self {
            pages,
            fail_on_call: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    /// Continuation tokens received, one entry per call
    pub fn tokens(&self) -> Vec<Option<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectLister for PagedLister {
    async fn list_page(
        &self,
        _bucket: &str,
        _prefix: &str,
        continuation_token: Option<&str>,
    ) -> AppResult<ListPage> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(continuation_token.map(str::to_owned));
            calls.len() - 1
        };
        if self.fail_on_call == Some(call) {
            return Err(AppError::StorageError(
                "Failed to list objects in bucket: NoSuchBucket".to_string(),
            ));
        }
        Ok(self.pages[call].clone())
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        _ => "Unknown",
    }
}

/// Serves `connections` HTTP requests on a local port.
///
/// `routes` maps request paths to `(status, body)`; unknown paths get a 404.
/// Returns the base URL and a handle resolving to the requested paths in order.
#[allow(dead_code)]
pub async fn serve(
    routes: HashMap<String, (u16, Vec<u8>)>,
    connections: usize,
) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut requested = Vec::with_capacity(connections);
        for _ in 0..connections {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }

            let request = String::from_utf8_lossy(&request);
            let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
            let (status, body) = routes
                .get(&path)
                .cloned()
                .unwrap_or((404, b"not found".to_vec()));

            let head = format!(
                "HTTP/1.1 {status} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                reason(status),
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(&body).await.unwrap();
            let _ = socket.shutdown().await;

            requested.push(path);
        }
        requested
    });

    (format!("http://{addr}/"), handle)
}
