use super::{ListPage, ObjectLister};
use crate::constants::CREDENTIALS_PROVIDER_NAME;
use crate::credentials::Credentials;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;
use tracing::debug;

/// Builds an S3 client from explicit credentials.
///
/// Credentials from the environment or shared profile files are never
/// consulted; only the pair read from the credentials CSV is used. An
/// `endpoint_url` points the client at an S3-compatible service and switches
/// to path-style addressing.
pub async fn s3_client(
    credentials: &Credentials,
    region: &str,
    endpoint_url: Option<&str>,
) -> Client {
    let provider = aws_sdk_s3::config::Credentials::new(
        credentials.access_key_id.clone(),
        credentials.secret_access_key.clone(),
        None,
        None,
        CREDENTIALS_PROVIDER_NAME,
    );

    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .credentials_provider(provider)
        .region(Region::new(region.to_string()));
    if let Some(endpoint) = endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }
    let shared_config = loader.load().await;

    let config = aws_sdk_s3::config::Builder::from(&shared_config)
        .force_path_style(endpoint_url.is_some())
        .build();

    Client::from_conf(config)
}

/// [`ObjectLister`] backed by `ListObjectsV2`.
#[derive(Debug, Clone)]
pub struct S3Lister {
    client: Client,
}

impl S3Lister {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectLister for S3Lister {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<&str>,
    ) -> AppResult<ListPage> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .set_continuation_token(continuation_token.map(str::to_owned))
            .send()
            .await
            .map_err(|e| {
                AppError::StorageError(format!(
                    "Failed to list objects in bucket {bucket}: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        let keys: Vec<String> = output
            .contents()
            .iter()
            .filter_map(|object| object.key().map(str::to_owned))
            .collect();

        debug!(
            bucket = bucket,
            keys = keys.len(),
            truncated = output.is_truncated().unwrap_or(false),
            "Listed page"
        );

        Ok(ListPage {
            keys,
            next_token: output.next_continuation_token().map(str::to_owned),
        })
    }
}
