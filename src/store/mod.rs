//! Object store listing.
//!
//! The store is reached through the [`ObjectLister`] trait so the enumeration
//! loop can run against S3 in production and an in-memory fake in tests. The
//! main entry point is [`list_keys`].

mod enumerator;
mod s3;

use crate::errors::AppResult;
use async_trait::async_trait;

// Re-export public API
pub use enumerator::list_keys;
pub use s3::{s3_client, S3Lister};

/// One page of a paginated listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    /// Keys returned by this page, in store order
    pub keys: Vec<String>,
    /// Cursor for the next page; `None` on the last page
    pub next_token: Option<String>,
}

/// A store able to list object keys one page at a time.
#[async_trait]
pub trait ObjectLister {
    /// Lists one page of keys in `bucket` under `prefix`, resuming at
    /// `continuation_token` when given.
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<&str>,
    ) -> AppResult<ListPage>;
}
