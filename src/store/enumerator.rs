use super::{ListPage, ObjectLister};
use crate::errors::{AppError, AppResult};
use futures::{future, stream, Stream, TryStreamExt};
use tracing::debug;

/// Pagination cursor owned by the enumeration loop.
#[derive(Debug, PartialEq, Eq)]
enum Cursor {
    Start,
    Continue(String),
    Done,
}

/// Lists every key in `bucket` that starts with `prefix`.
///
/// Pages are requested lazily, one at a time, as the stream is polled. The
/// first request carries no continuation token; each following request
/// passes the token returned by the previous page. A page without a next
/// token ends the stream. There is no cap on the number of pages.
///
/// The prefix is sent to the store and applied again to the returned keys, so
/// listers that ignore it still yield only matching keys. An empty prefix
/// matches everything.
///
/// The stream cannot be resumed; calling `list_keys` again re-lists from the
/// first page. A listing failure is yielded as the stream's last item.
///
/// # Example
///
/// ```no_run
/// use divvy_tripdata::store::{list_keys, ObjectLister};
/// use futures::TryStreamExt;
///
/// # async fn example(lister: &dyn ObjectLister) -> divvy_tripdata::errors::AppResult<()> {
/// let keys: Vec<String> = list_keys(lister, "divvy-tripdata", "").try_collect().await?;
/// println!("{} archives available", keys.len());
/// # Ok(())
/// # }
/// ```
pub fn list_keys<'a, L>(
    lister: &'a L,
    bucket: &'a str,
    prefix: &'a str,
) -> impl Stream<Item = AppResult<String>> + 'a
where
    L: ObjectLister + ?Sized,
{
    let pages = stream::try_unfold(Cursor::Start, move |cursor| async move {
        let token = match cursor {
            Cursor::Done => return Ok(None),
            Cursor::Start => None,
            Cursor::Continue(token) => Some(token),
        };

        let ListPage { keys, next_token } =
            lister.list_page(bucket, prefix, token.as_deref()).await?;

        debug!(
            bucket = bucket,
            prefix = prefix,
            keys = keys.len(),
            more = next_token.is_some(),
            "Received listing page"
        );

        let next = match next_token {
            Some(token) => Cursor::Continue(token),
            None => Cursor::Done,
        };
        Ok::<_, AppError>(Some((keys, next)))
    });

    pages
        .map_ok(|keys| stream::iter(keys.into_iter().map(Ok::<_, AppError>)))
        .try_flatten()
        .try_filter(move |key| future::ready(key.starts_with(prefix)))
}
