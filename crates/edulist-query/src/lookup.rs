//! Single-item lookup by slug.

use std::sync::Arc;

use tracing::{debug, instrument};

use edulist_core::error::{InvalidInputError, NotFoundError};
use edulist_core::{Item, ItemSource, Page, Pagination, QueryKey, Result};

use crate::cache::QueryCache;

/// Find the item with `slug` in a whole-collection source.
///
/// The collection is loaded through `cache`, so a lookup right after the list
/// was shown costs no request.
///
/// # Errors
///
/// Returns [`NotFoundError`] when no item carries `slug`, and
/// [`InvalidInputError::Other`] for paged sources, which cannot be searched
/// without walking every page.
#[instrument(skip(cache, source), fields(resource = %source.resource()))]
pub async fn find_by_slug<T: Item>(
    cache: &QueryCache,
    source: Arc<dyn ItemSource<Item = T>>,
    slug: &str,
) -> Result<T> {
    let resource = source.resource();
    if source.pagination() != Pagination::WholeCollection {
        return Err(InvalidInputError::Other {
            message: format!("{} cannot be looked up by slug", resource),
        }
        .into());
    }

    let key = QueryKey::collection(resource);
    let fetch_key = key.clone();
    let collection: Arc<Page<T>> = cache
        .fetch(&key, move || async move { source.fetch_page(&fetch_key).await })
        .await?;

    let found = collection.items.iter().find(|item| item.slug() == slug);
    debug!(found = found.is_some(), "slug lookup");
    found.cloned().ok_or_else(|| {
        NotFoundError {
            resource,
            slug: slug.to_string(),
        }
        .into()
    })
}
