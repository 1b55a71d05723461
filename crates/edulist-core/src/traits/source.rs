//! Item source trait.

use async_trait::async_trait;

use crate::Result;
use crate::models::Item;
use crate::types::{ApiUrl, Page, Pagination, QueryKey, Resource};

/// A backend that serves one catalog resource.
///
/// Implementations issue the actual request; caching, de-duplication and
/// accumulation happen above this trait.
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Item type served by this source.
    type Item: Item;

    /// Returns the base URL this source reads from.
    fn url(&self) -> &ApiUrl;

    fn resource(&self) -> Resource {
        <Self::Item as Item>::RESOURCE
    }

    fn pagination(&self) -> Pagination {
        self.resource().pagination()
    }

    /// Fetch one page.
    ///
    /// Paged sources receive a page key carrying the filter and the page
    /// cursor. Whole-collection sources receive the collection key and answer
    /// with the entire collection as a single final page.
    async fn fetch_page(&self, key: &QueryKey) -> Result<Page<Self::Item>>;
}
