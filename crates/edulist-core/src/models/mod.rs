//! Catalog item models.
//!
//! Items are owned by the remote catalog. This crate stores, orders and
//! filters them but never mutates their fields.

mod blog;
mod college;
mod exam;

pub use blog::Blog;
pub use college::{College, CountryRef};
pub use exam::{Exam, HeroSection};

use std::fmt::Debug;

use crate::types::{NormalizedFilter, Resource};

/// An entity served by one of the catalog endpoints.
pub trait Item: Clone + Debug + Send + Sync + 'static {
    /// Resource whose endpoint serves this item type.
    const RESOURCE: Resource;

    /// Stable identifier used for de-duplication.
    fn id(&self) -> &str;

    /// URL slug used by single-item lookups.
    fn slug(&self) -> &str;

    /// Values of the category facet carried by this item.
    fn category_values(&self) -> Vec<&str>;

    /// Values of the secondary facet carried by this item.
    fn secondary_values(&self) -> Vec<&str>;

    /// Text fields the free-text search looks into.
    fn search_fields(&self) -> Vec<&str>;

    /// Local filter predicate used where the server does not filter.
    ///
    /// A secondary selection is ignored for resources without a secondary facet,
    /// mirroring how [`crate::QueryKey`] drops it.
    fn matches(&self, filter: &NormalizedFilter) -> bool {
        let secondary = Self::RESOURCE
            .secondary_facet()
            .and(filter.secondary.as_deref());
        NormalizedFilter::facet_matches(filter.category.as_deref(), self.category_values())
            && NormalizedFilter::facet_matches(secondary, self.secondary_values())
            && filter.search_matches(self.search_fields())
    }
}
