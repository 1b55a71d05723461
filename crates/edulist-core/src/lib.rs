//! edulist-core - Core types and traits for incremental catalog list loading.
//!
//! This crate holds everything that does not need an async runtime: the item
//! models served by the catalog endpoints, filter state and its canonical
//! [`QueryKey`] encoding, server [`Page`]s, the [`PageAccumulator`] that merges
//! pages into one list, facet extraction, and the [`ItemSource`] trait that
//! backends implement.

pub mod accumulator;
pub mod error;
pub mod facets;
pub mod models;
pub mod traits;
pub mod types;

pub use accumulator::{ListPhase, PageAccumulator};
pub use error::Error;
pub use facets::{FacetSet, extract_facets};
pub use models::{Blog, College, Exam, Item};
pub use traits::ItemSource;
pub use types::{
    ApiUrl, FIRST_PAGE, FacetSelection, FilterState, NormalizedFilter, Page, Pagination, QueryKey,
    RequestState, Resource,
};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
