//! Core catalog types.
//!
//! These types enforce their invariants at construction time: URLs are
//! validated, filter changes reset pagination, and query keys are normalised.

mod api_url;
mod filter;
mod page;
mod query_key;
mod resource;

pub use api_url::ApiUrl;
pub use filter::{FacetSelection, FilterState, FIRST_PAGE, NormalizedFilter};
pub use page::{Page, RequestState};
pub use query_key::QueryKey;
pub use resource::{Pagination, Resource};
