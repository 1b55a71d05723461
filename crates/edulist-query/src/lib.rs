//! edulist-query - Incremental list acquisition over edulist item sources.
//!
//! The pieces compose into one data flow:
//!
//! ```text
//! keystrokes -> Debouncer -> FilterState -> QueryKey -> QueryCache -> PageAccumulator -> view
//!                                                          ^                              |
//!                                                          +------ ViewportTrigger <------+
//! ```
//!
//! [`ListController`] owns the accumulator, the trigger and the stale-response
//! guard for one list view. The [`QueryCache`] is an explicitly owned service
//! shared by every controller that should reuse responses.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use edulist_core::{College, ItemSource};
//! use edulist_query::{ListController, QueryCache, QueryConfig};
//!
//! # async fn example(source: Arc<dyn ItemSource<Item = College>>) {
//! let cache = QueryCache::new(&QueryConfig::default());
//! let mut colleges = ListController::new(source, cache.clone());
//!
//! if let Some(request) = colleges.set_search("IIT") {
//!     let outcome = request.run().await;
//!     colleges.apply(outcome);
//! }
//! println!("{} colleges loaded", colleges.items().len());
//! # }
//! ```

mod cache;
mod config;
mod controller;
mod debounce;
mod lookup;
mod trigger;

#[cfg(test)]
mod testing;

pub use cache::{CacheStats, QueryCache};
pub use config::{DEFAULT_DEBOUNCE, DEFAULT_STALE_TIME, QueryConfig};
pub use controller::{Applied, ListController, ListView, PageOutcome, PageRequest};
pub use debounce::Debouncer;
pub use lookup::find_by_slug;
pub use trigger::{Subscription, TriggerDecision, ViewportTrigger};
