//! edulist-http - Catalog API backend.
//!
//! Colleges are served page by page with server-side filtering; exams and
//! blogs are fetched as whole collections and filtered by the caller.

mod catalog;
mod client;
mod endpoints;

pub use catalog::{HttpCatalog, HttpCollection, HttpColleges};
pub use client::{DEFAULT_TIMEOUT, HttpClient};
pub use endpoints::{BLOGS, COLLEGES, EXAMS};
