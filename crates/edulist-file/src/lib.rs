//! edulist-file - Filesystem-backed catalog for offline use and tests.

mod catalog;
mod store;

pub use catalog::{DEFAULT_PAGE_SIZE, FileCatalog, FileSource};
pub use store::FileStore;
