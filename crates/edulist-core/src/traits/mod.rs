//! Core traits for item backends.

mod source;

pub use source::ItemSource;
