//! Catalog backend selection.

use std::sync::Arc;

use anyhow::{Context, Result};

use edulist_core::{ApiUrl, Blog, College, Exam, ItemSource};
use edulist_file::FileCatalog;
use edulist_http::HttpCatalog;

use crate::config::Settings;

/// Catalog wrapper for CLI use.
#[derive(Debug, Clone)]
pub enum Catalog {
    File(FileCatalog),
    Http(HttpCatalog),
}

impl Catalog {
    /// Open the backend the configured base URL points at.
    pub fn open(settings: &Settings) -> Result<Self> {
        let url = settings.base_url.clone();
        if url.is_local() {
            let catalog = FileCatalog::new(url).context("Failed to open catalog directory")?;
            Ok(Catalog::File(catalog.with_page_size(settings.page_size)))
        } else {
            let catalog = HttpCatalog::with_timeout(url, settings.timeout())
                .context("Failed to create HTTP client")?;
            Ok(Catalog::Http(catalog))
        }
    }

    pub fn url(&self) -> &ApiUrl {
        match self {
            Catalog::File(catalog) => catalog.url(),
            Catalog::Http(catalog) => catalog.url(),
        }
    }

    pub fn colleges(&self) -> Arc<dyn ItemSource<Item = College>> {
        match self {
            Catalog::File(catalog) => Arc::new(catalog.colleges()),
            Catalog::Http(catalog) => Arc::new(catalog.colleges()),
        }
    }

    pub fn exams(&self) -> Arc<dyn ItemSource<Item = Exam>> {
        match self {
            Catalog::File(catalog) => Arc::new(catalog.exams()),
            Catalog::Http(catalog) => Arc::new(catalog.exams()),
        }
    }

    pub fn blogs(&self) -> Arc<dyn ItemSource<Item = Blog>> {
        match self {
            Catalog::File(catalog) => Arc::new(catalog.blogs()),
            Catalog::Http(catalog) => Arc::new(catalog.blogs()),
        }
    }
}
