//! File-backed item sources.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use edulist_core::error::InvalidInputError;
use edulist_core::{
    ApiUrl, Blog, College, Exam, FIRST_PAGE, Item, ItemSource, Page, Pagination, QueryKey, Result,
};

use crate::store::FileStore;

/// Items per page for paged resources.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Offline catalog read from a `file://` directory.
///
/// Paged resources are filtered and sliced here the way the API server does
/// it; whole collections are returned as stored.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    store: FileStore,
    url: ApiUrl,
    page_size: usize,
}

impl FileCatalog {
    /// Open the catalog directory named by a `file://` URL.
    pub fn new(url: ApiUrl) -> Result<Self> {
        let root = url.to_file_path().ok_or_else(|| InvalidInputError::ApiUrl {
            value: url.to_string(),
            reason: "file catalogs need a file:// URL".to_string(),
        })?;
        Ok(Self {
            store: FileStore::new(root),
            url,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Use `page_size` items per page; zero falls back to the default.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        self
    }

    pub fn url(&self) -> &ApiUrl {
        &self.url
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn colleges(&self) -> FileSource<College> {
        FileSource::new(self.clone())
    }

    pub fn exams(&self) -> FileSource<Exam> {
        FileSource::new(self.clone())
    }

    pub fn blogs(&self) -> FileSource<Blog> {
        FileSource::new(self.clone())
    }
}

/// One resource of a [`FileCatalog`].
#[derive(Debug, Clone)]
pub struct FileSource<T> {
    catalog: FileCatalog,
    _item: PhantomData<fn() -> T>,
}

impl<T> FileSource<T> {
    fn new(catalog: FileCatalog) -> Self {
        Self {
            catalog,
            _item: PhantomData,
        }
    }
}

#[async_trait]
impl<T: Item + DeserializeOwned> ItemSource for FileSource<T> {
    type Item = T;

    fn url(&self) -> &ApiUrl {
        &self.catalog.url
    }

    #[instrument(skip(self), fields(%key))]
    async fn fetch_page(&self, key: &QueryKey) -> Result<Page<T>> {
        let items: Vec<T> = self.catalog.store.read_collection(T::RESOURCE).await?;

        if T::RESOURCE.pagination() == Pagination::WholeCollection {
            return Ok(Page::whole(items));
        }

        let filter = key.normalized();
        let matching: Vec<T> = items.into_iter().filter(|item| item.matches(&filter)).collect();
        let total = matching.len();
        let page = key.page_number().unwrap_or(FIRST_PAGE).max(FIRST_PAGE);
        let size = self.catalog.page_size;
        let start = (page - FIRST_PAGE) as usize * size;
        let items: Vec<T> = matching.into_iter().skip(start).take(size).collect();
        let has_more = start + items.len() < total;
        debug!(page, total, received = items.len(), "sliced page");

        Ok(Page::new(items, total as u64, has_more, page))
    }
}
