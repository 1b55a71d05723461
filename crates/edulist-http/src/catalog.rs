//! Network-backed item sources.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use edulist_core::{
    ApiUrl, Blog, College, Exam, FIRST_PAGE, Item, ItemSource, Page, QueryKey, Resource, Result,
};

use crate::client::HttpClient;
use crate::endpoints::{COLLEGES, CollegesQuery, CollegesResponse, DataResponse, path_for};

const NO_PARAMS: &[(&str, &str)] = &[];

/// Entry point to the catalog API; hands out one source per resource.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: HttpClient,
}

impl HttpCatalog {
    /// Create a catalog for the API at `base`.
    pub fn new(base: ApiUrl) -> Result<Self> {
        Ok(Self::with_client(HttpClient::new(base)?))
    }

    pub fn with_timeout(base: ApiUrl, timeout: Duration) -> Result<Self> {
        Ok(Self::with_client(HttpClient::with_timeout(base, timeout)?))
    }

    pub fn with_client(client: HttpClient) -> Self {
        Self { client }
    }

    /// Returns the base URL for this catalog.
    pub fn url(&self) -> &ApiUrl {
        self.client.base()
    }

    pub fn colleges(&self) -> HttpColleges {
        HttpColleges {
            client: self.client.clone(),
        }
    }

    pub fn exams(&self) -> HttpCollection<Exam> {
        HttpCollection::new(self.client.clone())
    }

    pub fn blogs(&self) -> HttpCollection<Blog> {
        HttpCollection::new(self.client.clone())
    }
}

/// Paginated college listing, filtered by the server.
#[derive(Debug, Clone)]
pub struct HttpColleges {
    client: HttpClient,
}

#[async_trait]
impl ItemSource for HttpColleges {
    type Item = College;

    fn url(&self) -> &ApiUrl {
        self.client.base()
    }

    #[instrument(skip(self), fields(%key))]
    async fn fetch_page(&self, key: &QueryKey) -> Result<Page<College>> {
        let page = key.page_number().unwrap_or(FIRST_PAGE);
        let resource = Resource::Colleges;
        let query = CollegesQuery {
            search: key.search(),
            country: key.facet(resource.category_facet()),
            exam: resource.secondary_facet().and_then(|name| key.facet(name)),
            page,
        };

        let response: CollegesResponse<College> = self.client.get_json(COLLEGES, &query).await?;
        if let Some(echoed) = response.page.filter(|&echoed| echoed != page) {
            warn!(requested = page, echoed, "server echoed a different page number");
        }
        let has_more = response.has_more_after(page);
        debug!(
            received = response.colleges.len(),
            total = response.total,
            has_more,
            "fetched college page"
        );

        Ok(Page::new(response.colleges, response.total, has_more, page))
    }
}

/// A whole collection served in one response.
#[derive(Debug, Clone)]
pub struct HttpCollection<T> {
    client: HttpClient,
    _item: PhantomData<fn() -> T>,
}

impl<T> HttpCollection<T> {
    fn new(client: HttpClient) -> Self {
        Self {
            client,
            _item: PhantomData,
        }
    }
}

#[async_trait]
impl<T: Item + DeserializeOwned> ItemSource for HttpCollection<T> {
    type Item = T;

    fn url(&self) -> &ApiUrl {
        self.client.base()
    }

    #[instrument(skip(self), fields(%key))]
    async fn fetch_page(&self, key: &QueryKey) -> Result<Page<T>> {
        let path = path_for(T::RESOURCE);
        let response: DataResponse<T> = self.client.get_json(path, NO_PARAMS).await?;
        debug!(received = response.data.len(), "fetched {}", T::RESOURCE);
        Ok(Page::whole(response.data))
    }
}
