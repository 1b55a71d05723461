//! Per-view list state: filter, accumulated pages and the stale-response guard.

use std::sync::Arc;

use tracing::{debug, info, trace};

use edulist_core::{
    Error, FacetSelection, FacetSet, FilterState, Item, ItemSource, ListPhase, Page,
    PageAccumulator, Pagination, QueryKey, RequestState, Resource, Result, extract_facets,
};

use crate::cache::QueryCache;
use crate::trigger::{Subscription, TriggerDecision, ViewportTrigger};

/// Loading state for one list view.
///
/// The controller never awaits anything itself. Operations that need data
/// return a [`PageRequest`]; the caller runs it (possibly concurrently with
/// other work) and hands the [`PageOutcome`] back to [`ListController::apply`].
/// Only the outcome of the most recently issued request is committed, so a
/// slow response for an old filter can never overwrite the current list.
///
/// Paged resources are filtered by the source, one request per page.
/// Whole-collection resources are fetched once and filtered locally, so
/// changing their filter usually needs no request at all.
pub struct ListController<T: Item> {
    source: Arc<dyn ItemSource<Item = T>>,
    cache: QueryCache,
    resource: Resource,
    pagination: Pagination,
    filter: FilterState,
    accumulator: PageAccumulator<T>,
    trigger: ViewportTrigger,
    pending: Option<Pending>,
}

/// Identity of the request the controller is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    fetch_key: QueryKey,
    list_key: QueryKey,
    page: u32,
}

/// A page fetch detached from the controller that issued it.
#[must_use = "a page request does nothing until it is run"]
pub struct PageRequest<T: Item> {
    fetch_key: QueryKey,
    list_key: QueryKey,
    page: u32,
    bypass_cache: bool,
    source: Arc<dyn ItemSource<Item = T>>,
    cache: QueryCache,
}

/// Result of a [`PageRequest`], tagged with the identity it was issued under.
#[derive(Debug)]
pub struct PageOutcome<T> {
    pub fetch_key: QueryKey,
    pub list_key: QueryKey,
    pub page: u32,
    pub result: Result<Arc<Page<T>>>,
}

/// What [`ListController::apply`] did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The page was merged into the list.
    Committed,
    /// The outcome belongs to a superseded request and was dropped.
    Stale,
    /// The request failed; loaded items are kept.
    Failed,
}

/// What a view should render.
#[derive(Debug)]
pub enum ListView<'a, T> {
    /// Nothing requested yet.
    Idle,
    /// The first page is loading.
    Loading,
    /// The last request failed.
    Error {
        message: String,
        retryable: bool,
        items: &'a [T],
    },
    /// The list loaded and nothing matched.
    Empty,
    Ready {
        items: &'a [T],
        loading_more: bool,
        has_more: bool,
    },
}

impl<T: Item> PageRequest<T> {
    pub fn fetch_key(&self) -> &QueryKey {
        &self.fetch_key
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Perform the fetch through the cache.
    pub async fn run(self) -> PageOutcome<T> {
        let source = self.source;
        let key = self.fetch_key.clone();
        let fetcher = move || async move { source.fetch_page(&key).await };

        let result = if self.bypass_cache {
            self.cache.refetch(&self.fetch_key, fetcher).await
        } else {
            self.cache.fetch(&self.fetch_key, fetcher).await
        };

        PageOutcome {
            fetch_key: self.fetch_key,
            list_key: self.list_key,
            page: self.page,
            result,
        }
    }
}

impl<T: Item> std::fmt::Debug for PageRequest<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRequest")
            .field("fetch_key", &self.fetch_key)
            .field("page", &self.page)
            .field("bypass_cache", &self.bypass_cache)
            .finish()
    }
}

impl<T: Item> ListController<T> {
    pub fn new(source: Arc<dyn ItemSource<Item = T>>, cache: QueryCache) -> Self {
        let resource = source.resource();
        let pagination = source.pagination();
        let filter = FilterState::new();
        let mut accumulator = PageAccumulator::new();
        accumulator.reset(QueryKey::list(resource, &filter));
        Self {
            source,
            cache,
            resource,
            pagination,
            filter,
            accumulator,
            trigger: ViewportTrigger::new(),
            pending: None,
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Key of the list currently shown.
    pub fn list_key(&self) -> QueryKey {
        QueryKey::list(self.resource, &self.filter)
    }

    /// Request the first page if nothing has been requested yet.
    pub fn start(&mut self) -> Option<PageRequest<T>> {
        match self.accumulator.phase() {
            ListPhase::Empty => self.load_current(),
            _ => None,
        }
    }

    /// Switch to `filter`.
    ///
    /// A filter that selects the same list is a no-op. Otherwise the
    /// accumulated items are discarded immediately, before any new page
    /// arrives, and outstanding requests become stale.
    pub fn set_filter(&mut self, filter: FilterState) -> Option<PageRequest<T>> {
        if filter.same_list(&self.filter) {
            self.filter = filter;
            return None;
        }

        self.filter = filter;
        let key = self.list_key();
        info!(key = %key, "filter changed");

        self.accumulator.reset(key);
        self.trigger.detach();
        self.pending = None;
        self.load_current()
    }

    pub fn set_search(&mut self, text: impl Into<String>) -> Option<PageRequest<T>> {
        self.set_filter(self.filter.with_search(text))
    }

    pub fn set_category(&mut self, selection: impl Into<FacetSelection>) -> Option<PageRequest<T>> {
        self.set_filter(self.filter.with_category(selection))
    }

    pub fn set_secondary(&mut self, selection: impl Into<FacetSelection>) -> Option<PageRequest<T>> {
        self.set_filter(self.filter.with_secondary(selection))
    }

    /// Request the next page.
    ///
    /// Returns `None` while a request is in flight, after the last page, and
    /// after a failure (see [`ListController::retry`]).
    pub fn request_next_page(&mut self) -> Option<PageRequest<T>> {
        let page = self.accumulator.begin()?;
        Some(self.issue(page, false))
    }

    /// Re-issue the failed request with the same key, skipping the cache.
    pub fn retry(&mut self) -> Option<PageRequest<T>> {
        let page = self.accumulator.retry()?;
        info!(key = %self.list_key(), page, "retrying");
        Some(self.issue(page, true))
    }

    /// Drop cached data for the current list and load it again from the top.
    pub fn refresh(&mut self) -> Option<PageRequest<T>> {
        match self.pagination {
            Pagination::Paged => self.cache.invalidate_list(&self.list_key()),
            Pagination::WholeCollection => {
                self.cache.invalidate(&QueryKey::collection(self.resource))
            }
        }
        self.accumulator.reset(self.list_key());
        self.trigger.detach();
        self.pending = None;
        self.request_next_page()
    }

    /// Observe the last rendered item. Returns `None` for an empty list.
    pub fn observe_sentinel(&self) -> Option<Subscription> {
        let last = self.accumulator.len().checked_sub(1)?;
        Some(self.trigger.observe(last))
    }

    /// Handle the observed sentinel scrolling into view.
    pub fn on_sentinel_visible(&mut self, subscription: &Subscription) -> Option<PageRequest<T>> {
        let decision = self.trigger.evaluate(
            subscription,
            self.accumulator.len(),
            self.accumulator.has_more(),
            self.accumulator.is_in_flight(),
        );
        match decision {
            TriggerDecision::Fetch => self.request_next_page(),
            other => {
                trace!(?other, "sentinel visible, not fetching");
                None
            }
        }
    }

    /// Commit `outcome` if it answers the request the controller is waiting for.
    pub fn apply(&mut self, outcome: PageOutcome<T>) -> Applied {
        let expected = Pending {
            fetch_key: outcome.fetch_key,
            list_key: outcome.list_key,
            page: outcome.page,
        };
        if self.pending.as_ref() != Some(&expected) {
            debug!(key = %expected.fetch_key, "discarding stale response");
            return Applied::Stale;
        }
        self.pending = None;

        let committed = match outcome.result {
            Ok(page) => {
                let page = match self.pagination {
                    Pagination::Paged => (*page).clone(),
                    Pagination::WholeCollection => self.select(&page),
                };
                self.commit(page)
            }
            Err(err) => Err(err),
        };

        match committed {
            Ok(()) => Applied::Committed,
            Err(err) => {
                self.accumulator.fail(err);
                Applied::Failed
            }
        }
    }

    /// Request, run and apply the first page if nothing was loaded yet.
    pub async fn load(&mut self) -> Option<Applied> {
        let request = self.start();
        self.complete(request).await
    }

    /// Request, run and apply the next page.
    pub async fn load_more(&mut self) -> Option<Applied> {
        let request = self.request_next_page();
        self.complete(request).await
    }

    /// Run `request`, if any, and apply its outcome.
    pub async fn complete(&mut self, request: Option<PageRequest<T>>) -> Option<Applied> {
        let outcome = request?.run().await;
        Some(self.apply(outcome))
    }

    pub fn items(&self) -> &[T] {
        self.accumulator.items()
    }

    pub fn status(&self) -> RequestState {
        self.accumulator.request_state()
    }

    pub fn error(&self) -> Option<&Error> {
        self.accumulator.error()
    }

    pub fn has_more(&self) -> bool {
        self.accumulator.has_more()
    }

    pub fn total_count(&self) -> u64 {
        self.accumulator.total_count()
    }

    /// Filter options for the current resource.
    ///
    /// Whole-collection resources derive them from the full cached collection,
    /// so narrowing one facet does not hide the options of the other. Paged
    /// resources only know the pages loaded so far, as does a collection that
    /// has been flushed from the cache.
    pub fn facets(&self) -> FacetSet {
        match self.pagination {
            Pagination::WholeCollection => self
                .cache
                .get::<Page<T>>(&QueryKey::collection(self.resource))
                .map(|page| extract_facets(&page.items, true))
                .unwrap_or_else(|| extract_facets(self.accumulator.items(), false)),
            Pagination::Paged => {
                extract_facets(self.accumulator.items(), !self.accumulator.has_more())
            }
        }
    }

    pub fn view(&self) -> ListView<'_, T> {
        let items = self.accumulator.items();
        match self.accumulator.phase() {
            ListPhase::Empty => ListView::Idle,
            ListPhase::Loading => ListView::Loading,
            ListPhase::Failed { error, .. } => ListView::Error {
                message: error.user_message(),
                retryable: error.is_retryable(),
                items,
            },
            _ if items.is_empty() => ListView::Empty,
            phase => ListView::Ready {
                items,
                loading_more: matches!(phase, ListPhase::LoadingMore),
                has_more: self.accumulator.has_more(),
            },
        }
    }

    /// Load the current list, serving whole collections from a fresh cache
    /// entry without a request.
    fn load_current(&mut self) -> Option<PageRequest<T>> {
        if self.pagination == Pagination::WholeCollection {
            let cached = self
                .cache
                .get_fresh::<Page<T>>(&QueryKey::collection(self.resource));
            if let Some(collection) = cached {
                self.accumulator.begin()?;
                let selected = self.select(&collection);
                if let Err(err) = self.commit(selected) {
                    self.accumulator.fail(err);
                }
                return None;
            }
        }
        self.request_next_page()
    }

    fn issue(&mut self, page: u32, bypass_cache: bool) -> PageRequest<T> {
        let list_key = self.list_key();
        let fetch_key = match self.pagination {
            Pagination::Paged => list_key.with_page(page),
            Pagination::WholeCollection => QueryKey::collection(self.resource),
        };
        debug!(key = %fetch_key, page, bypass_cache, "requesting page");

        self.pending = Some(Pending {
            fetch_key: fetch_key.clone(),
            list_key: list_key.clone(),
            page,
        });
        PageRequest {
            fetch_key,
            list_key,
            page,
            bypass_cache,
            source: Arc::clone(&self.source),
            cache: self.cache.clone(),
        }
    }

    /// Items of a whole collection that match the current filter.
    fn select(&self, collection: &Page<T>) -> Page<T> {
        let filter = self.filter.normalized();
        Page::whole(
            collection
                .items
                .iter()
                .filter(|item| item.matches(&filter))
                .cloned()
                .collect(),
        )
    }

    fn commit(&mut self, page: Page<T>) -> Result<()> {
        let received = page.len();
        let items = self.accumulator.append(page)?;
        debug!(received, total = items.len(), "page committed");
        Ok(())
    }
}

impl<T: Item> std::fmt::Debug for ListController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListController")
            .field("resource", &self.resource)
            .field("filter", &self.filter)
            .field("items", &self.accumulator.len())
            .field("status", &self.status())
            .finish()
    }
}
