//! Merging sequential pages into one list.
//!
//! The accumulator owns the list a view renders for one list key. Pages are
//! appended strictly in cursor order, items are de-duplicated by id, and a
//! change of list key discards everything so results from an old filter never
//! bleed into the new one.
//!
//! ```text
//! Empty -> Loading -> Populated -> LoadingMore -> Populated -> ... -> Exhausted
//!             \                        \
//!              +-> Failed --retry-->    +-> Failed --retry--> LoadingMore
//! ```

use std::collections::HashMap;

use crate::Result;
use crate::error::{Error, InvalidInputError};
use crate::models::Item;
use crate::types::{FIRST_PAGE, Page, QueryKey, RequestState};

/// Where the accumulated list is in its lifecycle.
#[derive(Debug, Clone)]
pub enum ListPhase {
    /// Nothing requested yet for the current key.
    Empty,
    /// The first page is in flight.
    Loading,
    /// At least one page merged and more are available.
    Populated,
    /// A follow-up page is in flight.
    LoadingMore,
    /// The last page has been merged.
    Exhausted,
    /// The request for `page` failed; loaded items are kept.
    Failed { page: u32, error: Error },
}

/// Ordered, de-duplicated concatenation of the pages fetched for one list key.
#[derive(Debug, Clone)]
pub struct PageAccumulator<T> {
    key: Option<QueryKey>,
    items: Vec<T>,
    positions: HashMap<String, usize>,
    last_cursor: Option<u32>,
    has_more: bool,
    total_count: u64,
    phase: ListPhase,
}

impl<T: Item> Default for PageAccumulator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Item> PageAccumulator<T> {
    pub fn new() -> Self {
        Self {
            key: None,
            items: Vec::new(),
            positions: HashMap::new(),
            last_cursor: None,
            has_more: true,
            total_count: 0,
            phase: ListPhase::Empty,
        }
    }

    /// List key the accumulated items belong to.
    pub fn key(&self) -> Option<&QueryKey> {
        self.key.as_ref()
    }

    /// Discard all pages and start over for `key`.
    ///
    /// The page component of `key`, if any, is dropped.
    pub fn reset(&mut self, key: QueryKey) {
        *self = Self {
            key: Some(key.list_key()),
            ..Self::new()
        };
    }

    /// Page number the next append must carry, or `None` once exhausted.
    pub fn next_page(&self) -> Option<u32> {
        match self.last_cursor {
            None => Some(FIRST_PAGE),
            Some(_) if !self.has_more => None,
            Some(cursor) => Some(cursor + 1),
        }
    }

    /// Mark the next page as in flight and return its number.
    ///
    /// Returns `None` while a page is already in flight, after the last page,
    /// and after a failure (use [`PageAccumulator::retry`]).
    pub fn begin(&mut self) -> Option<u32> {
        let page = match self.phase {
            ListPhase::Empty => {
                self.phase = ListPhase::Loading;
                FIRST_PAGE
            }
            ListPhase::Populated => {
                let page = self.next_page()?;
                self.phase = ListPhase::LoadingMore;
                page
            }
            ListPhase::Loading
            | ListPhase::LoadingMore
            | ListPhase::Exhausted
            | ListPhase::Failed { .. } => return None,
        };
        Some(page)
    }

    /// Return from a failure to the loading state that preceded it.
    pub fn retry(&mut self) -> Option<u32> {
        let ListPhase::Failed { page, .. } = self.phase else {
            return None;
        };
        self.phase = if page == FIRST_PAGE && self.last_cursor.is_none() {
            ListPhase::Loading
        } else {
            ListPhase::LoadingMore
        };
        Some(page)
    }

    /// Merge the next page.
    ///
    /// An item whose id was already seen replaces the earlier copy in place,
    /// so the newest data wins without reordering the list.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::PageOrder`] if `page` does not directly
    /// follow the last merged page.
    pub fn append(&mut self, page: Page<T>) -> Result<&[T]> {
        let expected = self.next_page();
        if expected != Some(page.cursor) {
            return Err(InvalidInputError::PageOrder {
                expected_after: self.last_cursor.unwrap_or(0),
                actual: page.cursor,
            }
            .into());
        }

        for item in page.items {
            match self.positions.get(item.id()) {
                Some(&index) => self.items[index] = item,
                None => {
                    self.positions.insert(item.id().to_string(), self.items.len());
                    self.items.push(item);
                }
            }
        }

        self.last_cursor = Some(page.cursor);
        self.has_more = page.has_more;
        self.total_count = page.total_count;
        self.phase = if page.has_more {
            ListPhase::Populated
        } else {
            ListPhase::Exhausted
        };

        Ok(&self.items)
    }

    /// Record a failed page request without discarding loaded items.
    pub fn fail(&mut self, error: Error) {
        let page = self.next_page().unwrap_or(FIRST_PAGE);
        self.phase = ListPhase::Failed { page, error };
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the most recent page announced a successor.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Number of pages merged so far.
    pub fn loaded_pages(&self) -> u32 {
        self.last_cursor.unwrap_or(0)
    }

    pub fn phase(&self) -> &ListPhase {
        &self.phase
    }

    pub fn error(&self) -> Option<&Error> {
        match &self.phase {
            ListPhase::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.phase, ListPhase::Loading | ListPhase::LoadingMore)
    }

    pub fn request_state(&self) -> RequestState {
        match self.phase {
            ListPhase::Empty => RequestState::Idle,
            ListPhase::Loading => RequestState::Loading,
            ListPhase::LoadingMore => RequestState::LoadingMore,
            ListPhase::Populated | ListPhase::Exhausted => RequestState::Success,
            ListPhase::Failed { .. } => RequestState::Error,
        }
    }
}
