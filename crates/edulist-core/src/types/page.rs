//! Server pages and request state.

use serde::{Deserialize, Serialize};

use super::filter::FIRST_PAGE;

/// One server response: a run of items plus continuation metadata.
///
/// Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in server order.
    pub items: Vec<T>,
    /// Total number of matching items on the server.
    pub total_count: u64,
    /// Whether a further page exists.
    pub has_more: bool,
    /// Page number this response represents.
    pub cursor: u32,
}

impl<T> Page<T> {
    /// A page from a paginated endpoint.
    pub fn new(items: Vec<T>, total_count: u64, has_more: bool, cursor: u32) -> Self {
        Self {
            items,
            total_count,
            has_more,
            cursor,
        }
    }

    /// A whole collection delivered as one final page.
    pub fn whole(items: Vec<T>) -> Self {
        let total_count = items.len() as u64;
        Self {
            items,
            total_count,
            has_more: false,
            cursor: FIRST_PAGE,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Coarse request state that drives spinners, banners, and disabled triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    Idle,
    Loading,
    LoadingMore,
    Success,
    Error,
}

impl RequestState {
    pub fn is_fetching(&self) -> bool {
        matches!(self, RequestState::Loading | RequestState::LoadingMore)
    }
}
