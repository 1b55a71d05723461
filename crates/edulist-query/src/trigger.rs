//! Scroll-to-end detection.
//!
//! The rendering side reports that a sentinel (the last rendered item) became
//! visible by handing back the [`Subscription`] it was given. A subscription
//! stops counting once it is dropped, replaced by a newer observation, or
//! detached because the list it pointed into was replaced.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

const DETACHED: u64 = 0;

/// Issues subscriptions on list sentinels and decides whether a visibility
/// event should load the next page.
#[derive(Debug, Clone, Default)]
pub struct ViewportTrigger {
    active: Arc<AtomicU64>,
    next_id: Arc<AtomicU64>,
}

/// Outcome of a sentinel visibility event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerDecision {
    /// Request the next page.
    Fetch,
    /// The subscription no longer observes the current list.
    Detached,
    /// The sentinel is not the last rendered item any more.
    NotLastItem,
    /// The last page has already been loaded.
    Exhausted,
    /// A page request is still in flight.
    InFlight,
}

impl ViewportTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe the item at index `sentinel`, replacing any earlier observation.
    pub fn observe(&self, sentinel: usize) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.active.store(id, Ordering::SeqCst);
        Subscription {
            id,
            sentinel,
            active: Arc::clone(&self.active),
        }
    }

    /// Stop observing; outstanding subscriptions become inert.
    pub fn detach(&self) {
        self.active.store(DETACHED, Ordering::SeqCst);
    }

    pub fn is_observing(&self) -> bool {
        self.active.load(Ordering::SeqCst) != DETACHED
    }

    /// Decide what a visibility event on `subscription` should do.
    pub fn evaluate(
        &self,
        subscription: &Subscription,
        rendered: usize,
        has_more: bool,
        in_flight: bool,
    ) -> TriggerDecision {
        if !subscription.is_attached() || !Arc::ptr_eq(&subscription.active, &self.active) {
            TriggerDecision::Detached
        } else if subscription.sentinel + 1 != rendered {
            TriggerDecision::NotLastItem
        } else if !has_more {
            TriggerDecision::Exhausted
        } else if in_flight {
            TriggerDecision::InFlight
        } else {
            TriggerDecision::Fetch
        }
    }
}

/// Handle for one observed sentinel. Dropping it stops the observation.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    sentinel: usize,
    active: Arc<AtomicU64>,
}

impl Subscription {
    /// Index of the observed item.
    pub fn sentinel(&self) -> usize {
        self.sentinel
    }

    pub fn is_attached(&self) -> bool {
        self.active.load(Ordering::SeqCst) == self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // Only clear the observation if it is still ours.
        let _ = self.active.compare_exchange(
            self.id,
            DETACHED,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }
}
