//! In-memory item sources for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;

use edulist_core::error::{ProtocolError, TransportError};
use edulist_core::{
    ApiUrl, College, Error, Exam, FIRST_PAGE, Item, ItemSource, Page, QueryKey, Result,
};

pub fn college(id: usize, name: &str, country: &str) -> College {
    serde_json::from_value(json!({
        "_id": format!("c{id}"),
        "name": name,
        "slug": name.to_lowercase().replace(' ', "-"),
        "country_ref": { "name": country },
        "exams": ["JEE"]
    }))
    .unwrap()
}

pub fn exam(id: usize, name: &str, exam_type: &str) -> Exam {
    serde_json::from_value(json!({
        "_id": format!("e{id}"),
        "name": name,
        "slug": name.to_lowercase().replace(' ', "-"),
        "exam_type": exam_type,
        "exam_mode": "Online"
    }))
    .unwrap()
}

fn url() -> ApiUrl {
    ApiUrl::new("https://api.example.com").unwrap()
}

/// Paged source that filters and slices a fixed list the way the server does.
pub struct PagedColleges {
    url: ApiUrl,
    colleges: Vec<College>,
    page_size: usize,
    failures: AtomicUsize,
    requested: Mutex<Vec<QueryKey>>,
}

impl PagedColleges {
    pub fn new(colleges: Vec<College>) -> Self {
        Self {
            url: url(),
            colleges,
            page_size: 10,
            failures: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Fail the next `n` requests with a connection error.
    pub fn fail_next(&self, n: usize) {
        self.failures.store(n, Ordering::SeqCst);
    }

    pub fn requested(&self) -> Vec<QueryKey> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ItemSource for PagedColleges {
    type Item = College;

    fn url(&self) -> &ApiUrl {
        &self.url
    }

    async fn fetch_page(&self, key: &QueryKey) -> Result<Page<College>> {
        self.requested.lock().unwrap().push(key.clone());
        tokio::task::yield_now().await;

        if self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(TransportError::Connection {
                message: "network unreachable".into(),
            }
            .into());
        }

        let filter = key.normalized();
        let matching: Vec<_> = self
            .colleges
            .iter()
            .filter(|c| c.matches(&filter))
            .cloned()
            .collect();
        let page = key.page_number().unwrap_or(FIRST_PAGE);
        let start = (page - 1) as usize * self.page_size;
        let items: Vec<_> = matching.iter().skip(start).take(self.page_size).cloned().collect();
        let has_more = start + items.len() < matching.len();
        Ok(Page::new(items, matching.len() as u64, has_more, page))
    }
}

/// Whole-collection source returning every exam at once.
pub struct AllExams {
    url: ApiUrl,
    exams: Vec<Exam>,
    calls: AtomicUsize,
    status: Option<u16>,
}

impl AllExams {
    pub fn new(exams: Vec<Exam>) -> Self {
        Self {
            url: url(),
            exams,
            calls: AtomicUsize::new(0),
            status: None,
        }
    }

    /// Answer every request with an HTTP error.
    pub fn failing(status: u16) -> Self {
        Self {
            status: Some(status),
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ItemSource for AllExams {
    type Item = Exam;

    fn url(&self) -> &ApiUrl {
        &self.url
    }

    async fn fetch_page(&self, _key: &QueryKey) -> Result<Page<Exam>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        match self.status {
            Some(status) => Err(Error::from(ProtocolError::new(
                status,
                Some("Internal server error".into()),
            ))),
            None => Ok(Page::whole(self.exams.clone())),
        }
    }
}
