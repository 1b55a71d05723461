//! Endpoint paths and wire types.

use serde::{Deserialize, Serialize};

use edulist_core::Resource;

// ============================================================================
// Endpoint Paths
// ============================================================================

/// Paginated, server-filtered college listing.
pub const COLLEGES: &str = "api/colleges";

/// Full exam listing.
pub const EXAMS: &str = "api/admin/exams";

/// Full blog listing.
pub const BLOGS: &str = "api/blogs";

/// Path serving `resource`.
pub fn path_for(resource: Resource) -> &'static str {
    match resource {
        Resource::Colleges => COLLEGES,
        Resource::Exams => EXAMS,
        Resource::Blogs => BLOGS,
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for the college listing. Absent filters are omitted.
#[derive(Debug, Serialize)]
pub struct CollegesQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam: Option<&'a str>,
    pub page: u32,
}

/// Response from the college listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegesResponse<T> {
    pub colleges: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub has_more: Option<bool>,
}

impl<T> CollegesResponse<T> {
    /// Whether another page follows `page`, falling back to `totalPages`
    /// when the server omits `hasMore`.
    pub fn has_more_after(&self, page: u32) -> bool {
        self.has_more
            .unwrap_or_else(|| self.total_pages.is_some_and(|total| page < total))
    }
}

/// Response wrapping a whole collection.
#[derive(Debug, Deserialize)]
pub struct DataResponse<T> {
    pub data: Vec<T>,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error)
    }
}
