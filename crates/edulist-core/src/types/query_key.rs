//! Canonical cache keys.

use std::collections::BTreeMap;
use std::fmt;

use super::filter::{FilterState, NormalizedFilter};
use super::resource::Resource;

/// Deterministic identity of a request.
///
/// Built from a [`FilterState`] after normalisation, so two snapshots that
/// mean the same thing produce equal keys. Facets live in a sorted map, making
/// the key independent of the order filters were applied in. The resource is
/// part of every key, so different list views never share entries.
///
/// A *list key* has no page component and names an accumulated list; a
/// *page key* adds the page cursor and names one server response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    resource: Resource,
    search: Option<String>,
    facets: BTreeMap<&'static str, String>,
    page: Option<u32>,
}

impl QueryKey {
    /// Key for the accumulated list selected by `filter` (page cursor excluded).
    pub fn list(resource: Resource, filter: &FilterState) -> Self {
        Self::from_normalized(resource, filter.normalized())
    }

    /// Key for the single page `filter` currently points at.
    pub fn page(resource: Resource, filter: &FilterState) -> Self {
        Self::list(resource, filter).with_page(filter.page())
    }

    /// Key for a whole, unfiltered collection.
    pub fn collection(resource: Resource) -> Self {
        Self {
            resource,
            search: None,
            facets: BTreeMap::new(),
            page: None,
        }
    }

    fn from_normalized(resource: Resource, filter: NormalizedFilter) -> Self {
        let mut facets = BTreeMap::new();
        if let Some(category) = filter.category {
            facets.insert(resource.category_facet(), category);
        }
        if let (Some(name), Some(value)) = (resource.secondary_facet(), filter.secondary) {
            facets.insert(name, value);
        }
        Self {
            resource,
            search: filter.search,
            facets,
            page: None,
        }
    }

    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: Some(page),
            ..self.clone()
        }
    }

    /// This key with the page cursor removed.
    #[must_use]
    pub fn list_key(&self) -> Self {
        Self {
            page: None,
            ..self.clone()
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn facet(&self, name: &str) -> Option<&str> {
        self.facets.get(name).map(String::as_str)
    }

    pub fn facets(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.facets.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn page_number(&self) -> Option<u32> {
        self.page
    }

    pub fn is_page_key(&self) -> bool {
        self.page.is_some()
    }

    /// The filter this key selects, for sources that filter locally.
    pub fn normalized(&self) -> NormalizedFilter {
        NormalizedFilter {
            search: self.search.clone(),
            category: self.facet(self.resource.category_facet()).map(str::to_string),
            secondary: self
                .resource
                .secondary_facet()
                .and_then(|name| self.facet(name))
                .map(str::to_string),
        }
    }

    /// True when both keys name the same accumulated list.
    pub fn same_list(&self, other: &QueryKey) -> bool {
        self.resource == other.resource
            && self.search == other.search
            && self.facets == other.facets
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resource)?;
        let mut sep = '?';
        for (name, value) in &self.facets {
            write!(f, "{}{}={}", sep, name, value)?;
            sep = '&';
        }
        if let Some(ref search) = self.search {
            write!(f, "{}search={}", sep, search)?;
        }
        if let Some(page) = self.page {
            write!(f, "#{}", page)?;
        }
        Ok(())
    }
}
