//! User filter intent.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Page number of the first page of any list.
pub const FIRST_PAGE: u32 = 1;

/// Selection of one categorical facet.
///
/// The `"all"` sentinel and blank input both mean "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FacetSelection {
    #[default]
    All,
    Value(String),
}

impl FacetSelection {
    /// Parse user input, folding the `"all"` sentinel and blank input to [`FacetSelection::All`].
    pub fn parse(input: impl AsRef<str>) -> Self {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            FacetSelection::All
        } else {
            FacetSelection::Value(trimmed.to_string())
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            FacetSelection::All => None,
            FacetSelection::Value(v) => Some(v),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, FacetSelection::All)
    }
}

impl From<&str> for FacetSelection {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for FacetSelection {
    fn from(s: String) -> Self {
        Self::parse(s)
    }
}

impl From<Option<String>> for FacetSelection {
    fn from(s: Option<String>) -> Self {
        s.map(Self::parse).unwrap_or_default()
    }
}

impl From<FacetSelection> for String {
    fn from(sel: FacetSelection) -> Self {
        match sel {
            FacetSelection::All => "all".to_string(),
            FacetSelection::Value(v) => v,
        }
    }
}

impl fmt::Display for FacetSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value().unwrap_or("all"))
    }
}

/// Immutable snapshot of what the user asked to see.
///
/// Every interaction produces a new snapshot. Changing the search text or
/// either facet resets the page cursor to [`FIRST_PAGE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    search_text: String,
    category: FacetSelection,
    secondary: FacetSelection,
    page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            category: FacetSelection::All,
            secondary: FacetSelection::All,
            page: FIRST_PAGE,
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn category(&self) -> &FacetSelection {
        &self.category
    }

    pub fn secondary(&self) -> &FacetSelection {
        &self.secondary
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn with_search(&self, text: impl Into<String>) -> Self {
        let text = text.into();
        if text == self.search_text {
            return self.clone();
        }
        Self {
            search_text: text,
            page: FIRST_PAGE,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_category(&self, selection: impl Into<FacetSelection>) -> Self {
        let selection = selection.into();
        if selection == self.category {
            return self.clone();
        }
        Self {
            category: selection,
            page: FIRST_PAGE,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_secondary(&self, selection: impl Into<FacetSelection>) -> Self {
        let selection = selection.into();
        if selection == self.secondary {
            return self.clone();
        }
        Self {
            secondary: selection,
            page: FIRST_PAGE,
            ..self.clone()
        }
    }

    /// Move the cursor to `page`; values below [`FIRST_PAGE`] clamp to it.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(FIRST_PAGE),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn next_page(&self) -> Self {
        self.with_page(self.page.saturating_add(1))
    }

    /// The cache-relevant part of the filter, normalised.
    pub fn normalized(&self) -> NormalizedFilter {
        NormalizedFilter {
            search: normalize_search(&self.search_text),
            category: self.category.value().map(str::to_string),
            secondary: self.secondary.value().map(str::to_string),
        }
    }

    /// True when both snapshots select the same list, ignoring the page cursor.
    pub fn same_list(&self, other: &FilterState) -> bool {
        self.normalized() == other.normalized()
    }
}

/// Trimmed, case-folded search text and concrete facet selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NormalizedFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub secondary: Option<String>,
}

impl NormalizedFilter {
    /// Case-insensitive substring match of the search text against any field.
    pub fn search_matches<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        match &self.search {
            None => true,
            Some(needle) => fields
                .into_iter()
                .any(|field| field.to_lowercase().contains(needle.as_str())),
        }
    }

    /// Exact match of an optional facet against any of the item's values.
    pub fn facet_matches<'a>(
        selection: Option<&str>,
        values: impl IntoIterator<Item = &'a str>,
    ) -> bool {
        match selection {
            None => true,
            Some(wanted) => values.into_iter().any(|v| v == wanted),
        }
    }
}

fn normalize_search(text: &str) -> Option<String> {
    let folded = text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    if folded.is_empty() { None } else { Some(folded) }
}
