//! Filter options derived from loaded items.
//!
//! Facets come only from items already loaded, so for a paged resource the
//! option lists can miss values that appear on pages not yet fetched.
//! [`FacetSet::complete`] tells callers whether that can be the case.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::Item;

/// Distinct facet values in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetSet {
    pub category: Vec<String>,
    pub secondary: Vec<String>,
    /// True when every item of the list has been loaded.
    pub complete: bool,
}

/// Collect the distinct, non-empty category and secondary values in `items`.
pub fn extract_facets<T: Item>(items: &[T], complete: bool) -> FacetSet {
    FacetSet {
        category: distinct(items.iter().flat_map(|item| item.category_values())),
        secondary: distinct(items.iter().flat_map(|item| item.secondary_values())),
        complete,
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Blog, College};
    use serde_json::json;

    #[test]
    fn college_facets_are_countries_and_exams() {
        let colleges: Vec<College> = serde_json::from_value(json!([
            { "_id": "1", "name": "A", "country_ref": { "name": "India" }, "exams": ["JEE", "GATE"] },
            { "_id": "2", "name": "B", "country_ref": "Germany", "exams": ["GRE"] },
            { "_id": "3", "name": "C", "country_ref": "India", "exams": ["JEE"] },
            { "_id": "4", "name": "D" }
        ]))
        .unwrap();

        let facets = extract_facets(&colleges, false);
        assert_eq!(facets.category, vec!["India", "Germany"]);
        assert_eq!(facets.secondary, vec!["JEE", "GATE", "GRE"]);
        assert!(!facets.complete);
    }

    #[test]
    fn blog_facets_skip_blank_categories() {
        let blogs: Vec<Blog> = serde_json::from_value(json!([
            { "_id": "1", "title": "a", "category": "Visas" },
            { "_id": "2", "title": "b", "category": "" },
            { "_id": "3", "title": "c", "category": "Visas" }
        ]))
        .unwrap();

        let facets = extract_facets(&blogs, true);
        assert_eq!(facets.category, vec!["Visas"]);
        assert!(facets.secondary.is_empty());
        assert!(facets.complete);
    }

    #[test]
    fn empty_list_has_no_facets() {
        let facets = extract_facets::<Blog>(&[], true);
        assert_eq!(facets, FacetSet { complete: true, ..FacetSet::default() });
    }
}
