//! Catalog filtering by name search and category.
//!
//! Filtering is a pure derivation over the catalog: the result keeps the
//! catalog's native order and calling it twice with the same inputs yields
//! the same sequence.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Magazine};

/// Label of the chip that clears the category constraint.
pub const ALL_CATEGORIES: &str = "All";

/// Search text plus an optional category constraint.
///
/// `category == None` is the "All" chip: no category constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagazineFilter {
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl MagazineFilter {
    pub fn new(search_term: impl Into<String>, category: Option<String>) -> Self {
        Self {
            search_term: search_term.into(),
            category,
        }
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    /// Replace the category constraint; `None`, `""` and `"All"` clear it.
    pub fn select_category(&mut self, category: Option<String>) {
        self.category = normalize_category(category);
    }

    /// The same filter with a category of `""` or `"All"` turned into `None`.
    pub fn normalized(mut self) -> Self {
        self.category = normalize_category(self.category);
        self
    }

    /// Case-insensitive substring match on the name, AND category equality
    /// when a category is set.
    pub fn matches(&self, magazine: &Magazine) -> bool {
        let matches_search = self.search_term.is_empty()
            || magazine
                .name
                .to_lowercase()
                .contains(&self.search_term.to_lowercase());
        let matches_category = self
            .category
            .as_deref()
            .map_or(true, |c| magazine.category == c);
        matches_search && matches_category
    }

    pub fn apply(&self, catalog: &Catalog) -> Vec<Arc<Magazine>> {
        catalog
            .magazines()
            .iter()
            .filter(|m| self.matches(m))
            .cloned()
            .collect()
    }
}

fn normalize_category(category: Option<String>) -> Option<String> {
    category.filter(|c| !c.is_empty() && c != ALL_CATEGORIES)
}

/// The magazines visible for a given search term and selected category.
pub fn visible_magazines(
    catalog: &Catalog,
    search_term: &str,
    selected_category: Option<&str>,
) -> Vec<Arc<Magazine>> {
    MagazineFilter::new(search_term, selected_category.map(str::to_string)).apply(catalog)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn names(magazines: &[Arc<Magazine>]) -> Vec<String> {
        magazines.iter().map(|m| m.name.clone()).collect()
    }

    // -- visible_magazines --

    #[test]
    fn empty_inputs_return_full_catalog_in_order() {
        let catalog = Catalog::builtin();
        let all = visible_magazines(&catalog, "", None);
        assert_eq!(names(&all), names(catalog.magazines()));
    }

    #[test]
    fn search_is_case_insensitive() {
        let catalog = Catalog::builtin();
        assert_eq!(names(&visible_magazines(&catalog, "VOGUE", None)), ["Vogue Elevated"]);
        assert_eq!(names(&visible_magazines(&catalog, "digest", None)), ["Architectural Digest"]);
    }

    #[test]
    fn search_matches_substrings_anywhere() {
        let catalog = Catalog::builtin();
        let result = visible_magazines(&catalog, "to", None);
        assert_eq!(names(&result), ["Auto Today"]);
    }

    #[test]
    fn category_alone_constrains() {
        let catalog = Catalog::builtin();
        assert_eq!(names(&visible_magazines(&catalog, "", Some("Tech"))), ["Wired Forward"]);
    }

    #[test]
    fn search_and_category_are_and_combined() {
        let catalog = Catalog::builtin();
        assert!(visible_magazines(&catalog, "vogue", Some("Tech")).is_empty());
        assert_eq!(
            names(&visible_magazines(&catalog, "vogue", Some("Fashion"))),
            ["Vogue Elevated"]
        );
    }

    #[test]
    fn unknown_category_yields_nothing() {
        let catalog = Catalog::builtin();
        assert!(visible_magazines(&catalog, "", Some("Gardening")).is_empty());
    }

    #[test]
    fn non_ascii_names_are_searchable() {
        let catalog = Catalog::builtin();
        assert_eq!(names(&visible_magazines(&catalog, "APPÉTIT", None)), ["Bon Appétit"]);
    }

    // -- MagazineFilter --

    #[test]
    fn select_category_none_clears_constraint() {
        let catalog = Catalog::builtin();
        let mut filter = MagazineFilter::default().with_category(Some("Food".into()));
        assert_eq!(filter.apply(&catalog).len(), 1);
        filter.select_category(None);
        assert_eq!(filter.apply(&catalog).len(), catalog.magazines().len());
    }

    #[test]
    fn all_chip_normalizes_to_no_constraint() {
        let catalog = Catalog::builtin();
        let filter = MagazineFilter::new("", Some(ALL_CATEGORIES.into())).normalized();
        assert_eq!(filter, MagazineFilter::default());
        assert_eq!(filter.apply(&catalog).len(), catalog.magazines().len());
        assert_eq!(
            MagazineFilter::new("o", Some(String::new())).normalized(),
            MagazineFilter::new("o", None)
        );
        assert_eq!(
            MagazineFilter::new("", Some("Tech".into())).normalized().category.as_deref(),
            Some("Tech")
        );
    }

    #[test]
    fn select_category_treats_all_chip_as_none() {
        let mut filter = MagazineFilter::default();
        filter.select_category(Some("Food".into()));
        filter.select_category(Some(ALL_CATEGORIES.into()));
        assert_eq!(filter.category, None);
    }

    // -- properties --

    proptest! {
        #[test]
        fn results_satisfy_both_predicates(
            term in "[a-zA-Z ]{0,4}",
            category in proptest::option::of(proptest::sample::select(vec![
                "Fashion", "Real Estate", "Automobile", "Lifestyle", "Tech", "Food", "Nope",
            ])),
        ) {
            let catalog = Catalog::builtin();
            let result = visible_magazines(&catalog, &term, category);
            for m in &result {
                prop_assert!(m.name.to_lowercase().contains(&term.to_lowercase()));
                if let Some(c) = category {
                    prop_assert_eq!(m.category.as_str(), c);
                }
            }
            // Nothing that matches is left out, and order follows the catalog.
            let expected: Vec<_> = catalog
                .magazines()
                .iter()
                .filter(|m| m.name.to_lowercase().contains(&term.to_lowercase())
                    && category.map_or(true, |c| m.category == c))
                .map(|m| m.id.clone())
                .collect();
            let actual: Vec<_> = result.iter().map(|m| m.id.clone()).collect();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn filtering_is_idempotent(term in "[a-z]{0,3}") {
            let catalog = Catalog::builtin();
            let first = names(&visible_magazines(&catalog, &term, None));
            let second = names(&visible_magazines(&catalog, &term, None));
            prop_assert_eq!(first, second);
        }
    }
}
