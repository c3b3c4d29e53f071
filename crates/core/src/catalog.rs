//! Read-only magazine catalog (magazines, categories, ad packages).
//!
//! A [`Catalog`] is validated once when it is built and never mutated
//! afterwards. Magazines are held behind `Arc` so that booking state and
//! render models can keep a snapshot of the selected magazine without
//! borrowing from the catalog.

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{IssueId, MagazineId, PackageId, Price};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// An advertising product a magazine offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdPackage {
    pub id: PackageId,
    pub name: String,
    pub description: String,
    pub price: Price,
}

/// One issue in a magazine's digital archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagazineIssue {
    pub id: IssueId,
    /// Display string, e.g. `"October 2023"` or `"Holiday 2023"`.
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<String>,
}

impl MagazineIssue {
    /// An issue without a cover is eligible for externally generated artwork.
    pub fn cover_missing(&self) -> bool {
        self.cover_url.as_deref().map_or(true, str::is_empty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Magazine {
    pub id: MagazineId,
    pub name: String,
    pub category: String,
    pub description: String,
    pub thumbnail_url: String,
    pub media_kit_url: String,
    /// Display order.
    pub issues: Vec<MagazineIssue>,
    pub packages: Vec<AdPackage>,
}

impl Magazine {
    pub fn find_package(&self, package_id: &str) -> Option<&AdPackage> {
        self.packages.iter().find(|p| p.id == package_id)
    }

    pub fn find_issue(&self, issue_id: &str) -> Option<&MagazineIssue> {
        self.issues.iter().find(|i| i.id == issue_id)
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// On-disk / wire shape of a catalog, as loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub categories: Vec<String>,
    pub magazines: Vec<Magazine>,
}

/// Immutable collection of magazines and the fixed category set.
#[derive(Debug)]
pub struct Catalog {
    categories: Vec<String>,
    magazines: Vec<Arc<Magazine>>,
}

static BUILTIN: OnceLock<Arc<Catalog>> = OnceLock::new();

impl Catalog {
    /// Build a catalog, rejecting data that would break catalog invariants.
    pub fn new(categories: Vec<String>, magazines: Vec<Magazine>) -> Result<Self, CoreError> {
        validate(&categories, &magazines)?;
        Ok(Self::from_parts(categories, magazines))
    }

    /// Parse and validate a [`CatalogDocument`] from JSON.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let doc: CatalogDocument = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("Invalid catalog document: {e}")))?;
        Self::new(doc.categories, doc.magazines)
    }

    /// The catalog bundled with the crate, initialized on first use.
    pub fn builtin() -> Arc<Catalog> {
        Arc::clone(BUILTIN.get_or_init(|| Arc::new(crate::seed::builtin_catalog())))
    }

    pub(crate) fn from_parts(categories: Vec<String>, magazines: Vec<Magazine>) -> Self {
        Self {
            categories,
            magazines: magazines.into_iter().map(Arc::new).collect(),
        }
    }

    /// All magazines in native catalog order.
    pub fn magazines(&self) -> &[Arc<Magazine>] {
        &self.magazines
    }

    pub fn find_magazine_by_id(&self, id: &str) -> Option<&Arc<Magazine>> {
        self.magazines.iter().find(|m| m.id == id)
    }

    /// Like [`find_magazine_by_id`](Self::find_magazine_by_id) but lifts a
    /// miss into [`CoreError::NotFound`].
    pub fn require_magazine(&self, id: &str) -> Result<&Arc<Magazine>, CoreError> {
        self.find_magazine_by_id(id)
            .ok_or_else(|| CoreError::not_found("Magazine", id))
    }

    pub fn by_category(&self, category: &str) -> Vec<Arc<Magazine>> {
        self.magazines
            .iter()
            .filter(|m| m.category == category)
            .cloned()
            .collect()
    }

    pub fn all_categories(&self) -> &[String] {
        &self.categories
    }

    pub fn is_known_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn to_document(&self) -> CatalogDocument {
        CatalogDocument {
            categories: self.categories.clone(),
            magazines: self.magazines.iter().map(|m| (**m).clone()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(categories: &[String], magazines: &[Magazine]) -> Result<(), CoreError> {
    let mut seen_categories = HashSet::new();
    for category in categories {
        if category.trim().is_empty() {
            return Err(CoreError::Validation(
                "Category names must not be empty".to_string(),
            ));
        }
        if !seen_categories.insert(category.as_str()) {
            return Err(CoreError::Validation(format!(
                "Duplicate category '{category}'"
            )));
        }
    }

    let mut seen_magazines = HashSet::new();
    for magazine in magazines {
        if !seen_magazines.insert(magazine.id.as_str()) {
            return Err(CoreError::Validation(format!(
                "Duplicate magazine id '{}'",
                magazine.id
            )));
        }
        if magazine.name.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Magazine '{}' has an empty name",
                magazine.id
            )));
        }
        if !seen_categories.contains(magazine.category.as_str()) {
            return Err(CoreError::Validation(format!(
                "Magazine '{}' has unknown category '{}'. Must be one of: {}",
                magazine.id,
                magazine.category,
                categories.join(", ")
            )));
        }

        let mut issue_ids = HashSet::new();
        for issue in &magazine.issues {
            if !issue_ids.insert(issue.id.as_str()) {
                return Err(CoreError::Validation(format!(
                    "Magazine '{}' lists issue '{}' more than once",
                    magazine.id, issue.id
                )));
            }
        }

        let mut package_ids = HashSet::new();
        for package in &magazine.packages {
            if !package_ids.insert(package.id.as_str()) {
                return Err(CoreError::Validation(format!(
                    "Magazine '{}' offers package '{}' more than once",
                    magazine.id, package.id
                )));
            }
            if package.price > Price::MAX {
                return Err(CoreError::Validation(format!(
                    "Package '{}' of magazine '{}' is priced above {}",
                    package.id,
                    magazine.id,
                    Price::MAX
                )));
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
