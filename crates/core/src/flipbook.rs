//! Page-by-page viewer over an issue's cover and interior pages.
//!
//! The HTTP surface serves the opening state; paging and key handling run in
//! the presentation layer that owns the open viewer.

use serde::{Deserialize, Serialize};

use crate::catalog::{Magazine, MagazineIssue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipbookKey {
    ArrowRight,
    ArrowLeft,
    Escape,
}

impl FlipbookKey {
    /// Parse a DOM-style key name. Other keys are ignored.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowRight" => Some(Self::ArrowRight),
            "ArrowLeft" => Some(Self::ArrowLeft),
            "Escape" => Some(Self::Escape),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlipbookAction {
    Turned,
    /// Already at the first or last page.
    Stayed,
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flipbook {
    title: String,
    pages: Vec<String>,
    current: usize,
    loading: bool,
}

impl Flipbook {
    pub fn open(title: impl Into<String>, cover: Option<&str>, pages: &[String]) -> Self {
        let pages = cover
            .into_iter()
            .chain(pages.iter().map(String::as_str))
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            title: title.into(),
            pages,
            current: 0,
            loading: true,
        }
    }

    /// Viewer for one archive issue, titled "{magazine} - {date}".
    ///
    /// `cover` overrides the issue's own cover (e.g. a generated one).
    pub fn for_issue(magazine: &Magazine, issue: &MagazineIssue, cover: Option<&str>) -> Self {
        let cover = cover.or(issue.cover_url.as_deref());
        Self::open(
            format!("{} - {}", magazine.name, issue.date),
            cover,
            &issue.pages,
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn total(&self) -> usize {
        self.pages.len()
    }

    /// Zero-based index of the page on display.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_page(&self) -> Option<&str> {
        self.pages.get(self.current).map(String::as_str)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_next(&self) -> bool {
        self.current + 1 < self.pages.len()
    }

    pub fn has_prev(&self) -> bool {
        self.current > 0
    }

    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current += 1;
        self.loading = true;
        true
    }

    pub fn prev(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.current -= 1;
        self.loading = true;
        true
    }

    pub fn page_loaded(&mut self) {
        self.loading = false;
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current + 1, self.total())
    }

    pub fn handle_key(&mut self, key: FlipbookKey) -> FlipbookAction {
        let turned = match key {
            FlipbookKey::ArrowRight => self.next(),
            FlipbookKey::ArrowLeft => self.prev(),
            FlipbookKey::Escape => return FlipbookAction::Close,
        };
        if turned {
            FlipbookAction::Turned
        } else {
            FlipbookAction::Stayed
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn book(n: usize) -> Flipbook {
        let pages: Vec<String> = (1..=n).map(|i| format!("p{i}")).collect();
        Flipbook::open("Test - Issue", Some("cover"), &pages)
    }

    // -- open --

    #[test]
    fn cover_comes_first_and_empties_are_dropped() {
        let pages = vec!["a".to_string(), String::new(), "b".to_string()];
        let fb = Flipbook::open("T", Some("c"), &pages);
        assert_eq!(fb.pages(), ["c", "a", "b"]);
        assert_eq!(fb.current_page(), Some("c"));
        assert!(fb.is_loading());

        let fb = Flipbook::open("T", Some(""), &[]);
        assert_eq!(fb.total(), 0);
        assert_eq!(fb.current_page(), None);
    }

    #[test]
    fn for_issue_uses_name_and_date() {
        let catalog = Catalog::builtin();
        let mag = catalog.find_magazine_by_id("mag1").unwrap();
        let issue = mag.find_issue("issue1b").unwrap();
        let fb = Flipbook::for_issue(mag, issue, None);
        assert_eq!(fb.title(), "Vogue Elevated - September 2023");
        assert_eq!(fb.total(), 5);

        let missing = mag.find_issue("issue1a").unwrap();
        let fb = Flipbook::for_issue(mag, missing, Some("data:image/jpeg;base64,xyz"));
        assert_eq!(fb.pages(), ["data:image/jpeg;base64,xyz"]);
    }

    // -- paging --

    #[test]
    fn next_and_prev_clamp() {
        let mut fb = book(2);
        fb.page_loaded();
        assert!(!fb.prev());
        assert!(!fb.is_loading());

        assert!(fb.next());
        assert!(fb.is_loading());
        assert!(fb.next());
        assert!(!fb.next());
        assert_eq!(fb.label(), "Page 3 of 3");

        assert!(fb.prev());
        assert_eq!(fb.label(), "Page 2 of 3");
    }

    #[test]
    fn keys_map_to_actions() {
        let mut fb = book(1);
        assert_eq!(fb.handle_key(FlipbookKey::ArrowLeft), FlipbookAction::Stayed);
        assert_eq!(fb.handle_key(FlipbookKey::ArrowRight), FlipbookAction::Turned);
        assert_eq!(fb.handle_key(FlipbookKey::ArrowRight), FlipbookAction::Stayed);
        assert_eq!(fb.handle_key(FlipbookKey::Escape), FlipbookAction::Close);
        assert_eq!(fb.current(), 1);
    }

    #[test]
    fn key_names() {
        assert_eq!(FlipbookKey::from_name("Escape"), Some(FlipbookKey::Escape));
        assert_eq!(FlipbookKey::from_name("Enter"), None);
    }
}
