//! Cover artwork for archive issues that ship without one.
//!
//! Generation itself happens behind [`CoverProducer`]; this module only
//! tracks which covers are pending, generated, or unavailable for a single
//! magazine profile. Results live in [`CoverGallery`] and never touch
//! catalog or booking data.
//!
//! The gallery is held by the presentation layer rendering a profile; the
//! HTTP surface serves catalog covers only.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;

use crate::catalog::{Magazine, MagazineIssue};
use crate::types::IssueId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoverError {
    #[error("Cover generation failed: {0}")]
    Generation(String),

    #[error("Cover producer returned no image")]
    Empty,
}

/// Asynchronous source of cover images (e.g. an image generation service).
#[async_trait]
pub trait CoverProducer: Send + Sync {
    /// Produce a displayable image reference (URL or data URI) for `issue`.
    async fn request_cover(
        &self,
        magazine: &Magazine,
        issue: &MagazineIssue,
    ) -> Result<String, CoverError>;
}

/// Prompt text describing the cover to generate.
pub fn cover_prompt(magazine: &Magazine, issue: &MagazineIssue) -> String {
    format!(
        "A professional, stylish magazine cover for '{}'. Category: {}. Issue date: {}. \
         Style: modern, artistic, visually striking. No text on the cover.",
        magazine.name, magazine.category, issue.date
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "url", rename_all = "snake_case")]
pub enum CoverState {
    /// The catalog supplies a cover.
    Provided(String),
    /// No cover yet and none requested.
    Missing,
    Pending,
    Generated(String),
    /// Generation failed; render "no preview available".
    Unavailable,
}

impl CoverState {
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Provided(url) | Self::Generated(url) => Some(url),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueCover {
    pub issue_id: IssueId,
    pub date: String,
    pub cover: CoverState,
}

/// Render-side cover bookkeeping for one magazine's archive.
#[derive(Debug)]
pub struct CoverGallery {
    magazine: Arc<Magazine>,
    generated: HashMap<IssueId, String>,
    pending: HashSet<IssueId>,
    failed: HashSet<IssueId>,
}

impl CoverGallery {
    pub fn new(magazine: Arc<Magazine>) -> Self {
        Self {
            magazine,
            generated: HashMap::new(),
            pending: HashSet::new(),
            failed: HashSet::new(),
        }
    }

    pub fn magazine(&self) -> &Arc<Magazine> {
        &self.magazine
    }

    /// Cover state for an issue, or `None` if the magazine has no such issue.
    pub fn state(&self, issue_id: &str) -> Option<CoverState> {
        let issue = self.magazine.find_issue(issue_id)?;
        Some(self.state_of(issue))
    }

    /// The image to show for an issue: its own cover, else a generated one.
    pub fn cover_src(&self, issue_id: &str) -> Option<String> {
        self.state(issue_id)
            .and_then(|state| state.url().map(str::to_string))
    }

    /// Issues still lacking a cover that have not been requested yet.
    pub fn issues_needing_covers(&self) -> Vec<&MagazineIssue> {
        self.magazine
            .issues
            .iter()
            .filter(|i| self.state_of(i) == CoverState::Missing)
            .collect()
    }

    /// Request every missing cover concurrently and record the results.
    ///
    /// Returns the number of covers generated. Issues that are pending,
    /// generated, or failed before are not requested again.
    pub async fn resolve_missing(&mut self, producer: &dyn CoverProducer) -> usize {
        let targets: Vec<MagazineIssue> = self
            .issues_needing_covers()
            .into_iter()
            .cloned()
            .collect();
        if targets.is_empty() {
            return 0;
        }
        for issue in &targets {
            self.pending.insert(issue.id.clone());
        }

        let magazine = Arc::clone(&self.magazine);
        let requests = targets.iter().map(|issue| {
            let magazine = &magazine;
            async move { (issue.id.clone(), producer.request_cover(magazine, issue).await) }
        });
        let results = join_all(requests).await;

        let mut generated = 0;
        for (issue_id, result) in results {
            if self.record(&issue_id, result) {
                generated += 1;
            }
        }
        generated
    }

    /// Record the result of a request made outside [`resolve_missing`](Self::resolve_missing).
    /// Returns `true` when a cover was stored.
    pub fn record(&mut self, issue_id: &str, result: Result<String, CoverError>) -> bool {
        self.pending.remove(issue_id);
        match result {
            Ok(url) if !url.is_empty() => {
                self.failed.remove(issue_id);
                self.generated.insert(issue_id.to_string(), url);
                true
            }
            Ok(_) => self.record_failure(issue_id, &CoverError::Empty),
            Err(e) => self.record_failure(issue_id, &e),
        }
    }

    pub fn entries(&self) -> Vec<IssueCover> {
        self.magazine
            .issues
            .iter()
            .map(|issue| IssueCover {
                issue_id: issue.id.clone(),
                date: issue.date.clone(),
                cover: self.state_of(issue),
            })
            .collect()
    }

    fn record_failure(&mut self, issue_id: &str, error: &CoverError) -> bool {
        tracing::warn!(
            magazine_id = %self.magazine.id,
            issue_id,
            error = %error,
            "Failed to generate cover"
        );
        self.failed.insert(issue_id.to_string());
        false
    }

    fn state_of(&self, issue: &MagazineIssue) -> CoverState {
        if let Some(url) = issue.cover_url.as_deref().filter(|u| !u.is_empty()) {
            return CoverState::Provided(url.to_string());
        }
        if let Some(url) = self.generated.get(&issue.id) {
            return CoverState::Generated(url.clone());
        }
        if self.pending.contains(&issue.id) {
            CoverState::Pending
        } else if self.failed.contains(&issue.id) {
            CoverState::Unavailable
        } else {
            CoverState::Missing
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
    use std::sync::Mutex;

    /// Succeeds for every issue except those listed in `fail`.
    #[derive(Default)]
    struct FakeProducer {
        fail: Vec<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CoverProducer for FakeProducer {
        async fn request_cover(
            &self,
            magazine: &Magazine,
            issue: &MagazineIssue,
        ) -> Result<String, CoverError> {
            self.calls.lock().unwrap().push(issue.id.clone());
            if self.fail.contains(&issue.id.as_str()) {
                Err(CoverError::Generation("quota exceeded".into()))
            } else {
                Ok(format!("data:image/jpeg;base64,{}-{}", magazine.id, issue.id))
            }
        }
    }

    fn vogue() -> Arc<Magazine> {
        Arc::clone(Catalog::builtin().find_magazine_by_id("mag1").unwrap())
    }

    #[test]
    fn prompt_mentions_name_category_and_date() {
        let mag = vogue();
        let prompt = cover_prompt(&mag, &mag.issues[0]);
        assert!(prompt.starts_with("A professional, stylish magazine cover for 'Vogue Elevated'."));
        assert!(prompt.contains("Category: Fashion."));
        assert!(prompt.contains("Issue date: October 2023."));
    }

    #[test]
    fn initial_states() {
        let gallery = CoverGallery::new(vogue());
        assert_eq!(gallery.state("issue1a"), Some(CoverState::Missing));
        assert_eq!(
            gallery.cover_src("issue1b").as_deref(),
            Some("https://picsum.photos/seed/vogue_issue2/400/500")
        );
        assert_eq!(gallery.state("nope"), None);
        let needing: Vec<_> = gallery.issues_needing_covers().iter().map(|i| i.id.clone()).collect();
        assert_eq!(needing, ["issue1a", "issue1c"]);
    }

    #[tokio::test]
    async fn resolve_missing_fills_only_missing_covers() {
        let producer = FakeProducer::default();
        let mut gallery = CoverGallery::new(vogue());

        assert_eq!(gallery.resolve_missing(&producer).await, 2);
        assert_eq!(
            gallery.cover_src("issue1a").as_deref(),
            Some("data:image/jpeg;base64,mag1-issue1a")
        );
        let mut calls = producer.calls.lock().unwrap().clone();
        calls.sort();
        assert_eq!(calls, ["issue1a", "issue1c"]);
    }

    #[tokio::test]
    async fn generated_covers_are_not_requested_again() {
        let producer = FakeProducer::default();
        let mut gallery = CoverGallery::new(vogue());
        gallery.resolve_missing(&producer).await;
        assert_eq!(gallery.resolve_missing(&producer).await, 0);
        assert_eq!(producer.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failures_become_unavailable_without_touching_catalog() {
        let producer = FakeProducer {
            fail: vec!["issue1c"],
            ..FakeProducer::default()
        };
        let mag = vogue();
        let mut gallery = CoverGallery::new(Arc::clone(&mag));

        assert_eq!(gallery.resolve_missing(&producer).await, 1);
        assert_eq!(gallery.state("issue1c"), Some(CoverState::Unavailable));
        assert_eq!(gallery.cover_src("issue1c"), None);
        assert!(mag.find_issue("issue1c").unwrap().cover_url.is_none());
    }

    #[test]
    fn record_empty_url_is_a_failure() {
        let mut gallery = CoverGallery::new(vogue());
        assert!(!gallery.record("issue1a", Ok(String::new())));
        assert_eq!(gallery.state("issue1a"), Some(CoverState::Unavailable));
    }

    #[test]
    fn entries_follow_issue_order() {
        let gallery = CoverGallery::new(vogue());
        let ids: Vec<_> = gallery.entries().into_iter().map(|e| e.issue_id).collect();
        assert_eq!(ids, ["issue1a", "issue1b", "issue1c"]);
    }
}
