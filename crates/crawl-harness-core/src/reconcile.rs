//! Reconciliation rules for two-phase tracker crawls.
//!
//! A crawl first lists every item with only its identity and remote
//! "updated at" token, then fetches full content for the items whose token
//! differs from stored state. This module holds the collaborator traits for
//! both phases and the pure per-item decisions; the async orchestration
//! lives in the main crate.
//!
//! ```text
//!   absent ──fetch──▶ discovered ──┬── same version ──▶ skip (loop)
//!                                  ├── new content ───▶ changed (loop)
//!                                  └── not listed ────▶ removed ──▶ absent
//! ```

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::models::{FetchedItem, ItemType, LinearStateEntry, ListedItem};

/// Which slice of the tracker a crawl covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingScope {
    /// Team (or workspace) identifier passed to the listing calls.
    pub scope_id: String,
    /// Restrict the listing to one project.
    pub project: Option<String>,
}

impl ListingScope {
    pub fn new(scope_id: impl Into<String>) -> Self {
        Self {
            scope_id: scope_id.into(),
            project: None,
        }
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }
}

/// Cheap listing phase: identities and version tokens, no content.
#[async_trait]
pub trait ItemLister: Send + Sync {
    async fn list_issues(&self, scope: &ListingScope) -> Result<Vec<ListedItem>>;

    async fn list_documents(&self, scope: &ListingScope) -> Result<Vec<ListedItem>>;
}

/// Expensive fetch phase: one full item at a time.
#[async_trait]
pub trait ItemFetcher: Send + Sync {
    async fn get_issue(&self, source_ref: &str) -> Result<FetchedItem>;

    async fn get_document(&self, source_ref: &str) -> Result<FetchedItem>;

    /// Route a listed item to the matching getter.
    async fn fetch_listed(&self, item: &ListedItem) -> Result<FetchedItem> {
        match item.item_type {
            ItemType::Issue => self.get_issue(&item.source_ref).await,
            ItemType::Document => self.get_document(&item.source_ref).await,
        }
    }
}

/// What to do when a listed version token is older than the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionRegressionPolicy {
    /// Fetch and classify as for any other version change.
    #[default]
    Refetch,
    /// Record a data-integrity error and leave state untouched.
    Reject,
}

/// Listing-phase decision for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingDecision {
    /// Stored version equals the listed one.
    Skip,
    /// New item, or the version moved forward (or is not comparable).
    Fetch,
    /// Both tokens are timestamps and the listed one is older.
    Regressed,
}

pub fn decide(prior: Option<&LinearStateEntry>, listed: &ListedItem) -> ListingDecision {
    match prior {
        None => ListingDecision::Fetch,
        Some(p) if p.source_version == listed.updated_at => ListingDecision::Skip,
        Some(p) if version_regressed(&p.source_version, &listed.updated_at) => {
            ListingDecision::Regressed
        }
        Some(_) => ListingDecision::Fetch,
    }
}

/// True only when both tokens parse as RFC 3339 and `listed` is earlier.
///
/// Opaque tokens are never ordered, so they can only ever look "changed".
pub fn version_regressed(stored: &str, listed: &str) -> bool {
    match (
        DateTime::parse_from_rfc3339(stored),
        DateTime::parse_from_rfc3339(listed),
    ) {
        (Ok(stored), Ok(listed)) => listed < stored,
        _ => false,
    }
}

/// Fetch-phase classification once the content fingerprint is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Discovered,
    Changed { previous_source_version: String },
    /// Version token moved but the content hash did not.
    MetadataOnly,
}

pub fn classify_fetched(prior: Option<&LinearStateEntry>, fingerprint: &str) -> FetchOutcome {
    match prior {
        None => FetchOutcome::Discovered,
        Some(p) if p.content_fingerprint != fingerprint => FetchOutcome::Changed {
            previous_source_version: p.source_version.clone(),
        },
        Some(_) => FetchOutcome::MetadataOnly,
    }
}

/// Stored entries whose source_ref is missing from the current listing.
pub fn removed_entries<'a>(
    prior: &'a [LinearStateEntry],
    seen: &HashSet<String>,
) -> Vec<&'a LinearStateEntry> {
    prior
        .iter()
        .filter(|e| !seen.contains(&e.source_ref))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(source_ref: &str, version: &str, fp: &str) -> LinearStateEntry {
        LinearStateEntry {
            crawl_scope: "team".to_string(),
            source_ref: source_ref.to_string(),
            source_version: version.to_string(),
            content_fingerprint: fp.to_string(),
        }
    }

    fn listed(source_ref: &str, version: &str) -> ListedItem {
        ListedItem {
            source_ref: source_ref.to_string(),
            updated_at: version.to_string(),
            item_type: ItemType::Issue,
        }
    }

    #[test]
    fn test_decide_matrix() {
        let prior = entry("ISSUE-1", "v5", "h1");
        assert_eq!(decide(None, &listed("ISSUE-1", "v5")), ListingDecision::Fetch);
        assert_eq!(decide(Some(&prior), &listed("ISSUE-1", "v5")), ListingDecision::Skip);
        assert_eq!(decide(Some(&prior), &listed("ISSUE-1", "v6")), ListingDecision::Fetch);
    }

    #[test]
    fn test_regression_only_for_comparable_timestamps() {
        assert!(version_regressed("2024-05-02T10:00:00Z", "2024-05-01T10:00:00Z"));
        assert!(!version_regressed("2024-05-01T10:00:00Z", "2024-05-02T10:00:00Z"));
        assert!(!version_regressed("v6", "v5"));

        let prior = entry("ISSUE-1", "2024-05-02T10:00:00+00:00", "h1");
        assert_eq!(
            decide(Some(&prior), &listed("ISSUE-1", "2024-05-01T09:00:00Z")),
            ListingDecision::Regressed
        );
    }

    #[test]
    fn test_classify_fetched() {
        let prior = entry("ISSUE-1", "v5", "h1");
        assert_eq!(classify_fetched(None, "h1"), FetchOutcome::Discovered);
        assert_eq!(classify_fetched(Some(&prior), "h1"), FetchOutcome::MetadataOnly);
        assert_eq!(
            classify_fetched(Some(&prior), "h2"),
            FetchOutcome::Changed {
                previous_source_version: "v5".to_string()
            }
        );
    }

    #[test]
    fn test_removed_entries() {
        let prior = vec![entry("ISSUE-1", "v1", "a"), entry("ISSUE-2", "v1", "b")];
        let seen: HashSet<String> = ["ISSUE-1".to_string()].into_iter().collect();
        let removed = removed_entries(&prior, &seen);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].source_ref, "ISSUE-2");
    }
}
