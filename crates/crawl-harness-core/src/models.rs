//! Core data models shared by the fetcher, the debounce gate, and the
//! reconciliation engine.
//!
//! These types describe fetch outcomes, persisted per-item crawl state, and
//! the events emitted when a crawl observes a transition.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of crawler backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlerType {
    /// Plain file on the local filesystem, polled or triggered directly.
    Filesystem,
    /// Local file reported by a filesystem watcher.
    Watchdog,
    /// File inside a git working tree.
    GitRepo,
    /// Issue or document in the Linear tracker.
    Linear,
}

impl CrawlerType {
    pub const ALL: [CrawlerType; 4] = [
        CrawlerType::Filesystem,
        CrawlerType::Watchdog,
        CrawlerType::GitRepo,
        CrawlerType::Linear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CrawlerType::Filesystem => "filesystem",
            CrawlerType::Watchdog => "watchdog",
            CrawlerType::GitRepo => "git_repo",
            CrawlerType::Linear => "linear",
        }
    }
}

impl fmt::Display for CrawlerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrawlerType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        CrawlerType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown crawler type: '{}'. Available: filesystem, watchdog, git_repo, linear",
                    s
                )
            })
    }
}

/// Outcome category of a single document fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FetchStatus {
    Success,
    /// The target no longer exists. Not a failure; carries a removed event.
    FileNotFound,
    /// Content was read but the git commit id could not be resolved.
    GitShaUnavailable,
    FetchFailed,
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FetchStatus::Success => "SUCCESS",
            FetchStatus::FileNotFound => "FILE_NOT_FOUND",
            FetchStatus::GitShaUnavailable => "GIT_SHA_UNAVAILABLE",
            FetchStatus::FetchFailed => "FETCH_FAILED",
        };
        f.write_str(s)
    }
}

/// Notification that a tracked item disappeared from its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedEvent {
    pub source_ref: String,
    pub crawl_scope: String,
    pub correlation_id: String,
    pub last_source_version: Option<String>,
}

/// Result of one [`CrawlerType`]-specific fetch.
///
/// Built once through one of the status constructors and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub source_ref: String,
    pub crawl_scope: String,
    pub status: FetchStatus,
    pub raw_content: Option<Vec<u8>>,
    /// Commit id for `git_repo`; always `None` for the other backends.
    pub resolved_source_version: Option<String>,
    pub removed_event: Option<RemovedEvent>,
    pub error: Option<String>,
    pub correlation_id: String,
}

impl FetchResult {
    pub fn success(
        source_ref: &str,
        crawl_scope: &str,
        correlation_id: &str,
        raw_content: Vec<u8>,
        resolved_source_version: Option<String>,
    ) -> Self {
        Self {
            source_ref: source_ref.to_string(),
            crawl_scope: crawl_scope.to_string(),
            status: FetchStatus::Success,
            raw_content: Some(raw_content),
            resolved_source_version,
            removed_event: None,
            error: None,
            correlation_id: correlation_id.to_string(),
        }
    }

    pub fn not_found(source_ref: &str, crawl_scope: &str, correlation_id: &str) -> Self {
        Self {
            source_ref: source_ref.to_string(),
            crawl_scope: crawl_scope.to_string(),
            status: FetchStatus::FileNotFound,
            raw_content: None,
            resolved_source_version: None,
            removed_event: Some(RemovedEvent {
                source_ref: source_ref.to_string(),
                crawl_scope: crawl_scope.to_string(),
                correlation_id: correlation_id.to_string(),
                last_source_version: None,
            }),
            error: None,
            correlation_id: correlation_id.to_string(),
        }
    }

    /// Content is usable, only the version token is missing.
    pub fn sha_unavailable(
        source_ref: &str,
        crawl_scope: &str,
        correlation_id: &str,
        raw_content: Vec<u8>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            source_ref: source_ref.to_string(),
            crawl_scope: crawl_scope.to_string(),
            status: FetchStatus::GitShaUnavailable,
            raw_content: Some(raw_content),
            resolved_source_version: None,
            removed_event: None,
            error: Some(reason.into()),
            correlation_id: correlation_id.to_string(),
        }
    }

    pub fn failed(
        source_ref: &str,
        crawl_scope: &str,
        correlation_id: &str,
        error: impl Into<String>,
    ) -> Self {
        Self {
            source_ref: source_ref.to_string(),
            crawl_scope: crawl_scope.to_string(),
            status: FetchStatus::FetchFailed,
            raw_content: None,
            resolved_source_version: None,
            removed_event: None,
            error: Some(error.into()),
            correlation_id: correlation_id.to_string(),
        }
    }

    /// True when `raw_content` is populated (full or degraded success).
    pub fn has_content(&self) -> bool {
        self.raw_content.is_some()
    }
}

/// Kind of tracker item returned by a listing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Issue,
    Document,
}

/// Cheap listing record: identity and remote version only, no content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedItem {
    pub source_ref: String,
    /// Remote "updated at" token, compared for equality with stored state.
    pub updated_at: String,
    pub item_type: ItemType,
}

/// Full item body returned by the expensive fetch path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedItem {
    pub content: String,
}

/// Persisted per-item crawl state for the tracker source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearStateEntry {
    pub crawl_scope: String,
    pub source_ref: String,
    /// Last-seen remote "updated at" token.
    pub source_version: String,
    pub content_fingerprint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredEvent {
    pub crawl_scope: String,
    pub source_ref: String,
    pub source_version: String,
    pub content_fingerprint: String,
    pub correlation_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedEvent {
    pub crawl_scope: String,
    pub source_ref: String,
    pub source_version: String,
    pub previous_source_version: String,
    pub content_fingerprint: String,
    pub correlation_id: String,
}

/// Aggregate outcome of one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlResult {
    pub correlation_id: String,
    pub discovered: Vec<DiscoveredEvent>,
    pub changed: Vec<ChangedEvent>,
    pub removed: Vec<RemovedEvent>,
    /// Unchanged versions plus metadata-only updates.
    pub skipped: usize,
    /// Item-level failures keyed by source_ref.
    pub errors: BTreeMap<String, String>,
}

impl CrawlResult {
    pub fn new(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            ..Default::default()
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of events this run will hand to a publisher.
    pub fn event_count(&self) -> usize {
        self.discovered.len() + self.changed.len() + self.removed.len()
    }
}

/// Generate a fresh correlation id.
pub fn new_correlation_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawler_type_round_trip() {
        for t in CrawlerType::ALL {
            assert_eq!(t.as_str().parse::<CrawlerType>().unwrap(), t);
        }
        assert_eq!("GIT-REPO".parse::<CrawlerType>().unwrap(), CrawlerType::GitRepo);
        assert!("s3".parse::<CrawlerType>().is_err());
    }

    #[test]
    fn test_not_found_carries_removed_event() {
        let result = FetchResult::not_found("/tmp/missing.py", "local", "cid-1");
        assert_eq!(result.status, FetchStatus::FileNotFound);
        assert!(result.raw_content.is_none());
        let removed = result.removed_event.unwrap();
        assert_eq!(removed.source_ref, "/tmp/missing.py");
        assert_eq!(removed.correlation_id, "cid-1");
        assert!(removed.last_source_version.is_none());
    }

    #[test]
    fn test_sha_unavailable_keeps_content() {
        let result = FetchResult::sha_unavailable("a.py", "repo", "cid", b"x".to_vec(), "no history");
        assert!(result.has_content());
        assert!(result.resolved_source_version.is_none());
        assert_eq!(result.status, FetchStatus::GitShaUnavailable);
    }

    #[test]
    fn test_fetch_status_serializes_screaming() {
        let json = serde_json::to_string(&FetchStatus::GitShaUnavailable).unwrap();
        assert_eq!(json, "\"GIT_SHA_UNAVAILABLE\"");
        assert_eq!(FetchStatus::FileNotFound.to_string(), "FILE_NOT_FOUND");
    }
}
