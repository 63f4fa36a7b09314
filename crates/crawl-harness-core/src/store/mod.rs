//! Crawl-state storage abstraction.
//!
//! The [`CrawlStateStore`] trait is the single source of truth for "have we
//! seen this item, and in what form". The reconciliation engine only reads
//! and writes through it, so backends are pluggable (SQLite in the main
//! crate, [`memory::InMemoryStateStore`] for tests and embedding).
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::LinearStateEntry;

/// Persisted per-item state, partitioned by crawl scope.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`get_all_entries`](CrawlStateStore::get_all_entries) | Every entry tracked under a scope |
/// | [`upsert_entry`](CrawlStateStore::upsert_entry) | Insert or replace one entry |
/// | [`delete_entry`](CrawlStateStore::delete_entry) | Forget one item |
#[async_trait]
pub trait CrawlStateStore: Send + Sync {
    async fn get_all_entries(&self, crawl_scope: &str) -> Result<Vec<LinearStateEntry>>;

    /// Insert or replace the entry keyed by `(crawl_scope, source_ref)`.
    async fn upsert_entry(&self, entry: &LinearStateEntry) -> Result<()>;

    /// Remove an entry. Deleting a missing entry is not an error.
    async fn delete_entry(&self, crawl_scope: &str, source_ref: &str) -> Result<()>;
}
