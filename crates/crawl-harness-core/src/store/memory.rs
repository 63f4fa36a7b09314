//! In-memory [`CrawlStateStore`] for tests and embedded use.
//!
//! Uses a `BTreeMap` behind `std::sync::RwLock`, so listings come back in
//! a stable `(crawl_scope, source_ref)` order.

use std::collections::BTreeMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::LinearStateEntry;

use super::CrawlStateStore;

pub struct InMemoryStateStore {
    entries: RwLock<BTreeMap<(String, String), LinearStateEntry>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Build a store pre-populated with `entries`.
    pub fn with_entries(entries: impl IntoIterator<Item = LinearStateEntry>) -> Self {
        let map = entries
            .into_iter()
            .map(|e| ((e.crawl_scope.clone(), e.source_ref.clone()), e))
            .collect();
        Self {
            entries: RwLock::new(map),
        }
    }

    pub fn get(&self, crawl_scope: &str, source_ref: &str) -> Option<LinearStateEntry> {
        let entries = self.entries.read().unwrap();
        entries
            .get(&(crawl_scope.to_string(), source_ref.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CrawlStateStore for InMemoryStateStore {
    async fn get_all_entries(&self, crawl_scope: &str) -> Result<Vec<LinearStateEntry>> {
        let entries = self.entries.read().unwrap();
        Ok(entries
            .values()
            .filter(|e| e.crawl_scope == crawl_scope)
            .cloned()
            .collect())
    }

    async fn upsert_entry(&self, entry: &LinearStateEntry) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        entries.insert(
            (entry.crawl_scope.clone(), entry.source_ref.clone()),
            entry.clone(),
        );
        Ok(())
    }

    async fn delete_entry(&self, crawl_scope: &str, source_ref: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        entries.remove(&(crawl_scope.to_string(), source_ref.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(scope: &str, source_ref: &str, version: &str) -> LinearStateEntry {
        LinearStateEntry {
            crawl_scope: scope.to_string(),
            source_ref: source_ref.to_string(),
            source_version: version.to_string(),
            content_fingerprint: format!("fp-{version}"),
        }
    }

    #[tokio::test]
    async fn test_entries_are_partitioned_by_scope() {
        let store = InMemoryStateStore::new();
        store.upsert_entry(&entry("team-a", "ISSUE-1", "v1")).await.unwrap();
        store.upsert_entry(&entry("team-b", "ISSUE-1", "v9")).await.unwrap();

        let a = store.get_all_entries("team-a").await.unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].source_version, "v1");
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_upsert_replaces_and_delete_is_idempotent() {
        let store = InMemoryStateStore::with_entries([entry("s", "ISSUE-1", "v1")]);
        store.upsert_entry(&entry("s", "ISSUE-1", "v2")).await.unwrap();
        assert_eq!(store.get("s", "ISSUE-1").unwrap().source_version, "v2");

        store.delete_entry("s", "ISSUE-1").await.unwrap();
        store.delete_entry("s", "ISSUE-1").await.unwrap();
        assert!(store.is_empty());
    }
}
