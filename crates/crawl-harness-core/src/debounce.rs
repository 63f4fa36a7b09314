//! Per-source debounce gate.
//!
//! Bursts of low-level triggers (several watcher events for one save, a
//! webhook retried by its sender) should collapse into a single crawl. The
//! gate remembers when each `(source_ref, crawler_type)` key was last acted
//! on and answers whether a new trigger falls outside the window.
//!
//! The gate holds no lock. Callers sharing one instance across tasks must
//! serialize access themselves, normally by owning it behind a mutex.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};

use crate::models::CrawlerType;

type DebounceKey = (String, CrawlerType);

/// In-memory sliding-window guard keyed by source reference and crawler type.
#[derive(Debug, Default)]
pub struct DebounceGate {
    /// key -> last accepted trigger time.
    entries: HashMap<DebounceKey, DateTime<Utc>>,
}

impl DebounceGate {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Whether a trigger for this key may run at `now`.
    ///
    /// Unknown keys are always allowed. For a known key the elapsed time
    /// since the last recorded trigger must be at least `window`; the
    /// boundary itself is allowed. A zero window never blocks. This call
    /// does not record anything.
    pub fn is_allowed(
        &self,
        source_ref: &str,
        crawler_type: CrawlerType,
        window: TimeDelta,
        now: DateTime<Utc>,
    ) -> bool {
        if window <= TimeDelta::zero() {
            return true;
        }
        match self.entries.get(&(source_ref.to_string(), crawler_type)) {
            Some(last) => now - *last >= window,
            None => true,
        }
    }

    /// Start (or restart) the window for this key at `now`.
    pub fn record_trigger(&mut self, source_ref: &str, crawler_type: CrawlerType, now: DateTime<Utc>) {
        self.entries.insert((source_ref.to_string(), crawler_type), now);
    }

    /// Drop one key, reopening its window. Returns whether it was present.
    pub fn clear_debounce(&mut self, source_ref: &str, crawler_type: CrawlerType) -> bool {
        self.entries
            .remove(&(source_ref.to_string(), crawler_type))
            .is_some()
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn active_key_count(&self) -> usize {
        self.entries.len()
    }

    pub fn last_trigger(&self, source_ref: &str, crawler_type: CrawlerType) -> Option<DateTime<Utc>> {
        self.entries
            .get(&(source_ref.to_string(), crawler_type))
            .copied()
    }
}
