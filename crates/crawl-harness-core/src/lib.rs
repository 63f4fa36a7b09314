//! # Crawl Harness Core
//!
//! Runtime-agnostic building blocks for incremental crawling: data models,
//! the debounce gate, content fingerprints, the crawl-state store
//! abstraction, and the per-item reconciliation rules.
//!
//! This crate contains no tokio, sqlx, or filesystem I/O. The async
//! collaborator traits ([`reconcile::ItemLister`], [`reconcile::ItemFetcher`],
//! [`store::CrawlStateStore`]) are declared here so that any runtime can
//! drive them.

pub mod debounce;
pub mod fingerprint;
pub mod models;
pub mod reconcile;
pub mod store;
