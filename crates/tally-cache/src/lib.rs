//! Day-scoped cache of validated scheduler results.
//!
//! # Overview
//!
//! Entries are keyed by scheduler name and persisted as one JSON list in
//! `validation-cache.json`. Validity is calendar-date based: an entry
//! written at 09:00 WIB expires at the next WIB midnight, not 24 hours
//! later. The [`store::CacheStore`] trait is the seam handlers and tests
//! depend on; [`file::FileCacheStore`] is the production implementation and
//! [`memory::MemoryCacheStore`] backs tests.
//!
//! # On-disk layouts
//!
//! | Layout          | Shape                                   |
//! |-----------------|-----------------------------------------|
//! | current         | JSON array of entries                   |
//! | legacy dict     | JSON object keyed by scheduler name     |
//! | legacy per-name | `validation-cache-{NAME}.json` siblings |
//!
//! Legacy layouts are normalized to the current shape on first access.

pub mod error;
pub mod file;
pub mod memory;
pub mod migrate;
pub mod store;
pub mod types;

pub use error::CacheError;
pub use file::FileCacheStore;
pub use memory::MemoryCacheStore;
pub use store::CacheStore;
pub use types::CacheEntry;
