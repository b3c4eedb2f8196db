//! Local caching module for offline data access.
//!
//! This module provides the `CacheManager` holding the last synchronized
//! copy of the member collection. The snapshot is advisory: reads never fail
//! and writes are best-effort, with failures only logged.
//!
//! Data is cached in JSON format and considered stale after 60 minutes.

pub mod manager;

pub use manager::{CacheManager, CachedData};
