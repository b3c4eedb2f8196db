use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::Member;

/// Consider cache stale after 1 hour.
const CACHE_STALE_MINUTES: i64 = 60;

/// Cache entry holding the member collection
const MEMBERS_CACHE: &str = "members";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            let remaining_mins = minutes % 60;
            if remaining_mins >= 30 {
                // Round up: 1h 30m+ becomes 2h
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            let remaining_hours = (minutes % 1440) / 60;
            if remaining_hours >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }

    /// Data that was never part of a full synchronization, stamped with the
    /// Unix epoch so it always reads as stale
    fn unsynced(data: T) -> Self {
        Self {
            data,
            cached_at: DateTime::<Utc>::default(),
        }
    }

    pub fn is_synced(&self) -> bool {
        self.cached_at > DateTime::<Utc>::default()
    }
}

pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory: {}", cache_dir.display()))?;
        Ok(Self { cache_dir })
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        self.save_with(name, &CachedData::new(data))
    }

    /// Save with an explicit timestamp
    fn save_with<T: Serialize>(&self, name: &str, cached: &CachedData<T>) -> Result<()> {
        let path = self.cache_path(name);
        let contents = serde_json::to_string_pretty(cached)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write cache file: {}", name))?;
        Ok(())
    }

    // ===== Members =====

    /// The full snapshot including when it was last synchronized.
    pub fn snapshot(&self) -> Option<CachedData<Vec<Member>>> {
        match self.load(MEMBERS_CACHE) {
            Ok(cached) => cached,
            Err(e) => {
                warn!(cache = MEMBERS_CACHE, error = %e, "Failed to load member cache");
                None
            }
        }
    }

    /// Last known member collection; empty when there is none or it is unreadable.
    pub fn read(&self) -> Vec<Member> {
        self.snapshot().map(|cached| cached.data).unwrap_or_default()
    }

    /// Replace the snapshot after a full read from the remote. Stamps the
    /// synchronization time. Failure is logged, not propagated.
    pub fn write(&self, members: &[Member]) {
        match self.save(MEMBERS_CACHE, &members) {
            Ok(()) => debug!(count = members.len(), "Member cache written"),
            Err(e) => warn!(cache = MEMBERS_CACHE, error = %e, "Failed to write member cache"),
        }
    }

    /// Insert or replace one record.
    pub fn upsert_entry(&self, member: Member) {
        self.merge(std::slice::from_ref(&member));
    }

    /// Drop one record if present.
    pub fn remove_entry(&self, id: &str) {
        let Some(mut cached) = self.snapshot() else {
            return;
        };
        let before = cached.data.len();
        cached.data.retain(|m| m.id != id);
        if cached.data.len() != before {
            self.edit(&cached);
        }
    }

    /// Union-merge: records with a known id are overwritten, others added,
    /// nothing is removed.
    pub fn merge(&self, incoming: &[Member]) {
        let cached = match self.snapshot() {
            Some(CachedData { data, cached_at }) => CachedData {
                data: merge_members(data, incoming),
                cached_at,
            },
            None => CachedData::unsynced(merge_members(Vec::new(), incoming)),
        };
        self.edit(&cached);
    }

    /// Partial edits keep the timestamp of the last full synchronization.
    fn edit(&self, cached: &CachedData<Vec<Member>>) {
        match self.save_with(MEMBERS_CACHE, cached) {
            Ok(()) => debug!(count = cached.data.len(), "Member cache edited"),
            Err(e) => warn!(cache = MEMBERS_CACHE, error = %e, "Failed to edit member cache"),
        }
    }

    /// `None` until the first full synchronization
    pub fn age_display(&self) -> Option<String> {
        self.snapshot()
            .filter(CachedData::is_synced)
            .map(|cached| cached.age_display())
    }

    /// No snapshot counts as stale
    pub fn is_stale(&self) -> bool {
        self.snapshot().map(|cached| cached.is_stale()).unwrap_or(true)
    }
}

/// Overwrite-or-add by id, keeping newest registrations first.
pub(crate) fn merge_members(existing: Vec<Member>, incoming: &[Member]) -> Vec<Member> {
    let mut by_id: HashMap<String, Member> = existing
        .into_iter()
        .map(|m| (m.id.clone(), m))
        .collect();

    for member in incoming {
        by_id.insert(member.id.clone(), member.clone());
    }

    let mut merged: Vec<Member> = by_id.into_values().collect();
    merged.sort_by(|a, b| {
        b.registered_at
            .cmp(&a.registered_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    merged
}

// ============================================================================
// Tests
// ============================================================================
