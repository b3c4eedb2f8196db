//! The coordinator: the only API a front-end calls.
//!
//! Policy, applied uniformly:
//! - `list_members` / `get_member` try the remote and fall back to the cache
//!   snapshot on any failure, so reads stay available offline.
//! - `create_member` / `update_member` / `delete_member` / `import_snapshot`
//!   are strict: they fail when the remote write fails and never leave a
//!   record that exists only in the cache.
//! - Every successful remote read replaces the cache; every successful remote
//!   write is mirrored into it on a best-effort basis.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use chrono::Local;
use tracing::{debug, info, warn};

use crate::api::{ApiError, MemberDirectory};
use crate::badge::BadgeSheet;
use crate::cache::CacheManager;
use crate::models::snapshot::ImportDocument;
use crate::models::{ExportDocument, Member, MemberPatch, NewMember, SortOrder};
use crate::stats::MemberStats;
use crate::utils::DEFAULT_COUNTRY_PREFIX;

use super::ids::{generate_id, RegistrationClock};
use super::{RemoteAvailability, RemoteHandle, SyncError};

pub struct Coordinator {
    remote: RemoteHandle,
    cache: CacheManager,
    country_prefix: String,
    clock: RegistrationClock,
    last_seen: Mutex<RemoteAvailability>,
}

impl Coordinator {
    pub fn new(remote: RemoteHandle, cache: CacheManager) -> Self {
        Self {
            remote,
            cache,
            country_prefix: DEFAULT_COUNTRY_PREFIX.to_string(),
            clock: RegistrationClock::new(),
            last_seen: Mutex::new(RemoteAvailability::Configured),
        }
    }

    /// Country calling code used when deriving `tel:` QR payloads
    pub fn with_country_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.country_prefix = prefix.into();
        self
    }

    // =========================================================================
    // Availability
    // =========================================================================

    /// Whether a remote URL and access key were available at startup
    pub fn is_configured(&self) -> bool {
        self.remote.is_configured()
    }

    pub fn availability(&self) -> RemoteAvailability {
        match self.remote {
            RemoteHandle::Unconfigured => RemoteAvailability::Unconfigured,
            RemoteHandle::Configured(_) => *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    fn directory(&self) -> Result<&dyn MemberDirectory, SyncError> {
        match &self.remote {
            RemoteHandle::Configured(directory) => Ok(directory.as_ref()),
            RemoteHandle::Unconfigured => Err(SyncError::Unconfigured),
        }
    }

    /// Record what a remote call says about reachability. Any answer from the
    /// server, even a refusal, means it is reachable.
    fn observe<T>(&self, result: &Result<T, ApiError>) {
        let seen = match result {
            Err(e) if e.is_unreachable() => RemoteAvailability::Unreachable,
            _ => RemoteAvailability::Configured,
        };
        let mut last = self.last_seen.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = *last;
        if previous != seen {
            info!(from = %previous, to = %seen, "Remote availability changed");
            *last = seen;
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current collection, newest registration first. Never fails: falls
    /// back to the cache snapshot (possibly empty) when the remote cannot
    /// answer.
    pub async fn list_members(&self) -> Vec<Member> {
        let directory = match self.directory() {
            Ok(directory) => directory,
            Err(_) => {
                debug!("Remote not configured, serving cached members");
                return self.cache.read();
            }
        };

        let result = directory.select(SortOrder::newest_first()).await;
        self.observe(&result);

        match result {
            Ok(members) => {
                self.cache.write(&members);
                members
            }
            Err(e) => {
                warn!(error = %e, "Remote read failed, serving cached members");
                self.cache.read()
            }
        }
    }

    /// Full fetch then filter; the collection is small enough that a point
    /// query is not worth a second code path.
    pub async fn get_member(&self, id: &str) -> Result<Member, SyncError> {
        self.list_members()
            .await
            .into_iter()
            .find(|m| m.id == id)
            .ok_or_else(|| SyncError::not_found(id))
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Register a member. Identity and registration time are assigned here.
    pub async fn create_member(&self, fields: NewMember) -> Result<Member, SyncError> {
        let directory = self.directory()?;

        let member = fields.into_member(self.fresh_id(), self.clock.next(), &self.country_prefix);

        let result = directory.insert(&member).await;
        self.observe(&result);
        let stored = result.map_err(|e| {
            warn!(id = %member.id, error = %e, "Remote create failed, nothing cached");
            SyncError::from(e)
        })?;

        self.cache.upsert_entry(stored.clone());
        info!(id = %stored.id, "Member registered");
        Ok(stored)
    }

    /// Shallow merge of `patch` into the stored record.
    pub async fn update_member(&self, id: &str, patch: MemberPatch) -> Result<Member, SyncError> {
        let directory = self.directory()?;

        let patch = patch.with_derived_qr_code(&self.country_prefix);
        if patch.is_empty() {
            debug!(id = id, "Empty update, returning current record");
            return self.get_member(id).await;
        }

        let result = directory.update(id, &patch).await;
        self.observe(&result);
        let updated = result
            .map_err(|e| {
                warn!(id = id, error = %e, "Remote update failed");
                SyncError::from(e)
            })?
            .ok_or_else(|| SyncError::not_found(id))?;

        self.cache.upsert_entry(updated.clone());
        info!(id = id, "Member updated");
        Ok(updated)
    }

    /// Returns whether a record was removed. Deleting an absent id is a
    /// successful no-op.
    pub async fn delete_member(&self, id: &str) -> Result<bool, SyncError> {
        let directory = self.directory()?;

        let result = directory.delete(id).await;
        self.observe(&result);
        let removed = result.map_err(|e| {
            warn!(id = id, error = %e, "Remote delete failed");
            SyncError::from(e)
        })?;

        self.cache.remove_entry(id);
        if removed {
            info!(id = id, "Member deleted");
        } else {
            debug!(id = id, "Delete of absent member");
        }
        Ok(removed)
    }

    fn fresh_id(&self) -> String {
        let known: HashSet<String> = self.cache.read().into_iter().map(|m| m.id).collect();
        loop {
            let id = generate_id();
            if !known.contains(&id) {
                return id;
            }
        }
    }

    // =========================================================================
    // Export / import
    // =========================================================================

    /// Serialized collection with export date and format version.
    pub async fn export_snapshot(&self) -> Result<Vec<u8>, SyncError> {
        let document = ExportDocument::new(self.list_members().await);
        let bytes = serde_json::to_vec_pretty(&document)
            .map_err(|e| SyncError::InvalidFormat(e.to_string()))?;
        info!(count = document.members.len(), "Members exported");
        Ok(bytes)
    }

    /// Union-merge an export file into the directory: ids present in the
    /// file are overwritten, ids absent from it are left alone. Returns the
    /// resulting collection.
    pub async fn import_snapshot(&self, bytes: &[u8]) -> Result<Vec<Member>, SyncError> {
        let members = Self::parse_import(bytes)?;
        let directory = self.directory()?;

        if members.is_empty() {
            debug!("Import file has no members");
            return Ok(self.list_members().await);
        }

        // One request, so the remote applies all of it or none of it
        let result = directory.upsert(&members).await;
        self.observe(&result);
        result.map_err(|e| {
            warn!(count = members.len(), error = %e, "Remote import failed, nothing applied");
            SyncError::from(e)
        })?;

        self.cache.merge(&members);
        info!(count = members.len(), "Members imported");
        Ok(self.list_members().await)
    }

    fn parse_import(bytes: &[u8]) -> Result<Vec<Member>, SyncError> {
        let document: ImportDocument =
            serde_json::from_slice(bytes).map_err(|e| SyncError::InvalidFormat(e.to_string()))?;

        if let Some(index) = document.members.iter().position(|m| m.id.trim().is_empty()) {
            return Err(SyncError::InvalidFormat(format!(
                "member at position {} has no id",
                index + 1
            )));
        }

        // Later entries win when an id repeats
        let mut seen = HashSet::new();
        let mut members: Vec<Member> = document
            .members
            .into_iter()
            .rev()
            .filter(|m| seen.insert(m.id.clone()))
            .collect();
        members.reverse();
        Ok(members)
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    pub async fn stats(&self) -> MemberStats {
        MemberStats::for_day(&self.list_members().await, Local::now().date_naive())
    }

    /// Badge data for one member, or for everyone when `id` is `None`.
    pub async fn badge_sheet(&self, id: Option<&str>) -> Result<BadgeSheet, SyncError> {
        match id {
            Some(id) => {
                let member = self.get_member(id).await?;
                Ok(BadgeSheet::single(&member, &self.country_prefix))
            }
            None => {
                let members = self.list_members().await;
                Ok(BadgeSheet::all(&members, Local::now().date_naive(), &self.country_prefix))
            }
        }
    }

    /// How old the cache snapshot is, e.g. "5m ago"; `None` if never synced
    pub fn cache_age(&self) -> Option<String> {
        self.cache.age_display()
    }

    pub fn is_cache_stale(&self) -> bool {
        self.cache.is_stale()
    }
}

// ============================================================================
// Tests
// ============================================================================
