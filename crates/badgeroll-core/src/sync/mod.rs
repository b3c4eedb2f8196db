//! Synchronization between the remote member table and the local cache.
//!
//! The remote is the system of record. Reads degrade to the cache when the
//! remote is unreachable or not configured; writes are strict and fail
//! instead of leaving a cache-only record behind.

pub mod coordinator;
pub mod error;
pub mod ids;

#[cfg(test)]
mod memory;

use std::sync::Arc;

use tracing::warn;

use crate::api::{ApiClient, MemberDirectory};
use crate::config::Config;

pub use coordinator::Coordinator;
pub use error::SyncError;

/// The remote connection handed to the coordinator.
#[derive(Clone)]
pub enum RemoteHandle {
    Configured(Arc<dyn MemberDirectory>),
    Unconfigured,
}

impl RemoteHandle {
    /// Build the remote from configuration. Missing or unusable settings
    /// yield `Unconfigured`, not an error.
    pub fn from_config(config: &Config) -> Self {
        let Some(settings) = config.remote_settings() else {
            return RemoteHandle::Unconfigured;
        };

        match ApiClient::new(&settings) {
            Ok(client) => RemoteHandle::Configured(Arc::new(client)),
            Err(e) => {
                warn!(error = %e, "Remote settings unusable, running from cache");
                RemoteHandle::Unconfigured
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, RemoteHandle::Configured(_))
    }
}

/// Where the remote stands, as seen by the last call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteAvailability {
    Configured,
    Unconfigured,
    Unreachable,
}

impl std::fmt::Display for RemoteAvailability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteAvailability::Configured => write!(f, "online"),
            RemoteAvailability::Unconfigured => write!(f, "not configured"),
            RemoteAvailability::Unreachable => write!(f, "unreachable"),
        }
    }
}
