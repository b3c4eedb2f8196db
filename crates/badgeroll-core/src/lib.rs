//! Badgeroll core - member directory, offline cache and badge preparation.
//!
//! The `sync::Coordinator` is the only entry point a front-end should use.
//! It reads from and writes to the hosted member table through
//! `api::ApiClient` and keeps a local snapshot in `cache::CacheManager` for
//! when the remote is unreachable or not configured.

pub mod api;
pub mod auth;
pub mod badge;
pub mod cache;
pub mod config;
pub mod models;
pub mod stats;
pub mod sync;
pub mod utils;

pub use config::Config;
pub use models::{Member, MemberPatch, NewMember};
pub use sync::{Coordinator, RemoteAvailability, RemoteHandle, SyncError};
