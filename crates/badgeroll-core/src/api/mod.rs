//! REST client module for the hosted member table.
//!
//! This module provides the `MemberDirectory` contract the coordinator talks
//! to, and `ApiClient`, its implementation against a Supabase/PostgREST
//! endpoint.
//!
//! Requests authenticate with the project's access key, sent both as the
//! `apikey` header and as a bearer token.

pub mod client;
pub mod directory;
pub mod error;

pub use client::ApiClient;
pub use directory::MemberDirectory;
pub use error::ApiError;
