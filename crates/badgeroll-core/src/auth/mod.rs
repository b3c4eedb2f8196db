//! Credential module for the remote access key.
//!
//! This module provides `CredentialStore`: secure OS-level storage of the
//! project access key via keyring, one entry per remote URL.

pub mod credentials;

pub use credentials::CredentialStore;
