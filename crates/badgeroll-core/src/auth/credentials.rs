use anyhow::{Context, Result};
use keyring::Entry;

use crate::config::APP_NAME;

pub struct CredentialStore;

impl CredentialStore {
    /// Store the access key for a remote URL in the OS keychain
    pub fn store_api_key(remote_url: &str, api_key: &str) -> Result<()> {
        let entry = Entry::new(APP_NAME, remote_url)
            .context("Failed to create keyring entry")?;
        entry
            .set_password(api_key)
            .context("Failed to store access key in keychain")?;
        Ok(())
    }

    /// Retrieve the access key for a remote URL from the OS keychain
    pub fn get_api_key(remote_url: &str) -> Result<String> {
        let entry = Entry::new(APP_NAME, remote_url)
            .context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("Failed to retrieve access key from keychain")
    }

    /// Delete the stored access key for a remote URL
    pub fn delete_api_key(remote_url: &str) -> Result<()> {
        let entry = Entry::new(APP_NAME, remote_url)
            .context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete access key from keychain")?;
        Ok(())
    }
}
