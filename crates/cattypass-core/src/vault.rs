//! Credential operations over a storage area.
//!
//! Every mutation is a full load → mutate → save cycle through
//! [`PasswordVault::with_store`]. Two independent vaults sharing one storage
//! area can still lose each other's updates; nothing here locks.

use crate::csv_import;
use crate::error::{Result, VaultError};
use crate::export::{self, Downloader};
use crate::models::{CredentialRecord, CredentialStore, Listing};
use crate::storage::{CredentialStoreAdapter, StorageArea};
use std::path::PathBuf;

/// Message of the [`VaultError::Parse`] raised when an import holds no usable row.
pub const NO_VALID_PASSWORDS: &str = "No valid passwords found in CSV.";

/// The password vault, owning the only handle on durable state.
pub struct PasswordVault<S> {
    adapter: CredentialStoreAdapter<S>,
}

impl<S: StorageArea> PasswordVault<S> {
    pub fn new(area: S) -> Self {
        Self {
            adapter: CredentialStoreAdapter::new(area),
        }
    }

    pub fn adapter(&self) -> &CredentialStoreAdapter<S> {
        &self.adapter
    }

    /// Load the store, apply `f` to it, and save the result.
    ///
    /// Nothing is written if loading fails.
    pub async fn with_store<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut CredentialStore) -> T,
    {
        let mut store = self.adapter.load_all().await?;
        let out = f(&mut store);
        self.adapter.save_all(&store).await?;
        Ok(out)
    }

    /// Save `record` under `site`, replacing any previous record.
    ///
    /// The site name and every record field are trimmed before saving.
    pub async fn upsert(&self, site: &str, record: CredentialRecord) -> Result<()> {
        let site = site.trim();
        let record = record.trimmed();
        if site.is_empty() || record.password.is_empty() {
            return Err(VaultError::Validation(
                "Please provide both site name and password to save.".to_string(),
            ));
        }

        let replaced = self
            .with_store(|store| store.insert(site, record))
            .await?
            .is_some();
        tracing::info!(site, replaced, "Saved password");
        Ok(())
    }

    /// Replace the record of an already listed site.
    ///
    /// The site key is used verbatim so stored names are matched exactly.
    pub async fn edit(&self, site: &str, record: CredentialRecord) -> Result<()> {
        let record = record.trimmed();
        if site.is_empty() {
            return Err(VaultError::Validation("Site name cannot be empty!".to_string()));
        }
        if record.password.is_empty() {
            return Err(VaultError::Validation("Password cannot be empty!".to_string()));
        }

        self.with_store(|store| store.insert(site, record)).await?;
        tracing::info!(site, "Edited password");
        Ok(())
    }

    /// Remove `site`. Returns whether it was present; absence is not an error.
    pub async fn delete(&self, site: &str) -> Result<bool> {
        let removed = self
            .with_store(|store| store.remove(site))
            .await?
            .is_some();
        tracing::info!(site, removed, "Deleted password");
        Ok(removed)
    }

    /// All records in display order, or [`Listing::Empty`].
    pub async fn list(&self) -> Result<Listing> {
        Ok(self.adapter.load_all().await?.into())
    }

    pub async fn get(&self, site: &str) -> Result<Option<CredentialRecord>> {
        Ok(self.adapter.load_all().await?.get(site).cloned())
    }

    /// Merge `imported` into the saved store; imported keys win.
    ///
    /// Returns the number of imported records.
    pub async fn import_store(&self, imported: CredentialStore) -> Result<usize> {
        if imported.is_empty() {
            return Err(VaultError::Parse(NO_VALID_PASSWORDS.to_string()));
        }

        let count = imported.len();
        self.with_store(|store| store.merge(imported)).await?;
        tracing::info!(count, "Imported passwords");
        Ok(count)
    }

    /// Parse CSV bytes and merge them into the saved store.
    pub async fn import_csv(&self, bytes: &[u8]) -> Result<usize> {
        let imported = csv_import::parse_csv_bytes(bytes)?;
        self.import_store(imported).await
    }

    /// Export the saved store as JSON through `downloader`.
    ///
    /// An empty store fails before the downloader is involved.
    pub async fn export<D>(&self, downloader: &D) -> Result<PathBuf>
    where
        D: Downloader + ?Sized,
    {
        let store = self.adapter.load_all().await?;
        let document = export::export_document(&store)?;
        downloader.download(&document).await
    }
}
