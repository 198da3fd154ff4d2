//! Core models, storage and vault operations for cattypass.
//!
//! This crate provides shared types and credential operations used by both
//! the CLI and TUI frontends.

pub mod config;
pub mod csv_import;
pub mod error;
pub mod export;
pub mod generator;
pub mod models;
pub mod storage;
pub mod vault;

pub use config::Config;
pub use error::VaultError;
pub use export::{Downloader, ExportDocument, FileDownloader, EXPORT_FILENAME, EXPORT_MEDIA_TYPE};
pub use generator::generate_password;
pub use models::{CredentialRecord, CredentialStore, Listing};
pub use storage::{CredentialStoreAdapter, FileStorage, MemoryStorage, StorageArea, PASSWORDS_KEY};
pub use vault::{PasswordVault, NO_VALID_PASSWORDS};
