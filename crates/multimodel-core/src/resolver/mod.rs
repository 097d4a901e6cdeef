//! Credential resolution
//!
//! This module provides a single entry point for resolving provider API
//! keys from the vault and environment tiers, caching each key for the
//! lifetime of the process.

mod credential_store;

pub use credential_store::{CredentialError, CredentialStore, Resolution, VaultFactory, VaultOutcome};
