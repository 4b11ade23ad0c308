//! Service-account credentials for the remote spreadsheet.
//!
//! The credential blob is the JSON key file Google issues for a service
//! account. It is kept in the OS keyring, or read from a file path given in
//! the configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::StoreError;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Keyring entry holding the credential JSON.
pub const SERVICE_ACCOUNT_KEY: &str = "gcp_service_account";

const NO_STORED_KEY: &str =
    "no service account credentials stored; run `weekplan auth set-credentials`";

/// Fields of a service-account key file that the token exchange needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_json(blob: &str) -> Result<Self, StoreError> {
        serde_json::from_str(blob)
            .map_err(|e| StoreError::Auth(format!("invalid service account credentials: {e}")))
    }

    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let blob = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Auth(format!(
                "cannot read credentials at {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&blob)
    }

    /// Read the key from the OS keyring.
    pub fn from_keyring() -> Result<Self, StoreError> {
        let blob = keyring_store::get(SERVICE_ACCOUNT_KEY)?.ok_or_else(|| {
            StoreError::Auth(NO_STORED_KEY.into())
        })?;
        Self::from_json(&blob)
    }
}

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    const SERVICE: &str = "weekplan";

    pub fn get(key: &str) -> Result<Option<String>, keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)
    }

    pub fn delete(key: &str) -> Result<(), keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
