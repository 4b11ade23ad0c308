use std::path::PathBuf;

use clap::Subcommand;
use weekplan_core::store::credentials::{keyring_store, ServiceAccountKey, SERVICE_ACCOUNT_KEY};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store a Google service-account key file in the OS keyring
    SetCredentials {
        /// Path to the JSON key file
        path: PathBuf,
    },
    /// Remove the stored service-account key
    Clear,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::SetCredentials { path } => {
            let blob = std::fs::read_to_string(&path)?;
            let key = ServiceAccountKey::from_json(&blob)?;
            keyring_store::set(SERVICE_ACCOUNT_KEY, &blob)?;
            println!("credentials stored for {}", key.client_email);
        }
        AuthAction::Clear => {
            keyring_store::delete(SERVICE_ACCOUNT_KEY)?;
            println!("credentials removed");
        }
    }
    Ok(())
}
