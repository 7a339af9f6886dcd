//! Bootstrap a fresh Passpie key pair from environment variables
//!
//! Usage:
//!   cargo run --bin init-keyring
//!
//! Reads PASSPIE_KEY_EMAIL, PASSPIE_KEY_NAME, PASSPIE_KEY_LENGTH and
//! PASSPIE_KEY_PASSPHRASE, generates a key pair through the installed
//! backend and writes the exported armored block to PASSPIE_KEY_OUTPUT
//! (stdout when unset).

use passpie_gpg::{generate_keys, GpgBinary, KeyDefaults, KeyRequest};
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    passpie_logging::init("init-keyring");

    let passphrase = env::var("PASSPIE_KEY_PASSPHRASE")
        .map_err(|_| anyhow::anyhow!("PASSPIE_KEY_PASSPHRASE must be set"))?;

    let request = KeyRequest {
        key_length: env::var("PASSPIE_KEY_LENGTH")
            .ok()
            .and_then(|value| value.parse().ok()),
        name: env::var("PASSPIE_KEY_NAME").ok(),
        email: env::var("PASSPIE_KEY_EMAIL").ok(),
        passphrase,
        ..Default::default()
    };

    let backend = GpgBinary::discover();
    let (block, descriptor) = generate_keys(&backend, &KeyDefaults::default(), &request).await?;
    info!(
        email = %descriptor.email,
        key_length = descriptor.key_length,
        "Key pair generated"
    );

    match env::var("PASSPIE_KEY_OUTPUT") {
        Ok(path) => {
            tokio::fs::write(&path, &block).await?;
            info!(path = %path, "Exported key block written");
        }
        Err(_) => println!("{}", block),
    }

    Ok(())
}
