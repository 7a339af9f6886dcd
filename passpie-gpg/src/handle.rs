//! Aggregate handle binding homedir, recipient and passphrase
// Copyright 2025 Francisco F. Pinochet
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use crate::config::GpgOptions;
use crate::crypto;
use crate::error::{GpgError, GpgResult};
use crate::homedir::{setup_homedir, Homedir};
use crate::invoker::{BackendInvoker, GpgBinary};
use crate::registry::{self, ListMode};
use std::sync::Arc;
use tracing::info;

/// Sentinel for the `ensure` round-trip probe
const PROBE_PLAINTEXT: &[u8] = b"OK";

/// High-level handle over one configured keyring
///
/// Immutable after construction; the homedir is resolved once when the
/// handle is built.
pub struct Gpg {
    backend: Arc<dyn BackendInvoker>,
    homedir: Homedir,
    recipient: String,
    passphrase: Option<String>,
}

impl std::fmt::Debug for Gpg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gpg")
            .field("homedir", &self.homedir)
            .field("recipient", &self.recipient)
            .finish_non_exhaustive()
    }
}

impl Gpg {
    /// Bind a backend and configuration, resolving the homedir
    ///
    /// Homedir precedence: explicit path from the options, then the
    /// `PASSPIE_GPG_HOMEDIR` override, then an ephemeral directory built
    /// from the configured key blocks.
    pub async fn new(backend: Arc<dyn BackendInvoker>, options: GpgOptions) -> GpgResult<Self> {
        let homedir = setup_homedir(
            backend.as_ref(),
            options.resolved_homedir(),
            &options.key_blocks,
        )
        .await?;

        Ok(Self {
            backend,
            homedir,
            recipient: options.recipient,
            passphrase: options.passphrase,
        })
    }

    pub fn homedir(&self) -> &Homedir {
        &self.homedir
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// List identities in the bound homedir
    pub async fn list_keys(&self, mode: ListMode) -> GpgResult<Vec<String>> {
        registry::list_keys(self.backend.as_ref(), self.homedir.path(), mode).await
    }

    /// Export every key pair currently listed, in listing order
    pub async fn export(&self) -> GpgResult<Vec<String>> {
        registry::export_all(self.backend.as_ref(), self.homedir.path()).await
    }

    /// Encrypt opaque bytes for the configured recipient
    pub async fn encrypt(&self, data: &[u8]) -> GpgResult<Vec<u8>> {
        crypto::encrypt_data(
            self.backend.as_ref(),
            data,
            &self.recipient,
            self.homedir.path(),
        )
        .await
    }

    /// Decrypt opaque bytes with the configured passphrase
    pub async fn decrypt(&self, data: &[u8]) -> GpgResult<Vec<u8>> {
        let passphrase = self
            .passphrase
            .as_deref()
            .ok_or_else(|| GpgError::Configuration("Passphrase not set".to_string()))?;
        crypto::decrypt_data(
            self.backend.as_ref(),
            data,
            &self.recipient,
            self.homedir.path(),
            passphrase,
        )
        .await
    }

    /// Confirm the configuration is operationally sound
    ///
    /// The recipient must appear in either the fingerprint or the email
    /// listing, and the configured passphrase must decrypt a throwaway
    /// probe back to the exact sentinel. Idempotent; the probe pair is
    /// the only side effect.
    pub async fn ensure(&self) -> GpgResult<()> {
        let emails = self.list_keys(ListMode::Emails).await?;
        let fingerprints = self.list_keys(ListMode::Fingerprints).await?;
        let known = emails
            .iter()
            .chain(fingerprints.iter())
            .any(|identity| identity == &self.recipient);
        if !known {
            return Err(GpgError::Configuration(format!(
                "Recipient '{}' not found in homedir",
                self.recipient
            )));
        }

        if self.passphrase.is_none() {
            return Err(GpgError::Configuration("Passphrase not set".to_string()));
        }

        let round_trip = async {
            let ciphertext = self.encrypt(PROBE_PLAINTEXT).await?;
            self.decrypt(&ciphertext).await
        };
        match round_trip.await {
            Ok(plaintext) if plaintext == PROBE_PLAINTEXT => {
                info!(recipient = %self.recipient, "Keyring configuration verified");
                Ok(())
            }
            _ => Err(GpgError::Configuration("Wrong passphrase".to_string())),
        }
    }
}

/// Initialize a handle against the installed backend binary
pub async fn init_gpg(options: GpgOptions) -> GpgResult<Arc<Gpg>> {
    let backend = Arc::new(GpgBinary::discover());
    let gpg = Gpg::new(backend, options).await?;
    Ok(Arc::new(gpg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::testing::FakeBackend;
    use crate::invoker::BackendOutput;

    fn listing_for(email: &str, fingerprint: &str) -> String {
        let mut uid = vec![""; 11];
        uid[0] = "uid";
        uid[1] = "u";
        let user_id = format!("Test <{}>", email);
        uid[9] = user_id.as_str();
        let mut fpr = vec![""; 11];
        fpr[0] = "fpr";
        fpr[9] = fingerprint;
        format!("{}\n{}\n", fpr.join(":"), uid.join(":"))
    }

    fn keyring_backend(
        email: &'static str,
        fingerprint: &'static str,
        decrypts_to: &'static [u8],
    ) -> Arc<FakeBackend> {
        Arc::new(FakeBackend::new(move |args, stdin| {
            if args.contains(&"--list-keys".to_string()) {
                Ok(FakeBackend::ok(&listing_for(email, fingerprint)))
            } else if args.contains(&"--encrypt".to_string()) {
                let mut stdout = b"ENC:".to_vec();
                stdout.extend_from_slice(stdin.unwrap());
                Ok(BackendOutput {
                    stdout,
                    stderr: Vec::new(),
                    code: 0,
                })
            } else {
                Ok(BackendOutput {
                    stdout: decrypts_to.to_vec(),
                    stderr: Vec::new(),
                    code: 0,
                })
            }
        }))
    }

    fn options_with_homedir(recipient: &str, passphrase: Option<&str>) -> (GpgOptions, tempfile::TempDir) {
        let temp = tempfile::tempdir().unwrap();
        let mut options = GpgOptions::new(recipient);
        options.homedir = Some(temp.path().to_path_buf());
        options.passphrase = passphrase.map(|p| p.to_string());
        (options, temp)
    }

    #[tokio::test]
    async fn test_new_without_homedir_or_keys_fails() {
        let backend = Arc::new(FakeBackend::new(|_, _| Ok(FakeBackend::ok(""))));
        let err = Gpg::new(backend, GpgOptions::new("a@b.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, GpgError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_ensure_rejects_unknown_recipient() {
        let backend = keyring_backend("other@host", "AABBCCDD", b"OK");
        let (options, _temp) = options_with_homedir("a@b.com", Some("secret"));
        let gpg = Gpg::new(backend, options).await.unwrap();

        let err = gpg.ensure().await.unwrap_err();
        assert!(err.to_string().contains("not found in homedir"));
    }

    #[tokio::test]
    async fn test_ensure_accepts_recipient_by_fingerprint() {
        let backend = keyring_backend("other@host", "AABBCCDD", b"OK");
        let (options, _temp) = options_with_homedir("AABBCCDD", Some("secret"));
        let gpg = Gpg::new(backend, options).await.unwrap();

        gpg.ensure().await.unwrap();
    }

    #[tokio::test]
    async fn test_ensure_requires_a_passphrase() {
        let backend = keyring_backend("a@b.com", "AABBCCDD", b"OK");
        let (options, _temp) = options_with_homedir("a@b.com", None);
        let gpg = Gpg::new(backend, options).await.unwrap();

        let err = gpg.ensure().await.unwrap_err();
        assert!(err.to_string().contains("Passphrase not set"));
    }

    #[tokio::test]
    async fn test_ensure_round_trip_succeeds() {
        let backend = keyring_backend("a@b.com", "AABBCCDD", b"OK");
        let (options, _temp) = options_with_homedir("a@b.com", Some("secret"));
        let gpg = Gpg::new(backend, options).await.unwrap();

        gpg.ensure().await.unwrap();
    }

    #[tokio::test]
    async fn test_ensure_flags_a_wrong_passphrase() {
        // The probe decrypts to something other than the sentinel.
        let backend = keyring_backend("a@b.com", "AABBCCDD", b"");
        let (options, _temp) = options_with_homedir("a@b.com", Some("wrong-passphrase"));
        let gpg = Gpg::new(backend, options).await.unwrap();

        let err = gpg.ensure().await.unwrap_err();
        assert!(matches!(err, GpgError::Configuration(_)));
        assert!(err.to_string().contains("Wrong passphrase"));
    }

    #[tokio::test]
    async fn test_ensure_treats_backend_failure_as_wrong_passphrase() {
        let backend = Arc::new(FakeBackend::new(|args, _| {
            if args.contains(&"--list-keys".to_string()) {
                Ok(FakeBackend::ok(&listing_for("a@b.com", "AABBCCDD")))
            } else if args.contains(&"--encrypt".to_string()) {
                Ok(FakeBackend::ok("ciphertext"))
            } else {
                Ok(FakeBackend::fail("gpg: decryption failed: Bad session key"))
            }
        }));
        let (options, _temp) = options_with_homedir("a@b.com", Some("wrong-passphrase"));
        let gpg = Gpg::new(backend, options).await.unwrap();

        let err = gpg.ensure().await.unwrap_err();
        assert!(matches!(err, GpgError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_encrypt_decrypt_pass_through() {
        let backend = keyring_backend("a@b.com", "AABBCCDD", b"plain");
        let (options, _temp) = options_with_homedir("a@b.com", Some("secret"));
        let gpg = Gpg::new(backend, options).await.unwrap();

        let ciphertext = gpg.encrypt(b"plain").await.unwrap();
        assert_eq!(ciphertext, b"ENC:plain");
        let plaintext = gpg.decrypt(&ciphertext).await.unwrap();
        assert_eq!(plaintext, b"plain");
    }

    #[tokio::test]
    async fn test_decrypt_without_passphrase_is_a_configuration_error() {
        let backend = keyring_backend("a@b.com", "AABBCCDD", b"plain");
        let (options, _temp) = options_with_homedir("a@b.com", None);
        let gpg = Gpg::new(backend, options).await.unwrap();

        let err = gpg.decrypt(b"ciphertext").await.unwrap_err();
        assert!(matches!(err, GpgError::Configuration(_)));
    }
}
