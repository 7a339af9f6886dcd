//! Configuration types for keyring orchestration
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


use std::env;
use std::path::PathBuf;

/// Environment variable overriding the keyring homedir
pub const HOMEDIR_ENV: &str = "PASSPIE_GPG_HOMEDIR";

/// Defaults applied to key generation requests that leave fields unset
///
/// Carried per handle rather than as module constants so multiple
/// configured backends can use different defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDefaults {
    /// Key length in bits
    pub key_length: u32,
    /// Subject name on the generated identity
    pub name: String,
    /// Email on the generated identity
    pub email: String,
    /// Free-form comment on the generated identity
    pub comment: String,
    /// Expiration ("0" = never)
    pub expire_date: String,
}

impl Default for KeyDefaults {
    fn default() -> Self {
        Self {
            key_length: 4096,
            name: "Passpie".to_string(),
            email: "passpie@localhost".to_string(),
            comment: "Generated by Passpie".to_string(),
            expire_date: "0".to_string(),
        }
    }
}

/// Configuration for one backend handle
#[derive(Debug, Clone, Default)]
pub struct GpgOptions {
    /// Identity data is encrypted for (email or fingerprint)
    pub recipient: String,
    /// Passphrase unlocking the recipient's secret key
    pub passphrase: Option<String>,
    /// Explicit keyring homedir; when absent one is created from `key_blocks`
    pub homedir: Option<PathBuf>,
    /// Armored key blocks to import into an ephemeral homedir
    pub key_blocks: Vec<String>,
    /// Defaults for key generation requests
    pub key_defaults: KeyDefaults,
}

impl GpgOptions {
    /// Options for a recipient with everything else unset
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            ..Default::default()
        }
    }

    /// Homedir override from the environment, honoring a local `.env` file
    pub fn homedir_override() -> Option<PathBuf> {
        let _ = dotenvy::dotenv();
        env::var_os(HOMEDIR_ENV).map(PathBuf::from)
    }

    /// Explicit homedir if configured, else the environment override
    pub fn resolved_homedir(&self) -> Option<PathBuf> {
        self.homedir.clone().or_else(Self::homedir_override)
    }
}
