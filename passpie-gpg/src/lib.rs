//! GPG keyring orchestration for Passpie
//!
//! Coordinates the external OpenPGP backend as a subprocess: keyring
//! homedir lifecycle, batch key generation, key listing and export,
//! payload encryption/decryption, and validation that a configured
//! recipient/passphrase pair is actually usable.
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


pub mod config;
pub mod crypto;
pub mod error;
pub mod handle;
pub mod homedir;
pub mod invoker;
pub mod keygen;
pub mod records;
pub mod registry;

pub use config::{GpgOptions, KeyDefaults, HOMEDIR_ENV};
pub use error::{GpgError, GpgResult};
pub use handle::{init_gpg, Gpg};
pub use homedir::{setup_homedir, Homedir, Provenance};
pub use invoker::{BackendInvoker, BackendOutput, GpgBinary};
pub use keygen::{generate_keys, make_key_input, KeyDescriptor, KeyRequest};
pub use registry::{export_all, export_keys, list_keys, ListMode};
