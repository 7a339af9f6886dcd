//! Payload encryption and decryption round-trips
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


use crate::error::{GpgError, GpgResult};
use crate::invoker::BackendInvoker;
use std::path::Path;
use tracing::debug;

/// Encrypt opaque bytes for `recipient` using keys in `homedir`
///
/// Trust-chain validation is skipped; the keyring is private and
/// self-managed. Output is armored ciphertext. Stateless: one subprocess
/// round-trip per call, no caching, no retry.
pub async fn encrypt_data(
    backend: &dyn BackendInvoker,
    data: &[u8],
    recipient: &str,
    homedir: &Path,
) -> GpgResult<Vec<u8>> {
    let homedir_arg = homedir.display().to_string();
    let args: Vec<String> = [
        "--batch",
        "--no-tty",
        "--always-trust",
        "--armor",
        "--recipient",
        recipient,
        "--homedir",
        homedir_arg.as_str(),
        "--encrypt",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let output = backend.run(&args, Some(data)).await?;
    if !output.is_success() {
        return Err(GpgError::Backend(output.stderr_text()));
    }
    debug!(recipient, bytes = data.len(), "Encrypted payload");
    Ok(output.stdout)
}

/// Decrypt opaque bytes with `passphrase` for `recipient` using `homedir`
///
/// The passphrase is supplied on the invocation, never prompted. A wrong
/// passphrase or corrupt ciphertext exits non-zero and surfaces as a
/// backend error carrying the diagnostic text.
pub async fn decrypt_data(
    backend: &dyn BackendInvoker,
    data: &[u8],
    recipient: &str,
    homedir: &Path,
    passphrase: &str,
) -> GpgResult<Vec<u8>> {
    let homedir_arg = homedir.display().to_string();
    let args: Vec<String> = [
        "--batch",
        "--no-tty",
        "--always-trust",
        "--recipient",
        recipient,
        "--homedir",
        homedir_arg.as_str(),
        "--passphrase",
        passphrase,
        "-o",
        "-",
        "-d",
        "-",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let output = backend.run(&args, Some(data)).await?;
    if !output.is_success() {
        return Err(GpgError::Backend(output.stderr_text()));
    }
    debug!(recipient, bytes = data.len(), "Decrypted payload");
    Ok(output.stdout)
}
