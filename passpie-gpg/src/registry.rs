//! Key listing and export against a keyring homedir
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
use crate::records::ColonRecord;
use std::path::Path;
use tracing::debug;

/// Which identity view of a listing to return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// Fingerprints from `fpr` records
    Fingerprints,
    /// Bracketed addresses from `uid` records
    Emails,
}

/// List key identities present in a homedir, in backend output order
pub async fn list_keys(
    backend: &dyn BackendInvoker,
    homedir: &Path,
    mode: ListMode,
) -> GpgResult<Vec<String>> {
    let homedir_arg = homedir.display().to_string();
    let args: Vec<String> = [
        "--no-tty",
        "--batch",
        "--fixed-list-mode",
        "--with-colons",
        "--homedir",
        homedir_arg.as_str(),
        "--list-keys",
        "--fingerprint",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let output = backend.run(&args, None).await?;
    if !output.is_success() {
        return Err(GpgError::Backend(output.stderr_text()));
    }

    let listing = output.stdout_utf8()?;
    let mut keys = Vec::new();
    for line in listing.lines() {
        let record = ColonRecord::parse(line);
        let identity = match mode {
            ListMode::Fingerprints => record.fingerprint(),
            ListMode::Emails => record.email(),
        };
        if let Some(identity) = identity {
            keys.push(identity.to_string());
        }
    }

    debug!(homedir = %homedir.display(), ?mode, count = keys.len(), "Listed keys");
    Ok(keys)
}

/// Export the armored key blocks for one identity
///
/// The result is the public block followed by the secret block. An
/// identity without a secret key yields empty secret output, so the
/// result degrades to the public block alone. An empty `identity`
/// exports everything in the homedir.
pub async fn export_keys(
    backend: &dyn BackendInvoker,
    homedir: &Path,
    identity: &str,
) -> GpgResult<String> {
    let homedir_arg = homedir.display().to_string();

    let mut args: Vec<String> = [
        "--no-tty",
        "--batch",
        "--homedir",
        homedir_arg.as_str(),
        "--export",
        "--armor",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    if !identity.is_empty() {
        args.push(identity.to_string());
    }

    let mut secret_args: Vec<String> = [
        "--no-tty",
        "--batch",
        "--homedir",
        homedir_arg.as_str(),
        "--export-secret-keys",
        "--armor",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    if !identity.is_empty() {
        secret_args.push(identity.to_string());
    }

    let public = backend.run(&args, None).await?;
    if !public.is_success() {
        return Err(GpgError::Backend(public.stderr_text()));
    }

    // No secret key for the identity is not an error; the export is then
    // just the public block.
    let secret = backend.run(&secret_args, None).await?;

    let mut block = public.stdout_utf8()?;
    block.push_str(&secret.stdout_utf8()?);
    Ok(block)
}

/// Export every key pair currently listed, in listing order
pub async fn export_all(backend: &dyn BackendInvoker, homedir: &Path) -> GpgResult<Vec<String>> {
    let mut blocks = Vec::new();
    for fingerprint in list_keys(backend, homedir, ListMode::Fingerprints).await? {
        blocks.push(export_keys(backend, homedir, &fingerprint).await?);
    }
    Ok(blocks)
}
