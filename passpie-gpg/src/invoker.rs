//! Invocation boundary for the external encryption backend
//!
//! Every keyring operation goes through the [`BackendInvoker`] trait, so
//! registry, crypto and homedir code can be exercised against a fake
//! backend instead of an installed binary.
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
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Captured output of one backend invocation
#[derive(Debug, Clone)]
pub struct BackendOutput {
    /// Captured standard output
    pub stdout: Vec<u8>,
    /// Captured diagnostic stream
    pub stderr: Vec<u8>,
    /// Exit code (-1 when terminated by signal)
    pub code: i32,
}

impl BackendOutput {
    /// Whether the backend exited zero
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Standard output as text; non-UTF-8 output is a backend error
    pub fn stdout_utf8(&self) -> GpgResult<String> {
        String::from_utf8(self.stdout.clone())
            .map_err(|_| GpgError::Backend("backend output was not valid UTF-8".to_string()))
    }

    /// Diagnostic stream as lossy text
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Trait for running the external encryption backend
///
/// One call is one full subprocess round-trip: run with the given
/// arguments, pipe `stdin` when present, block until exit, return the
/// captured streams and exit code. Interpreting a non-zero exit is left
/// to the operation making the call.
#[async_trait]
pub trait BackendInvoker: Send + Sync {
    /// Run the backend once and capture its output
    async fn run(&self, args: &[String], stdin: Option<&[u8]>) -> GpgResult<BackendOutput>;
}

/// The installed GPG binary, resolved once at construction
pub struct GpgBinary {
    path: PathBuf,
}

impl GpgBinary {
    /// Use an explicit binary path
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Locate the backend on PATH, preferring `gpg2` over `gpg`
    ///
    /// Falls back to the bare name `gpg` when neither is found, deferring
    /// the failure to the first invocation.
    pub fn discover() -> Self {
        let path = std::env::var_os("PATH")
            .and_then(|path_var| search_path(&["gpg2", "gpg"], &path_var))
            .unwrap_or_else(|| PathBuf::from("gpg"));
        debug!(binary = %path.display(), "Resolved backend binary");
        Self { path }
    }

    /// Resolved binary path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Find the first of `names` present as a file in any `path_var` directory
fn search_path(names: &[&str], path_var: &OsStr) -> Option<PathBuf> {
    for name in names {
        for dir in std::env::split_paths(path_var) {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

#[async_trait]
impl BackendInvoker for GpgBinary {
    async fn run(&self, args: &[String], stdin: Option<&[u8]>) -> GpgResult<BackendOutput> {
        debug!(binary = %self.path.display(), ?args, "Invoking backend");

        let mut command = tokio::process::Command::new(&self.path);
        command
            .args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().map_err(|e| {
            GpgError::Backend(format!("failed to spawn {}: {}", self.path.display(), e))
        })?;

        // The write must proceed while the output pipes are drained; a
        // backend that fills its stdout pipe before consuming all input
        // would deadlock a sequential write-then-read.
        let writer = match (stdin, child.stdin.take()) {
            (Some(data), Some(mut pipe)) => {
                let data = data.to_vec();
                Some(tokio::spawn(async move {
                    // The backend may exit without consuming its input;
                    // its stderr is the better diagnostic then.
                    match pipe.write_all(&data).await {
                        Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => return Err(e),
                        _ => {}
                    }
                    match pipe.shutdown().await {
                        Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => Err(e),
                        _ => Ok(()),
                    }
                }))
            }
            _ => None,
        };

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| GpgError::Backend(format!("backend wait failed: {}", e)))?;

        if let Some(writer) = writer {
            writer
                .await
                .map_err(|e| GpgError::Backend(format!("stdin writer failed: {}", e)))?
                .map_err(|e| GpgError::Backend(format!("stdin write failed: {}", e)))?;
        }

        Ok(BackendOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            code: output.status.code().unwrap_or(-1),
        })
    }
}
