//! Error types for keyring orchestration
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


use thiserror::Error;

/// Keyring orchestration errors
#[derive(Error, Debug)]
pub enum GpgError {
    /// Resolvable by the caller by changing configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The backend exited non-zero or produced unusable output;
    /// carries the captured diagnostic text
    #[error("Backend error: {0}")]
    Backend(String),

    /// Filesystem operation failed
    #[error("Resource error: {0}")]
    Resource(#[from] std::io::Error),
}

/// Result type for keyring operations
pub type GpgResult<T> = Result<T, GpgError>;
