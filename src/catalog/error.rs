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
//
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Service catalog error.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog is absent or has no entries.
    #[error("the service catalog is empty")]
    EmptyCatalog,

    /// No endpoint matched the filter. Carries the canonical filter string.
    #[error("endpoint not found for {0}")]
    EndpointNotFound(String),

    /// Unknown endpoint visibility (interface).
    #[error("invalid visibility {0}, must be one of: public, internal, admin")]
    InvalidVisibility(String),

    /// Version detection pattern error.
    #[error("version pattern error: {0}")]
    Regex(#[from] regex::Error),

    /// Catalog entry has an unexpected structure.
    #[error("malformed catalog: {}", source)]
    Serde {
        /// The source of the error.
        #[from]
        source: serde_json::Error,
    },
}
