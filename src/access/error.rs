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
//! Access information errors.

use thiserror::Error;

/// Access information error.
#[derive(Error, Debug)]
pub enum AccessInfoError {
    /// The v3 token id is neither in the `X-Subject-Token` header nor in the
    /// raw fields.
    #[error("the subject token is missing in the authentication response")]
    MissingSubjectToken,

    /// The `X-Subject-Token` header is not a valid string.
    #[error("the subject token header is not a valid string")]
    InvalidSubjectToken,

    /// Token payload has an unexpected structure.
    #[error("malformed authentication response: {}", source)]
    Serde {
        /// The source of the error.
        #[from]
        source: serde_json::Error,
    },

    /// None of the known Identity API versions recognizes the payload.
    #[error("unrecognized authentication response")]
    UnrecognizedAuthResponse,
}
