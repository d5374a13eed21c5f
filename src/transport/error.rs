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
//! Transport errors.

use reqwest::StatusCode;
use thiserror::Error;

/// Error of the HTTP transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Non-success status code of the Identity service.
    #[error("{url} returned {status}")]
    HttpStatus {
        /// Response status.
        status: StatusCode,
        /// Requested URL.
        url: String,
    },

    /// Request could not be performed.
    #[error("request failed: {}", source)]
    Reqwest {
        /// The source of the error.
        #[from]
        source: reqwest::Error,
    },

    #[error("invalid url {url}: {}", source)]
    Url {
        url: String,
        source: url::ParseError,
    },
}
