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
//! # Error
//!
//! Aggregate of the errors of the individual modules.
use thiserror::Error;

use crate::access::AccessInfoError;
use crate::auth::AuthError;
use crate::catalog::CatalogError;
use crate::transport::TransportError;

/// Keystone authentication error.
#[derive(Debug, Error)]
pub enum KeystoneAuthError {
    #[error(transparent)]
    AccessInfo {
        #[from]
        source: AccessInfoError,
    },

    #[error(transparent)]
    Auth {
        #[from]
        source: AuthError,
    },

    #[error(transparent)]
    Catalog {
        #[from]
        source: CatalogError,
    },

    #[error(transparent)]
    Transport {
        #[from]
        source: TransportError,
    },
}
