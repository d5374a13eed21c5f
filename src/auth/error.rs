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
//! Authentication errors.

use thiserror::Error;

use crate::access::AccessInfoError;
use crate::auth::method::{PasswordMethodBuilderError, TokenMethodBuilderError};
use crate::auth::v2::{PasswordCredentialsBuilderError, V2AuthBuilderError};
use crate::auth::v3::V3AuthBuilderError;
use crate::catalog::CatalogError;
use crate::transport::TransportError;

/// Authentication plugin error.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Usage or configuration error detected before contacting the Identity
    /// service.
    #[error("authorization failure: {0}")]
    AuthorizationFailure(String),

    /// The Identity service response lacks the expected data.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Parameters not accepted by the authentication method.
    #[error("unknown parameters for the {method} authentication: {}", names.join(", "))]
    UnknownParameters {
        method: &'static str,
        names: Vec<String>,
    },

    /// Parameter value has an unexpected format.
    #[error("invalid value of the parameter {name}: {value}")]
    InvalidParameter { name: String, value: String },

    #[error(transparent)]
    AccessInfo {
        #[from]
        source: AccessInfoError,
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

    #[error(transparent)]
    PasswordMethodBuilder {
        #[from]
        source: PasswordMethodBuilderError,
    },

    #[error(transparent)]
    TokenMethodBuilder {
        #[from]
        source: TokenMethodBuilderError,
    },

    #[error(transparent)]
    PasswordCredentialsBuilder {
        #[from]
        source: PasswordCredentialsBuilderError,
    },

    #[error(transparent)]
    V2AuthBuilder {
        #[from]
        source: V2AuthBuilderError,
    },

    #[error(transparent)]
    V3AuthBuilder {
        #[from]
        source: V3AuthBuilderError,
    },
}

impl AuthError {
    pub(crate) fn failure<S: Into<String>>(msg: S) -> Self {
        Self::AuthorizationFailure(msg.into())
    }
}
