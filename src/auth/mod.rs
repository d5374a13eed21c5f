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

//! # Authentication
//!
//! Obtaining and caching the tokens of the Identity service.
//!
//! - [`method`]: credential fragments ([`PasswordMethod`], [`TokenMethod`])
//!   composing the authentication request.
//!
//! - [`v2`] and [`v3`]: the wire version specific authorizers building the
//!   request and wrapping the response into the
//!   [`AccessInfo`](crate::access::AccessInfo).
//!
//! - [`IdentityPlugin`]: the token lifecycle. The access information is cached
//!   until it is about to expire or is explicitly invalidated.
//!
//! - [`GenericAuth`]: picks the authorizer from a bare auth URL and the named
//!   [`AuthParameters`].
//!
//! The authorizers can be built either with the typed builders or from the
//! named parameters. In the latter case a parameter not understood by the
//! authorizer is an error.

pub mod error;
pub mod generic;
pub mod method;
pub mod params;
pub mod plugin;
pub mod v2;
pub mod v3;

pub use error::AuthError;
pub use generic::GenericAuth;
pub use method::{AuthMethod, PasswordMethod, PasswordMethodBuilder, TokenMethod, TokenMethodBuilder};
pub use params::AuthParameters;
pub use plugin::{Authorizer, IdentityPlugin};
pub use v2::{PasswordCredentials, PasswordCredentialsBuilder, V2Auth, V2AuthBuilder, V2Credential};
pub use v3::{V3Auth, V3AuthBuilder};

/// Request header carrying the token.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
