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

//! # OpenStack Keystone client authentication
//!
//! Client side of the Keystone identity protocol: turning a set of
//! credentials into an access token that is transparently refreshed before
//! it expires, and turning a declarative "service type + interface + region"
//! query into a concrete endpoint URL from the service catalog returned with
//! the token.
//!
//! The main building blocks are:
//!
//! - [`catalog::ServiceFilter`]: a declarative endpoint lookup query.
//!
//! - [`catalog::ServiceCatalog`]: an immutable index of the service
//!   endpoints. Both the Identity v2 (`publicURL`/`internalURL`/`adminURL`)
//!   and the v3 (`interface`) catalog shapes are normalized into one form and
//!   every endpoint URL is turned into a template with the API version as a
//!   placeholder.
//!
//! - [`access::AccessInfo`]: normalized view over the v2 or v3
//!   authentication response.
//!
//! - [`auth::IdentityPlugin`]: caches the [`access::AccessInfo`] and
//!   re-authenticates through the injected [`transport::Transport`] once the
//!   token is about to expire.
//!
//! - [`auth::GenericAuth`]: picks the proper Identity API version and
//!   credential type from a bare auth URL and a set of parameters.
//!
//! ```no_run
//! # async fn doc() -> Result<(), openstack_keystone_auth::error::KeystoneAuthError> {
//! use openstack_keystone_auth::auth::{AuthParameters, GenericAuth};
//! use openstack_keystone_auth::catalog::ServiceFilter;
//! use openstack_keystone_auth::transport::HttpTransport;
//!
//! let params = AuthParameters::from_iter([
//!     ("username", "admin"),
//!     ("password", "secret"),
//!     ("user_domain_id", "default"),
//!     ("project_name", "admin"),
//!     ("project_domain_id", "default"),
//! ]);
//! let auth = GenericAuth::new("https://keystone.example/v3", &params)?;
//! let transport = HttpTransport::default();
//!
//! let token = auth.get_token(&transport).await?;
//! let compute = auth
//!     .get_endpoint(&transport, &ServiceFilter::new("compute", "public")?)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod transport;
