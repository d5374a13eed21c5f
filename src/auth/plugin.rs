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
//! # Identity plugin
//!
//! Token lifecycle of the authentication: the plugin caches the
//! [`AccessInfo`] returned by the authorizer and transparently obtains a new
//! one when the cached token is about to expire.
//!
//! ```text
//! NoToken --get_access--> Authorizing --ok--> Authorized
//!    ^                                           |
//!    +-------- expires soon / invalidate --------+
//! ```
//!
//! The check-then-authorize sequence runs under a lock, so concurrent
//! callers of the same plugin trigger a single authorization request.
use std::sync::Arc;

use chrono::TimeDelta;
use secrecy::SecretString;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::access::{AccessInfo, AccessInfoApi, WireVersion};
use crate::auth::AuthError;
use crate::auth::v2::V2Auth;
use crate::auth::v3::V3Auth;
use crate::catalog::ServiceFilter;
use crate::transport::Transport;

/// Default lead time (in seconds) before the token expiration at which the
/// token is renewed.
pub const DEFAULT_EXPIRY_LEAD_SECONDS: u32 = 30;

/// Wire version specific authorization.
#[derive(Clone, Debug)]
pub enum Authorizer {
    V2(V2Auth),
    V3(V3Auth),
}

impl Authorizer {
    pub fn version(&self) -> WireVersion {
        match self {
            Self::V2(_) => WireVersion::V2,
            Self::V3(_) => WireVersion::V3,
        }
    }

    pub fn auth_url(&self) -> &str {
        match self {
            Self::V2(auth) => auth.auth_url(),
            Self::V3(auth) => auth.auth_url(),
        }
    }

    /// Obtain a new token.
    pub async fn authorize(&self, transport: &dyn Transport) -> Result<AccessInfo, AuthError> {
        Ok(match self {
            Self::V2(auth) => auth.authorize(transport).await?.into(),
            Self::V3(auth) => auth.authorize(transport).await?.into(),
        })
    }
}

impl From<V2Auth> for Authorizer {
    fn from(value: V2Auth) -> Self {
        Self::V2(value)
    }
}

impl From<V3Auth> for Authorizer {
    fn from(value: V3Auth) -> Self {
        Self::V3(value)
    }
}

/// Authentication plugin caching the access information.
#[derive(Debug)]
pub struct IdentityPlugin {
    authorizer: Authorizer,

    /// Cached access information. `None` until the first authorization and
    /// after the invalidation.
    access: Mutex<Option<Arc<AccessInfo>>>,

    /// Renew the token when it expires within this period.
    expiry_lead: TimeDelta,

    /// Renew the expiring token. When disabled the cached access is returned
    /// even after the expiration.
    reauthenticate: bool,
}

impl IdentityPlugin {
    pub fn new<A: Into<Authorizer>>(authorizer: A) -> Self {
        Self {
            authorizer: authorizer.into(),
            access: Mutex::new(None),
            expiry_lead: TimeDelta::seconds(DEFAULT_EXPIRY_LEAD_SECONDS.into()),
            reauthenticate: true,
        }
    }

    pub fn with_expiry_lead(mut self, expiry_lead: TimeDelta) -> Self {
        self.expiry_lead = expiry_lead;
        self
    }

    pub fn with_reauthenticate(mut self, reauthenticate: bool) -> Self {
        self.reauthenticate = reauthenticate;
        self
    }

    pub fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }

    pub fn expiry_lead(&self) -> TimeDelta {
        self.expiry_lead
    }

    pub fn reauthenticate(&self) -> bool {
        self.reauthenticate
    }

    fn needs_reauthentication(&self, access: &AccessInfo) -> bool {
        self.reauthenticate && access.will_expire_soon(self.expiry_lead)
    }

    /// Valid access information, authorizing when there is none or the
    /// cached one expires soon.
    #[tracing::instrument(skip_all, fields(auth_url = %self.authorizer.auth_url()))]
    pub async fn get_access(
        &self,
        transport: &dyn Transport,
    ) -> Result<Arc<AccessInfo>, AuthError> {
        let mut cached = self.access.lock().await;
        if let Some(access) = cached.as_ref() {
            if !self.needs_reauthentication(access) {
                return Ok(access.clone());
            }
            debug!("token expires soon, reauthenticating");
        }
        let access = Arc::new(self.authorizer.authorize(transport).await?);
        info!(
            user_id = access.user_id(),
            expires_at = %access.expires_at(),
            "obtained a new token"
        );
        *cached = Some(access.clone());
        Ok(access)
    }

    /// Token for the `X-Auth-Token` header.
    pub async fn get_token(&self, transport: &dyn Transport) -> Result<SecretString, AuthError> {
        Ok(self.get_access(transport).await?.auth_token().clone())
    }

    /// Endpoint URL from the service catalog of the token.
    #[tracing::instrument(skip_all, fields(filter = %filter))]
    pub async fn get_endpoint(
        &self,
        transport: &dyn Transport,
        filter: &ServiceFilter,
    ) -> Result<String, AuthError> {
        Ok(self
            .get_access(transport)
            .await?
            .service_catalog()?
            .get_url(filter)?)
    }

    pub async fn get_user_id(
        &self,
        transport: &dyn Transport,
    ) -> Result<Option<String>, AuthError> {
        Ok(self.get_access(transport).await?.user_id().map(Into::into))
    }

    pub async fn get_project_id(
        &self,
        transport: &dyn Transport,
    ) -> Result<Option<String>, AuthError> {
        Ok(self.get_access(transport).await?.project_id().map(Into::into))
    }

    /// Cached access information, without contacting the Identity service.
    pub async fn get_auth_ref(&self) -> Option<Arc<AccessInfo>> {
        self.access.lock().await.clone()
    }

    /// Drop the cached access information. Returns whether there was one.
    pub async fn invalidate(&self) -> bool {
        let invalidated = self.access.lock().await.take().is_some();
        if invalidated {
            debug!("access information invalidated");
        }
        invalidated
    }
}
