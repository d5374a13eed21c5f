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
//! # Generic authentication
//!
//! Authentication plugin choosing the Identity API version from the auth URL
//! and the credential type from the parameters.
use std::sync::Arc;

use chrono::TimeDelta;
use secrecy::SecretString;
use tracing::debug;
use url::Url;

use crate::access::{AccessInfo, WireVersion};
use crate::auth::method::{PasswordMethod, TokenMethod};
use crate::auth::plugin::{Authorizer, IdentityPlugin};
use crate::auth::v2::{PasswordCredentials, V2Auth};
use crate::auth::v3::V3Auth;
use crate::auth::{AuthError, AuthParameters};
use crate::catalog::ServiceFilter;
use crate::config::Config;
use crate::transport::Transport;

/// Parameters consumed by the generic plugin itself.
const BASE_OPTIONS: &[&str] = &["auth_url", "reauthenticate"];

/// Identity API version of the auth URL.
///
/// The first path segment made of `v` and a digit (`v2.0`, `v3`) decides:
/// `2` means v2, everything else (including no such segment) is v3.
pub fn detect_version(auth_url: &str) -> Result<WireVersion, AuthError> {
    let url = Url::parse(auth_url)
        .map_err(|err| AuthError::failure(format!("invalid auth_url {auth_url}: {err}")))?;
    let major = url
        .path()
        .split('/')
        .filter_map(|segment| segment.strip_prefix('v'))
        .filter_map(|rest| rest.chars().next())
        .find(char::is_ascii_digit);
    Ok(match major {
        Some('2') => WireVersion::V2,
        _ => WireVersion::V3,
    })
}

/// Authentication plugin for a bare auth URL.
#[derive(Debug)]
pub struct GenericAuth {
    plugin: IdentityPlugin,
}

impl GenericAuth {
    /// Select the plugin for the `auth_url` and the `params`.
    ///
    /// The `token` parameter selects the token authentication, otherwise the
    /// password one is used. Parameters the selected plugin does not know are
    /// ignored.
    pub fn new(auth_url: &str, params: &AuthParameters) -> Result<Self, AuthError> {
        if auth_url.trim().is_empty() {
            return Err(AuthError::failure("auth_url is required"));
        }
        let version = detect_version(auth_url)?;
        let use_token = params.contains("token");
        let allowed = match (version, use_token) {
            (WireVersion::V2, false) => {
                [V2Auth::OPTIONS, PasswordCredentials::PARAMETERS].concat()
            }
            (WireVersion::V2, true) => [V2Auth::OPTIONS, TokenMethod::PARAMETERS].concat(),
            (WireVersion::V3, false) => [V3Auth::OPTIONS, PasswordMethod::PARAMETERS].concat(),
            (WireVersion::V3, true) => [V3Auth::OPTIONS, TokenMethod::PARAMETERS].concat(),
        };
        let dropped = params.unknown(&[allowed.as_slice(), BASE_OPTIONS].concat());
        if !dropped.is_empty() {
            debug!(?version, ?dropped, "ignoring parameters unknown to the plugin");
        }
        let forwarded = params.select(&allowed);

        let authorizer: Authorizer = match (version, use_token) {
            (WireVersion::V2, false) => V2Auth::password(auth_url, &forwarded)?.into(),
            (WireVersion::V2, true) => V2Auth::token(auth_url, &forwarded)?.into(),
            (WireVersion::V3, false) => V3Auth::password(auth_url, &forwarded)?.into(),
            (WireVersion::V3, true) => V3Auth::token(auth_url, &forwarded)?.into(),
        };
        let reauthenticate = params.get_bool("reauthenticate")?.unwrap_or(true);
        Ok(Self {
            plugin: IdentityPlugin::new(authorizer).with_reauthenticate(reauthenticate),
        })
    }

    /// Plugin described by the `[auth]` section of the configuration.
    pub fn from_config(config: &Config) -> Result<Self, AuthError> {
        let auth_url = config.auth.auth_url.as_deref().unwrap_or_default();
        Ok(Self::new(auth_url, &config.auth.to_parameters())?
            .with_expiry_lead(config.auth.expiry_lead()))
    }

    pub fn with_expiry_lead(mut self, expiry_lead: TimeDelta) -> Self {
        self.plugin = self.plugin.with_expiry_lead(expiry_lead);
        self
    }

    pub fn version(&self) -> WireVersion {
        self.plugin.authorizer().version()
    }

    /// The selected plugin.
    pub fn plugin(&self) -> &IdentityPlugin {
        &self.plugin
    }

    pub async fn get_access(
        &self,
        transport: &dyn Transport,
    ) -> Result<Arc<AccessInfo>, AuthError> {
        self.plugin.get_access(transport).await
    }

    pub async fn get_token(&self, transport: &dyn Transport) -> Result<SecretString, AuthError> {
        self.plugin.get_token(transport).await
    }

    pub async fn get_endpoint(
        &self,
        transport: &dyn Transport,
        filter: &ServiceFilter,
    ) -> Result<String, AuthError> {
        self.plugin.get_endpoint(transport, filter).await
    }

    pub async fn get_auth_ref(&self) -> Option<Arc<AccessInfo>> {
        self.plugin.get_auth_ref().await
    }

    pub async fn invalidate(&self) -> bool {
        self.plugin.invalidate().await
    }
}
