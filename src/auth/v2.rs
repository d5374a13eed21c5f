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
//! # Identity v2 authentication
//!
//! `POST <auth_url>/tokens` with the password or token credentials and the
//! optional tenant and trust scope.
use derive_builder::Builder;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::access::AccessInfoV2;
use crate::auth::method::{AuthMethod, TokenMethod};
use crate::auth::{AuthError, AuthParameters};
use crate::transport::Transport;

/// v2 `passwordCredentials`.
#[derive(Builder, Clone, Debug)]
#[builder(setter(strip_option, into))]
pub struct PasswordCredentials {
    #[builder(default)]
    user_id: Option<String>,

    #[builder(default)]
    username: Option<String>,

    password: SecretString,
}

impl PasswordCredentials {
    pub const PARAMETERS: &'static [&'static str] = &["user_id", "username", "password"];

    pub fn from_params(params: &AuthParameters) -> Result<Self, AuthError> {
        params.ensure_known("passwordCredentials", &[Self::PARAMETERS])?;
        let mut builder = PasswordCredentialsBuilder::default();
        if let Some(val) = params.get("user_id") {
            builder.user_id(val);
        }
        if let Some(val) = params.get("username") {
            builder.username(val);
        }
        if let Some(val) = params.get("password") {
            builder.password(val);
        }
        Ok(builder.build()?)
    }
}

impl AuthMethod for PasswordCredentials {
    fn method_name(&self) -> &'static str {
        "passwordCredentials"
    }

    fn auth_data(&self, _headers: &mut HeaderMap) -> Result<Value, AuthError> {
        let mut auth = Map::new();
        auth.insert("password".into(), json!(self.password.expose_secret()));
        if let Some(name) = &self.username {
            auth.insert("username".into(), json!(name));
        } else if let Some(id) = &self.user_id {
            auth.insert("userId".into(), json!(id));
        } else {
            return Err(AuthError::failure(
                "either the username or the user_id is required",
            ));
        }
        Ok(Value::Object(auth))
    }
}

/// Credentials of the v2 authentication request.
#[derive(Clone, Debug)]
pub enum V2Credential {
    Password(PasswordCredentials),
    Token(TokenMethod),
}

impl V2Credential {
    fn as_method(&self) -> &dyn AuthMethod {
        match self {
            Self::Password(x) => x,
            Self::Token(x) => x,
        }
    }
}

impl From<PasswordCredentials> for V2Credential {
    fn from(value: PasswordCredentials) -> Self {
        Self::Password(value)
    }
}

impl From<TokenMethod> for V2Credential {
    fn from(value: TokenMethod) -> Self {
        Self::Token(value)
    }
}

/// Identity v2 authorizer.
#[derive(Builder, Clone, Debug)]
#[builder(setter(strip_option, into))]
pub struct V2Auth {
    /// Identity endpoint (i.e. `https://keystone.example/v2.0`).
    auth_url: String,

    credential: V2Credential,

    #[builder(default)]
    tenant_id: Option<String>,

    #[builder(default)]
    tenant_name: Option<String>,

    #[builder(default)]
    trust_id: Option<String>,
}

impl V2Auth {
    /// Scope parameters.
    pub const OPTIONS: &'static [&'static str] = &["tenant_id", "tenant_name", "trust_id"];

    /// Password authentication from the named parameters.
    pub fn password(auth_url: &str, params: &AuthParameters) -> Result<Self, AuthError> {
        params.ensure_known(
            "passwordCredentials",
            &[Self::OPTIONS, PasswordCredentials::PARAMETERS],
        )?;
        let credential =
            PasswordCredentials::from_params(&params.select(PasswordCredentials::PARAMETERS))?;
        Self::with_scope(auth_url, credential.into(), params)
    }

    /// Token authentication from the named parameters.
    pub fn token(auth_url: &str, params: &AuthParameters) -> Result<Self, AuthError> {
        params.ensure_known(TokenMethod::NAME, &[Self::OPTIONS, TokenMethod::PARAMETERS])?;
        let credential = TokenMethod::from_params(&params.select(TokenMethod::PARAMETERS))?;
        Self::with_scope(auth_url, credential.into(), params)
    }

    fn with_scope(
        auth_url: &str,
        credential: V2Credential,
        params: &AuthParameters,
    ) -> Result<Self, AuthError> {
        let mut builder = V2AuthBuilder::default();
        builder.auth_url(auth_url).credential(credential);
        if let Some(val) = params.get("tenant_id") {
            builder.tenant_id(val);
        }
        if let Some(val) = params.get("tenant_name") {
            builder.tenant_name(val);
        }
        if let Some(val) = params.get("trust_id") {
            builder.trust_id(val);
        }
        Ok(builder.build()?)
    }

    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    /// Body of the authentication request.
    pub fn request_body(&self, headers: &mut HeaderMap) -> Result<Value, AuthError> {
        let credential = self.credential.as_method();
        let mut auth = Map::new();
        auth.insert(
            credential.method_name().into(),
            credential.auth_data(headers)?,
        );
        if let Some(id) = &self.tenant_id {
            auth.insert("tenantId".into(), json!(id));
        } else if let Some(name) = &self.tenant_name {
            auth.insert("tenantName".into(), json!(name));
        }
        if let Some(id) = &self.trust_id {
            auth.insert("trust_id".into(), json!(id));
        }
        Ok(json!({"auth": auth}))
    }

    /// Obtain a new token.
    #[tracing::instrument(name = "v2_authorize", skip_all, fields(auth_url = %self.auth_url))]
    pub async fn authorize(&self, transport: &dyn Transport) -> Result<AccessInfoV2, AuthError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let body = self.request_body(&mut headers)?;
        let url = format!("{}/tokens", self.auth_url.trim_end_matches('/'));

        debug!("requesting a new token");
        let response = transport.post(&url, &body, &headers).await?;
        let access = response
            .body
            .as_ref()
            .and_then(|body| body.get("access"))
            .ok_or_else(|| {
                AuthError::InvalidResponse("the response has no access information".into())
            })?;
        Ok(AccessInfoV2::new(access)?)
    }
}
