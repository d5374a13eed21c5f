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
//! # Authentication method fragments
//!
//! A v3 authentication request is composed of one or more methods. Every
//! method contributes its name to the `methods` list and its own fragment
//! of the `identity` object:
//!
//! ```json
//! {"identity": {"methods": ["password"], "password": {"user": {...}}}}
//! ```
use std::fmt;

use derive_builder::Builder;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value, json};

use crate::auth::{AUTH_TOKEN_HEADER, AuthError, AuthParameters};

/// Credential fragment of the authentication request.
pub trait AuthMethod: fmt::Debug + Send + Sync {
    /// Name of the method in the request (`password`, `token`, ...).
    fn method_name(&self) -> &'static str;

    /// Wire fragment of the method. Methods may add request headers.
    fn auth_data(&self, headers: &mut HeaderMap) -> Result<Value, AuthError>;
}

/// Put the token into the `X-Auth-Token` request header.
pub(crate) fn set_auth_token(
    headers: &mut HeaderMap,
    token: &SecretString,
) -> Result<(), AuthError> {
    let mut value = HeaderValue::from_str(token.expose_secret())
        .map_err(|_| AuthError::failure("the token is not a valid header value"))?;
    value.set_sensitive(true);
    headers.insert(AUTH_TOKEN_HEADER, value);
    Ok(())
}

/// Password authentication of the user identified by the ID or by the name
/// (with the user domain).
#[derive(Builder, Clone, Debug)]
#[builder(setter(strip_option, into))]
pub struct PasswordMethod {
    #[builder(default)]
    user_id: Option<String>,

    #[builder(default)]
    username: Option<String>,

    #[builder(default)]
    user_domain_id: Option<String>,

    #[builder(default)]
    user_domain_name: Option<String>,

    password: SecretString,
}

impl PasswordMethod {
    pub const NAME: &'static str = "password";

    /// Parameters understood by the method.
    pub const PARAMETERS: &'static [&'static str] = &[
        "user_id",
        "username",
        "user_domain_id",
        "user_domain_name",
        "password",
    ];

    /// Build the method out of the named parameters. Parameters not in
    /// [`Self::PARAMETERS`] are rejected.
    pub fn from_params(params: &AuthParameters) -> Result<Self, AuthError> {
        params.ensure_known(Self::NAME, &[Self::PARAMETERS])?;
        let mut builder = PasswordMethodBuilder::default();
        if let Some(val) = params.get("user_id") {
            builder.user_id(val);
        }
        if let Some(val) = params.get("username") {
            builder.username(val);
        }
        if let Some(val) = params.get("user_domain_id") {
            builder.user_domain_id(val);
        }
        if let Some(val) = params.get("user_domain_name") {
            builder.user_domain_name(val);
        }
        if let Some(val) = params.get("password") {
            builder.password(val);
        }
        Ok(builder.build()?)
    }
}

impl AuthMethod for PasswordMethod {
    fn method_name(&self) -> &'static str {
        Self::NAME
    }

    fn auth_data(&self, _headers: &mut HeaderMap) -> Result<Value, AuthError> {
        let mut user = Map::new();
        user.insert("password".into(), json!(self.password.expose_secret()));
        if let Some(id) = &self.user_id {
            user.insert("id".into(), json!(id));
        } else if let Some(name) = &self.username {
            user.insert("name".into(), json!(name));
        } else {
            return Err(AuthError::failure(
                "either the user id or the user name is required",
            ));
        }
        if let Some(id) = &self.user_domain_id {
            user.insert("domain".into(), json!({"id": id}));
        } else if let Some(name) = &self.user_domain_name {
            user.insert("domain".into(), json!({"name": name}));
        }
        Ok(json!({"user": user}))
    }
}

/// Authentication with the existing token.
#[derive(Builder, Clone, Debug)]
#[builder(setter(into))]
pub struct TokenMethod {
    token: SecretString,
}

impl TokenMethod {
    pub const NAME: &'static str = "token";

    pub const PARAMETERS: &'static [&'static str] = &["token"];

    pub fn from_params(params: &AuthParameters) -> Result<Self, AuthError> {
        params.ensure_known(Self::NAME, &[Self::PARAMETERS])?;
        let mut builder = TokenMethodBuilder::default();
        if let Some(val) = params.get("token") {
            builder.token(val);
        }
        Ok(builder.build()?)
    }
}

impl AuthMethod for TokenMethod {
    fn method_name(&self) -> &'static str {
        Self::NAME
    }

    fn auth_data(&self, headers: &mut HeaderMap) -> Result<Value, AuthError> {
        set_auth_token(headers, &self.token)?;
        Ok(json!({"id": self.token.expose_secret()}))
    }
}
