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
//! Identity v3 (`token`) authentication response.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::Value;

use super::common::{isotime, lazy_catalog, optional_isotime};
use super::{AccessInfoApi, AccessInfoError, WireVersion};
use crate::catalog::{CatalogError, ServiceCatalog};

/// The `token` object of the v3 token response.
#[derive(Clone, Debug, Deserialize)]
pub struct Token {
    /// The date and time when the token expires.
    #[serde(deserialize_with = "isotime")]
    pub expires_at: DateTime<Utc>,

    /// The date and time when the token was issued.
    #[serde(default, deserialize_with = "optional_isotime")]
    pub issued_at: Option<DateTime<Utc>>,

    /// The authentication methods used to obtain the token.
    #[serde(default)]
    pub methods: Vec<String>,

    /// A user object.
    pub user: User,

    /// The project the token is scoped to.
    #[serde(default)]
    pub project: Option<Project>,

    /// The domain the token is scoped to.
    #[serde(default)]
    pub domain: Option<Domain>,

    /// A list of role objects.
    #[serde(default)]
    pub roles: Vec<Role>,

    /// Raw catalog object.
    #[serde(default)]
    pub catalog: Option<Value>,

    /// Trust the token was issued through.
    #[serde(rename = "OS-TRUST:trust", default)]
    pub trust: Option<Trust>,

    /// A list of one or two audit IDs.
    #[serde(default)]
    pub audit_ids: Vec<String>,
}

/// User information
#[derive(Clone, Debug, Deserialize)]
pub struct User {
    /// User ID
    pub id: String,
    /// User Name
    pub name: Option<String>,
    /// User domain
    pub domain: Option<Domain>,
    /// Federation information of the federated users.
    #[serde(rename = "OS-FEDERATION", default)]
    pub federation: Option<Value>,
}

/// Domain information.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Domain {
    /// Domain ID.
    pub id: Option<String>,
    /// Domain Name.
    pub name: Option<String>,
}

/// Project information.
#[derive(Clone, Debug, Deserialize)]
pub struct Project {
    /// Project ID.
    pub id: String,
    /// Project Name.
    pub name: Option<String>,
    /// Project domain.
    pub domain: Option<Domain>,
}

/// Role assigned on the token scope.
#[derive(Clone, Debug, Deserialize)]
pub struct Role {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Trust {
    pub id: String,
    #[serde(default)]
    pub impersonation: bool,
}

/// Access information of the Identity v3 token.
#[derive(Clone, Debug)]
pub struct AccessInfoV3 {
    auth_token: SecretString,
    token: Token,
    catalog: OnceLock<ServiceCatalog>,
}

impl AccessInfoV3 {
    /// Wrap the content of the `token` object together with the token id
    /// returned in the `X-Subject-Token` header.
    pub fn new(auth_token: SecretString, token: &Value) -> Result<Self, AccessInfoError> {
        Ok(Self {
            auth_token,
            token: Token::deserialize(token)?,
            catalog: OnceLock::new(),
        })
    }

    /// Whether the response body (or the raw token fields) is a v3 one.
    pub fn is_valid(body: Option<&Value>, raw_fields: Option<&Value>) -> bool {
        match (body, raw_fields) {
            (Some(body), _) => body.get("token").is_some(),
            (None, Some(raw)) => raw.get("version").and_then(Value::as_str) == Some("v3"),
            (None, None) => false,
        }
    }

    /// Raw `token` data.
    pub fn token(&self) -> &Token {
        &self.token
    }
}

impl AccessInfoApi for AccessInfoV3 {
    fn version(&self) -> WireVersion {
        WireVersion::V3
    }

    fn auth_token(&self) -> &SecretString {
        &self.auth_token
    }

    fn expires_at(&self) -> DateTime<Utc> {
        self.token.expires_at
    }

    fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.token.issued_at
    }

    fn audit_ids(&self) -> &[String] {
        &self.token.audit_ids
    }

    fn methods(&self) -> &[String] {
        &self.token.methods
    }

    fn user_id(&self) -> Option<&str> {
        Some(self.token.user.id.as_str())
    }

    fn username(&self) -> Option<&str> {
        self.token.user.name.as_deref()
    }

    fn user_domain_id(&self) -> Option<&str> {
        self.token.user.domain.as_ref()?.id.as_deref()
    }

    fn user_domain_name(&self) -> Option<&str> {
        self.token.user.domain.as_ref()?.name.as_deref()
    }

    fn is_federated(&self) -> bool {
        self.token.user.federation.is_some()
    }

    fn project_id(&self) -> Option<&str> {
        self.token.project.as_ref().map(|project| project.id.as_str())
    }

    fn project_name(&self) -> Option<&str> {
        self.token.project.as_ref()?.name.as_deref()
    }

    fn project_domain_id(&self) -> Option<&str> {
        self.token.project.as_ref()?.domain.as_ref()?.id.as_deref()
    }

    fn project_domain_name(&self) -> Option<&str> {
        self.token.project.as_ref()?.domain.as_ref()?.name.as_deref()
    }

    fn domain_id(&self) -> Option<&str> {
        self.token.domain.as_ref()?.id.as_deref()
    }

    fn domain_name(&self) -> Option<&str> {
        self.token.domain.as_ref()?.name.as_deref()
    }

    fn role_ids(&self) -> Vec<&str> {
        self.token
            .roles
            .iter()
            .filter_map(|role| role.id.as_deref())
            .collect()
    }

    fn role_names(&self) -> Vec<&str> {
        self.token
            .roles
            .iter()
            .filter_map(|role| role.name.as_deref())
            .collect()
    }

    fn trust_id(&self) -> Option<&str> {
        self.token.trust.as_ref().map(|trust| trust.id.as_str())
    }

    fn project_scoped(&self) -> bool {
        self.token.project.is_some()
    }

    fn domain_scoped(&self) -> bool {
        self.token.domain.is_some()
    }

    fn trust_scoped(&self) -> bool {
        self.token.trust.is_some()
    }

    fn service_catalog(&self) -> Result<&ServiceCatalog, CatalogError> {
        lazy_catalog(&self.catalog, self.token.catalog.as_ref())
    }
}
