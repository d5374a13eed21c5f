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
//! Identity v2 (`access`) authentication response.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::Value;

use super::common::{isotime, lazy_catalog, optional_isotime};
use super::{AccessInfoApi, AccessInfoError, WireVersion};
use crate::catalog::{CatalogError, ServiceCatalog};

/// Domain reported for v2 users and projects.
const DEFAULT_DOMAIN_ID: &str = "default";
const DEFAULT_DOMAIN_NAME: &str = "Default";

/// The `access` object of the v2 token response.
#[derive(Clone, Debug, Deserialize)]
pub struct Access {
    /// Token.
    pub token: Token,
    /// User the token was issued for.
    pub user: User,
    /// Raw service catalog.
    #[serde(rename = "serviceCatalog", default)]
    pub service_catalog: Option<Value>,
    /// Trust the token was issued through.
    #[serde(default)]
    pub trust: Option<Trust>,
    /// Token metadata.
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Token {
    pub id: SecretString,
    #[serde(deserialize_with = "isotime")]
    pub expires: DateTime<Utc>,
    #[serde(default, deserialize_with = "optional_isotime")]
    pub issued_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tenant: Option<Tenant>,
    /// Pre-Diablo tenant reference.
    #[serde(rename = "tenantId", default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub audit_ids: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Tenant {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct User {
    pub id: Option<String>,
    pub name: Option<String>,
    pub username: Option<String>,
    /// Pre-Grizzly tenant reference.
    #[serde(rename = "tenantId", default)]
    pub tenant_id: Option<String>,
    /// Pre-Grizzly tenant reference.
    #[serde(rename = "tenantName", default)]
    pub tenant_name: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Role {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Trust {
    pub id: String,
    pub trustee_user_id: Option<String>,
    pub trustor_user_id: Option<String>,
    #[serde(default)]
    pub impersonation: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Access information of the Identity v2 token.
#[derive(Clone, Debug)]
pub struct AccessInfoV2 {
    access: Access,
    catalog: OnceLock<ServiceCatalog>,
}

impl AccessInfoV2 {
    /// Wrap the content of the `access` object.
    pub fn new(access: &Value) -> Result<Self, AccessInfoError> {
        Ok(Self {
            access: Access::deserialize(access)?,
            catalog: OnceLock::new(),
        })
    }

    /// Whether the response body (or the raw token fields) is a v2 one.
    pub fn is_valid(body: Option<&Value>, raw_fields: Option<&Value>) -> bool {
        match (body, raw_fields) {
            (Some(body), _) => body.get("access").is_some(),
            (None, Some(raw)) => raw.get("version").and_then(Value::as_str) == Some("v2.0"),
            (None, None) => false,
        }
    }

    /// Raw `access` data.
    pub fn access(&self) -> &Access {
        &self.access
    }
}

impl AccessInfoApi for AccessInfoV2 {
    fn version(&self) -> WireVersion {
        WireVersion::V2
    }

    fn auth_token(&self) -> &SecretString {
        &self.access.token.id
    }

    fn expires_at(&self) -> DateTime<Utc> {
        self.access.token.expires
    }

    fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.access.token.issued_at
    }

    fn audit_ids(&self) -> &[String] {
        &self.access.token.audit_ids
    }

    fn methods(&self) -> &[String] {
        &[]
    }

    fn user_id(&self) -> Option<&str> {
        self.access.user.id.as_deref()
    }

    fn username(&self) -> Option<&str> {
        self.access
            .user
            .name
            .as_deref()
            .or(self.access.user.username.as_deref())
    }

    fn user_domain_id(&self) -> Option<&str> {
        Some(DEFAULT_DOMAIN_ID)
    }

    fn user_domain_name(&self) -> Option<&str> {
        Some(DEFAULT_DOMAIN_NAME)
    }

    fn is_federated(&self) -> bool {
        false
    }

    fn project_id(&self) -> Option<&str> {
        match &self.access.token.tenant {
            Some(tenant) => tenant.id.as_deref(),
            None => self
                .access
                .user
                .tenant_id
                .as_deref()
                .or(self.access.token.tenant_id.as_deref()),
        }
    }

    fn project_name(&self) -> Option<&str> {
        match &self.access.token.tenant {
            Some(tenant) => tenant.name.as_deref(),
            None => self
                .access
                .user
                .tenant_name
                .as_deref()
                .or(self.access.token.tenant_id.as_deref()),
        }
    }

    fn project_domain_id(&self) -> Option<&str> {
        self.project_id().map(|_| DEFAULT_DOMAIN_ID)
    }

    fn project_domain_name(&self) -> Option<&str> {
        self.project_id().map(|_| DEFAULT_DOMAIN_NAME)
    }

    fn domain_id(&self) -> Option<&str> {
        None
    }

    fn domain_name(&self) -> Option<&str> {
        None
    }

    fn role_ids(&self) -> Vec<&str> {
        self.access
            .metadata
            .as_ref()
            .map(|meta| meta.roles.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn role_names(&self) -> Vec<&str> {
        self.access
            .user
            .roles
            .iter()
            .map(|role| role.name.as_str())
            .collect()
    }

    fn trust_id(&self) -> Option<&str> {
        self.access.trust.as_ref().map(|trust| trust.id.as_str())
    }

    fn project_scoped(&self) -> bool {
        self.access.token.tenant.is_some()
    }

    fn domain_scoped(&self) -> bool {
        false
    }

    fn trust_scoped(&self) -> bool {
        self.access.trust.is_some()
    }

    fn service_catalog(&self) -> Result<&ServiceCatalog, CatalogError> {
        lazy_catalog(&self.catalog, self.access.service_catalog.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;
    use serde_json::json;

    use super::*;

    fn access() -> Value {
        json!({
            "token": {
                "id": "tok",
                "expires": "2026-10-19T12:00:00Z",
                "issued_at": "2026-10-19T11:00:00.000000",
                "tenant": {"id": "tid", "name": "tname"},
                "audit_ids": ["a1", "a2"]
            },
            "user": {
                "id": "uid",
                "name": "uname",
                "roles": [{"name": "admin"}, {"name": "member"}]
            },
            "metadata": {"roles": ["r1", "r2"]},
            "serviceCatalog": [{
                "type": "identity",
                "endpoints": [{
                    "region": "RegionOne",
                    "publicURL": "http://keystone.example:5000/v2.0",
                    "adminURL": "http://keystone.example:35357/v2.0"
                }]
            }]
        })
    }

    #[test]
    fn test_accessors() {
        let sot = AccessInfoV2::new(&access()).unwrap();
        assert_eq!("tok", sot.auth_token().expose_secret());
        assert_eq!(Some("uid"), sot.user_id());
        assert_eq!(Some("uname"), sot.username());
        assert_eq!(Some("default"), sot.user_domain_id());
        assert_eq!(Some("tid"), sot.project_id());
        assert_eq!(Some("tname"), sot.project_name());
        assert_eq!(Some("Default"), sot.project_domain_name());
        assert_eq!(vec!["admin", "member"], sot.role_names());
        assert_eq!(vec!["r1", "r2"], sot.role_ids());
        assert_eq!(Some("a1"), sot.audit_id());
        assert_eq!(Some("a2"), sot.audit_chain_id());
        assert!(sot.issued_at().is_some());
        assert!(sot.project_scoped());
        assert!(!sot.domain_scoped());
        assert!(!sot.trust_scoped());
        assert_eq!(
            Some("http://keystone.example:5000/v2.0".to_string()),
            sot.auth_url()
        );
        assert_eq!(
            Some("http://keystone.example:35357/v2.0".to_string()),
            sot.management_url()
        );
    }

    #[test]
    fn test_legacy_project() {
        // pre-Grizzly: tenant on the user
        let sot = AccessInfoV2::new(&json!({
            "token": {"id": "tok", "expires": "2026-10-19T12:00:00Z"},
            "user": {"id": "uid", "username": "uname", "tenantId": "utid", "tenantName": "utname"}
        }))
        .unwrap();
        assert_eq!(Some("utid"), sot.project_id());
        assert_eq!(Some("utname"), sot.project_name());
        assert_eq!(Some("uname"), sot.username());
        assert!(!sot.project_scoped());
        assert!(!sot.has_service_catalog());

        // pre-Diablo: only the tenantId on the token
        let sot = AccessInfoV2::new(&json!({
            "token": {"id": "tok", "expires": "2026-10-19T12:00:00Z", "tenantId": "ttid"},
            "user": {"id": "uid"}
        }))
        .unwrap();
        assert_eq!(Some("ttid"), sot.project_id());
        assert_eq!(Some("ttid"), sot.project_name());
        assert_eq!(Some("default"), sot.project_domain_id());

        // unscoped: no project information anywhere
        let sot = AccessInfoV2::new(&json!({
            "token": {"id": "tok", "expires": "2026-10-19T12:00:00Z"},
            "user": {"id": "uid"}
        }))
        .unwrap();
        assert_eq!(None, sot.project_id());
        assert_eq!(None, sot.project_domain_id());
        assert_eq!(None, sot.project_domain_name());
    }

    #[test]
    fn test_trust() {
        let sot = AccessInfoV2::new(&json!({
            "token": {"id": "tok", "expires": "2026-10-19T12:00:00Z"},
            "user": {"id": "uid"},
            "trust": {"id": "trid", "trustee_user_id": "u1", "trustor_user_id": "u2", "impersonation": true}
        }))
        .unwrap();
        assert!(sot.trust_scoped());
        assert_eq!(Some("trid"), sot.trust_id());
    }

    #[test]
    fn test_is_valid() {
        assert!(AccessInfoV2::is_valid(Some(&json!({"access": {}})), None));
        assert!(!AccessInfoV2::is_valid(Some(&json!({"token": {}})), None));
        assert!(AccessInfoV2::is_valid(None, Some(&json!({"version": "v2.0"}))));
        assert!(!AccessInfoV2::is_valid(None, Some(&json!({"version": "v3"}))));
        assert!(!AccessInfoV2::is_valid(None, None));
    }
}
