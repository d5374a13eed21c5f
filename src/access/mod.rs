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
//! # Access information
//!
//! Normalized view over the authentication response of the Identity API. The
//! v2 (`access`) and v3 (`token`) responses differ structurally; both are
//! exposed through the [`AccessInfoApi`] accessors.
//!
//! An [`AccessInfo`] is never modified: re-authentication produces a new one.
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::header::HeaderMap;
use secrecy::SecretString;
use serde_json::Value;
use tracing::debug;

pub mod common;
pub mod error;
pub mod v2;
pub mod v3;

use crate::catalog::{CatalogError, ServiceCatalog, ServiceFilter, ServiceType, Visibility};

pub use error::AccessInfoError;
pub use v2::AccessInfoV2;
pub use v3::AccessInfoV3;

/// Response header carrying the v3 token id.
pub const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// Identity API wire version.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WireVersion {
    /// Identity v2.0.
    V2,
    /// Identity v3.
    V3,
}

/// Authorization scope of the token.
///
/// A trust scoped token is reported as [`TokenScope::Trust`] even though the
/// response carries the trust project as well.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TokenScope {
    /// Unscoped.
    Unscoped,
    /// Project scope.
    Project {
        id: String,
        name: Option<String>,
        domain_id: Option<String>,
        domain_name: Option<String>,
    },
    /// Domain scope.
    Domain { id: String, name: Option<String> },
    /// Trust scope.
    Trust { id: String },
}

/// Accessors of the authentication response.
pub trait AccessInfoApi {
    /// Identity API version of the response.
    fn version(&self) -> WireVersion;

    /// The token to be used in the `X-Auth-Token` header.
    fn auth_token(&self) -> &SecretString;

    fn expires_at(&self) -> DateTime<Utc>;

    fn issued_at(&self) -> Option<DateTime<Utc>>;

    /// Audit IDs. The first one is the audit ID of the token, the second one
    /// (if present) the one of the token it was re-scoped from.
    fn audit_ids(&self) -> &[String];

    /// Authentication methods the token was obtained with (v3 only).
    fn methods(&self) -> &[String];

    fn user_id(&self) -> Option<&str>;

    fn username(&self) -> Option<&str>;

    fn user_domain_id(&self) -> Option<&str>;

    fn user_domain_name(&self) -> Option<&str>;

    /// Whether the user is a federated one.
    fn is_federated(&self) -> bool;

    fn project_id(&self) -> Option<&str>;

    fn project_name(&self) -> Option<&str>;

    fn project_domain_id(&self) -> Option<&str>;

    fn project_domain_name(&self) -> Option<&str>;

    fn domain_id(&self) -> Option<&str>;

    fn domain_name(&self) -> Option<&str>;

    fn role_ids(&self) -> Vec<&str>;

    fn role_names(&self) -> Vec<&str>;

    fn trust_id(&self) -> Option<&str>;

    fn project_scoped(&self) -> bool;

    fn domain_scoped(&self) -> bool;

    fn trust_scoped(&self) -> bool;

    /// Service catalog of the token, built on the first call.
    ///
    /// [`CatalogError::EmptyCatalog`] when the token carries no catalog, a
    /// malformed catalog is reported here and not when the token is read.
    fn service_catalog(&self) -> Result<&ServiceCatalog, CatalogError>;

    fn has_service_catalog(&self) -> bool {
        self.service_catalog().is_ok()
    }

    fn scoped(&self) -> bool {
        self.project_scoped() || self.domain_scoped() || self.trust_scoped()
    }

    fn scope(&self) -> TokenScope {
        if let (true, Some(id)) = (self.trust_scoped(), self.trust_id()) {
            TokenScope::Trust { id: id.into() }
        } else if let (true, Some(id)) = (self.project_scoped(), self.project_id()) {
            TokenScope::Project {
                id: id.into(),
                name: self.project_name().map(Into::into),
                domain_id: self.project_domain_id().map(Into::into),
                domain_name: self.project_domain_name().map(Into::into),
            }
        } else if let (true, Some(id)) = (self.domain_scoped(), self.domain_id()) {
            TokenScope::Domain {
                id: id.into(),
                name: self.domain_name().map(Into::into),
            }
        } else {
            TokenScope::Unscoped
        }
    }

    fn audit_id(&self) -> Option<&str> {
        self.audit_ids().first().map(String::as_str)
    }

    fn audit_chain_id(&self) -> Option<&str> {
        self.audit_ids().get(1).map(String::as_str)
    }

    /// Whether the token expires before `lead` elapses.
    fn will_expire_soon(&self, lead: TimeDelta) -> bool {
        self.will_expire_soon_at(Utc::now(), lead)
    }

    /// Whether the token expires before `now + lead`.
    fn will_expire_soon_at(&self, now: DateTime<Utc>, lead: TimeDelta) -> bool {
        self.expires_at() < now + lead
    }

    /// Public Identity endpoint from the catalog.
    fn auth_url(&self) -> Option<String> {
        identity_url(self.service_catalog().ok()?, Visibility::Public)
    }

    /// Admin Identity endpoint from the catalog.
    fn management_url(&self) -> Option<String> {
        identity_url(self.service_catalog().ok()?, Visibility::Admin)
    }
}

fn identity_url(catalog: &ServiceCatalog, visibility: Visibility) -> Option<String> {
    catalog
        .get_urls(&ServiceFilter::with_visibility(
            ServiceType::Named("identity".into()),
            visibility,
        ))
        .into_iter()
        .next()
}

/// Authentication response of either Identity API version.
#[derive(Clone, Debug)]
pub enum AccessInfo {
    /// Identity v2.
    V2(AccessInfoV2),
    /// Identity v3.
    V3(AccessInfoV3),
}

/// Recognizes the payload of a wire version.
type Predicate = fn(Option<&Value>, Option<&Value>) -> bool;
/// Builds the access information out of the recognized payload.
type Constructor =
    fn(Option<&HeaderMap>, Option<&Value>, Option<&Value>) -> Result<AccessInfo, AccessInfoError>;

/// Known wire versions, evaluated in order. The first match wins.
const WIRE_VERSIONS: [(Predicate, Constructor); 2] = [
    (AccessInfoV3::is_valid, AccessInfo::build_v3),
    (AccessInfoV2::is_valid, AccessInfo::build_v2),
];

impl AccessInfo {
    /// Build the access information from the authentication response.
    ///
    /// `body` is the complete response body (`{"access": ...}` or
    /// `{"token": ...}`). Without the body the `raw_fields` (the token
    /// fields with a `version` tag of `v2.0` or `v3`) are used instead.
    ///
    /// Fails with [`AccessInfoError::UnrecognizedAuthResponse`] when no wire
    /// version recognizes the payload.
    pub fn factory(
        headers: Option<&HeaderMap>,
        body: Option<&Value>,
        raw_fields: Option<&Value>,
    ) -> Result<Self, AccessInfoError> {
        for (is_valid, build) in WIRE_VERSIONS {
            if is_valid(body, raw_fields) {
                return build(headers, body, raw_fields);
            }
        }
        debug!("authentication response is not recognized");
        Err(AccessInfoError::UnrecognizedAuthResponse)
    }

    fn build_v2(
        _headers: Option<&HeaderMap>,
        body: Option<&Value>,
        raw_fields: Option<&Value>,
    ) -> Result<Self, AccessInfoError> {
        let access = body
            .and_then(|body| body.get("access"))
            .or(raw_fields)
            .ok_or(AccessInfoError::UnrecognizedAuthResponse)?;
        Ok(Self::V2(AccessInfoV2::new(access)?))
    }

    fn build_v3(
        headers: Option<&HeaderMap>,
        body: Option<&Value>,
        raw_fields: Option<&Value>,
    ) -> Result<Self, AccessInfoError> {
        let token = body
            .and_then(|body| body.get("token"))
            .or(raw_fields)
            .ok_or(AccessInfoError::UnrecognizedAuthResponse)?;
        let subject = match headers.and_then(|headers| headers.get(SUBJECT_TOKEN_HEADER)) {
            Some(val) => val
                .to_str()
                .map_err(|_| AccessInfoError::InvalidSubjectToken)?
                .to_string(),
            None => raw_fields
                .and_then(|raw| raw.get("auth_token"))
                .and_then(Value::as_str)
                .ok_or(AccessInfoError::MissingSubjectToken)?
                .to_string(),
        };
        Ok(Self::V3(AccessInfoV3::new(SecretString::from(subject), token)?))
    }

    fn as_api(&self) -> &dyn AccessInfoApi {
        match self {
            Self::V2(x) => x,
            Self::V3(x) => x,
        }
    }
}

impl From<AccessInfoV2> for AccessInfo {
    fn from(value: AccessInfoV2) -> Self {
        Self::V2(value)
    }
}

impl From<AccessInfoV3> for AccessInfo {
    fn from(value: AccessInfoV3) -> Self {
        Self::V3(value)
    }
}

impl AccessInfoApi for AccessInfo {
    fn version(&self) -> WireVersion {
        self.as_api().version()
    }

    fn auth_token(&self) -> &SecretString {
        self.as_api().auth_token()
    }

    fn expires_at(&self) -> DateTime<Utc> {
        self.as_api().expires_at()
    }

    fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.as_api().issued_at()
    }

    fn audit_ids(&self) -> &[String] {
        self.as_api().audit_ids()
    }

    fn methods(&self) -> &[String] {
        self.as_api().methods()
    }

    fn user_id(&self) -> Option<&str> {
        self.as_api().user_id()
    }

    fn username(&self) -> Option<&str> {
        self.as_api().username()
    }

    fn user_domain_id(&self) -> Option<&str> {
        self.as_api().user_domain_id()
    }

    fn user_domain_name(&self) -> Option<&str> {
        self.as_api().user_domain_name()
    }

    fn is_federated(&self) -> bool {
        self.as_api().is_federated()
    }

    fn project_id(&self) -> Option<&str> {
        self.as_api().project_id()
    }

    fn project_name(&self) -> Option<&str> {
        self.as_api().project_name()
    }

    fn project_domain_id(&self) -> Option<&str> {
        self.as_api().project_domain_id()
    }

    fn project_domain_name(&self) -> Option<&str> {
        self.as_api().project_domain_name()
    }

    fn domain_id(&self) -> Option<&str> {
        self.as_api().domain_id()
    }

    fn domain_name(&self) -> Option<&str> {
        self.as_api().domain_name()
    }

    fn role_ids(&self) -> Vec<&str> {
        self.as_api().role_ids()
    }

    fn role_names(&self) -> Vec<&str> {
        self.as_api().role_names()
    }

    fn trust_id(&self) -> Option<&str> {
        self.as_api().trust_id()
    }

    fn project_scoped(&self) -> bool {
        self.as_api().project_scoped()
    }

    fn domain_scoped(&self) -> bool {
        self.as_api().domain_scoped()
    }

    fn trust_scoped(&self) -> bool {
        self.as_api().trust_scoped()
    }

    fn service_catalog(&self) -> Result<&ServiceCatalog, CatalogError> {
        self.as_api().service_catalog()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use reqwest::header::HeaderValue;
    use rstest::rstest;
    use secrecy::ExposeSecret;
    use serde_json::json;

    use super::*;

    fn v2_body() -> Value {
        json!({"access": {
            "token": {"id": "v2tok", "expires": "2026-10-19T12:00:00Z"},
            "user": {"id": "uid", "name": "uname"}
        }})
    }

    fn v3_body() -> Value {
        json!({"token": {
            "expires_at": "2026-10-19T12:00:00.000000Z",
            "user": {"id": "uid", "name": "uname", "domain": {"id": "default"}}
        }})
    }

    fn subject_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(SUBJECT_TOKEN_HEADER, HeaderValue::from_static("v3tok"));
        headers
    }

    #[test]
    fn test_factory_v2() {
        let sot = AccessInfo::factory(None, Some(&v2_body()), None).unwrap();
        assert_eq!(WireVersion::V2, sot.version());
        assert_eq!("v2tok", sot.auth_token().expose_secret());
        assert!(!AccessInfoV3::is_valid(Some(&v2_body()), None));
    }

    #[test]
    fn test_factory_v3() {
        let sot = AccessInfo::factory(Some(&subject_headers()), Some(&v3_body()), None).unwrap();
        assert_eq!(WireVersion::V3, sot.version());
        assert_eq!("v3tok", sot.auth_token().expose_secret());
        assert_eq!(Some("uname"), sot.username());
        assert!(!AccessInfoV2::is_valid(Some(&v3_body()), None));
    }

    #[test]
    fn test_factory_v3_missing_subject() {
        assert!(matches!(
            AccessInfo::factory(None, Some(&v3_body()), None),
            Err(AccessInfoError::MissingSubjectToken)
        ));
    }

    #[test]
    fn test_factory_raw_fields() {
        let raw = json!({
            "version": "v3",
            "auth_token": "rawtok",
            "expires_at": "2026-10-19T12:00:00Z",
            "user": {"id": "uid"},
            "domain": {"id": "did"}
        });
        let sot = AccessInfo::factory(None, None, Some(&raw)).unwrap();
        assert_eq!(WireVersion::V3, sot.version());
        assert_eq!("rawtok", sot.auth_token().expose_secret());
        assert_eq!(Some("did"), sot.domain_id());

        let raw = json!({
            "version": "v2.0",
            "token": {"id": "rawtok", "expires": "2026-10-19T12:00:00Z"},
            "user": {"id": "uid"}
        });
        let sot = AccessInfo::factory(None, None, Some(&raw)).unwrap();
        assert_eq!(WireVersion::V2, sot.version());
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(json!({"error": {"code": 401}})), None)]
    #[case(None, Some(json!({"version": "v4"})))]
    fn test_factory_unrecognized(#[case] body: Option<Value>, #[case] raw: Option<Value>) {
        assert!(matches!(
            AccessInfo::factory(None, body.as_ref(), raw.as_ref()),
            Err(AccessInfoError::UnrecognizedAuthResponse)
        ));
    }

    #[test]
    fn test_will_expire_soon() {
        let sot = AccessInfo::factory(None, Some(&v2_body()), None).unwrap();
        let expires = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let lead = TimeDelta::seconds(30);
        assert!(!sot.will_expire_soon_at(expires - TimeDelta::seconds(31), lead));
        // expires_at - now == lead is not "soon"
        assert!(!sot.will_expire_soon_at(expires - lead, lead));
        assert!(sot.will_expire_soon_at(expires - TimeDelta::seconds(29), lead));
        assert!(sot.will_expire_soon_at(expires + TimeDelta::seconds(1), lead));
        assert!(!sot.will_expire_soon_at(expires, TimeDelta::zero()));
    }

    #[test]
    fn test_scope_unscoped() {
        let sot = AccessInfo::factory(Some(&subject_headers()), Some(&v3_body()), None).unwrap();
        assert_eq!(TokenScope::Unscoped, sot.scope());
        assert!(!sot.scoped());
    }
}
