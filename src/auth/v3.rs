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
//! # Identity v3 authentication
//!
//! `POST <auth_url>/auth/tokens` with the identity composed of the
//! configured [`AuthMethod`]s and at most one scope target.
use std::sync::Arc;

use derive_builder::Builder;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::SecretString;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::access::{AccessInfoV3, SUBJECT_TOKEN_HEADER};
use crate::auth::method::{AuthMethod, PasswordMethod, TokenMethod};
use crate::auth::{AuthError, AuthParameters};
use crate::transport::Transport;

/// Identity v3 authorizer.
#[derive(Builder, Clone, Debug)]
#[builder(setter(strip_option, into))]
pub struct V3Auth {
    /// Identity endpoint (i.e. `https://keystone.example/v3`).
    auth_url: String,

    /// Authentication methods.
    #[builder(default)]
    methods: Vec<Arc<dyn AuthMethod>>,

    #[builder(default)]
    domain_id: Option<String>,

    #[builder(default)]
    domain_name: Option<String>,

    #[builder(default)]
    project_id: Option<String>,

    #[builder(default)]
    project_name: Option<String>,

    #[builder(default)]
    project_domain_id: Option<String>,

    #[builder(default)]
    project_domain_name: Option<String>,

    #[builder(default)]
    trust_id: Option<String>,

    /// Request the catalog together with the token.
    #[builder(default = "true")]
    include_catalog: bool,
}

impl V3AuthBuilder {
    /// Add the authentication method.
    pub fn method<M: AuthMethod + 'static>(&mut self, method: M) -> &mut Self {
        self.methods
            .get_or_insert_with(Vec::new)
            .push(Arc::new(method));
        self
    }
}

impl V3Auth {
    /// Scope parameters and switches.
    pub const OPTIONS: &'static [&'static str] = &[
        "domain_id",
        "domain_name",
        "project_id",
        "project_name",
        "project_domain_id",
        "project_domain_name",
        "trust_id",
        "include_catalog",
    ];

    /// Password authentication from the named parameters.
    pub fn password(auth_url: &str, params: &AuthParameters) -> Result<Self, AuthError> {
        params.ensure_known(PasswordMethod::NAME, &[Self::OPTIONS, PasswordMethod::PARAMETERS])?;
        let method = PasswordMethod::from_params(&params.select(PasswordMethod::PARAMETERS))?;
        Self::with_scope(auth_url, method, params)
    }

    /// Token authentication from the named parameters.
    pub fn token(auth_url: &str, params: &AuthParameters) -> Result<Self, AuthError> {
        params.ensure_known(TokenMethod::NAME, &[Self::OPTIONS, TokenMethod::PARAMETERS])?;
        let method = TokenMethod::from_params(&params.select(TokenMethod::PARAMETERS))?;
        Self::with_scope(auth_url, method, params)
    }

    fn with_scope<M: AuthMethod + 'static>(
        auth_url: &str,
        method: M,
        params: &AuthParameters,
    ) -> Result<Self, AuthError> {
        let mut builder = V3AuthBuilder::default();
        builder.auth_url(auth_url).method(method);
        if let Some(val) = params.get("domain_id") {
            builder.domain_id(val);
        }
        if let Some(val) = params.get("domain_name") {
            builder.domain_name(val);
        }
        if let Some(val) = params.get("project_id") {
            builder.project_id(val);
        }
        if let Some(val) = params.get("project_name") {
            builder.project_name(val);
        }
        if let Some(val) = params.get("project_domain_id") {
            builder.project_domain_id(val);
        }
        if let Some(val) = params.get("project_domain_name") {
            builder.project_domain_name(val);
        }
        if let Some(val) = params.get("trust_id") {
            builder.trust_id(val);
        }
        if let Some(val) = params.get_bool("include_catalog")? {
            builder.include_catalog(val);
        }
        Ok(builder.build()?)
    }

    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    /// Scope of the request. At most one of domain, project and trust may be
    /// set.
    fn scope(&self) -> Result<Option<Value>, AuthError> {
        let targets = [
            self.domain_id.is_some() || self.domain_name.is_some(),
            self.project_id.is_some() || self.project_name.is_some(),
            self.trust_id.is_some(),
        ];
        if targets.into_iter().filter(|target| *target).count() > 1 {
            return Err(AuthError::failure(
                "authentication cannot be scoped to multiple targets, pick one of: project, domain or trust",
            ));
        }

        let scope = if let Some(id) = &self.domain_id {
            json!({"domain": {"id": id}})
        } else if let Some(name) = &self.domain_name {
            json!({"domain": {"name": name}})
        } else if let Some(id) = &self.project_id {
            json!({"project": {"id": id}})
        } else if let Some(name) = &self.project_name {
            let mut project = json!({"name": name});
            if let Some(id) = &self.project_domain_id {
                project["domain"] = json!({"id": id});
            } else if let Some(name) = &self.project_domain_name {
                project["domain"] = json!({"name": name});
            }
            json!({"project": project})
        } else if let Some(id) = &self.trust_id {
            json!({"OS-TRUST:trust": {"id": id}})
        } else {
            return Ok(None);
        };
        Ok(Some(scope))
    }

    /// Body of the authentication request.
    pub fn request_body(&self, headers: &mut HeaderMap) -> Result<Value, AuthError> {
        if self.methods.is_empty() {
            return Err(AuthError::failure(
                "authentication method required (e.g. password)",
            ));
        }
        let mut identity = Map::new();
        let mut names = Vec::with_capacity(self.methods.len());
        for method in &self.methods {
            identity.insert(method.method_name().into(), method.auth_data(headers)?);
            names.push(method.method_name());
        }
        identity.insert("methods".into(), json!(names));

        let mut auth = Map::new();
        auth.insert("identity".into(), Value::Object(identity));
        if let Some(scope) = self.scope()? {
            auth.insert("scope".into(), scope);
        }
        Ok(json!({"auth": auth}))
    }

    /// Obtain a new token.
    #[tracing::instrument(name = "v3_authorize", skip_all, fields(auth_url = %self.auth_url))]
    pub async fn authorize(&self, transport: &dyn Transport) -> Result<AccessInfoV3, AuthError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let body = self.request_body(&mut headers)?;
        let mut url = format!("{}/auth/tokens", self.auth_url.trim_end_matches('/'));
        if !self.include_catalog {
            url.push_str("?nocatalog");
        }

        debug!("requesting a new token");
        let response = transport.post(&url, &body, &headers).await?;
        let token = response
            .body
            .as_ref()
            .and_then(|body| body.get("token"))
            .ok_or_else(|| AuthError::InvalidResponse("the response has no token data".into()))?;
        let subject = response
            .headers
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|val| val.to_str().ok())
            .ok_or_else(|| {
                AuthError::InvalidResponse(format!(
                    "the response has no valid {SUBJECT_TOKEN_HEADER} header"
                ))
            })?;
        Ok(AccessInfoV3::new(
            SecretString::from(subject.to_string()),
            token,
        )?)
    }
}
