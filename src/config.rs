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
//! # Configuration
//!
//! Authentication options read from an INI file:
//!
//! ```ini
//! [auth]
//! auth_url = https://keystone.example/v3
//! username = admin
//! password = secret
//! user_domain_id = default
//! project_name = admin
//! project_domain_id = default
//!
//! [endpoint]
//! interface = internal
//! region_name = RegionOne
//! ```

use std::path::PathBuf;

use chrono::TimeDelta;
use config::{File, FileFormat};
use eyre::{Report, WrapErr};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::auth::AuthParameters;
use crate::auth::plugin::DEFAULT_EXPIRY_LEAD_SECONDS;
use crate::catalog::{CatalogError, ServiceFilter};

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    /// Authentication options.
    #[serde(default)]
    pub auth: AuthSection,

    /// Endpoint selection.
    #[serde(default)]
    pub endpoint: EndpointSection,
}

/// Authentication options.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthSection {
    /// Identity service endpoint. The API version in the path selects the
    /// Identity API used.
    pub auth_url: Option<String>,

    pub user_id: Option<String>,
    pub username: Option<String>,
    pub user_domain_id: Option<String>,
    pub user_domain_name: Option<String>,
    pub password: Option<SecretString>,

    /// Existing token used for the authentication instead of the password.
    pub token: Option<SecretString>,

    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub project_domain_id: Option<String>,
    pub project_domain_name: Option<String>,
    pub domain_id: Option<String>,
    pub domain_name: Option<String>,

    /// v2 tenant.
    pub tenant_id: Option<String>,
    pub tenant_name: Option<String>,

    pub trust_id: Option<String>,

    /// Request the service catalog together with the token (v3).
    #[serde(default = "default_true")]
    pub include_catalog: bool,

    /// Renew the token once it is about to expire.
    #[serde(default = "default_true")]
    pub reauthenticate: bool,

    /// Seconds before the expiration at which the token is renewed.
    #[serde(default = "default_expiry_lead")]
    pub expiry_lead: u32,
}

fn default_true() -> bool {
    true
}

fn default_expiry_lead() -> u32 {
    DEFAULT_EXPIRY_LEAD_SECONDS
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            auth_url: None,
            user_id: None,
            username: None,
            user_domain_id: None,
            user_domain_name: None,
            password: None,
            token: None,
            project_id: None,
            project_name: None,
            project_domain_id: None,
            project_domain_name: None,
            domain_id: None,
            domain_name: None,
            tenant_id: None,
            tenant_name: None,
            trust_id: None,
            include_catalog: true,
            reauthenticate: true,
            expiry_lead: default_expiry_lead(),
        }
    }
}

impl AuthSection {
    /// Named authentication parameters of the configured options.
    pub fn to_parameters(&self) -> AuthParameters {
        let options = [
            ("user_id", self.user_id.as_deref()),
            ("username", self.username.as_deref()),
            ("user_domain_id", self.user_domain_id.as_deref()),
            ("user_domain_name", self.user_domain_name.as_deref()),
            ("password", self.password.as_ref().map(|x| x.expose_secret())),
            ("token", self.token.as_ref().map(|x| x.expose_secret())),
            ("project_id", self.project_id.as_deref()),
            ("project_name", self.project_name.as_deref()),
            ("project_domain_id", self.project_domain_id.as_deref()),
            ("project_domain_name", self.project_domain_name.as_deref()),
            ("domain_id", self.domain_id.as_deref()),
            ("domain_name", self.domain_name.as_deref()),
            ("tenant_id", self.tenant_id.as_deref()),
            ("tenant_name", self.tenant_name.as_deref()),
            ("trust_id", self.trust_id.as_deref()),
        ];
        let mut params: AuthParameters = options
            .into_iter()
            .filter_map(|(name, value)| value.map(|value| (name, value)))
            .collect();
        if !self.include_catalog {
            params = params.with("include_catalog", "false");
        }
        if !self.reauthenticate {
            params = params.with("reauthenticate", "false");
        }
        params
    }

    pub fn expiry_lead(&self) -> TimeDelta {
        TimeDelta::seconds(self.expiry_lead.into())
    }
}

/// Endpoint selection options.
#[derive(Debug, Deserialize, Clone)]
pub struct EndpointSection {
    /// Endpoint interface (`public`, `internal` or `admin`).
    #[serde(default = "default_interface")]
    pub interface: String,

    pub region_name: Option<String>,
}

fn default_interface() -> String {
    "public".into()
}

impl Default for EndpointSection {
    fn default() -> Self {
        Self {
            interface: default_interface(),
            region_name: None,
        }
    }
}

impl EndpointSection {
    /// Catalog query of the configured interface and region for the service.
    pub fn filter<S: Into<String>>(&self, service_type: S) -> Result<ServiceFilter, CatalogError> {
        let filter = ServiceFilter::new(service_type, &self.interface)?;
        Ok(match &self.region_name {
            Some(region) => filter.region(region.clone()),
            None => filter,
        })
    }
}

impl Config {
    pub fn new(path: PathBuf) -> Result<Self, Report> {
        let mut builder = config::Config::builder();

        if std::path::Path::new(&path).is_file() {
            builder = builder.add_source(File::from(path).format(FileFormat::Ini));
        }

        builder.try_into()
    }
}

impl TryFrom<config::ConfigBuilder<config::builder::DefaultState>> for Config {
    type Error = Report;
    fn try_from(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, Self::Error> {
        builder
            .set_default("auth.include_catalog", "true")?
            .set_default("auth.reauthenticate", "true")?
            .set_default("auth.expiry_lead", DEFAULT_EXPIRY_LEAD_SECONDS.to_string())?
            .set_default("endpoint.interface", "public")?
            .build()
            .wrap_err("Failed to read configuration file")?
            .try_deserialize()
            .wrap_err("Failed to parse configuration file")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::catalog::Visibility;

    fn load(content: &str) -> Config {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        Config::new(file.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_defaults() {
        let sot = Config::new(PathBuf::from("/nonexisting/keystone-auth.conf")).unwrap();
        assert!(sot.auth.auth_url.is_none());
        assert!(sot.auth.include_catalog);
        assert!(sot.auth.reauthenticate);
        assert_eq!(TimeDelta::seconds(30), sot.auth.expiry_lead());
        assert_eq!(DEFAULT_EXPIRY_LEAD_SECONDS, sot.auth.expiry_lead);
        assert_eq!(DEFAULT_EXPIRY_LEAD_SECONDS, AuthSection::default().expiry_lead);
        assert_eq!("public", sot.endpoint.interface);
        assert!(sot.auth.to_parameters().is_empty());
    }

    #[test]
    fn test_load() {
        let sot = load(
            r#"
[auth]
auth_url = https://keystone.example/v3
username = admin
password = secret
user_domain_id = default
project_name = demo
project_domain_id = default
include_catalog = false
expiry_lead = 120

[endpoint]
interface = internalURL
region_name = RegionOne
"#,
        );
        assert_eq!(Some("https://keystone.example/v3"), sot.auth.auth_url.as_deref());
        assert_eq!(
            Some("secret"),
            sot.auth.password.as_ref().map(|x| x.expose_secret())
        );
        assert!(!sot.auth.include_catalog);
        assert_eq!(TimeDelta::seconds(120), sot.auth.expiry_lead());

        let params = sot.auth.to_parameters();
        assert_eq!(Some("admin"), params.get("username"));
        assert_eq!(Some("secret"), params.get("password"));
        assert_eq!(Some("false"), params.get("include_catalog"));
        assert!(!params.contains("reauthenticate"));
        assert!(!params.contains("token"));

        let filter = sot.endpoint.filter("compute").unwrap();
        assert_eq!(Visibility::Internal, filter.get_visibility());
        assert_eq!(Some("RegionOne"), filter.get_region());
    }

    #[test]
    fn test_invalid_interface() {
        let sot = load("[endpoint]\ninterface = private\n");
        assert!(matches!(
            sot.endpoint.filter("compute"),
            Err(CatalogError::InvalidVisibility(_))
        ));
    }
}
