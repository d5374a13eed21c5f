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

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::error::CatalogError;
use crate::catalog::filter::Visibility;
use crate::catalog::version::UrlTemplate;

/// Normalized catalog endpoint.
#[derive(Builder, Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[builder(setter(strip_option, into))]
pub struct Endpoint {
    /// The ID of the endpoint.
    #[builder(default)]
    pub id: Option<String>,
    /// The interface type, which describes the visibility of the endpoint.
    /// Value is:
    ///   - public. Visible by end users on a publicly available network
    ///     interface.
    ///
    ///   - internal. Visible by end users on an unmetered internal network
    ///     interface.
    ///
    ///   - admin. Visible by administrative users on a secure network
    ///     interface.
    pub interface: String,
    /// The region that contains the service endpoint.
    #[builder(default)]
    pub region: Option<String>,
    /// The endpoint URL template with the `%(version)s` placeholder.
    pub url: String,
    /// The API version detected in the endpoint URL.
    #[builder(default)]
    pub version: Option<String>,
}

impl Endpoint {
    /// Render the concrete endpoint URL.
    ///
    /// `version` overrides the detected version.
    pub fn render_url(&self, version: Option<&str>) -> String {
        UrlTemplate {
            template: self.url.clone(),
            version: self.version.clone(),
        }
        .render(version)
    }
}

/// Catalog endpoint in either of the wire shapes.
///
/// Identity v3 endpoints carry an explicit `interface` next to the `url`,
/// while v2 endpoints carry one URL per visibility in the `publicURL`,
/// `internalURL` and `adminURL` keys.
#[derive(Clone, Debug, Default, Deserialize)]
pub(super) struct RawEndpoint {
    id: Option<String>,
    interface: Option<String>,
    url: Option<String>,
    region: Option<String>,
    region_id: Option<String>,
    version: Option<String>,
    #[serde(rename = "publicURL")]
    public_url: Option<String>,
    #[serde(rename = "internalURL")]
    internal_url: Option<String>,
    #[serde(rename = "adminURL")]
    admin_url: Option<String>,
}

impl RawEndpoint {
    /// Convert into the unified endpoints with the URL templates.
    pub(super) fn normalize(self) -> Result<Vec<Endpoint>, CatalogError> {
        let region = self.region_id.or(self.region);
        let mut urls: Vec<(String, String)> = Vec::new();
        if let Some(interface) = self.interface {
            match self.url {
                Some(url) => urls.push((interface, url)),
                None => warn!("catalog endpoint {:?} has no url, ignoring", self.id),
            }
        } else {
            for (visibility, url) in [
                (Visibility::Public, self.public_url),
                (Visibility::Internal, self.internal_url),
                (Visibility::Admin, self.admin_url),
            ] {
                if let Some(url) = url {
                    urls.push((visibility.as_str().into(), url));
                }
            }
        }

        urls.into_iter()
            .map(|(interface, url)| {
                let parsed = UrlTemplate::parse(&url, self.version.as_deref())?;
                Ok(Endpoint {
                    id: self.id.clone(),
                    interface,
                    region: region.clone(),
                    url: parsed.template,
                    version: parsed.version,
                })
            })
            .collect()
    }
}
