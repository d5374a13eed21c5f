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

use super::endpoint::{Endpoint, RawEndpoint};
use crate::catalog::error::CatalogError;

/// Service catalog entry.
#[derive(Builder, Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[builder(setter(strip_option, into))]
pub struct ServiceCatalogEntry {
    /// The ID of the service.
    #[builder(default)]
    pub id: Option<String>,
    /// The service type.
    pub r#type: String,
    /// The service name.
    #[builder(default)]
    pub name: Option<String>,
    /// Normalized endpoints of the service.
    #[builder(default)]
    pub endpoints: Vec<Endpoint>,
}

/// Catalog entry as delivered by the Identity API.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct RawServiceCatalogEntry {
    id: Option<String>,
    r#type: String,
    name: Option<String>,
    #[serde(default)]
    endpoints: Vec<RawEndpoint>,
}

impl TryFrom<RawServiceCatalogEntry> for ServiceCatalogEntry {
    type Error = CatalogError;

    fn try_from(value: RawServiceCatalogEntry) -> Result<Self, Self::Error> {
        let mut endpoints = Vec::with_capacity(value.endpoints.len());
        for raw in value.endpoints {
            endpoints.extend(raw.normalize()?);
        }
        Ok(Self {
            id: value.id,
            r#type: value.r#type,
            name: value.name,
            endpoints,
        })
    }
}
