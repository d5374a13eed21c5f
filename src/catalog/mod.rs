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
//! # Service catalog
//!
//! The service catalog is returned together with the token and lists the
//! service endpoints that the API user is able to use.
//!
//! Following Keystone concepts are covered:
//!
//! ## Endpoint
//!
//! A network-accessible address, usually a URL, through which you can access a
//! service. Every endpoint URL is stored as a template where the API version
//! is replaced by the `%(version)s` placeholder (see [`version`]).
//!
//! ## Service
//!
//! An OpenStack service, such as Compute (nova), Object Storage (swift), or
//! Image service (glance), that provides one or more endpoints through which
//! users can access resources and perform operations.
//!
//! The catalog is built once from the raw response payload and is read-only
//! afterwards.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

pub mod error;
pub mod filter;
pub mod types;
pub mod version;

pub use error::CatalogError;
pub use filter::{ServiceFilter, ServiceType, Visibility};
pub use types::*;

/// Service catalog.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ServiceCatalog {
    entries: Vec<ServiceCatalogEntry>,
}

impl ServiceCatalog {
    /// Build the catalog from the raw `serviceCatalog` (v2) or `catalog` (v3)
    /// payload.
    ///
    /// The payload is read, never kept: the catalog owns a normalized copy.
    /// Fails with [`CatalogError::EmptyCatalog`] when the payload is absent or
    /// empty (`null`, `[]`, `{}`, `""` or `false`).
    pub fn new(raw: Option<&Value>) -> Result<Self, CatalogError> {
        let raw = match raw {
            None | Some(Value::Null) => return Err(CatalogError::EmptyCatalog),
            Some(Value::Array(entries)) if entries.is_empty() => {
                return Err(CatalogError::EmptyCatalog);
            }
            Some(Value::Object(entries)) if entries.is_empty() => {
                return Err(CatalogError::EmptyCatalog);
            }
            Some(Value::String(entries)) if entries.is_empty() => {
                return Err(CatalogError::EmptyCatalog);
            }
            Some(Value::Bool(false)) => return Err(CatalogError::EmptyCatalog),
            Some(raw) => raw,
        };
        let entries = Vec::<RawServiceCatalogEntry>::deserialize(raw)?
            .into_iter()
            .map(ServiceCatalogEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        trace!("service catalog with {} entries", entries.len());
        Ok(Self { entries })
    }

    /// Catalog entries in the order of the payload.
    pub fn entries(&self) -> &[ServiceCatalogEntry] {
        &self.entries
    }

    /// Matching (service, endpoint) pairs in the catalog order.
    fn matching<'a>(
        &'a self,
        filter: &'a ServiceFilter,
    ) -> impl Iterator<Item = (&'a ServiceCatalogEntry, &'a Endpoint)> + 'a {
        self.entries
            .iter()
            .filter(move |entry| {
                filter.match_service_type(&entry.r#type)
                    && filter.match_service_name(entry.name.as_deref())
            })
            .flat_map(move |entry| {
                entry
                    .endpoints
                    .iter()
                    .filter(move |ep| {
                        filter.match_region(ep.region.as_deref())
                            && filter.match_visibility(&ep.interface)
                    })
                    .map(move |ep| (entry, ep))
            })
    }

    /// Concrete URLs of all endpoints matching the filter.
    ///
    /// The version requested by the filter, otherwise the version detected
    /// in the catalog, is substituted into the URL templates.
    pub fn get_urls(&self, filter: &ServiceFilter) -> Vec<String> {
        self.matching(filter)
            .map(|(_, ep)| ep.render_url(filter.get_version()))
            .collect()
    }

    /// First URL matching the filter.
    #[tracing::instrument(level = "debug", skip_all, fields(filter = %filter))]
    pub fn get_url(&self, filter: &ServiceFilter) -> Result<String, CatalogError> {
        self.get_urls(filter).into_iter().next().ok_or_else(|| {
            debug!("no endpoint matches the filter");
            CatalogError::EndpointNotFound(filter.to_string())
        })
    }

    /// Versions detected in the endpoints matching the filter.
    ///
    /// Returns `None` only when no endpoint matched at all. Endpoints without
    /// a detected version do not contribute to the list.
    pub fn get_versions(&self, filter: &ServiceFilter) -> Option<Vec<String>> {
        let mut matched = false;
        let versions = self
            .matching(filter)
            .filter_map(|(_, ep)| {
                matched = true;
                ep.version.clone()
            })
            .collect();
        matched.then_some(versions)
    }

    /// Endpoints matching the filter grouped by the service type.
    pub fn get_endpoints(&self, filter: &ServiceFilter) -> BTreeMap<String, Vec<Endpoint>> {
        let mut res: BTreeMap<String, Vec<Endpoint>> = BTreeMap::new();
        for (entry, ep) in self.matching(filter) {
            res.entry(entry.r#type.clone())
                .or_default()
                .push(ep.clone());
        }
        res
    }
}
