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
//! # Service filter
//!
//! Declarative endpoint query used both to request and to match the service
//! catalog entries.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::error::CatalogError;

/// Endpoint visibility (the `interface` of the v3 catalog).
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible by end users on a publicly available network interface.
    #[default]
    Public,
    /// Visible by end users on an unmetered internal network interface.
    Internal,
    /// Visible by administrative users on a secure network interface.
    Admin,
}

impl Visibility {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Visibility {
    type Err = CatalogError;

    /// Parse the visibility accepting the legacy `publicURL`, `internalURL`
    /// and `adminURL` names as well.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_suffix("URL").unwrap_or(s) {
            "public" => Ok(Self::Public),
            "internal" => Ok(Self::Internal),
            "admin" => Ok(Self::Admin),
            _ => Err(CatalogError::InvalidVisibility(s.into())),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service type a filter is looking for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ServiceType {
    /// Matches every catalog entry. Used by the discovery flows.
    Any,
    /// Matches the entries of exactly this type.
    Named(String),
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Endpoint lookup query.
///
/// The string form (`service_type=<t>,visibility=<v>[,region=<r>][,service_name=<n>]`)
/// is used in the error messages and is kept stable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServiceFilter {
    service_type: ServiceType,
    visibility: Visibility,
    region: Option<String>,
    service_name: Option<String>,
    version: Option<String>,
}

impl ServiceFilter {
    /// Filter for the service type with the given visibility.
    ///
    /// Fails with [`CatalogError::InvalidVisibility`] when the visibility is
    /// not one of `public`, `internal`, `admin` (optionally suffixed with
    /// `URL`).
    pub fn new<S: Into<String>>(service_type: S, visibility: &str) -> Result<Self, CatalogError> {
        Ok(Self::with_visibility(
            ServiceType::Named(service_type.into()),
            visibility.parse()?,
        ))
    }

    /// Filter matching every service type.
    pub fn any(visibility: &str) -> Result<Self, CatalogError> {
        Ok(Self::with_visibility(ServiceType::Any, visibility.parse()?))
    }

    pub fn with_visibility(service_type: ServiceType, visibility: Visibility) -> Self {
        Self {
            service_type,
            visibility,
            region: None,
            service_name: None,
            version: None,
        }
    }

    /// Restrict the filter to the region.
    pub fn region<S: Into<String>>(mut self, region: S) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Restrict the filter to the service name.
    pub fn service_name<S: Into<String>>(mut self, service_name: S) -> Self {
        self.service_name = Some(service_name.into());
        self
    }

    /// Request an explicit API version to be substituted into the URL
    /// templates instead of the version detected in the catalog.
    pub fn version<S: Into<String>>(mut self, version: S) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn get_service_type(&self) -> &ServiceType {
        &self.service_type
    }

    pub fn get_visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn get_region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn get_service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }

    pub fn get_version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn match_service_type(&self, candidate: &str) -> bool {
        match &self.service_type {
            ServiceType::Any => true,
            ServiceType::Named(name) => name == candidate,
        }
    }

    pub fn match_service_name(&self, candidate: Option<&str>) -> bool {
        match_optional(self.service_name.as_deref(), candidate)
    }

    pub fn match_region(&self, candidate: Option<&str>) -> bool {
        match_optional(self.region.as_deref(), candidate)
    }

    pub fn match_visibility(&self, candidate: &str) -> bool {
        self.visibility.as_str() == candidate
    }
}

/// Unset filter value matches anything (including an absent candidate), a
/// set one requires the exact candidate value.
fn match_optional(wanted: Option<&str>, candidate: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => candidate == Some(wanted),
    }
}

impl fmt::Display for ServiceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "service_type={},visibility={}",
            self.service_type, self.visibility
        )?;
        if let Some(region) = &self.region {
            write!(f, ",region={region}")?;
        }
        if let Some(service_name) = &self.service_name {
            write!(f, ",service_name={service_name}")?;
        }
        Ok(())
    }
}
