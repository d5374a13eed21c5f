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
//! Helpers shared by the wire versions.
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::catalog::{CatalogError, ServiceCatalog};

/// Parse the ISO 8601 timestamp of the token.
///
/// Older Identity v2 deployments return timestamps without the timezone,
/// those are interpreted as UTC.
pub fn parse_isotime(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|dt| dt.and_utc())
                .ok()
        })
}

pub fn isotime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_isotime(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {raw}")))
}

pub fn optional_isotime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_isotime(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {raw}"))),
        None => Ok(None),
    }
}

/// Catalog of the token built on the first access and kept in `cell`.
///
/// Failures are not memoized, every call on a token with a missing or
/// malformed catalog reports the error again.
pub(super) fn lazy_catalog<'a>(
    cell: &'a OnceLock<ServiceCatalog>,
    raw: Option<&Value>,
) -> Result<&'a ServiceCatalog, CatalogError> {
    if let Some(catalog) = cell.get() {
        return Ok(catalog);
    }
    let catalog = ServiceCatalog::new(raw)?;
    Ok(cell.get_or_init(|| catalog))
}
