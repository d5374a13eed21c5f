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
//! # Endpoint URL version templating
//!
//! Every catalog endpoint URL is turned into a template where the API
//! version segment of the path (`/v2`, `/v3.1`, ...) is replaced by the
//! [`VERSION_PLACEHOLDER`]. URLs without a version segment get the
//! placeholder appended so that every endpoint can be rendered for an
//! explicitly requested version.
//!
//! A version segment must be a whole path segment: `/v2.0beta/x` or `/v2x`
//! carry no version and are treated as unversioned.
use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::error::CatalogError;

/// Placeholder for the API version in the endpoint URL templates.
pub const VERSION_PLACEHOLDER: &str = "%(version)s";

/// Version path segment: a slash, `v`, digits, optionally followed by the
/// dot separated digits, ending the path or followed by another segment.
static VERSION_SEGMENT: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"/(?<version>v\d+(?:\.\d+)*)(?:/|$)"));

/// Endpoint URL template with the detected version.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UrlTemplate {
    /// URL with the [`VERSION_PLACEHOLDER`] in place of the version.
    pub template: String,
    /// Version detected in the original URL.
    pub version: Option<String>,
}

impl UrlTemplate {
    /// Build the template from the endpoint URL.
    ///
    /// URLs already containing the [`VERSION_PLACEHOLDER`] are taken as they
    /// are together with the `version` announced next to them.
    pub fn parse(url: &str, version: Option<&str>) -> Result<Self, CatalogError> {
        if url.contains(VERSION_PLACEHOLDER) {
            return Ok(Self {
                template: url.to_string(),
                version: version.map(Into::into),
            });
        }
        let re = VERSION_SEGMENT
            .as_ref()
            .map_err(|err| CatalogError::Regex(err.clone()))?;

        let (path_start, path_end) = path_bounds(url);
        let path = &url[path_start..path_end];

        if let Some(found) = re.captures(path)
            && let Some(version) = found.name("version")
        {
            let before = &url[..path_start + version.start() - 1];
            let rest = &path[version.end()..];
            let rest = rest.strip_suffix('/').unwrap_or(rest);
            Ok(Self {
                template: format!(
                    "{before}/{VERSION_PLACEHOLDER}{rest}{}",
                    &url[path_end..]
                ),
                version: Some(version.as_str().to_string()),
            })
        } else {
            let base = url.strip_suffix('/').unwrap_or(url);
            Ok(Self {
                template: format!("{base}/{VERSION_PLACEHOLDER}"),
                version: None,
            })
        }
    }

    /// Render the concrete URL.
    ///
    /// The explicitly requested version wins over the detected one. Without
    /// any version the placeholder segment is dropped.
    pub fn render(&self, version: Option<&str>) -> String {
        match version.or(self.version.as_deref()) {
            Some(version) => self.template.replace(VERSION_PLACEHOLDER, version),
            None => self
                .template
                .replace(&format!("/{VERSION_PLACEHOLDER}"), "")
                .replace(VERSION_PLACEHOLDER, ""),
        }
    }
}

/// Byte range of the path component of the URL.
///
/// The URL is not normalized through a full parser on purpose: the catalog
/// URLs carry `%(project_id)s` style templates and must be reproduced
/// byte for byte.
fn path_bounds(url: &str) -> (usize, usize) {
    let authority_start = url.find("://").map(|idx| idx + 3).unwrap_or(0);
    let path_start = url[authority_start..]
        .find(['/', '?', '#'])
        .map(|idx| authority_start + idx)
        .unwrap_or(url.len());
    let path_end = url[path_start..]
        .find(['?', '#'])
        .map(|idx| path_start + idx)
        .unwrap_or(url.len());
    (path_start, path_end)
}
