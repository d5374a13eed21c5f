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
//! Authentication parameters.
use std::collections::BTreeMap;
use std::fmt;

use crate::auth::AuthError;

/// Parameters never printed in the `Debug` output.
const SENSITIVE: [&str; 2] = ["password", "token"];

/// Named authentication parameters (`username`, `project_id`, ...) as they
/// come from the configuration or the command line.
///
/// The map is never modified by the plugins: every consumer selects the
/// subset it understands into a new map.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct AuthParameters(BTreeMap<String, String>);

impl AuthParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the parameter.
    pub fn with<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Copy of the parameters named in `allowed`.
    pub fn select(&self, allowed: &[&str]) -> Self {
        self.0
            .iter()
            .filter(|(name, _)| allowed.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Names of the parameters not present in `allowed`.
    pub fn unknown(&self, allowed: &[&str]) -> Vec<String> {
        self.names()
            .filter(|name| !allowed.contains(name))
            .map(Into::into)
            .collect()
    }

    /// Fail with [`AuthError::UnknownParameters`] if any parameter is not in
    /// `allowed`.
    pub(crate) fn ensure_known(
        &self,
        method: &'static str,
        allowed: &[&[&str]],
    ) -> Result<(), AuthError> {
        let allowed: Vec<&str> = allowed.iter().flat_map(|x| x.iter().copied()).collect();
        let names = self.unknown(&allowed);
        if names.is_empty() {
            Ok(())
        } else {
            Err(AuthError::UnknownParameters { method, names })
        }
    }

    /// Boolean parameter.
    pub fn get_bool(&self, name: &str) -> Result<Option<bool>, AuthError> {
        self.get(name)
            .map(|value| match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(AuthError::InvalidParameter {
                    name: name.into(),
                    value: value.into(),
                }),
            })
            .transpose()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AuthParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl fmt::Debug for AuthParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|(name, value)| {
                if SENSITIVE.contains(&name.as_str()) {
                    (name.as_str(), "[REDACTED]")
                } else {
                    (name.as_str(), value.as_str())
                }
            }))
            .finish()
    }
}
