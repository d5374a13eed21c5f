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

//! End to end authentication against a mocked Identity service.

use httpmock::MockServer;
use serde_json::{Value, json};

use openstack_keystone_auth::auth::AuthParameters;

mod config;
mod v2;
mod v3;

/// Password parameters understood by both API versions.
fn password_params() -> AuthParameters {
    AuthParameters::from_iter([
        ("username", "admin"),
        ("password", "secret"),
        ("user_domain_id", "default"),
        ("project_name", "demo"),
        ("project_domain_id", "default"),
        ("tenant_name", "demo"),
    ])
}

/// v3 catalog with the identity service pointing to the mock server.
fn catalog_v3(srv: &MockServer) -> Value {
    json!([
        {
            "type": "identity",
            "name": "keystone",
            "endpoints": [
                {"interface": "public", "region": "RegionOne", "url": srv.url("/v3")},
                {"interface": "admin", "region": "RegionOne", "url": srv.url("/v3")}
            ]
        },
        {
            "type": "compute",
            "name": "nova",
            "endpoints": [
                {"interface": "public", "region": "RegionOne", "url": "http://nova.r1/v2.1/"},
                {"interface": "internal", "region": "RegionOne", "url": "http://nova.r1.internal/v2.1"},
                {"interface": "public", "region_id": "RegionTwo", "url": "http://nova.r2/v2.1"}
            ]
        }
    ])
}
