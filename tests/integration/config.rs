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

use std::io::Write;

use chrono::{TimeDelta, Utc};
use eyre::Result;
use httpmock::MockServer;
use serde_json::json;
use tempfile::NamedTempFile;

use openstack_keystone_auth::auth::{AuthError, GenericAuth};
use openstack_keystone_auth::config::Config;
use openstack_keystone_auth::transport::HttpTransport;

use crate::catalog_v3;

#[tokio::test]
async fn test_from_config() -> Result<()> {
    let srv = MockServer::start_async().await;
    let mock = srv
        .mock_async(|when, then| {
            when.method("POST")
                .path("/v3/auth/tokens")
                .json_body(json!({"auth": {
                    "identity": {
                        "methods": ["password"],
                        "password": {"user": {"id": "uid", "password": "secret"}}
                    },
                    "scope": {"project": {"id": "pid"}}
                }}));
            then.status(201)
                .header("content-type", "application/json")
                .header("x-subject-token", "tok")
                .json_body(json!({"token": {
                    "expires_at": (Utc::now() + TimeDelta::hours(1)).to_rfc3339(),
                    "user": {"id": "uid"},
                    "project": {"id": "pid"},
                    "catalog": catalog_v3(&srv)
                }}));
        })
        .await;

    let mut file = NamedTempFile::new()?;
    write!(
        file,
        "[auth]\nauth_url = {}\nuser_id = uid\npassword = secret\nproject_id = pid\nexpiry_lead = 60\n\n[endpoint]\ninterface = internal\nregion_name = RegionOne\n",
        srv.url("/v3")
    )?;
    let cfg = Config::new(file.path().to_path_buf())?;
    let auth = GenericAuth::from_config(&cfg)?;
    assert_eq!(TimeDelta::seconds(60), auth.plugin().expiry_lead());

    let endpoint = auth
        .get_endpoint(&HttpTransport::default(), &cfg.endpoint.filter("compute")?)
        .await?;
    assert_eq!("http://nova.r1.internal/v2.1", endpoint);
    mock.assert();
    Ok(())
}

#[test]
fn test_missing_auth_url() -> Result<()> {
    let cfg = Config::new("/nonexisting/keystone-auth.conf".into())?;
    assert!(matches!(
        GenericAuth::from_config(&cfg),
        Err(AuthError::AuthorizationFailure(_))
    ));
    Ok(())
}
