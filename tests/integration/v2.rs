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

use chrono::{TimeDelta, Utc};
use eyre::Result;
use httpmock::MockServer;
use secrecy::ExposeSecret;
use serde_json::json;

use openstack_keystone_auth::access::{AccessInfoApi, WireVersion};
use openstack_keystone_auth::auth::{AuthError, GenericAuth};
use openstack_keystone_auth::catalog::ServiceFilter;
use openstack_keystone_auth::transport::HttpTransport;

use crate::password_params;

#[tokio::test]
async fn test_password_reauthenticate() -> Result<()> {
    let srv = MockServer::start_async().await;
    // token valid for less than the expiry lead: every call reauthenticates
    let mock = srv
        .mock_async(|when, then| {
            when.method("POST")
                .path("/v2.0/tokens")
                .header("accept", "application/json")
                .json_body(json!({"auth": {
                    "passwordCredentials": {"username": "admin", "password": "secret"},
                    "tenantName": "demo"
                }}));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"access": {
                    "token": {
                        "id": "v2token",
                        "expires": (Utc::now() + TimeDelta::seconds(10)).to_rfc3339(),
                        "tenant": {"id": "tid", "name": "demo"}
                    },
                    "user": {"id": "uid", "name": "admin", "roles": [{"name": "member"}]},
                    "serviceCatalog": [{
                        "type": "compute",
                        "name": "nova",
                        "endpoints": [{
                            "region": "RegionOne",
                            "publicURL": "http://nova.example/v2.1/tid",
                            "internalURL": "http://nova.internal/v2.1/tid",
                            "adminURL": "http://nova.admin/v2.1/tid"
                        }]
                    }]
                }}));
        })
        .await;

    let auth = GenericAuth::new(&srv.url("/v2.0"), &password_params())?;
    assert_eq!(WireVersion::V2, auth.version());
    let transport = HttpTransport::default();

    assert_eq!("v2token", auth.get_token(&transport).await?.expose_secret());
    assert_eq!(
        "http://nova.admin/v2.1/tid",
        auth.get_endpoint(&transport, &ServiceFilter::new("compute", "adminURL")?)
            .await?
    );
    let access = auth.get_access(&transport).await?;
    assert_eq!(Some("tid"), access.project_id());
    assert_eq!(Some("default"), access.project_domain_id());
    mock.assert_hits(3);

    // the lead is configurable
    let auth = GenericAuth::new(&srv.url("/v2.0"), &password_params())?
        .with_expiry_lead(TimeDelta::seconds(1));
    auth.get_token(&transport).await?;
    auth.get_token(&transport).await?;
    mock.assert_hits(4);
    Ok(())
}

#[tokio::test]
async fn test_invalid_response() -> Result<()> {
    let srv = MockServer::start_async().await;
    srv.mock_async(|when, then| {
        when.method("POST").path("/v2.0/tokens");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"token": {"id": "v3 shaped"}}));
    })
    .await;

    let auth = GenericAuth::new(&srv.url("/v2.0"), &password_params())?;
    assert!(matches!(
        auth.get_token(&HttpTransport::default()).await,
        Err(AuthError::InvalidResponse(_))
    ));
    Ok(())
}
