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

use openstack_keystone_auth::access::{AccessInfoApi, TokenScope, WireVersion};
use openstack_keystone_auth::auth::{AuthError, AuthParameters, GenericAuth};
use openstack_keystone_auth::catalog::{ServiceFilter, ServiceType, Visibility};
use openstack_keystone_auth::transport::HttpTransport;

use crate::{catalog_v3, password_params};

#[tokio::test]
async fn test_password_project_scope() -> Result<()> {
    let srv = MockServer::start_async().await;
    let mock = srv
        .mock_async(|when, then| {
            when.method("POST")
                .path("/v3/auth/tokens")
                .header("accept", "application/json")
                .json_body(json!({"auth": {
                    "identity": {
                        "methods": ["password"],
                        "password": {"user": {
                            "name": "admin",
                            "domain": {"id": "default"},
                            "password": "secret"
                        }}
                    },
                    "scope": {"project": {"name": "demo", "domain": {"id": "default"}}}
                }}));
            then.status(201)
                .header("content-type", "application/json")
                .header("x-subject-token", "gAAAAABtoken")
                .json_body(json!({"token": {
                    "methods": ["password"],
                    "expires_at": (Utc::now() + TimeDelta::hours(1)).to_rfc3339(),
                    "issued_at": Utc::now().to_rfc3339(),
                    "audit_ids": ["audit"],
                    "user": {"id": "uid", "name": "admin", "domain": {"id": "default", "name": "Default"}},
                    "project": {"id": "pid", "name": "demo", "domain": {"id": "default", "name": "Default"}},
                    "roles": [{"id": "rid", "name": "admin"}],
                    "catalog": catalog_v3(&srv)
                }}));
        })
        .await;

    let auth = GenericAuth::new(&srv.url("/v3"), &password_params())?;
    assert_eq!(WireVersion::V3, auth.version());
    let transport = HttpTransport::default();

    assert_eq!(
        "gAAAAABtoken",
        auth.get_token(&transport).await?.expose_secret()
    );
    assert_eq!(
        "http://nova.r1/v2.1",
        auth.get_endpoint(&transport, &ServiceFilter::new("compute", "public")?)
            .await?
    );
    assert_eq!(
        "http://nova.r2/v2.1",
        auth.get_endpoint(
            &transport,
            &ServiceFilter::new("compute", "public")?.region("RegionTwo")
        )
        .await?
    );
    assert_eq!(
        "http://nova.r1.internal/v2",
        auth.get_endpoint(
            &transport,
            &ServiceFilter::new("compute", "internalURL")?.version("v2")
        )
        .await?
    );
    match auth
        .get_endpoint(&transport, &ServiceFilter::new("volume", "public")?)
        .await
    {
        Err(AuthError::Catalog { source }) => assert_eq!(
            "endpoint not found for service_type=volume,visibility=public",
            source.to_string()
        ),
        other => panic!("volume is not in the catalog, got {other:?}"),
    }

    let access = auth.get_access(&transport).await?;
    assert!(matches!(access.scope(), TokenScope::Project { id, .. } if id == "pid"));
    assert_eq!(vec!["admin"], access.role_names());
    assert_eq!(Some(srv.url("/v3")), access.auth_url());
    let catalog = access.service_catalog()?;
    assert_eq!(
        Some(vec!["v2.1".to_string(), "v2.1".to_string()]),
        catalog.get_versions(&ServiceFilter::with_visibility(
            ServiceType::Named("compute".into()),
            Visibility::Public
        ))
    );
    assert_eq!(
        vec![srv.url("/v3")],
        catalog.get_urls(&ServiceFilter::any("admin")?.region("RegionOne"))
    );

    // everything above was served by a single token
    mock.assert_hits(1);
    Ok(())
}

#[tokio::test]
async fn test_token_nocatalog() -> Result<()> {
    let srv = MockServer::start_async().await;
    let mock = srv
        .mock_async(|when, then| {
            when.method("POST")
                .path("/v3/auth/tokens")
                .query_param_exists("nocatalog")
                .header("x-auth-token", "old")
                .json_body(json!({"auth": {
                    "identity": {"methods": ["token"], "token": {"id": "old"}},
                    "scope": {"domain": {"id": "did"}}
                }}));
            then.status(201)
                .header("content-type", "application/json")
                .header("x-subject-token", "new")
                .json_body(json!({"token": {
                    "methods": ["token"],
                    "expires_at": (Utc::now() + TimeDelta::hours(1)).to_rfc3339(),
                    "user": {"id": "uid"},
                    "domain": {"id": "did", "name": "dname"}
                }}));
        })
        .await;

    let auth = GenericAuth::new(
        &srv.url("/v3/"),
        &AuthParameters::from_iter([
            ("token", "old"),
            ("domain_id", "did"),
            ("include_catalog", "false"),
        ]),
    )?;
    let transport = HttpTransport::default();
    assert_eq!("new", auth.get_token(&transport).await?.expose_secret());
    let access = auth.get_access(&transport).await?;
    assert!(access.domain_scoped());
    assert!(!access.has_service_catalog());
    assert!(matches!(
        auth.get_endpoint(&transport, &ServiceFilter::new("compute", "public")?)
            .await,
        Err(AuthError::Catalog { .. })
    ));
    mock.assert_hits(1);
    Ok(())
}

#[tokio::test]
async fn test_rejected() -> Result<()> {
    let srv = MockServer::start_async().await;
    let mock = srv
        .mock_async(|when, then| {
            when.method("POST").path("/v3/auth/tokens");
            then.status(401)
                .header("content-type", "application/json")
                .json_body(json!({"error": {"code": 401, "title": "Unauthorized"}}));
        })
        .await;

    let auth = GenericAuth::new(&srv.url("/v3"), &password_params())?;
    let transport = HttpTransport::default();
    assert!(matches!(
        auth.get_token(&transport).await,
        Err(AuthError::Transport { .. })
    ));
    assert!(auth.get_auth_ref().await.is_none());
    mock.assert_hits(1);
    Ok(())
}
