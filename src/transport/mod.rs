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
//! # HTTP transport
//!
//! The authentication plugins never talk HTTP directly: every request to the
//! Identity service goes through the [`Transport`]. [`HttpTransport`] is the
//! `reqwest` based implementation. Retries, redirects and timeouts are the
//! business of the `reqwest::Client` it is created with.
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::Url;

pub mod error;
#[cfg(test)]
pub mod mock;

pub use error::TransportError;
#[cfg(test)]
pub use mock::MockTransport;

/// Response of the Identity service.
#[derive(Clone, Debug)]
pub struct TransportResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// JSON body. `None` when the body is empty or not a JSON document.
    pub body: Option<Value>,
}

impl TransportResponse {
    /// `200 OK` response with the JSON body and no headers.
    pub fn json(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Some(body),
        }
    }
}

/// Sending the authentication requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST the JSON `body` with the additional `headers` to the `url`.
    async fn post(
        &self,
        url: &str,
        body: &Value,
        headers: &HeaderMap,
    ) -> Result<TransportResponse, TransportError>;
}

/// [`Transport`] backed by the `reqwest::Client`.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(level = "debug", skip(self, body, headers))]
    async fn post(
        &self,
        url: &str,
        body: &Value,
        headers: &HeaderMap,
    ) -> Result<TransportResponse, TransportError> {
        let target = Url::parse(url).map_err(|source| TransportError::Url {
            url: url.to_string(),
            source,
        })?;
        let response = self
            .client
            .post(target)
            .headers(headers.clone())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!("Identity service returned {:?}", response);
            return Err(TransportError::HttpStatus {
                status,
                url: url.to_string(),
            });
        }
        let headers = response.headers().clone();
        let raw = response.bytes().await?;
        Ok(TransportResponse {
            status,
            headers,
            body: serde_json::from_slice(&raw).ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use eyre::Result;
    use httpmock::MockServer;
    use reqwest::header::HeaderValue;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_post() -> Result<()> {
        let mock_srv = MockServer::start_async().await;
        let mock = mock_srv
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/v3/auth/tokens")
                    .header("accept", "application/json")
                    .json_body(json!({"auth": {"identity": {"methods": []}}}));
                then.status(201)
                    .header("content-type", "application/json")
                    .header("x-subject-token", "tok")
                    .json_body(json!({"token": {}}));
            })
            .await;

        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/json"));
        let rsp = HttpTransport::default()
            .post(
                &mock_srv.url("/v3/auth/tokens"),
                &json!({"auth": {"identity": {"methods": []}}}),
                &headers,
            )
            .await?;
        mock.assert();
        assert_eq!(StatusCode::CREATED, rsp.status);
        assert_eq!(Some(json!({"token": {}})), rsp.body);
        assert_eq!(
            Some("tok"),
            rsp.headers.get("X-Subject-Token").and_then(|v| v.to_str().ok())
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_post_error_status() -> Result<()> {
        let mock_srv = MockServer::start_async().await;
        let mock = mock_srv
            .mock_async(|when, then| {
                when.method("POST").path("/v2.0/tokens");
                then.status(401);
            })
            .await;

        match HttpTransport::default()
            .post(&mock_srv.url("/v2.0/tokens"), &json!({}), &HeaderMap::new())
            .await
        {
            Err(TransportError::HttpStatus { status, .. }) => {
                assert_eq!(StatusCode::UNAUTHORIZED, status)
            }
            other => panic!("401 should be an HttpStatus error, got {other:?}"),
        }
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn test_post_not_json() -> Result<()> {
        let mock_srv = MockServer::start_async().await;
        mock_srv
            .mock_async(|when, then| {
                when.method("POST").path("/v3/auth/tokens");
                then.status(200).body("<html></html>");
            })
            .await;
        let rsp = HttpTransport::default()
            .post(&mock_srv.url("/v3/auth/tokens"), &json!({}), &HeaderMap::new())
            .await?;
        assert!(rsp.body.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_post_invalid_url() {
        assert!(matches!(
            HttpTransport::default()
                .post("not a url", &json!({}), &HeaderMap::new())
                .await,
            Err(TransportError::Url { .. })
        ));
    }
}
