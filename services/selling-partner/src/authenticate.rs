// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::token::{Token, TokenResponse};
use crate::Config;
use async_trait::async_trait;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use log::{debug, error};
use serde::Serialize;
use spapi_core::utils::Redact;
use spapi_core::{Context, Error, Result};
use std::fmt::{self, Debug};

/// Authenticate exchanges a refresh token for a fresh bearer token.
///
/// Implementations must not retry: the caller decides what to do with a
/// failure. Errors are expected to be [`spapi_core::ErrorKind::Auth`].
#[async_trait]
pub trait Authenticate: Debug + Send + Sync + 'static {
    /// Exchange `refresh_token` for a new token.
    async fn authenticate(&self, ctx: &Context, refresh_token: &str) -> Result<Token>;
}

/// Refresh token grant sent to the token endpoint.
#[derive(Serialize)]
struct RefreshTokenRequest<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

/// LwaAuthenticator talks to the Login with Amazon token endpoint.
#[derive(Clone)]
pub struct LwaAuthenticator {
    client_id: String,
    client_secret: String,
    token_endpoint: String,
}

impl Debug for LwaAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LwaAuthenticator")
            .field("client_id", &self.client_id)
            .field("client_secret", &Redact::from(&self.client_secret))
            .field("token_endpoint", &self.token_endpoint)
            .finish()
    }
}

impl LwaAuthenticator {
    /// Create a new authenticator.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        token_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_endpoint: token_endpoint.into(),
        }
    }

    /// Create an authenticator from config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.client_id.clone().unwrap_or_default(),
            config.client_secret.clone().unwrap_or_default(),
            config.token_endpoint.clone(),
        )
    }
}

#[async_trait]
impl Authenticate for LwaAuthenticator {
    async fn authenticate(&self, ctx: &Context, refresh_token: &str) -> Result<Token> {
        debug!("exchanging refresh token for access token");

        let form = serde_urlencoded::to_string(RefreshTokenRequest {
            grant_type: "refresh_token",
            refresh_token,
            client_id: &self.client_id,
            client_secret: &self.client_secret,
        })
        .map_err(|e| Error::auth("failed to encode token request").with_source(e))?;

        let req = http::Request::post(self.token_endpoint.as_str())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Bytes::from(form))
            .map_err(|e| {
                Error::auth("failed to build token request")
                    .with_source(e)
                    .with_context(format!("token_endpoint: {}", self.token_endpoint))
            })?;

        let resp = ctx.http_send(req).await.map_err(|e| {
            Error::auth("failed to reach token endpoint")
                .with_source(e)
                .with_context(format!("token_endpoint: {}", self.token_endpoint))
        })?;

        let status = resp.status();
        if status != http::StatusCode::OK {
            error!("refresh token exchange got unexpected response: {status}");
            let body = String::from_utf8_lossy(resp.body()).to_string();
            return Err(
                Error::auth(format!("token endpoint returned {status}: {body}"))
                    .with_status(status)
                    .with_body(body),
            );
        }

        let token: TokenResponse = serde_json::from_slice(resp.body()).map_err(|e| {
            Error::auth("failed to decode token response")
                .with_source(e)
                .with_context(format!("response_length: {}", resp.body().len()))
        })?;
        if token.access_token.is_empty() {
            return Err(Error::auth("token response carries no access token"));
        }

        Ok(token.into_token(refresh_token))
    }
}
