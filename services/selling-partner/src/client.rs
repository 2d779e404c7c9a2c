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

use crate::authenticate::{Authenticate, LwaAuthenticator};
use crate::build::RequestBuilder;
use crate::constants::{INVENTORY_SUMMARIES_PATH, ORDERS_PATH};
use crate::models::{GetInventorySummariesResponse, GetOrdersResponse};
use crate::refresh::{RefreshScheduler, SchedulerState};
use crate::sign::RoleSigner;
use crate::Config;
use bytes::Bytes;
use http::Method;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use spapi_core::time::{format_rfc3339, DateTime};
use spapi_core::{Context, Error, Result};
use std::sync::Arc;
use std::time::Duration;

/// ApiClient calls the Selling Partner API.
///
/// It owns one token scheduler and one role signer. Every call builds the
/// request with the current access token, signs it with freshly assumed role
/// credentials and sends it through the context's [`spapi_core::HttpSend`].
///
/// Call [`ApiClient::stop`] to shut the background refresh down; dropping
/// the client does the same without waiting.
#[derive(Debug)]
pub struct ApiClient {
    ctx: Context,
    scheduler: Arc<RefreshScheduler>,
    builder: RequestBuilder,
    signer: RoleSigner,
    marketplace_id: String,
    timeout: Option<Duration>,
}

impl ApiClient {
    /// Create a client and fetch the first access token.
    ///
    /// Fails with a [`spapi_core::ErrorKind::ConfigInvalid`] error on an
    /// incomplete config and with an [`spapi_core::ErrorKind::Auth`] error
    /// when the first token exchange fails.
    pub async fn new(ctx: Context, config: Config) -> Result<Self> {
        config.validate()?;

        let authenticator = LwaAuthenticator::from_config(&config);
        let signer = RoleSigner::from_config(&config);
        Self::from_parts(ctx, &config, Arc::new(authenticator), signer).await
    }

    /// Create a client from its parts.
    ///
    /// Only the endpoint, user agent, marketplace, skew, timeout and refresh
    /// token seed are read from `config`.
    pub async fn from_parts(
        ctx: Context,
        config: &Config,
        authenticator: Arc<dyn Authenticate>,
        signer: RoleSigner,
    ) -> Result<Self> {
        let scheduler = RefreshScheduler::with_authenticator(
            ctx.clone(),
            authenticator,
            config.refresh_token.clone().unwrap_or_default(),
        )
        .with_refresh_skew(config.refresh_skew);
        scheduler.start().await?;

        let scheduler = Arc::new(scheduler);
        let builder = RequestBuilder::new(
            config.base_url(),
            config.user_agent.clone(),
            scheduler.clone(),
        );

        Ok(Self {
            ctx,
            scheduler,
            builder,
            signer,
            marketplace_id: config.marketplace_id().to_string(),
            timeout: config.timeout,
        })
    }

    /// List FBA inventory summaries of the configured marketplace.
    ///
    /// Pass the `next_token` of the previous page to continue paginating.
    pub async fn get_inventory_summaries(
        &self,
        next_token: Option<&str>,
    ) -> Result<GetInventorySummariesResponse> {
        let mut query = vec![
            ("granularityType", "Marketplace"),
            ("granularityId", self.marketplace_id.as_str()),
            ("marketplaceIds", self.marketplace_id.as_str()),
            ("details", "true"),
        ];
        if let Some(token) = next_token {
            query.push(("nextToken", token));
        }

        self.send(Method::GET, INVENTORY_SUMMARIES_PATH, &query)
            .await
    }

    /// List orders of the configured marketplace, optionally created after a point in time.
    pub async fn get_orders(&self, created_after: Option<DateTime>) -> Result<GetOrdersResponse> {
        let created_after = created_after.map(format_rfc3339);

        let mut query = vec![("MarketplaceIds", self.marketplace_id.as_str())];
        if let Some(v) = created_after.as_deref() {
            query.push(("CreatedAfter", v));
        }

        self.send(Method::GET, ORDERS_PATH, &query).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let req = self.builder.build(method.clone(), path, query).await?;

        let (mut parts, body) = req.into_parts();
        self.signer.sign(&self.ctx, &mut parts, &body).await?;
        let req = http::Request::from_parts(parts, body);

        debug!("sending {method} {path}");
        let resp = self.dispatch(req).await?;

        let status = resp.status();
        if !status.is_success() {
            let body = String::from_utf8_lossy(resp.body()).to_string();
            warn!("{method} {path} returned {status}");
            return Err(Error::api(format!("{method} {path} returned {status}"))
                .with_status(status)
                .with_body(body));
        }

        serde_json::from_slice(resp.body()).map_err(|e| {
            Error::unexpected("failed to decode api response")
                .with_source(e)
                .with_context(format!("path: {path}"))
                .with_context(format!("response_length: {}", resp.body().len()))
        })
    }

    async fn dispatch(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let Some(timeout) = self.timeout else {
            return self.ctx.http_send(req).await;
        };

        tokio::time::timeout(timeout, self.ctx.http_send(req))
            .await
            .map_err(|e| {
                Error::transport("api request timed out")
                    .with_source(e)
                    .with_context(format!("timeout: {timeout:?}"))
            })?
    }

    /// Stop the background token refresh and wait for it to exit.
    ///
    /// Safe to call more than once. Later calls still work, they
    /// re-authenticate on demand once the token expires.
    pub async fn stop(&self) {
        self.scheduler.stop().await
    }

    /// State of the background token refresh.
    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// The error of the last failed token refresh, if it hasn't recovered.
    pub fn last_refresh_error(&self) -> Option<Arc<Error>> {
        self.scheduler.last_error()
    }

    /// The access token currently held.
    pub fn access_token(&self) -> Option<String> {
        self.scheduler.store().access_token()
    }
}
