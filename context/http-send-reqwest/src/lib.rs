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

//! Reqwest-based HTTP client implementation for the Selling Partner API client.
//!
//! `ReqwestHttpSend` implements the `HttpSend` trait from `spapi_core` and is
//! used for every outgoing call: the LWA token exchange, STS AssumeRole and
//! the marketplace API itself.
//!
//! ## Example
//!
//! ```no_run
//! use spapi_core::Context;
//! use spapi_http_send_reqwest::ReqwestHttpSend;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), reqwest::Error> {
//! let client = reqwest::Client::builder()
//!     .timeout(Duration::from_secs(30))
//!     .build()?;
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use log::debug;
use reqwest::{Client, Request};
use spapi_core::{Error, HttpSend, Result};

/// Reqwest-based implementation of the `HttpSend` trait.
///
/// Network failures, timeouts included, surface as
/// [`spapi_core::ErrorKind::Transport`]; a non-success status is not an error
/// at this layer.
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let method = req.method().clone();
        let uri = req.uri().clone();

        let req = Request::try_from(req).map_err(|e| {
            Error::request_invalid("failed to convert request into reqwest request")
                .with_source(e)
                .with_context(format!("uri: {uri}"))
        })?;

        debug!("sending {method} {}", uri.path());
        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    "request timed out"
                } else {
                    "failed to send request"
                };
                Error::transport(message)
                    .with_source(e)
                    .with_context(format!("method: {method}"))
                    .with_context(format!("uri: {uri}"))
            })?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| {
                Error::transport("failed to read response body")
                    .with_source(e)
                    .with_context(format!("uri: {uri}"))
            })?;
        Ok(http::Response::from_parts(parts, bs))
    }
}
