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

use crate::constants::X_AMZ_ACCESS_TOKEN;
use crate::refresh::RefreshScheduler;
use bytes::Bytes;
use http::header::{CONTENT_TYPE, USER_AGENT};
use http::{HeaderValue, Method};
use spapi_core::{Error, Result};
use std::sync::Arc;

/// RequestBuilder builds unsigned API requests carrying the current access token.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    user_agent: String,
    scheduler: Arc<RefreshScheduler>,
}

impl RequestBuilder {
    /// Create a builder for requests against `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        user_agent: impl Into<String>,
        scheduler: Arc<RefreshScheduler>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
            scheduler,
        }
    }

    /// Build a request for `path` with `query` form-urlencoded.
    ///
    /// Signing rewrites the query string in canonical order, so the pairs
    /// go out sorted by name whatever order they are given in.
    ///
    /// The access token is read from the scheduler at build time, so a
    /// request is never built with an expired token.
    pub async fn build(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<http::Request<Bytes>> {
        let token = self.scheduler.token().await?;

        let mut url = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            let mut serializer = form_urlencoded::Serializer::new(String::new());
            serializer.extend_pairs(query);
            url.push('?');
            url.push_str(&serializer.finish());
        }

        let mut access_token = HeaderValue::from_str(&token.access_token).map_err(|e| {
            Error::request_invalid("access token is not a valid header value").with_source(e)
        })?;
        access_token.set_sensitive(true);

        http::Request::builder()
            .method(method)
            .uri(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, &self.user_agent)
            .header(X_AMZ_ACCESS_TOKEN, access_token)
            .body(Bytes::new())
            .map_err(|e| {
                Error::request_invalid("failed to build api request")
                    .with_source(e)
                    .with_context(format!("url: {url}"))
            })
    }
}
