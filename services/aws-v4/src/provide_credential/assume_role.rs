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

use crate::constants::{STS_SERVICE, X_AMZN_REQUESTID};
use crate::credential::Credential;
use crate::provide_credential::utils::{parse_sts_error, sts_endpoint};
use crate::RequestSigner;
use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use quick_xml::de;
use serde::Deserialize;
use spapi_core::time::parse_rfc3339;
use spapi_core::{Context, Error, ProvideCredential, Result, SignRequest};
use std::sync::Arc;

/// AssumeRoleCredentialProvider loads temporary credentials by calling STS
/// AssumeRole with a set of base credentials.
///
/// Every call performs a fresh AssumeRole. Callers that want to reuse the
/// temporary credentials until they expire must cache them themselves.
///
/// All failures, including missing base credentials, surface as
/// [`spapi_core::ErrorKind::RoleAssumption`].
#[derive(Debug, Clone)]
pub struct AssumeRoleCredentialProvider {
    role_arn: String,
    role_session_name: String,
    duration_seconds: u32,

    region: Option<String>,
    use_regional_sts_endpoint: bool,
    endpoint: Option<String>,

    base: Arc<dyn ProvideCredential<Credential = Credential>>,
}

impl AssumeRoleCredentialProvider {
    /// Create a new assume role loader.
    pub fn new(
        role_arn: impl Into<String>,
        base: impl ProvideCredential<Credential = Credential>,
    ) -> Self {
        Self {
            role_arn: role_arn.into(),
            role_session_name: "spapi".to_string(),
            duration_seconds: 3600,
            region: None,
            use_regional_sts_endpoint: false,
            endpoint: None,
            base: Arc::new(base),
        }
    }

    /// Set the role session name.
    pub fn with_role_session_name(mut self, name: impl Into<String>) -> Self {
        self.role_session_name = name.into();
        self
    }

    /// Set the duration in seconds.
    pub fn with_duration_seconds(mut self, seconds: u32) -> Self {
        self.duration_seconds = seconds;
        self
    }

    /// Set the region used to sign the STS call.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Use regional STS endpoint.
    pub fn with_regional_sts_endpoint(mut self) -> Self {
        self.use_regional_sts_endpoint = true;
        self
    }

    /// Override the STS endpoint, e.g. `https://sts.example.com`.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// The role this provider assumes.
    pub fn role_arn(&self) -> &str {
        &self.role_arn
    }

    fn with_role_context(&self, err: Error) -> Error {
        err.with_context(format!("role_arn: {}", self.role_arn))
            .with_context(format!("session_name: {}", self.role_session_name))
    }

    fn endpoint(&self) -> Result<String> {
        if let Some(endpoint) = &self.endpoint {
            return Ok(endpoint.trim_end_matches('/').to_string());
        }
        let host = sts_endpoint(self.region.as_deref(), self.use_regional_sts_endpoint)?;
        Ok(format!("https://{host}"))
    }

    async fn assume_role(&self, ctx: &Context) -> Result<Credential> {
        let base = match self.base.provide_credential(ctx).await {
            Ok(Some(cred)) => cred,
            Ok(None) => {
                return Err(Error::role_assumption(
                    "no base credentials available to assume role",
                ))
            }
            Err(err) => {
                return Err(Error::role_assumption("failed to load base credentials")
                    .with_source(err))
            }
        };

        let endpoint = self.endpoint()?;
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("Action", "AssumeRole")
            .append_pair("RoleArn", &self.role_arn)
            .append_pair("RoleSessionName", &self.role_session_name)
            .append_pair("DurationSeconds", &self.duration_seconds.to_string())
            .append_pair("Version", "2011-06-15")
            .finish();
        let url = format!("{endpoint}/?{query}");

        let req = http::Request::get(&url)
            .header(
                http::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(Bytes::new())?;

        let (mut parts, body) = req.into_parts();
        let region = self.region.as_deref().unwrap_or("us-east-1");
        RequestSigner::new(STS_SERVICE, region)
            .sign_request(ctx, &mut parts, &body, Some(&base))
            .await?;
        let req = http::Request::from_parts(parts, body);

        debug!("assuming role {} via {endpoint}", self.role_arn);
        let resp = ctx.http_send_as_string(req).await?;

        let status = resp.status();
        let request_id = resp
            .headers()
            .get(X_AMZN_REQUESTID)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        if status != http::StatusCode::OK {
            return Err(parse_sts_error(
                "AssumeRole",
                status,
                resp.body(),
                request_id.as_deref(),
            ));
        }

        let body = resp.into_body();
        let resp: AssumeRoleResponse = de::from_str(&body).map_err(|e| {
            Error::role_assumption("failed to parse STS AssumeRole response")
                .with_source(e)
                .with_context(format!("response_length: {}", body.len()))
        })?;
        let resp_cred = resp.result.credentials;
        if resp_cred.access_key_id.is_empty() || resp_cred.secret_access_key.is_empty() {
            return Err(Error::role_assumption(
                "STS AssumeRole response carries no credentials",
            )
            .with_body(body));
        }

        let expires_at = parse_rfc3339(resp_cred.expiration.trim()).map_err(|e| {
            Error::role_assumption("failed to parse AssumeRole credential expiration")
                .with_source(e)
                .with_context(format!("expiration_value: {}", resp_cred.expiration))
        })?;

        Ok(Credential {
            access_key_id: resp_cred.access_key_id.trim().to_string(),
            secret_access_key: resp_cred.secret_access_key.trim().to_string(),
            session_token: Some(resp_cred.session_token.trim().to_string()),
            expires_at: Some(expires_at),
        })
    }
}

#[async_trait]
impl ProvideCredential for AssumeRoleCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        match self.assume_role(ctx).await {
            Ok(cred) => Ok(Some(cred)),
            Err(err) if err.kind() == spapi_core::ErrorKind::RoleAssumption => {
                Err(self.with_role_context(err))
            }
            Err(err) => Err(self.with_role_context(
                Error::role_assumption("failed to assume role").with_source(err),
            )),
        }
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct AssumeRoleResponse {
    #[serde(rename = "AssumeRoleResult")]
    result: AssumeRoleResult,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct AssumeRoleResult {
    credentials: AssumeRoleCredentials,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct AssumeRoleCredentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
    expiration: String,
}
