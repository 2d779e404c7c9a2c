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

use crate::constants::*;
use spapi_core::utils::Redact;
use spapi_core::{Context, Error, Result};
use std::fmt::{Debug, Formatter};
use std::time::Duration;

/// Deployment environment, selects the API host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Live host.
    Production,
    /// Live host as well, for development accounts.
    Development,
    /// Sandbox host with static responses.
    #[default]
    Sandbox,
}

impl Environment {
    /// Parse an `APP_ENV` style value.
    ///
    /// `prod` and `dev` select the live host, anything else falls back to
    /// the sandbox.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Environment::Production,
            "dev" | "development" => Environment::Development,
            _ => Environment::Sandbox,
        }
    }

    /// The API base url of this environment.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Environment::Production | Environment::Development => LIVE_ENDPOINT,
            Environment::Sandbox => SANDBOX_ENDPOINT,
        }
    }
}

/// Config carries all the configuration for the Selling Partner API client.
///
/// Build it by hand, or start from `Config::default()` and call
/// [`Config::from_env`]. The config never changes once a client is built.
#[derive(Clone)]
pub struct Config {
    /// `client_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SPAPI_CLIENT_ID`]
    pub client_id: Option<String>,
    /// `client_secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SPAPI_CLIENT_SECRET`]
    pub client_secret: Option<String>,
    /// `refresh_token` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SPAPI_REFRESH_TOKEN`]
    ///
    /// Only the seed: a refresh token returned by the token endpoint replaces it.
    pub refresh_token: Option<String>,
    /// `role_arn` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SPAPI_ROLE_ARN`]
    pub role_arn: Option<String>,
    /// `role_session_name` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SPAPI_ROLE_SESSION_NAME`]
    /// - default to `spapi`
    pub role_session_name: Option<String>,
    /// `environment` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`APP_ENV`]
    /// - default to [`Environment::Sandbox`]
    pub environment: Option<Environment>,
    /// `endpoint` overrides the host selected by `environment`.
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SPAPI_ENDPOINT`]
    pub endpoint: Option<String>,
    /// `region` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SPAPI_REGION`]
    /// - default to `us-east-1`
    pub region: Option<String>,
    /// `marketplace_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SPAPI_MARKETPLACE_ID`]
    /// - default to `ATVPDKIKX0DER`
    pub marketplace_id: Option<String>,
    /// Login with Amazon token endpoint.
    pub token_endpoint: String,
    /// User agent sent on every API call.
    pub user_agent: String,
    /// How long before the token expires the background refresh fires.
    pub refresh_skew: Duration,
    /// Deadline applied to every API call.
    pub timeout: Option<Duration>,
    /// Reuse assumed role credentials until two minutes before they expire.
    ///
    /// Disabled by default: every signed call performs its own AssumeRole.
    pub cache_role_credentials: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            refresh_token: None,
            role_arn: None,
            role_session_name: None,
            environment: None,
            endpoint: None,
            region: None,
            marketplace_id: None,
            token_endpoint: DEFAULT_TOKEN_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            refresh_skew: Duration::from_secs(DEFAULT_REFRESH_SKEW_SECS),
            timeout: None,
            cache_role_credentials: false,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &Redact::from(&self.client_secret))
            .field("refresh_token", &Redact::from(&self.refresh_token))
            .field("role_arn", &self.role_arn)
            .field("role_session_name", &self.role_session_name)
            .field("environment", &self.environment)
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("marketplace_id", &self.marketplace_id)
            .field("token_endpoint", &self.token_endpoint)
            .field("user_agent", &self.user_agent)
            .field("refresh_skew", &self.refresh_skew)
            .field("timeout", &self.timeout)
            .field("cache_role_credentials", &self.cache_role_credentials)
            .finish()
    }
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(SPAPI_CLIENT_ID) {
            self.client_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SPAPI_CLIENT_SECRET) {
            self.client_secret.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SPAPI_REFRESH_TOKEN) {
            self.refresh_token.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SPAPI_ROLE_ARN) {
            self.role_arn.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SPAPI_ROLE_SESSION_NAME) {
            self.role_session_name.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(APP_ENV) {
            self.environment.get_or_insert(Environment::parse(&v));
        }
        if let Some(v) = ctx.env_var(SPAPI_ENDPOINT) {
            self.endpoint.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SPAPI_REGION) {
            self.region.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SPAPI_MARKETPLACE_ID) {
            self.marketplace_id.get_or_insert(v);
        }

        self
    }

    /// Check that everything needed to build a client is present.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("refresh_token", &self.refresh_token),
            ("role_arn", &self.role_arn),
        ];
        for (name, value) in required {
            if value.as_deref().map_or(true, str::is_empty) {
                return Err(Error::config_invalid(format!("{name} is required")));
            }
        }

        let base_url = self.base_url();
        let uri: http::Uri = base_url.parse().map_err(|e| {
            Error::config_invalid("api endpoint is not a valid url")
                .with_source(e)
                .with_context(format!("endpoint: {base_url}"))
        })?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(Error::config_invalid("api endpoint must be an absolute url")
                .with_context(format!("endpoint: {base_url}")));
        }

        Ok(())
    }

    /// The API base url, without trailing slash.
    ///
    /// An explicit `endpoint` wins over the host picked by `environment`.
    pub fn base_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => self.environment.unwrap_or_default().endpoint().to_string(),
        }
    }

    /// The signing and STS region.
    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    /// The marketplace used by both endpoints.
    pub fn marketplace_id(&self) -> &str {
        self.marketplace_id
            .as_deref()
            .unwrap_or(DEFAULT_MARKETPLACE_ID)
    }

    /// The session name used for role assumption.
    pub fn role_session_name(&self) -> &str {
        self.role_session_name
            .as_deref()
            .unwrap_or(DEFAULT_ROLE_SESSION_NAME)
    }
}
