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
use crate::Credential;
use async_trait::async_trait;
use ini::Ini;
use log::debug;
use spapi_core::{Context, Error, ProvideCredential, Result};

/// ProfileCredentialProvider loads the IAM user credentials from the shared AWS files.
///
/// This provider loads credentials from:
/// - `~/.aws/credentials` (or the path specified by `AWS_SHARED_CREDENTIALS_FILE`)
/// - `~/.aws/config` (or the path specified by `AWS_CONFIG_FILE`)
///
/// The profile to use is determined by:
/// 1. The `AWS_PROFILE` environment variable
/// 2. The profile specified via `with_profile()`
/// 3. Default to "default"
#[derive(Debug)]
pub struct ProfileCredentialProvider {
    profile: String,
    config_file: Option<String>,
    credentials_file: Option<String>,
}

impl Default for ProfileCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileCredentialProvider {
    /// Create a new ProfileCredentialProvider with default settings.
    pub fn new() -> Self {
        Self {
            profile: "default".to_string(),
            config_file: None,
            credentials_file: None,
        }
    }

    /// Set the profile name to use.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the path to the config file.
    pub fn with_config_file(mut self, path: impl Into<String>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Set the path to the credentials file.
    pub fn with_credentials_file(mut self, path: impl Into<String>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    /// Read and parse an ini file, `None` if it can't be located or read.
    async fn load_ini(&self, ctx: &Context, path: &str) -> Result<Option<Ini>> {
        let Some(expanded_path) = ctx.expand_home_dir(path) else {
            debug!("failed to expand homedir for path: {path}");
            return Ok(None);
        };

        let content = match ctx.file_read_as_string(&expanded_path).await {
            Ok(content) => content,
            Err(err) => {
                debug!("failed to read aws file {expanded_path}: {err}");
                return Ok(None);
            }
        };

        let conf = Ini::load_from_str(&content).map_err(|e| {
            Error::config_invalid("failed to parse aws profile file")
                .with_source(e)
                .with_context(format!("path: {expanded_path}"))
        })?;
        Ok(Some(conf))
    }

    async fn load_from_credentials_file(
        &self,
        ctx: &Context,
        profile: &str,
    ) -> Result<Option<Credential>> {
        let path = self
            .credentials_file
            .clone()
            .or_else(|| ctx.env_var(AWS_SHARED_CREDENTIALS_FILE))
            .unwrap_or_else(|| "~/.aws/credentials".to_string());

        let Some(conf) = self.load_ini(ctx, &path).await? else {
            return Ok(None);
        };

        Ok(credential_from_section(&conf, profile))
    }

    async fn load_from_config_file(
        &self,
        ctx: &Context,
        profile: &str,
    ) -> Result<Option<Credential>> {
        let path = self
            .config_file
            .clone()
            .or_else(|| ctx.env_var(AWS_CONFIG_FILE))
            .unwrap_or_else(|| "~/.aws/config".to_string());

        let Some(conf) = self.load_ini(ctx, &path).await? else {
            return Ok(None);
        };

        // Named profiles in the config file live under `[profile <name>]`.
        let section = match profile {
            "default" => "default".to_string(),
            x => format!("profile {x}"),
        };
        Ok(credential_from_section(&conf, &section))
    }
}

fn credential_from_section(conf: &Ini, section: &str) -> Option<Credential> {
    let Some(props) = conf.section(Some(section)) else {
        debug!("section {section} not found in aws profile file");
        return None;
    };

    match (
        props.get("aws_access_key_id"),
        props.get("aws_secret_access_key"),
    ) {
        (Some(ak), Some(sk)) => Some(Credential {
            access_key_id: ak.to_string(),
            secret_access_key: sk.to_string(),
            session_token: props.get("aws_session_token").map(|s| s.to_string()),
            expires_at: None,
        }),
        _ => None,
    }
}

#[async_trait]
impl ProvideCredential for ProfileCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let profile = ctx
            .env_var(AWS_PROFILE)
            .unwrap_or_else(|| self.profile.clone());

        // Try credentials file first
        if let Some(cred) = self.load_from_credentials_file(ctx, &profile).await? {
            return Ok(Some(cred));
        }

        // Then try config file
        self.load_from_config_file(ctx, &profile).await
    }
}
