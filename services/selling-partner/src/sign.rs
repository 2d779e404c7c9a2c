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

use crate::Config;
use log::debug;
use spapi_aws_v4::{
    AssumeRoleCredentialProvider, Credential, DefaultCredentialProvider, RequestSigner,
    EXECUTE_API_SERVICE,
};
use spapi_core::{
    Context, Error, ErrorKind, ProvideCredential, Result, SignRequest, SigningCredential,
};
use std::fmt::{self, Debug};
use std::sync::Arc;

/// RoleSigner signs API requests with the credentials of an assumed IAM role.
///
/// Every [`RoleSigner::sign`] assumes the role again unless caching was
/// enabled with [`RoleSigner::with_cache`]. A failure to obtain role
/// credentials is a [`ErrorKind::Signing`] error wrapping the
/// [`ErrorKind::RoleAssumption`] cause, and the request is left untouched.
pub struct RoleSigner {
    provider: Arc<dyn ProvideCredential<Credential = Credential>>,
    signer: RequestSigner,
    cache: Option<tokio::sync::Mutex<Option<Credential>>>,
}

impl Debug for RoleSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoleSigner")
            .field("provider", &self.provider)
            .field("signer", &self.signer)
            .field("cache", &self.cache.is_some())
            .finish()
    }
}

impl RoleSigner {
    /// Create a signer that gets its credentials from `provider`.
    pub fn new(
        provider: impl ProvideCredential<Credential = Credential>,
        signer: RequestSigner,
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            signer,
            cache: None,
        }
    }

    /// Create a signer assuming `config.role_arn` with the ambient base credentials.
    pub fn from_config(config: &Config) -> Self {
        let provider = AssumeRoleCredentialProvider::new(
            config.role_arn.clone().unwrap_or_default(),
            DefaultCredentialProvider::new(),
        )
        .with_role_session_name(config.role_session_name())
        .with_region(config.region());

        Self::new(
            provider,
            RequestSigner::new(EXECUTE_API_SERVICE, config.region()),
        )
        .with_cache(config.cache_role_credentials)
    }

    /// Reuse role credentials until two minutes before they expire.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(|| tokio::sync::Mutex::new(None));
        self
    }

    async fn assume(&self, ctx: &Context) -> Result<Credential> {
        match self.provider.provide_credential(ctx).await? {
            Some(cred) => Ok(cred),
            None => Err(Error::role_assumption("no role credentials returned")),
        }
    }

    async fn credential(&self, ctx: &Context) -> Result<Credential> {
        let Some(cache) = &self.cache else {
            return self.assume(ctx).await;
        };

        let mut cached = cache.lock().await;
        if let Some(cred) = cached.as_ref().filter(|c| c.is_valid()) {
            debug!("reusing cached role credential");
            return Ok(cred.clone());
        }
        let cred = self.assume(ctx).await?;
        *cached = Some(cred.clone());
        Ok(cred)
    }

    /// Sign the request in place.
    ///
    /// `body` is only hashed, callers send the same bytes afterwards.
    pub async fn sign(
        &self,
        ctx: &Context,
        parts: &mut http::request::Parts,
        body: &[u8],
    ) -> Result<()> {
        let cred = self.credential(ctx).await.map_err(|err| {
            Error::signing("failed to obtain role credentials").with_source(err)
        })?;

        self.signer
            .sign_request(ctx, parts, body, Some(&cred))
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::Signing => err,
                _ => Error::signing("failed to sign request").with_source(err),
            })
    }
}
