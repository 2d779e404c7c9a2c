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

//! Signed, auto-refreshing client for the Amazon Selling Partner API.
//!
//! `spapi` bundles the pieces of this workspace:
//!
//! - [`ApiClient`]: the inventory summaries and orders operations, with the
//!   access token kept fresh in the background and every call signed with
//!   credentials of an assumed IAM role.
//! - [`aws`]: SigV4 signing and AWS credential providers.
//! - The core [`Context`] and [`Error`] types.
//!
//! With the `default-context` feature (on by default) [`from_env`] builds a
//! ready client from `SPAPI_*` and `AWS_*` env values.
//!
//! ```no_run
//! # async fn example() -> spapi::Result<()> {
//! let client = spapi::from_env().await?;
//! let orders = client.get_orders(None).await?;
//! println!("{} orders", orders.payload.map(|p| p.orders.len()).unwrap_or_default());
//! client.stop().await;
//! # Ok(())
//! # }
//! ```

pub use spapi_core::*;
pub use spapi_selling_partner::*;

/// AWS SigV4 signing and credential providers.
pub mod aws {
    pub use spapi_aws_v4::*;
}

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::{default_context, from_env};

/// Build a client from the config found in `ctx`'s env.
pub async fn connect(ctx: Context) -> Result<ApiClient> {
    let config = Config::default().from_env(&ctx);
    ApiClient::new(ctx, config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_connect_without_config() {
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: HashMap::new(),
        });

        let err = connect(ctx).await.expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[tokio::test]
    async fn test_connect_missing_role() {
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: HashMap::from_iter([
                (SPAPI_CLIENT_ID.to_string(), "id".to_string()),
                (SPAPI_CLIENT_SECRET.to_string(), "secret".to_string()),
                (SPAPI_REFRESH_TOKEN.to_string(), "Atzr|seed".to_string()),
            ]),
        });

        let err = connect(ctx).await.expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(err.message(), "role_arn is required");
    }
}
