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

//! Selling Partner API client.
//!
//! This crate keeps a Login with Amazon access token fresh in the background,
//! signs every call with SigV4 using credentials of an assumed IAM role and
//! exposes the inventory summaries and orders operations.
//!
//! ## Example
//!
//! ```no_run
//! use spapi_core::{Context, Result};
//! use spapi_selling_partner::{ApiClient, Config};
//!
//! # async fn example(ctx: Context) -> Result<()> {
//! let config = Config::default().from_env(&ctx);
//! let client = ApiClient::new(ctx, config).await?;
//!
//! let inventory = client.get_inventory_summaries(None).await?;
//! for summary in inventory.payload.iter().flat_map(|p| &p.inventory_summaries) {
//!     println!("{}: {}", summary.seller_sku, summary.total_quantity);
//! }
//!
//! client.stop().await;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;
pub use constants::{
    APP_ENV, DEFAULT_MARKETPLACE_ID, DEFAULT_REGION, DEFAULT_TOKEN_ENDPOINT, DEFAULT_USER_AGENT,
    LIVE_ENDPOINT, SANDBOX_ENDPOINT, SPAPI_CLIENT_ID, SPAPI_CLIENT_SECRET, SPAPI_ENDPOINT,
    SPAPI_MARKETPLACE_ID, SPAPI_REFRESH_TOKEN, SPAPI_REGION, SPAPI_ROLE_ARN,
    SPAPI_ROLE_SESSION_NAME, X_AMZ_ACCESS_TOKEN,
};

mod config;
pub use config::{Config, Environment};

mod token;
pub use token::{Token, TokenStore};

mod authenticate;
pub use authenticate::{Authenticate, LwaAuthenticator};

mod refresh;
pub use refresh::{RefreshScheduler, SchedulerState};

mod sign;
pub use sign::RoleSigner;

mod build;
pub use build::RequestBuilder;

mod client;
pub use client::ApiClient;

#[allow(missing_docs)]
pub mod models;
