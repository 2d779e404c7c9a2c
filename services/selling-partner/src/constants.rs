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

/// Env name of the Login with Amazon client id.
pub const SPAPI_CLIENT_ID: &str = "SPAPI_CLIENT_ID";
/// Env name of the Login with Amazon client secret.
pub const SPAPI_CLIENT_SECRET: &str = "SPAPI_CLIENT_SECRET";
/// Env name of the refresh token seed.
pub const SPAPI_REFRESH_TOKEN: &str = "SPAPI_REFRESH_TOKEN";
/// Env name of the IAM role to assume.
pub const SPAPI_ROLE_ARN: &str = "SPAPI_ROLE_ARN";
/// Env name of the role session name.
pub const SPAPI_ROLE_SESSION_NAME: &str = "SPAPI_ROLE_SESSION_NAME";
/// Env name of the signing region.
pub const SPAPI_REGION: &str = "SPAPI_REGION";
/// Env name of the marketplace id.
pub const SPAPI_MARKETPLACE_ID: &str = "SPAPI_MARKETPLACE_ID";
/// Env name of the API endpoint override.
pub const SPAPI_ENDPOINT: &str = "SPAPI_ENDPOINT";
/// Env name selecting the deployment environment.
pub const APP_ENV: &str = "APP_ENV";

/// Live API host.
pub const LIVE_ENDPOINT: &str = "https://sellingpartnerapi-na.amazon.com";
/// Sandbox API host.
pub const SANDBOX_ENDPOINT: &str = "https://sandbox.sellingpartnerapi-na.amazon.com";

/// Login with Amazon token endpoint.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://api.amazon.com/auth/o2/token";
/// US marketplace.
pub const DEFAULT_MARKETPLACE_ID: &str = "ATVPDKIKX0DER";
/// Region of the North America endpoint.
pub const DEFAULT_REGION: &str = "us-east-1";
/// Session name of the assumed role when none is configured.
pub const DEFAULT_ROLE_SESSION_NAME: &str = "spapi";
/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "spapi-rs/",
    env!("CARGO_PKG_VERSION"),
    " (Language=Rust)"
);
/// How long before expiry the access token is refreshed.
pub const DEFAULT_REFRESH_SKEW_SECS: u64 = 60;

/// Header carrying the access token on every API call.
pub const X_AMZ_ACCESS_TOKEN: &str = "x-amz-access-token";

/// Path of the FBA inventory summaries operation.
pub const INVENTORY_SUMMARIES_PATH: &str = "/fba/inventory/v1/summaries";
/// Path of the orders operation.
pub const ORDERS_PATH: &str = "/orders/v0/orders";
