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

use crate::{connect, ApiClient, Context, OsEnv, Result};
use reqwest::Client;
use spapi_file_read_tokio::TokioFileRead;
use spapi_http_send_reqwest::ReqwestHttpSend;

/// A context reading files with tokio, sending with a default reqwest
/// client and reading the process env.
pub fn default_context() -> Context {
    Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::new(Client::new()))
        .with_env(OsEnv)
}

/// Build a client from the process env.
///
/// Reads `SPAPI_CLIENT_ID`, `SPAPI_CLIENT_SECRET`, `SPAPI_REFRESH_TOKEN`,
/// `SPAPI_ROLE_ARN` and the optional `SPAPI_*` / `APP_ENV` values. Base AWS
/// credentials come from `AWS_*` env values or the shared profile files.
pub async fn from_env() -> Result<ApiClient> {
    connect(default_context()).await
}
