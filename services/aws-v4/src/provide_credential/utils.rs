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

use quick_xml::de;
use serde::Deserialize;
use spapi_core::{Error, Result};

/// Get the sts endpoint.
///
/// The returning format may look like `sts.{region}.amazonaws.com`
///
/// # Notes
///
/// AWS could have different sts endpoint based on it's region.
/// We can check them by region name.
///
/// ref: https://github.com/awslabs/aws-sdk-rust/blob/31cfae2cf23be0c68a47357070dea1aee9227e3a/sdk/sts/src/aws_endpoint.rs
pub fn sts_endpoint(region: Option<&str>, use_regional: bool) -> Result<String> {
    if use_regional {
        let region = region
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid("regional STS endpoint requires region"))?;
        if region.starts_with("cn-") {
            Ok(format!("sts.{region}.amazonaws.com.cn"))
        } else {
            Ok(format!("sts.{region}.amazonaws.com"))
        }
    } else {
        let region = region.unwrap_or_default();
        if region.starts_with("cn") {
            Ok("sts.amazonaws.com.cn".to_string())
        } else {
            Ok("sts.amazonaws.com".to_string())
        }
    }
}

/// Build a role assumption error out of a non-200 STS response.
///
/// STS answers with an `ErrorResponse` xml document. When the body can't be
/// parsed the raw body is kept so nothing gets lost.
pub fn parse_sts_error(
    action: &str,
    status: http::StatusCode,
    body: &str,
    request_id: Option<&str>,
) -> Error {
    let mut err = match de::from_str::<StsErrorResponse>(body) {
        Ok(resp) if !resp.error.code.is_empty() => Error::role_assumption(format!(
            "{action} returned {status}: {}: {}",
            resp.error.code,
            resp.error.message.trim()
        )),
        _ => Error::role_assumption(format!("{action} returned {status}")),
    };
    err = err.with_status(status).with_body(body);
    if let Some(request_id) = request_id {
        err = err.with_context(format!("request_id: {request_id}"));
    }
    err
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct StsErrorResponse {
    error: StsError,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct StsError {
    code: String,
    message: String,
}
