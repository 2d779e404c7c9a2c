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

use chrono::TimeDelta;
use serde::Deserialize;
use spapi_core::time::{now, DateTime};
use spapi_core::utils::Redact;
use std::fmt::{self, Debug};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::time::Instant;

/// Upper bound for any deadline, about 30 years.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// `at + after`, capped so a huge lifetime can't overflow the clock.
pub(crate) fn instant_after(at: Instant, after: Duration) -> Instant {
    at.checked_add(after.min(FAR_FUTURE)).unwrap_or(at)
}

/// Token is the bearer credential issued by Login with Amazon.
///
/// The lifetime is tracked on the tokio clock so refresh deadlines and
/// freshness checks agree with each other.
#[derive(Clone)]
pub struct Token {
    /// The access token sent as `x-amz-access-token`.
    pub access_token: String,
    /// The token type, usually `bearer`.
    pub token_type: String,
    /// The refresh token to use for the next exchange.
    pub refresh_token: String,
    /// Lifetime as announced by the token endpoint.
    pub expires_in: Duration,
    /// Wall clock expiry, for display.
    pub expires_at: DateTime,

    issued_at: Instant,
}

impl Token {
    /// Create a token issued right now.
    pub fn new(
        access_token: impl Into<String>,
        token_type: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: Duration,
    ) -> Self {
        let expires_at = TimeDelta::from_std(expires_in)
            .ok()
            .and_then(|d| now().checked_add_signed(d))
            .unwrap_or(DateTime::MAX_UTC);

        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
            refresh_token: refresh_token.into(),
            expires_in,
            expires_at,
            issued_at: Instant::now(),
        }
    }

    /// The instant this token was received.
    pub fn issued_at(&self) -> Instant {
        self.issued_at
    }

    /// The instant this token stops being accepted.
    pub fn deadline(&self) -> Instant {
        instant_after(self.issued_at, self.expires_in)
    }

    /// Whether the token has reached its expiry.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline()
    }
}

impl Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &Redact::from(&self.access_token))
            .field("token_type", &self.token_type)
            .field("refresh_token", &Redact::from(&self.refresh_token))
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Token response returned by the token endpoint.
#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl TokenResponse {
    /// Convert into a token, keeping `previous_refresh_token` when the
    /// endpoint didn't rotate it.
    pub fn into_token(self, previous_refresh_token: &str) -> Token {
        let refresh_token = self
            .refresh_token
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| previous_refresh_token.to_string());

        Token::new(
            self.access_token,
            self.token_type,
            refresh_token,
            Duration::from_secs(self.expires_in),
        )
    }
}

/// TokenStore holds the current bearer token.
///
/// Writers swap the whole token at once, so readers never see an access
/// token paired with another token's expiry.
#[derive(Clone, Default)]
pub struct TokenStore {
    token: Arc<RwLock<Option<Token>>>,
}

impl TokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of the current token.
    pub fn get(&self) -> Option<Token> {
        self.token.read().expect("lock poisoned").clone()
    }

    /// Replace the current token.
    pub fn set(&self, token: Token) {
        *self.token.write().expect("lock poisoned") = Some(token);
    }

    /// Get the current access token.
    pub fn access_token(&self) -> Option<String> {
        self.token
            .read()
            .expect("lock poisoned")
            .as_ref()
            .map(|t| t.access_token.clone())
    }
}

impl Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("token", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_token_response_keeps_refresh_token() {
        let resp: TokenResponse = serde_json::from_str(
            r#"{"access_token":"Atza|new","token_type":"bearer","expires_in":3600}"#,
        )
        .expect("must decode");

        let token = resp.into_token("Atzr|seed");
        assert_eq!(token.access_token, "Atza|new");
        assert_eq!(token.refresh_token, "Atzr|seed");
        assert_eq!(token.expires_in, Duration::from_secs(3600));
    }

    #[test]
    fn test_token_response_rotates_refresh_token() {
        let resp: TokenResponse = serde_json::from_str(
            r#"{"access_token":"Atza|new","token_type":"bearer","expires_in":3600,"refresh_token":"Atzr|rotated"}"#,
        )
        .expect("must decode");

        assert_eq!(resp.into_token("Atzr|seed").refresh_token, "Atzr|rotated");
    }

    #[tokio::test(start_paused = true)]
    async fn test_token_expiry() {
        let token = Token::new("Atza|x", "bearer", "Atzr|x", Duration::from_secs(10));
        assert!(!token.is_expired());

        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(token.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_token_with_huge_lifetime() {
        let token = Token::new("Atza|x", "bearer", "Atzr|x", Duration::from_secs(u64::MAX));
        assert_eq!(token.expires_at, DateTime::MAX_UTC);
        assert!(token.deadline() > token.issued_at());
        assert!(!token.is_expired());

        tokio::time::advance(Duration::from_secs(86400 * 365)).await;
        assert!(!token.is_expired());
    }

    #[test]
    fn test_store_swaps_whole_token() {
        let store = TokenStore::new();
        assert!(store.get().is_none());

        store.set(Token::new("Atza|a", "bearer", "Atzr|a", Duration::from_secs(60)));
        store.set(Token::new("Atza|b", "bearer", "Atzr|b", Duration::from_secs(120)));

        let token = store.get().expect("token must be set");
        assert_eq!(token.access_token, "Atza|b");
        assert_eq!(token.refresh_token, "Atzr|b");
        assert_eq!(token.expires_in, Duration::from_secs(120));
        assert_eq!(store.access_token().as_deref(), Some("Atza|b"));
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let token = Token::new(
            "Atza|IwEBIExampleAccessToken",
            "bearer",
            "Atzr|IwEBIExampleRefreshToken",
            Duration::from_secs(60),
        );
        let s = format!("{token:?}");
        assert!(!s.contains("IwEBIExampleAccessToken"));
        assert!(!s.contains("IwEBIExampleRefreshToken"));
    }
}
