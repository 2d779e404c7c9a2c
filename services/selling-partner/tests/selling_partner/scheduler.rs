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

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use spapi_core::{Context, Error, ErrorKind, Result};
use spapi_selling_partner::{Authenticate, RefreshScheduler, SchedulerState, Token};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// SlowAuthenticator takes `delay` per exchange and records how many
/// exchanges overlap.
#[derive(Debug, Clone, Default)]
struct SlowAuthenticator {
    delay: Duration,
    expires_in: u64,
    calls: Arc<AtomicUsize>,
    active: Arc<AtomicUsize>,
    max_active: Arc<AtomicUsize>,
    refresh_tokens: Arc<Mutex<Vec<String>>>,
}

impl SlowAuthenticator {
    fn new(delay: Duration, expires_in: u64) -> Self {
        Self {
            delay,
            expires_in,
            ..Default::default()
        }
    }
}

#[async_trait]
impl Authenticate for SlowAuthenticator {
    async fn authenticate(&self, _: &Context, refresh_token: &str) -> Result<Token> {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);
        self.refresh_tokens
            .lock()
            .unwrap()
            .push(refresh_token.to_string());

        tokio::time::sleep(self.delay).await;

        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(Token::new(
            format!("Atza|{n}"),
            "bearer",
            format!("Atzr|{n}"),
            Duration::from_secs(self.expires_in),
        ))
    }
}

#[derive(Debug)]
struct TransportFailure;

#[async_trait]
impl Authenticate for TransportFailure {
    async fn authenticate(&self, _: &Context, _: &str) -> Result<Token> {
        Err(Error::transport("connection reset"))
    }
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_refreshes_commit_in_order() -> anyhow::Result<()> {
    let auth = SlowAuthenticator::new(Duration::from_millis(100), 3600);
    let scheduler = Arc::new(RefreshScheduler::new(
        Context::new(),
        auth.clone(),
        "Atzr|seed",
    ));

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.refresh().await })
        })
        .collect();
    for handle in handles {
        handle.await??;
    }

    assert_eq!(auth.calls.load(Ordering::SeqCst), 5);
    assert_eq!(auth.max_active.load(Ordering::SeqCst), 1);
    assert_eq!(scheduler.store().access_token().as_deref(), Some("Atza|5"));

    // Each exchange used the refresh token committed by the one before it.
    assert_eq!(
        *auth.refresh_tokens.lock().unwrap(),
        vec!["Atzr|seed", "Atzr|1", "Atzr|2", "Atzr|3", "Atzr|4"]
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_waiting_readers_share_one_reauth() -> anyhow::Result<()> {
    let auth = SlowAuthenticator::new(Duration::from_millis(100), 3600);
    let scheduler = Arc::new(RefreshScheduler::new(
        Context::new(),
        auth.clone(),
        "Atzr|seed",
    ));

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.token().await })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await??.access_token, "Atza|1");
    }
    assert_eq!(auth.calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_short_lifetime_refreshes_at_expiry() -> anyhow::Result<()> {
    let auth = SlowAuthenticator::new(Duration::ZERO, 30);
    let scheduler = RefreshScheduler::new(Context::new(), auth.clone(), "Atzr|seed");
    scheduler.start().await?;

    tokio::time::sleep(Duration::from_secs(29)).await;
    assert_eq!(auth.calls.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(auth.calls.load(Ordering::SeqCst), 2);

    scheduler.stop().await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_stop_waits_for_inflight_refresh() -> anyhow::Result<()> {
    let auth = SlowAuthenticator::new(Duration::from_secs(10), 120);
    let scheduler = RefreshScheduler::new(Context::new(), auth.clone(), "Atzr|seed")
        .with_refresh_skew(Duration::from_secs(60));
    scheduler.start().await?;
    assert_eq!(auth.calls.load(Ordering::SeqCst), 1);

    // The initial exchange took 10s, so the loop fires 60s after it finished.
    tokio::time::sleep(Duration::from_secs(65)).await;
    assert_eq!(auth.active.load(Ordering::SeqCst), 1);

    scheduler.stop().await;
    assert_eq!(auth.active.load(Ordering::SeqCst), 0);
    assert_eq!(auth.calls.load(Ordering::SeqCst), 2);
    assert_eq!(scheduler.store().access_token().as_deref(), Some("Atza|2"));
    assert_eq!(scheduler.state(), SchedulerState::Idle);

    tokio::time::sleep(Duration::from_secs(3600)).await;
    assert_eq!(auth.calls.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test]
async fn test_start_failure_is_auth_error() {
    let scheduler = RefreshScheduler::new(Context::new(), TransportFailure, "Atzr|seed");

    let err = scheduler.start().await.expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::Auth);
    assert!(err.find_kind(ErrorKind::Transport).is_some());
    assert_eq!(scheduler.state(), SchedulerState::Idle);
    assert!(scheduler.last_error().is_some());
}
