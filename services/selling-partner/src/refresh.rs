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

use crate::authenticate::Authenticate;
use crate::constants::DEFAULT_REFRESH_SKEW_SECS;
use crate::token::{instant_after, Token, TokenStore};
use log::{debug, info, warn};
use spapi_core::{Context, Error, ErrorKind, Result};
use std::fmt::{self, Debug};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Never spin on a zero lifetime.
const MIN_REFRESH_PERIOD: Duration = Duration::from_secs(1);

/// State of the background refresh loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Not started, or stopped after the last refresh succeeded.
    Idle,
    /// The refresh loop is active and the last refresh succeeded.
    Running,
    /// The last background refresh failed. The next token read
    /// re-authenticates synchronously. Stopping the loop keeps this state.
    Degraded,
}

struct Status {
    running: bool,
    degraded: bool,
    last_error: Option<Arc<Error>>,
}

struct Shared {
    ctx: Context,
    authenticator: Arc<dyn Authenticate>,
    store: TokenStore,
    seed_refresh_token: String,

    /// Serializes every authenticate call so the last response commits last.
    refresh_lock: tokio::sync::Mutex<()>,
    status: Mutex<Status>,
}

impl Shared {
    fn state(&self) -> SchedulerState {
        let status = self.status.lock().expect("lock poisoned");
        if status.degraded {
            SchedulerState::Degraded
        } else if status.running {
            SchedulerState::Running
        } else {
            SchedulerState::Idle
        }
    }

    fn set_running(&self, running: bool) {
        self.status.lock().expect("lock poisoned").running = running;
    }

    /// Authenticate and commit the result. Callers must hold `refresh_lock`.
    async fn authenticate_locked(&self) -> Result<Token> {
        let refresh_token = self
            .store
            .get()
            .map(|t| t.refresh_token)
            .unwrap_or_else(|| self.seed_refresh_token.clone());

        let token = self
            .authenticator
            .authenticate(&self.ctx, &refresh_token)
            .await
            .map_err(|err| {
                if err.kind() == ErrorKind::Auth {
                    err
                } else {
                    Error::auth("failed to refresh access token").with_source(err)
                }
            })?;

        self.store.set(token.clone());
        Ok(token)
    }

    fn record_success(&self) {
        let mut status = self.status.lock().expect("lock poisoned");
        status.degraded = false;
        status.last_error = None;
    }

    fn record_failure(&self, err: &Error) {
        // The source chain stays with the caller, keep the rendered parts.
        let mut recorded = Error::new(err.kind(), err.message());
        if let Some(status) = err.status() {
            recorded = recorded.with_status(status);
        }
        if let Some(body) = err.response_body() {
            recorded = recorded.with_body(body);
        }
        for context in err.context() {
            recorded = recorded.with_context(context.as_str());
        }
        if let Some(source) = std::error::Error::source(err) {
            recorded = recorded.with_context(format!("source: {source}"));
        }

        let mut status = self.status.lock().expect("lock poisoned");
        // A failed start leaves the scheduler idle.
        if status.running {
            status.degraded = true;
        }
        status.last_error = Some(Arc::new(recorded));
    }
}

/// RefreshScheduler keeps the bearer token fresh in the background.
///
/// - [`RefreshScheduler::start`] authenticates synchronously when no token is
///   known, then spawns a loop that refreshes `expires_in - skew` after each
///   token was received.
/// - A failed background refresh is logged, kept in
///   [`RefreshScheduler::last_error`] and moves the scheduler to
///   [`SchedulerState::Degraded`]. The next [`RefreshScheduler::token`] call
///   then re-authenticates before handing out a token.
/// - [`RefreshScheduler::stop`] cancels the loop and waits for it to exit.
///   A degraded scheduler stays degraded until a token read re-authenticates.
///   Dropping the scheduler cancels the loop as well.
pub struct RefreshScheduler {
    shared: Arc<Shared>,
    skew: Duration,
    task: Mutex<Option<(CancellationToken, JoinHandle<()>)>>,
}

impl Debug for RefreshScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("authenticator", &self.shared.authenticator)
            .field("store", &self.shared.store)
            .field("skew", &self.skew)
            .field("state", &self.state())
            .finish()
    }
}

impl RefreshScheduler {
    /// Create a new scheduler with the default refresh skew of 60s.
    ///
    /// `refresh_token` seeds the first exchange; once the token endpoint
    /// returns a refresh token it takes over.
    pub fn new(
        ctx: Context,
        authenticator: impl Authenticate,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self::with_authenticator(ctx, Arc::new(authenticator), refresh_token)
    }

    /// Create a new scheduler from a shared authenticator.
    pub fn with_authenticator(
        ctx: Context,
        authenticator: Arc<dyn Authenticate>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                ctx,
                authenticator,
                store: TokenStore::new(),
                seed_refresh_token: refresh_token.into(),
                refresh_lock: tokio::sync::Mutex::new(()),
                status: Mutex::new(Status {
                    running: false,
                    degraded: false,
                    last_error: None,
                }),
            }),
            skew: Duration::from_secs(DEFAULT_REFRESH_SKEW_SECS),
            task: Mutex::new(None),
        }
    }

    /// Set how long before expiry the background refresh fires.
    ///
    /// Tokens whose lifetime isn't longer than the skew are refreshed at expiry.
    pub fn with_refresh_skew(mut self, skew: Duration) -> Self {
        self.skew = skew;
        self
    }

    /// The token store written by this scheduler.
    pub fn store(&self) -> &TokenStore {
        &self.shared.store
    }

    /// The current state.
    pub fn state(&self) -> SchedulerState {
        self.shared.state()
    }

    /// The error of the last failed refresh, cleared by the next success.
    pub fn last_error(&self) -> Option<Arc<Error>> {
        self.shared
            .status
            .lock()
            .expect("lock poisoned")
            .last_error
            .clone()
    }

    /// Start the background loop.
    ///
    /// Authenticates first when no token is known yet and returns that error
    /// instead of starting. Calling `start` on a running scheduler is a no-op.
    pub async fn start(&self) -> Result<()> {
        if self.task.lock().expect("lock poisoned").is_some() {
            return Ok(());
        }

        let token = match self.shared.store.get() {
            Some(token) => token,
            None => self.refresh().await?,
        };

        let mut task = self.task.lock().expect("lock poisoned");
        if task.is_some() {
            return Ok(());
        }

        let cancel = CancellationToken::new();
        let period = refresh_period(&token, self.skew);
        let handle = tokio::spawn(run(
            self.shared.clone(),
            cancel.clone(),
            refresh_deadline(&token, self.skew),
            self.skew,
        ));
        *task = Some((cancel, handle));
        self.shared.set_running(true);

        debug!("refresh scheduler started, next refresh in {period:?}");
        Ok(())
    }

    /// Stop the background loop and wait for it to exit.
    ///
    /// An in-flight refresh finishes before this returns. Safe to call more
    /// than once and from any task.
    pub async fn stop(&self) {
        let task = self.task.lock().expect("lock poisoned").take();
        if let Some((cancel, handle)) = task {
            cancel.cancel();
            if let Err(err) = handle.await {
                warn!("refresh loop exited abnormally: {err}");
            }
            debug!("refresh scheduler stopped");
        }
        self.shared.set_running(false);
    }

    /// Force a token refresh now and commit the result.
    pub async fn refresh(&self) -> Result<Token> {
        let _guard = self.shared.refresh_lock.lock().await;
        match self.shared.authenticate_locked().await {
            Ok(token) => {
                self.shared.record_success();
                Ok(token)
            }
            Err(err) => {
                self.shared.record_failure(&err);
                Err(err)
            }
        }
    }

    /// Get a token that is safe to use right now.
    ///
    /// Returns the stored token unless it has expired or the scheduler is
    /// degraded, in which case it re-authenticates first. A stale token is
    /// never handed out.
    pub async fn token(&self) -> Result<Token> {
        if let Some(token) = self.usable_token() {
            return Ok(token);
        }

        let _guard = self.shared.refresh_lock.lock().await;
        // Someone else may have refreshed while we waited for the lock.
        if let Some(token) = self.usable_token() {
            return Ok(token);
        }

        debug!("no usable token, re-authenticating");
        match self.shared.authenticate_locked().await {
            Ok(token) => {
                self.shared.record_success();
                info!("access token re-authenticated");
                Ok(token)
            }
            Err(err) => {
                self.shared.record_failure(&err);
                Err(err)
            }
        }
    }

    fn usable_token(&self) -> Option<Token> {
        if self.state() == SchedulerState::Degraded {
            return None;
        }
        self.shared.store.get().filter(|t| !t.is_expired())
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        if let Ok(mut task) = self.task.lock() {
            if let Some((cancel, _)) = task.take() {
                cancel.cancel();
            }
        }
    }
}

/// Time between receiving `token` and refreshing it.
fn refresh_period(token: &Token, skew: Duration) -> Duration {
    let period = if token.expires_in > skew {
        token.expires_in - skew
    } else {
        token.expires_in
    };
    period.max(MIN_REFRESH_PERIOD)
}

fn refresh_deadline(token: &Token, skew: Duration) -> Instant {
    instant_after(token.issued_at(), refresh_period(token, skew))
}

async fn run(
    shared: Arc<Shared>,
    cancel: CancellationToken,
    mut deadline: Instant,
    skew: Duration,
) {
    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep_until(deadline) => {}
        }

        // A synchronous re-auth may have refreshed the token already.
        if let Some(token) = shared.store.get() {
            let due = refresh_deadline(&token, skew);
            if shared.state() != SchedulerState::Degraded && due > Instant::now() {
                deadline = due;
                continue;
            }
        }

        let _guard = shared.refresh_lock.lock().await;
        deadline = match shared.authenticate_locked().await {
            Ok(token) => {
                shared.record_success();
                let period = refresh_period(&token, skew);
                info!("access token refreshed, next refresh in {period:?}");
                refresh_deadline(&token, skew)
            }
            Err(err) => {
                warn!("failed to refresh access token in background: {err}");
                // Retry after the last known lifetime; callers re-auth meanwhile.
                let period = shared
                    .store
                    .get()
                    .map(|t| refresh_period(&t, skew))
                    .unwrap_or(MIN_REFRESH_PERIOD);
                shared.record_failure(&err);
                instant_after(Instant::now(), period)
            }
        };
    }
}
