//! Access token state shared by every request of one run.
//!
//! Requests borrow the current token from a [`Session`]. When Spotify answers
//! 401 the session refreshes the token and repeats the request once. Refresh
//! is single-flight: the token carries a generation number, and a caller that
//! saw an older generation than the current one reuses the token somebody
//! else already refreshed instead of refreshing again. Concurrent searches
//! therefore cost one refresh call no matter how many of them hit the 401.

use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{Error, Res};

/// Source of access tokens.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Returns a token believed to be valid.
    async fn get_valid_token(&self) -> Res<String>;

    /// Forces a refresh. Fails when no refresh credential is available.
    async fn refresh_token(&self) -> Res<String>;
}

#[derive(Default)]
struct TokenState {
    access_token: Option<String>,
    generation: u64,
    // why the last refresh failed, shared with everyone who waited on it
    failure: Option<String>,
}

pub struct Session {
    provider: Arc<dyn AuthProvider>,
    state: Mutex<TokenState>,
}

impl Session {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            provider,
            state: Mutex::new(TokenState::default()),
        }
    }

    /// Current token and the generation it belongs to.
    async fn current(&self) -> Res<(String, u64)> {
        let mut state = self.state.lock().await;
        if let Some(token) = &state.access_token {
            return Ok((token.clone(), state.generation));
        }

        let token = self
            .provider
            .get_valid_token()
            .await
            .map_err(into_auth_failure)?;
        state.access_token = Some(token.clone());
        Ok((token, state.generation))
    }

    /// Refreshes the token unless it was already refreshed past `seen`.
    ///
    /// The state lock is held across the provider call, so callers arriving
    /// during a refresh wait for it and then take the branch that reuses the
    /// new token.
    async fn refresh(&self, seen: u64) -> Res<String> {
        let mut state = self.state.lock().await;
        if state.generation != seen {
            if let Some(token) = &state.access_token {
                debug!(generation = state.generation, "reusing refreshed token");
                return Ok(token.clone());
            }
            if let Some(reason) = &state.failure {
                return Err(Error::AuthFailure(reason.clone()));
            }
        }

        info!(generation = seen, "access token expired, refreshing");
        state.generation = seen + 1;
        match self.provider.refresh_token().await {
            Ok(token) => {
                state.access_token = Some(token.clone());
                state.failure = None;
                Ok(token)
            }
            Err(e) => {
                let err = into_auth_failure(e);
                state.access_token = None;
                state.failure = Some(match &err {
                    Error::AuthFailure(reason) => reason.clone(),
                    other => other.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Runs `op` with the current token, refreshing and retrying once when it
    /// fails with [`Error::AuthExpired`].
    ///
    /// A second `AuthExpired` after the refresh becomes
    /// [`Error::AuthFailure`]; every other error is returned untouched.
    pub async fn call<T, F, Fut>(&self, op: F) -> Res<T>
    where
        F: Fn(String) -> Fut + Send + Sync,
        Fut: Future<Output = Res<T>> + Send,
        T: Send,
    {
        let (token, generation) = self.current().await?;
        match op(token).await {
            Err(Error::AuthExpired) => {
                let token = self.refresh(generation).await?;
                match op(token).await {
                    Err(Error::AuthExpired) => Err(Error::AuthFailure(
                        "access token rejected after refresh".to_string(),
                    )),
                    other => other,
                }
            }
            other => other,
        }
    }
}

fn into_auth_failure(err: Error) -> Error {
    match err {
        Error::AuthFailure(_) => err,
        other => Error::AuthFailure(other.to_string()),
    }
}
