use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    config,
    error::{Error, Res},
    spotify::{self, session::AuthProvider},
    types::Token,
};

/// Seconds before expiry at which a token is already treated as expired.
const EXPIRY_MARGIN_SECS: u64 = 240;

/// The cached OAuth token, kept in `<data dir>/cache/token.json`.
pub struct TokenManager {
    token: Mutex<Token>,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager {
            token: Mutex::new(token),
        }
    }

    pub async fn load() -> Res<Self> {
        let path = Self::token_path();
        let content = async_fs::read_to_string(&path).await.map_err(|e| {
            Error::AuthFailure(format!(
                "cannot read token cache {} ({}), run setlistify auth",
                path.display(),
                e
            ))
        })?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self::new(token))
    }

    pub async fn persist(&self) -> Res<()> {
        let token = self.token.lock().await.clone();
        Self::write(&token).await
    }

    pub async fn current_token(&self) -> Token {
        self.token.lock().await.clone()
    }

    async fn write(token: &Token) -> Res<()> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(token)?;
        async_fs::write(&path, json).await?;
        Ok(())
    }

    /// Refreshes the held token and persists the result. A failed write only
    /// costs a refresh on the next run, so it is logged and not returned.
    async fn refresh_locked(token: &mut Token) -> Res<()> {
        let new_token = spotify::auth::refresh_token(&token.refresh_token).await?;
        *token = new_token;
        if let Err(e) = Self::write(token).await {
            warn!("failed to persist refreshed token: {}", e);
        }
        Ok(())
    }

    fn token_path() -> PathBuf {
        config::data_dir().join("cache/token.json")
    }
}

pub fn is_expired(token: &Token, now: u64) -> bool {
    now + EXPIRY_MARGIN_SECS >= token.obtained_at + token.expires_in
}

#[async_trait]
impl AuthProvider for TokenManager {
    async fn get_valid_token(&self) -> Res<String> {
        let mut token = self.token.lock().await;
        if is_expired(&token, Utc::now().timestamp() as u64) {
            debug!("cached token is about to expire, refreshing");
            Self::refresh_locked(&mut token).await?;
        }
        Ok(token.access_token.clone())
    }

    async fn refresh_token(&self) -> Res<String> {
        let mut token = self.token.lock().await;
        Self::refresh_locked(&mut token).await?;
        Ok(token.access_token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(obtained_at: u64, expires_in: u64) -> Token {
        Token {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            scope: String::new(),
            expires_in,
            obtained_at,
        }
    }

    #[test]
    fn token_expires_inside_margin() {
        let t = token(1_000, 3_600);
        assert!(!is_expired(&t, 1_000));
        assert!(!is_expired(&t, 4_359));
        assert!(is_expired(&t, 4_360));
    }

    #[tokio::test]
    async fn refresh_without_refresh_token_fails() {
        let mut t = token(0, 3_600);
        t.refresh_token = String::new();
        let manager = TokenManager::new(t);

        let result = manager.refresh_token().await;
        assert!(matches!(result, Err(Error::AuthFailure(_))));
    }
}
