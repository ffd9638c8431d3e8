use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{error, info, spotify, success, types::PkceToken};

pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) {
    info!("Waiting for Spotify authorization in your browser...");
    match spotify::auth::auth(shared_state).await {
        Ok(token) => success!("Authentication successful! Granted scope: {}", token.scope),
        Err(e) => error!("Authentication failed: {}", e),
    }
}
