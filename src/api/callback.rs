use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{spotify, types::PkceToken, warning};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<PkceToken>>>>,
) -> Html<&'static str> {
    if let Some(error) = params.get("error") {
        warning!("Authorization denied: {}", error);
        return Html("<h4>Authorization denied.</h4>");
    }

    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let verifier = match shared_state.lock().await.as_ref() {
        Some(pkce_state) => pkce_state.code_verifier.clone(),
        None => return Html("<h4>Missing PKCE code verifier.</h4>"),
    };

    match spotify::auth::exchange_code_pkce(code, &verifier).await {
        Ok(token) => {
            if let Some(pkce_state) = shared_state.lock().await.as_mut() {
                pkce_state.token = Some(token);
            }
            Html("<h2>Authentication successful.</h2><p>You can close this browser window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            Html("<h4>Login failed.</h4>")
        }
    }
}
