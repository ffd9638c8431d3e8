use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    config,
    error::{Error, Res},
    management::TokenManager,
    server::start_api_server,
    types::{PkceToken, Token, TokenResponse},
    utils, warning,
};

/// Runs the authorization-code flow with PKCE and stores the token.
///
/// 1. Generates the code verifier and its S256 challenge
/// 2. Starts the local callback server
/// 3. Opens the authorization URL in the browser
/// 4. Waits up to 60 seconds for the callback to exchange the code
/// 5. Persists the token through [`TokenManager`]
pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Res<Token> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let auth_url = authorize_url(
        &config::spotify_apiauth_url(),
        &config::spotify_client_id()?,
        &config::spotify_redirect_uri()?,
        &code_challenge,
        &config::spotify_scope(),
    )?;

    // Store verifier in shared state before redirect
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier,
            token: None,
        });
    }

    let server_state = Arc::clone(&shared_state);
    let addr = config::server_addr()?;
    let server = tokio::spawn(async move { start_api_server(&addr, server_state).await });

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = wait_for_token(shared_state, &server).await;
    server.abort();

    let token = token?;
    TokenManager::new(token.clone()).persist().await?;
    Ok(token)
}

/// Authorization endpoint URL with all PKCE parameters encoded.
pub fn authorize_url(
    base: &str,
    client_id: &str,
    redirect_uri: &str,
    code_challenge: &str,
    scope: &str,
) -> Res<String> {
    let url = reqwest::Url::parse_with_params(
        base,
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
            ("scope", scope),
            ("show_dialog", "true"),
        ],
    )
    .map_err(|e| Error::Config(format!("invalid authorization url '{}': {}", base, e)))?;
    Ok(url.to_string())
}

/// Polls the shared state once a second until the callback stored a token.
/// Gives up after 60 seconds or when the callback server stopped.
async fn wait_for_token(
    shared_state: Arc<Mutex<Option<PkceToken>>>,
    server: &tokio::task::JoinHandle<Res<()>>,
) -> Res<Token> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        {
            let lock = shared_state.lock().await;
            if let Some(token) = lock.as_ref().and_then(|p| p.token.as_ref()) {
                return Ok(token.clone());
            }
        }
        if server.is_finished() {
            return Err(Error::AuthFailure(
                "callback server stopped before authorization completed".to_string(),
            ));
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    Err(Error::AuthFailure(
        "authorization timed out after 60 seconds".to_string(),
    ))
}

/// Exchanges a refresh token for a new access token.
///
/// Spotify may or may not rotate the refresh token; when the response does
/// not carry one the old token stays in use.
pub async fn refresh_token(refresh_token: &str) -> Res<Token> {
    if refresh_token.is_empty() {
        return Err(Error::AuthFailure(
            "no refresh token available, run setlistify auth".to_string(),
        ));
    }

    let client_id = config::spotify_client_id()?;
    let res = Client::new()
        .post(config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id.as_str()),
        ])
        .send()
        .await?;

    let token = token_from_response(res, Some(refresh_token)).await?;
    debug!(expires_in = token.expires_in, "token refreshed");
    Ok(token)
}

/// Exchanges the authorization code from the callback for a token, proving
/// possession of the PKCE `verifier`.
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Res<Token> {
    let client_id = config::spotify_client_id()?;
    let redirect_uri = config::spotify_redirect_uri()?;

    let res = Client::new()
        .post(config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await?;

    token_from_response(res, None).await
}

async fn token_from_response(
    res: reqwest::Response,
    previous_refresh_token: Option<&str>,
) -> Res<Token> {
    let status = res.status();
    if !status.is_success() {
        let body: serde_json::Value = res.json().await.unwrap_or_default();
        let reason = body["error_description"]
            .as_str()
            .or_else(|| body["error"].as_str())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error"));
        return Err(Error::AuthFailure(format!(
            "token endpoint answered {}: {}",
            status.as_u16(),
            reason
        )));
    }

    let json: TokenResponse = res.json().await?;
    let refresh_token = json
        .refresh_token
        .or_else(|| previous_refresh_token.map(str::to_string))
        .unwrap_or_default();

    Ok(Token {
        access_token: json.access_token,
        refresh_token,
        scope: json.scope.unwrap_or_default(),
        expires_in: json.expires_in.unwrap_or(3600),
        obtained_at: Utc::now().timestamp() as u64,
    })
}
