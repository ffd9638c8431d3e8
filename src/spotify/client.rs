use std::sync::Arc;

use reqwest::{Client, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use crate::{
    config,
    error::{Error, Res},
    spotify::session::Session,
    types::CurrentUser,
};

/// Spotify Web API client. Every request goes through the [`Session`], so a
/// 401 on any endpoint gets the same refresh-and-retry-once treatment.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    base_url: String,
    session: Arc<Session>,
}

impl SpotifyClient {
    pub fn new(base_url: impl Into<String>, session: Arc<Session>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    /// Client for the configured `SPOTIFY_API_URL`.
    pub fn from_config(session: Arc<Session>) -> Self {
        Self::new(config::spotify_apiurl(), session)
    }

    /// The user the access token belongs to.
    pub async fn current_user(&self) -> Res<CurrentUser> {
        self.get_json("/me", &[]).await
    }

    pub(crate) async fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> Res<T>
    where
        T: DeserializeOwned + Send,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        self.session
            .call(|token| {
                let request = self.http.get(&url).query(query).bearer_auth(token);
                async move {
                    let response = check_status(request.send().await?).await?;
                    Ok(response.json::<T>().await?)
                }
            })
            .await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Res<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "POST");

        self.session
            .call(|token| {
                let request = self.http.post(&url).bearer_auth(token).json(body);
                async move {
                    let response = check_status(request.send().await?).await?;
                    Ok(response.json::<T>().await?)
                }
            })
            .await
    }
}

/// Maps 401 to [`Error::AuthExpired`] and other failures to [`Error::Api`].
async fn check_status(response: Response) -> Res<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::AuthExpired);
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::Api {
        status: status.as_u16(),
        message: error_message(&body, status),
    })
}

// Spotify wraps errors as {"error": {"status": 404, "message": "..."}}.
fn error_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json["error"]["message"]
                .as_str()
                .or_else(|| json["error"].as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string()
        })
}
