//! Client for an external setlist scraping service.
//!
//! `GET {base}/setlist/?url=<setlist url>&use_proxies=<bool>` answers with the
//! event as JSON; the service does its own proxy handling.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::{SetlistSource, validate_setlist_url};
use crate::{
    error::{Error, Res},
    types::SetlistEvent,
};

pub struct HttpSetlistSource {
    http: Client,
    base_url: String,
    use_proxies: bool,
}

impl HttpSetlistSource {
    pub fn new(base_url: impl Into<String>, use_proxies: bool) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            use_proxies,
        }
    }
}

#[async_trait]
impl SetlistSource for HttpSetlistSource {
    async fn fetch_setlist(&self, url: &str) -> Res<SetlistEvent> {
        let setlist_url = validate_setlist_url(url)?;
        let endpoint = format!("{}/setlist/", self.base_url);
        debug!(%endpoint, url = %setlist_url, use_proxies = self.use_proxies, "fetching setlist");

        let use_proxies = if self.use_proxies { "true" } else { "false" };
        let response = self
            .http
            .get(&endpoint)
            .query(&[("url", setlist_url.as_str()), ("use_proxies", use_proxies)])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(Error::SetlistNotFound(url.to_string())),
            status if status.is_success() => Ok(response.json::<SetlistEvent>().await?),
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(Error::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}
