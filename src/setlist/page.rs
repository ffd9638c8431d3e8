//! Reads a setlist straight from its setlist.fm page.
//!
//! Song titles are the `a.songLabel` links in page order. The date comes from
//! the month, day and year spans of the date block, artist and venue from
//! the page headline. A page without a date block is not a setlist page.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Proxy, StatusCode, Url};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::{ProxyPool, SetlistSource, validate_setlist_url};
use crate::{
    config,
    error::{Error, Res},
    types::SetlistEvent,
};

const PAGE_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const SONG_SELECTOR: &str = "a.songLabel";
const ARTIST_SELECTOR: &str = ".setlistHeadline h1 strong span a span";
const LOCATION_SELECTOR: &str = ".setlistHeadline h1 span span a span";

pub struct PageSetlistSource {
    http: Client,
    proxies: Option<ProxyPool>,
}

impl PageSetlistSource {
    pub fn new() -> Res<Self> {
        Ok(Self {
            http: page_client(None)?,
            proxies: None,
        })
    }

    /// Sends every page request through `proxies` instead of directly.
    pub fn with_proxies(mut self, proxies: ProxyPool) -> Self {
        self.proxies = Some(proxies);
        self
    }

    /// With `use_proxies` the list at `SETLIST_PROXY_LIST` is loaded and
    /// checked up front.
    pub async fn from_config(use_proxies: bool) -> Res<Self> {
        let source = Self::new()?;
        if !use_proxies {
            return Ok(source);
        }

        let candidates = ProxyPool::load(&config::proxy_list_path()).await?;
        let pool = ProxyPool::validated(candidates, &config::proxy_check_url()).await;
        Ok(source.with_proxies(pool))
    }

    /// Tries one proxy after the other. A proxy that fails for any reason
    /// other than a missing page is dropped from the pool.
    async fn fetch_through(&self, pool: &ProxyPool, url: &Url) -> Res<SetlistEvent> {
        while let Some(proxy) = pool.next().await {
            let attempt = match page_client(Some(&proxy)) {
                Ok(client) => fetch_page(&client, url).await,
                Err(e) => Err(e),
            };

            match attempt {
                Ok(event) => return Ok(event),
                Err(Error::SetlistNotFound(missing)) => {
                    return Err(Error::SetlistNotFound(missing));
                }
                Err(e) => {
                    warn!(%proxy, error = %e, "proxy failed, trying the next one");
                    pool.mark_invalid(&proxy).await;
                }
            }
        }

        Err(Error::ProxiesExhausted(url.to_string()))
    }
}

#[async_trait]
impl SetlistSource for PageSetlistSource {
    async fn fetch_setlist(&self, url: &str) -> Res<SetlistEvent> {
        let setlist_url = validate_setlist_url(url)?;
        debug!(url = %setlist_url, proxied = self.proxies.is_some(), "reading setlist page");

        match &self.proxies {
            Some(pool) => self.fetch_through(pool, &setlist_url).await,
            None => fetch_page(&self.http, &setlist_url).await,
        }
    }
}

fn page_client(proxy: Option<&str>) -> Res<Client> {
    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(PAGE_TIMEOUT);
    if let Some(proxy) = proxy {
        builder = builder.proxy(Proxy::all(proxy)?);
    }
    Ok(builder.build()?)
}

async fn fetch_page(client: &Client, url: &Url) -> Res<SetlistEvent> {
    let response = client.get(url.as_str()).send().await?;

    match response.status() {
        StatusCode::NOT_FOUND => Err(Error::SetlistNotFound(url.to_string())),
        status if status.is_success() => {
            let body = response.text().await?;
            parse_setlist_page(&body).ok_or_else(|| Error::UnreadableSetlistPage(url.to_string()))
        }
        status => Err(Error::Api {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string(),
        }),
    }
}

/// Extracts the event from a setlist.fm page. `None` when the page has no
/// date block.
pub fn parse_setlist_page(html: &str) -> Option<SetlistEvent> {
    let document = Html::parse_document(html);

    let month = first_text(&document, "span.month")?;
    let day = first_text(&document, "span.day")?;
    let year = first_text(&document, "span.year")?;

    let songs = Selector::parse(SONG_SELECTOR).ok()?;
    let setlist = document
        .select(&songs)
        .map(text_of)
        .filter(|title| !title.is_empty())
        .collect();

    Some(SetlistEvent {
        artist: first_text(&document, ARTIST_SELECTOR).unwrap_or_default(),
        date: format!("{} {}, {}", month, day, year),
        location: first_text(&document, LOCATION_SELECTOR).unwrap_or_default(),
        setlist,
    })
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document.select(&selector).next().map(text_of)
}

fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
