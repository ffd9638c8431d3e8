//! # Setlist Module
//!
//! Where setlists come from. A [`SetlistSource`] takes a setlist.fm URL and
//! answers with the event's artist billing, date, location and the ordered
//! song titles.
//!
//! - [`service`] - client for an external scraping service
//!   (`SETLIST_SERVICE_URL`)
//! - [`page`] - reads the setlist.fm page directly
//! - [`proxy`] - validated proxy list the page reader rotates through
//!
//! [`from_config`] picks the service when `SETLIST_SERVICE_URL` is set and
//! the page reader otherwise.

pub mod page;
pub mod proxy;
pub mod service;

use async_trait::async_trait;
use reqwest::Url;

use crate::{
    config,
    error::{Error, Res},
    types::SetlistEvent,
};

pub use page::{PageSetlistSource, parse_setlist_page};
pub use proxy::ProxyPool;
pub use service::HttpSetlistSource;

#[async_trait]
pub trait SetlistSource: Send + Sync {
    async fn fetch_setlist(&self, url: &str) -> Res<SetlistEvent>;
}

#[async_trait]
impl<T: SetlistSource + ?Sized> SetlistSource for Box<T> {
    async fn fetch_setlist(&self, url: &str) -> Res<SetlistEvent> {
        (**self).fetch_setlist(url).await
    }
}

/// Setlist source for the current configuration.
pub async fn from_config(use_proxies: bool) -> Res<Box<dyn SetlistSource>> {
    match config::setlist_service_url() {
        Some(base_url) => Ok(Box::new(HttpSetlistSource::new(base_url, use_proxies))),
        None => Ok(Box::new(PageSetlistSource::from_config(use_proxies).await?)),
    }
}

/// Accepts absolute http(s) URLs only.
pub fn validate_setlist_url(url: &str) -> Res<Url> {
    match Url::parse(url.trim()) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => {
            Ok(parsed)
        }
        _ => Err(Error::InvalidSetlistUrl(url.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_setlist_fm_url() {
        let url = "https://www.setlist.fm/setlist/lady-gaga/2025/empire-polo-club-indio-ca-35e0d6f.html";
        assert!(validate_setlist_url(url).is_ok());
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(
            validate_setlist_url("ftp://example.com/setlist"),
            Err(Error::InvalidSetlistUrl(_))
        ));
        assert!(matches!(
            validate_setlist_url("not a url"),
            Err(Error::InvalidSetlistUrl(_))
        ));
    }
}
