//! Proxy rotation for setlist.fm page requests.
//!
//! The list file holds one proxy per line. Before use every entry is checked
//! against `SETLIST_PROXY_CHECK_URL`; the ones that answer 200 go into a
//! [`ProxyPool`], which hands them out round-robin and forgets a proxy as
//! soon as a request through it fails.

use std::{
    path::Path,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use futures::{StreamExt, future, stream};
use reqwest::{Client, Proxy, StatusCode};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::Res;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);
const CONCURRENT_CHECKS: usize = 10;

pub struct ProxyPool {
    proxies: Mutex<Vec<String>>,
    next: AtomicUsize,
}

impl ProxyPool {
    pub fn new(proxies: Vec<String>) -> Self {
        Self {
            proxies: Mutex::new(proxies),
            next: AtomicUsize::new(0),
        }
    }

    /// Reads the proxy list at `path`.
    pub async fn load(path: &Path) -> Res<Vec<String>> {
        let text = async_fs::read_to_string(path).await?;
        Ok(parse_proxy_list(&text))
    }

    /// Pool of the `candidates` that answer `check_url` with 200, in list
    /// order. At most ten checks run at once.
    pub async fn validated(candidates: Vec<String>, check_url: &str) -> Self {
        let total = candidates.len();
        let valid: Vec<String> = stream::iter(candidates)
            .map(|proxy| async move {
                let usable = check_proxy(&proxy, check_url).await;
                (proxy, usable)
            })
            .buffered(CONCURRENT_CHECKS)
            .filter_map(|(proxy, usable)| future::ready(usable.then_some(proxy)))
            .collect()
            .await;

        info!(valid = valid.len(), total, "proxies checked");
        Self::new(valid)
    }

    /// Next proxy in round-robin order.
    pub async fn next(&self) -> Option<String> {
        let proxies = self.proxies.lock().await;
        if proxies.is_empty() {
            return None;
        }
        let i = self.next.fetch_add(1, Ordering::SeqCst);
        Some(proxies[i % proxies.len()].clone())
    }

    pub async fn mark_invalid(&self, proxy: &str) {
        self.proxies.lock().await.retain(|p| p != proxy);
    }

    pub async fn len(&self) -> usize {
        self.proxies.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// One proxy per line; blank lines and `#` comments are skipped, entries
/// without a scheme are taken as `http://`.
pub fn parse_proxy_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            if line.contains("://") {
                line.to_string()
            } else {
                format!("http://{}", line)
            }
        })
        .collect()
}

async fn check_proxy(proxy: &str, check_url: &str) -> bool {
    let client = match Proxy::all(proxy).and_then(|p| {
        Client::builder()
            .proxy(p)
            .timeout(CHECK_TIMEOUT)
            .build()
    }) {
        Ok(client) => client,
        Err(e) => {
            debug!(%proxy, error = %e, "unusable proxy entry");
            return false;
        }
    };

    match client.get(check_url).send().await {
        Ok(response) => response.status() == StatusCode::OK,
        Err(e) => {
            debug!(%proxy, error = %e, "proxy check failed");
            false
        }
    }
}
