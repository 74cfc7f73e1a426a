//! Retrieval session: scheme dispatch, caching and redirect following.
//!
//! # Design
//! A `Session` owns the connection pool and the response cache so both
//! survive across `retrieve` calls without any process-wide state. One
//! retrieval runs at a time (`&mut self`), so neither needs locking.
//!
//! Redirects are followed by a loop, not recursion. Each hop goes through the
//! same dispatch as the original address, so a redirect may land on a cached
//! resource, another origin, or a `data:` URL.

use std::fs;

use tracing::{debug, warn};

use crate::address::{Address, CacheKey, Origin, Remote, Scheme};
use crate::cache::ResponseCache;
use crate::client::WireClient;
use crate::config::SessionConfig;
use crate::error::FetchError;
use crate::http::HttpResponse;
use crate::pool::ConnectionPool;
use crate::redirect::{resolve_location, MAX_REDIRECTS};

/// A retrieved document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub body: String,
    /// The caller asked for `view-source:`; the body must be shown raw.
    pub view_source: bool,
}

enum Hop {
    Done(String),
    Redirect(Address),
}

pub struct Session {
    client: WireClient,
    pool: ConnectionPool,
    cache: ResponseCache,
    max_redirects: usize,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Session {
            client: WireClient::new(&config.user_agent),
            pool: ConnectionPool::new(config.read_timeout),
            cache: ResponseCache::new(),
            max_redirects: config.max_redirects.min(MAX_REDIRECTS),
        }
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Parse `url` and retrieve it.
    pub fn fetch(&mut self, url: &str) -> Result<Fetched, FetchError> {
        let address = Address::parse(url)?;
        self.retrieve(&address)
    }

    /// Retrieve the body `address` names, following redirects.
    pub fn retrieve(&mut self, address: &Address) -> Result<Fetched, FetchError> {
        let view_source = address.is_view_source();
        let mut current = address.clone();
        let mut hops = 0;

        loop {
            let hop = match current {
                Address::Data(payload) => Hop::Done(payload),
                Address::File(path) => {
                    let bytes = fs::read(&path).map_err(|source| FetchError::FileNotFound { path, source })?;
                    Hop::Done(String::from_utf8_lossy(&bytes).into_owned())
                }
                Address::ViewSource(inner) => {
                    current = *inner;
                    continue;
                }
                Address::Http(remote) => self.fetch_remote(Scheme::Http, &remote)?,
                Address::Https(remote) => self.fetch_remote(Scheme::Https, &remote)?,
            };

            match hop {
                Hop::Done(body) => return Ok(Fetched { body, view_source }),
                Hop::Redirect(next) => {
                    hops += 1;
                    if hops >= self.max_redirects {
                        return Err(FetchError::TooManyRedirects {
                            limit: self.max_redirects,
                        });
                    }
                    debug!(hop = hops, to = %next, "following redirect");
                    current = next;
                }
            }
        }
    }

    fn fetch_remote(&mut self, scheme: Scheme, remote: &Remote) -> Result<Hop, FetchError> {
        let key = CacheKey::new(scheme, remote);
        if let Some(body) = self.cache.lookup(&key) {
            debug!(origin = %key.origin, path = %key.path, "cache hit");
            return Ok(Hop::Done(body));
        }

        let response = self.exchange(&key.origin, remote)?;
        if response.is_redirect() {
            return resolve_location(scheme, remote, &response).map(Hop::Redirect);
        }

        if response.status == 200 {
            self.cache.store(key, &response.body, response.header("cache-control"));
        } else if !(200..300).contains(&response.status) {
            warn!(status = response.status, reason = %response.reason, path = %remote.path, "non-success status");
        }
        Ok(Hop::Done(response.body))
    }

    /// One request/response on the pooled connection for `origin`. The
    /// connection is evicted when it failed or cannot be reused.
    fn exchange(&mut self, origin: &Origin, remote: &Remote) -> Result<HttpResponse, FetchError> {
        let request = self.client.build_request(remote);
        let conn = self.pool.acquire(origin)?;
        let result = self.client.exchange(conn, &request);
        if !result.as_ref().is_ok_and(HttpResponse::keeps_alive) {
            self.pool.evict(origin);
        }
        result
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(SessionConfig::default())
    }
}
