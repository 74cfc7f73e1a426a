//! Request builder and wire exchange for network addresses.
//!
//! # Design
//! `WireClient` holds only the `User-Agent` it identifies as. `build_request`
//! produces an `HttpRequest` for a `Remote` without touching the network;
//! `exchange` writes that request to a pooled connection and reads one
//! response back with `http::read_response`.

use tracing::trace;

use crate::address::Remote;
use crate::error::FetchError;
use crate::http::{read_response, HttpRequest, HttpResponse};
use crate::pool::Connection;

#[derive(Debug, Clone)]
pub struct WireClient {
    user_agent: String,
}

impl WireClient {
    pub fn new(user_agent: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
        }
    }

    /// `GET <path> HTTP/1.0` with `Host`, `Connection: keep-alive` and
    /// `User-Agent`.
    pub fn build_request(&self, remote: &Remote) -> HttpRequest {
        HttpRequest {
            path: remote.path.clone(),
            headers: vec![
                ("Host".to_string(), remote.host.clone()),
                ("Connection".to_string(), "keep-alive".to_string()),
                ("User-Agent".to_string(), self.user_agent.clone()),
            ],
        }
    }

    /// Send `request` on `conn` and read the response.
    pub fn exchange(&self, conn: &mut Connection, request: &HttpRequest) -> Result<HttpResponse, FetchError> {
        trace!(origin = %conn.origin(), path = %request.path, "sending request");
        conn.send(&request.to_bytes())
            .map_err(|e| FetchError::connection(conn.origin(), e))?;

        let origin = conn.origin().clone();
        let response = read_response(conn.reader(), &origin)?;
        trace!(%origin, status = response.status, len = response.body.len(), "read response");
        Ok(response)
    }
}
