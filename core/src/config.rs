//! Session configuration.

use std::time::Duration;

use crate::redirect::MAX_REDIRECTS;

/// Project URL advertised in the default `User-Agent`.
const PROJECT_UA_URL: &str = "https://github.com/webfetch/webfetch";

/// Default `User-Agent` sent with every request.
#[must_use]
pub fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("webfetch/{version} (+{PROJECT_UA_URL})")
}

/// Knobs for a `Session`.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub user_agent: String,
    /// A chain fails once it reaches this many hops. Capped at
    /// `MAX_REDIRECTS`.
    pub max_redirects: usize,
    /// Read timeout applied to new sockets. `None` blocks indefinitely.
    pub read_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            user_agent: default_user_agent(),
            max_redirects: MAX_REDIRECTS,
            read_timeout: None,
        }
    }
}
