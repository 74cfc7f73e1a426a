//! Redirect target resolution.

use crate::address::{Address, Remote, Scheme};
use crate::error::FetchError;
use crate::http::HttpResponse;

/// Hard cap on the number of hops in one redirect chain.
pub const MAX_REDIRECTS: usize = 1024;

/// Address a 3xx `response` from `scheme`/`remote` points at.
///
/// A location starting with `/` is resolved against the current scheme and
/// host (keeping a non-default port). Anything else must be an absolute URL
/// and may name any supported scheme.
pub fn resolve_location(scheme: Scheme, remote: &Remote, response: &HttpResponse) -> Result<Address, FetchError> {
    let location = response
        .header("location")
        .ok_or_else(|| FetchError::violation(format!("{} redirect without a location header", response.status)))?;

    if location.starts_with('/') {
        let mut target = format!("{scheme}://{}", remote.host);
        if scheme.default_port() != Some(remote.port) {
            target.push_str(&format!(":{}", remote.port));
        }
        target.push_str(location);
        Address::parse(&target)
    } else {
        Address::parse(location)
    }
}
