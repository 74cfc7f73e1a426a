//! Parsed resource locators.
//!
//! # Design
//! An `Address` is an enum over the five supported schemes so every dispatch
//! site is an exhaustive `match`. Values are immutable: each redirect hop
//! parses a fresh `Address` instead of mutating the previous one.
//!
//! Network addresses expose two derived identities: `Origin` (scheme, host,
//! port), which keys the connection pool, and `CacheKey` (origin plus path),
//! which keys the response cache.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::FetchError;

/// Scheme tag of an `Address`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
    File,
    Data,
    ViewSource,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::File => "file",
            Scheme::Data => "data",
            Scheme::ViewSource => "view-source",
        }
    }

    /// Port used when a network URL does not name one.
    pub fn default_port(self) -> Option<u16> {
        match self {
            Scheme::Http => Some(80),
            Scheme::Https => Some(443),
            _ => None,
        }
    }

    pub fn is_secure(self) -> bool {
        self == Scheme::Https
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host, port and path of an `http` or `https` address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Remote {
    pub host: String,
    pub port: u16,
    /// Always starts with `/`.
    pub path: String,
}

impl Remote {
    fn parse(raw: &str, rest: &str, scheme: Scheme) -> Result<Self, FetchError> {
        let rest = rest
            .strip_prefix("//")
            .ok_or_else(|| FetchError::malformed(raw, "expected '//' after the scheme"))?;

        let (authority, path) = rest.split_once('/').unwrap_or((rest, ""));

        let (host, port) = match authority.split_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .ok()
                    .filter(|p| *p != 0)
                    .ok_or_else(|| FetchError::malformed(raw, "invalid port"))?;
                (host, port)
            }
            None => {
                let port = scheme
                    .default_port()
                    .ok_or_else(|| FetchError::malformed(raw, "scheme has no default port"))?;
                (authority, port)
            }
        };

        if host.is_empty() {
            return Err(FetchError::malformed(raw, "empty host"));
        }

        Ok(Remote {
            host: host.to_string(),
            port,
            path: format!("/{path}"),
        })
    }
}

/// The (scheme, host, port) triple a pooled connection is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
}

impl Origin {
    pub fn new(scheme: Scheme, remote: &Remote) -> Self {
        Origin {
            scheme,
            host: remote.host.clone(),
            port: remote.port,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// Identity of a cached network resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub origin: Origin,
    pub path: String,
}

impl CacheKey {
    pub fn new(scheme: Scheme, remote: &Remote) -> Self {
        CacheKey {
            origin: Origin::new(scheme, remote),
            path: remote.path.clone(),
        }
    }
}

/// A parsed resource locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    Http(Remote),
    Https(Remote),
    File(PathBuf),
    /// Inline document; the media type is always `text/html`.
    Data(String),
    /// Raw source of the wrapped address. Never wraps `Data` or `ViewSource`.
    ViewSource(Box<Address>),
}

impl Address {
    /// Parse a URL string.
    ///
    /// The scheme is everything before the first `:`. `data:` URLs must
    /// declare `text/html`; `view-source:` must wrap a network or file URL.
    pub fn parse(raw: &str) -> Result<Self, FetchError> {
        let (tag, rest) = raw
            .split_once(':')
            .ok_or_else(|| FetchError::malformed(raw, "missing scheme"))?;

        match tag {
            "http" => Ok(Address::Http(Remote::parse(raw, rest, Scheme::Http)?)),
            "https" => Ok(Address::Https(Remote::parse(raw, rest, Scheme::Https)?)),
            "file" => {
                let path = rest.strip_prefix("//").unwrap_or(rest);
                Ok(Address::File(PathBuf::from(path)))
            }
            "data" => {
                let (media_type, payload) = rest
                    .split_once(',')
                    .ok_or_else(|| FetchError::malformed(raw, "data url has no ','"))?;
                if media_type != "text/html" {
                    return Err(FetchError::UnsupportedMediaType(media_type.to_string()));
                }
                Ok(Address::Data(payload.to_string()))
            }
            "view-source" => match Address::parse(rest)? {
                inner @ (Address::Data(_) | Address::ViewSource(_)) => {
                    Err(FetchError::InvalidNesting(inner.scheme().as_str()))
                }
                inner => Ok(Address::ViewSource(Box::new(inner))),
            },
            _ => Err(FetchError::malformed(raw, "unsupported scheme")),
        }
    }

    pub fn scheme(&self) -> Scheme {
        match self {
            Address::Http(_) => Scheme::Http,
            Address::Https(_) => Scheme::Https,
            Address::File(_) => Scheme::File,
            Address::Data(_) => Scheme::Data,
            Address::ViewSource(_) => Scheme::ViewSource,
        }
    }

    /// Host/port/path for network addresses.
    pub fn remote(&self) -> Option<&Remote> {
        match self {
            Address::Http(remote) | Address::Https(remote) => Some(remote),
            _ => None,
        }
    }

    pub fn origin(&self) -> Option<Origin> {
        self.remote().map(|remote| Origin::new(self.scheme(), remote))
    }

    pub fn cache_key(&self) -> Option<CacheKey> {
        self.remote().map(|remote| CacheKey::new(self.scheme(), remote))
    }

    pub fn is_view_source(&self) -> bool {
        matches!(self, Address::ViewSource(_))
    }
}

impl FromStr for Address {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Http(remote) | Address::Https(remote) => {
                let scheme = self.scheme();
                write!(f, "{scheme}://{}", remote.host)?;
                if scheme.default_port() != Some(remote.port) {
                    write!(f, ":{}", remote.port)?;
                }
                f.write_str(&remote.path)
            }
            Address::File(path) => write!(f, "file://{}", path.display()),
            Address::Data(payload) => write!(f, "data:text/html,{payload}"),
            Address::ViewSource(inner) => write!(f, "view-source:{inner}"),
        }
    }
}
