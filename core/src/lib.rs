//! Blocking web-content retrieval core.
//!
//! # Overview
//! Turns a URL into a document body. `http` and `https` addresses are fetched
//! over a restricted HTTP/1.0 exchange on pooled keep-alive connections;
//! `file:` reads the local filesystem; `data:text/html,` returns its inline
//! payload; `view-source:` returns the wrapped address's body and marks it
//! for raw display.
//!
//! # Design
//! - `Session` is the only stateful type. It owns the `ConnectionPool` and
//!   the `ResponseCache`, so reuse spans calls without process globals.
//! - Request building and response parsing (`client`, `http`) are separated
//!   from the socket, mirroring a build/parse split that tests drive with
//!   in-memory buffers.
//! - Everything is synchronous and single-threaded: one retrieval in flight,
//!   blocking std I/O, rustls for TLS.
//!
//! ```rust,no_run
//! use webfetch_core::Session;
//!
//! let mut session = Session::default();
//! let page = session.fetch("https://example.org/")?;
//! println!("{}", page.body);
//! # Ok::<(), webfetch_core::FetchError>(())
//! ```

pub mod address;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod pool;
pub mod redirect;
pub mod session;

pub use address::{Address, CacheKey, Origin, Remote, Scheme};
pub use cache::{Clock, ResponseCache, SystemClock};
pub use client::WireClient;
pub use config::{default_user_agent, SessionConfig};
pub use error::FetchError;
pub use http::{read_response, HttpRequest, HttpResponse};
pub use pool::{Connection, ConnectionPool, Transport};
pub use redirect::{resolve_location, MAX_REDIRECTS};
pub use session::{Fetched, Session};
