//! Connection pool keyed by origin.
//!
//! One live connection per (scheme, host, port). Connections are opened on
//! first use and kept until the pool is dropped or the session evicts one
//! that can no longer carry a request. Retrieval is single-threaded, so the
//! pool is a plain `HashMap` behind `&mut self`.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::{self, BufReader, Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};
use tracing::debug;

use crate::address::Origin;
use crate::error::FetchError;

/// Byte stream under a pooled connection.
pub enum Transport {
    Plain(TcpStream),
    Tls(Box<StreamOwned<ClientConnection, TcpStream>>),
}

impl Read for Transport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Transport::Plain(stream) => stream.read(buf),
            Transport::Tls(stream) => stream.read(buf),
        }
    }
}

impl Write for Transport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Transport::Plain(stream) => stream.write(buf),
            Transport::Tls(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Transport::Plain(stream) => stream.flush(),
            Transport::Tls(stream) => stream.flush(),
        }
    }
}

/// A transport bound to one origin.
///
/// Reads go through a `BufReader` that lives as long as the connection, so
/// bytes buffered past the end of one response are still there for the next.
pub struct Connection {
    origin: Origin,
    stream: BufReader<Transport>,
}

impl Connection {
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        let transport = self.stream.get_mut();
        transport.write_all(bytes)?;
        transport.flush()
    }

    pub fn reader(&mut self) -> &mut BufReader<Transport> {
        &mut self.stream
    }
}

/// Live connections keyed by origin.
pub struct ConnectionPool {
    connections: HashMap<Origin, Connection>,
    tls: Option<Arc<ClientConfig>>,
    read_timeout: Option<Duration>,
    opened: usize,
}

impl ConnectionPool {
    pub fn new(read_timeout: Option<Duration>) -> Self {
        ConnectionPool {
            connections: HashMap::new(),
            tls: None,
            read_timeout,
            opened: 0,
        }
    }

    /// Return the pooled connection for `origin`, connecting first if there
    /// is none.
    pub fn acquire(&mut self, origin: &Origin) -> Result<&mut Connection, FetchError> {
        match self.connections.entry(origin.clone()) {
            Entry::Occupied(entry) => {
                debug!(%origin, "reusing pooled connection");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let transport = open(origin, &mut self.tls, self.read_timeout)?;
                self.opened += 1;
                debug!(%origin, opened = self.opened, "opened connection");
                Ok(entry.insert(Connection {
                    origin: origin.clone(),
                    stream: BufReader::new(transport),
                }))
            }
        }
    }

    /// Drop the connection for `origin`, if any.
    pub fn evict(&mut self, origin: &Origin) -> bool {
        let removed = self.connections.remove(origin).is_some();
        if removed {
            debug!(%origin, "evicted connection");
        }
        removed
    }

    pub fn contains(&self, origin: &Origin) -> bool {
        self.connections.contains_key(origin)
    }

    /// Number of connections this pool has ever opened.
    pub fn opened(&self) -> usize {
        self.opened
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Default for ConnectionPool {
    fn default() -> Self {
        ConnectionPool::new(None)
    }
}

fn open(
    origin: &Origin,
    tls: &mut Option<Arc<ClientConfig>>,
    read_timeout: Option<Duration>,
) -> Result<Transport, FetchError> {
    let fail = |e: io::Error| FetchError::connection(origin, e);

    let tcp = TcpStream::connect((origin.host.as_str(), origin.port)).map_err(fail)?;
    tcp.set_read_timeout(read_timeout).map_err(fail)?;

    if !origin.scheme.is_secure() {
        return Ok(Transport::Plain(tcp));
    }

    let config = tls.get_or_insert_with(client_config).clone();
    let server_name = ServerName::try_from(origin.host.clone())
        .map_err(|e| fail(io::Error::new(io::ErrorKind::InvalidInput, e)))?;
    let conn = ClientConnection::new(config, server_name).map_err(|e| fail(io::Error::other(e)))?;

    let mut stream = StreamOwned::new(conn, tcp);
    while stream.conn.is_handshaking() {
        stream.conn.complete_io(&mut stream.sock).map_err(fail)?;
    }
    Ok(Transport::Tls(Box::new(stream)))
}

/// Client config trusting the bundled webpki roots.
fn client_config() -> Arc<ClientConfig> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    Arc::new(config)
}
