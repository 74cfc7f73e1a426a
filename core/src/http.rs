//! HTTP/1.0 request and response types as plain data.
//!
//! # Design
//! `HttpRequest` knows how to serialize itself and `read_response` knows how
//! to parse a response from any `BufRead`. Neither touches a socket directly,
//! so both are tested against in-memory buffers; `client::WireClient` glues
//! them to a pooled connection.
//!
//! Bodies are delimited by `content-length` only. Chunked transfer coding and
//! content codings are rejected rather than decoded.

use std::collections::HashMap;
use std::io::{BufRead, Read};

use crate::address::Origin;
use crate::error::FetchError;

/// A `GET` request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub path: String,
    /// Sent in order, after the request line.
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Wire form: request line, header lines, blank line.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = String::with_capacity(128);
        out.push_str("GET ");
        out.push_str(&self.path);
        out.push_str(" HTTP/1.0\r\n");
        for (name, value) in &self.headers {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push_str("\r\n");
        }
        out.push_str("\r\n");
        out.into_bytes()
    }
}

/// A parsed response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub version: String,
    pub status: u16,
    pub reason: String,
    /// Lower-cased names, trimmed values. Later duplicates win.
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    /// Whether the connection this response came from can carry another
    /// request.
    pub fn keeps_alive(&self) -> bool {
        // HTTP/1.0 closes unless the server opts in; later versions persist
        // unless it opts out.
        let closing = match self.header("connection") {
            Some(v) if v.eq_ignore_ascii_case("close") => true,
            Some(v) if v.eq_ignore_ascii_case("keep-alive") => false,
            _ => self.version == "HTTP/1.0",
        };
        // Redirect bodies are only drained when their length is declared.
        let drained = !self.is_redirect() || self.content_length().is_some();
        !closing && drained
    }

    fn content_length(&self) -> Option<usize> {
        self.header("content-length").and_then(|v| v.parse().ok())
    }
}

/// Read one response from `reader`.
///
/// 3xx responses return right after the header block (their body is drained
/// when a length is declared). Every other status must carry a
/// `content-length` and no transfer or content coding.
pub fn read_response<R: BufRead>(reader: &mut R, origin: &Origin) -> Result<HttpResponse, FetchError> {
    let status_line = read_line(reader, origin)?
        .ok_or_else(|| FetchError::violation("connection closed before the status line"))?;

    let mut parts = status_line.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/") {
        return Err(FetchError::violation(format!("malformed status line {status_line:?}")));
    }
    let status = parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| FetchError::violation(format!("malformed status line {status_line:?}")))?;
    let reason = parts.next().unwrap_or_default().to_string();

    let mut headers = HashMap::new();
    loop {
        let line = read_line(reader, origin)?
            .ok_or_else(|| FetchError::violation("connection closed inside the header block"))?;
        if line.is_empty() {
            break;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| FetchError::violation(format!("malformed header line {line:?}")))?;
        headers.insert(name.to_ascii_lowercase(), value.trim().to_string());
    }

    let mut response = HttpResponse {
        version: version.to_string(),
        status,
        reason,
        headers,
        body: String::new(),
    };

    if response.is_redirect() {
        if let Some(len) = response.content_length() {
            response.body = read_body(reader, len, origin)?;
        }
        return Ok(response);
    }

    for coding in ["transfer-encoding", "content-encoding"] {
        if let Some(value) = response.header(coding) {
            return Err(FetchError::violation(format!("unsupported {coding}: {value}")));
        }
    }

    let len = match response.header("content-length") {
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| FetchError::violation(format!("invalid content-length {value:?}")))?,
        None => return Err(FetchError::violation("missing content-length")),
    };
    response.body = read_body(reader, len, origin)?;
    Ok(response)
}

/// One CRLF-terminated line without its terminator, or `None` at EOF.
fn read_line<R: BufRead>(reader: &mut R, origin: &Origin) -> Result<Option<String>, FetchError> {
    let mut buf = Vec::new();
    let n = reader
        .read_until(b'\n', &mut buf)
        .map_err(|e| FetchError::connection(origin, e))?;
    if n == 0 {
        return Ok(None);
    }
    if buf.ends_with(b"\n") {
        buf.pop();
        if buf.ends_with(b"\r") {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

fn read_body<R: BufRead>(reader: &mut R, len: usize, origin: &Origin) -> Result<String, FetchError> {
    let mut buf = Vec::with_capacity(len.min(64 * 1024));
    reader
        .by_ref()
        .take(len as u64)
        .read_to_end(&mut buf)
        .map_err(|e| FetchError::connection(origin, e))?;
    if buf.len() < len {
        return Err(FetchError::violation(format!(
            "body ended after {} of {len} bytes",
            buf.len()
        )));
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
