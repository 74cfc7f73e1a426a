//! End-to-end retrieval against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port in a background tokio runtime,
//! then drives a blocking `Session` against it over real sockets. Covers the
//! cache, redirect following and source view as a caller sees them.

use std::net::SocketAddr;

use webfetch_core::{FetchError, Session, SessionConfig};

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

#[test]
fn fetches_page_body() {
    let addr = start_server();
    let mut session = Session::default();

    let page = session.fetch(&format!("http://{addr}/page")).unwrap();
    assert_eq!(page.body, mock_server::PAGE);
    assert!(!page.view_source);
}

#[test]
fn view_source_returns_identical_bytes() {
    let addr = start_server();
    let mut session = Session::default();

    let raw = session.fetch(&format!("view-source:http://{addr}/counter")).unwrap();
    assert!(raw.view_source);
    assert_eq!(raw.body, "hit 1");

    // Same resource through the plain scheme: served from the cache, byte for byte.
    let plain = session.fetch(&format!("http://{addr}/counter")).unwrap();
    assert_eq!(plain.body, raw.body);
}

#[test]
fn response_without_cache_control_is_cached_forever() {
    let addr = start_server();
    let mut session = Session::default();
    let url = format!("http://{addr}/counter");

    let first = session.fetch(&url).unwrap();
    let second = session.fetch(&url).unwrap();
    assert_eq!(first.body, "hit 1");
    assert_eq!(second.body, "hit 1");
}

#[test]
fn no_store_is_refetched() {
    let addr = start_server();
    let mut session = Session::default();
    let url = format!("http://{addr}/no-store");

    assert_eq!(session.fetch(&url).unwrap().body, "hit 1");
    assert_eq!(session.fetch(&url).unwrap().body, "hit 2");
    assert!(session.cache().is_empty());
}

#[test]
fn max_age_controls_reuse() {
    let addr = start_server();
    let mut session = Session::default();

    let zero = format!("http://{addr}/cached/0");
    assert_eq!(session.fetch(&zero).unwrap().body, "hit 1");
    assert_eq!(session.fetch(&zero).unwrap().body, "hit 2");

    let minute = format!("http://{addr}/cached/60");
    assert_eq!(session.fetch(&minute).unwrap().body, "hit 3");
    assert_eq!(session.fetch(&minute).unwrap().body, "hit 3");
}

#[test]
fn follows_relative_redirect_chain() {
    let addr = start_server();
    let mut session = Session::default();

    let page = session.fetch(&format!("http://{addr}/redirect/5")).unwrap();
    assert_eq!(page.body, mock_server::PAGE);
}

#[test]
fn redirect_may_switch_to_inline_data() {
    let addr = start_server();
    let mut session = Session::default();

    let page = session.fetch(&format!("http://{addr}/to-data")).unwrap();
    assert_eq!(page.body, "<b>inline</b>");
}

#[test]
fn redirect_without_location_is_a_violation() {
    let addr = start_server();
    let err = Session::default().fetch(&format!("http://{addr}/moved")).unwrap_err();
    assert!(matches!(err, FetchError::ProtocolViolation(_)));
}

#[test]
fn redirect_limit_counts_hops() {
    let addr = start_server();
    let mut session = Session::new(SessionConfig {
        max_redirects: 4,
        ..SessionConfig::default()
    });

    // /redirect/2 takes three hops: 2 -> 1 -> 0 -> /page.
    assert!(session.fetch(&format!("http://{addr}/redirect/2")).is_ok());

    // /redirect/3 takes four.
    let err = session.fetch(&format!("http://{addr}/redirect/3")).unwrap_err();
    assert!(matches!(err, FetchError::TooManyRedirects { limit: 4 }));
}

#[test]
fn chain_of_1024_redirects_is_rejected() {
    let addr = start_server();
    let mut session = Session::default();

    // 1023 hops still resolve.
    let page = session.fetch(&format!("http://{addr}/redirect/1022")).unwrap();
    assert_eq!(page.body, mock_server::PAGE);

    let err = session.fetch(&format!("http://{addr}/redirect/1023")).unwrap_err();
    assert!(matches!(err, FetchError::TooManyRedirects { limit: 1024 }));
}

#[test]
fn error_status_is_returned_as_body() {
    let addr = start_server();
    let mut session = Session::default();

    let page = session.fetch(&format!("http://{addr}/missing")).unwrap();
    assert_eq!(page.body, "not found");
    assert!(session.cache().is_empty(), "only 200 responses are cached");
}

#[test]
fn failed_url_does_not_disturb_later_ones() {
    let addr = start_server();
    let mut session = Session::default();

    assert!(session.fetch(&format!("http://{addr}/moved")).is_err());
    assert!(session.fetch("data:text/plain,nope").is_err());
    assert_eq!(session.fetch(&format!("http://{addr}/page")).unwrap().body, mock_server::PAGE);
}
