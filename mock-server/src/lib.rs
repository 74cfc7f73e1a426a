use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

pub const PAGE: &str = "<html><body><h1>Hello</h1><p>a &lt;b&gt; c</p></body></html>";

pub const INLINE_TARGET: &str = "data:text/html,<b>inline</b>";

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    pub hits: u64,
}

pub type Hits = Arc<AtomicU64>;

pub fn app() -> Router {
    let hits: Hits = Arc::new(AtomicU64::new(0));
    Router::new()
        .route("/", get(page))
        .route("/page", get(page))
        .route("/counter", get(counter))
        .route("/no-store", get(no_store))
        .route("/cached/{secs}", get(cached))
        .route("/redirect/{n}", get(redirect))
        .route("/moved", get(moved))
        .route("/to-data", get(to_data))
        .route("/stats", get(stats))
        .fallback(not_found)
        .with_state(hits)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn hit(hits: &Hits) -> String {
    let n = hits.fetch_add(1, Ordering::SeqCst) + 1;
    tracing::debug!(hit = n, "served");
    format!("hit {n}")
}

async fn page(State(hits): State<Hits>) -> &'static str {
    hit(&hits);
    PAGE
}

/// Changes on every request and carries no cache directive.
async fn counter(State(hits): State<Hits>) -> String {
    hit(&hits)
}

async fn no_store(State(hits): State<Hits>) -> impl IntoResponse {
    ([(header::CACHE_CONTROL, "no-store")], hit(&hits))
}

async fn cached(State(hits): State<Hits>, Path(secs): Path<u64>) -> impl IntoResponse {
    ([(header::CACHE_CONTROL, format!("max-age={secs}"))], hit(&hits))
}

/// `/redirect/{n}` answers 302 to `/redirect/{n-1}`; `/redirect/0` points at
/// `/page`. Following `/redirect/n` to the end takes n + 1 hops.
async fn redirect(State(hits): State<Hits>, Path(n): Path<u32>) -> impl IntoResponse {
    hit(&hits);
    let location = match n {
        0 => "/page".to_string(),
        n => format!("/redirect/{}", n - 1),
    };
    (StatusCode::FOUND, [(header::LOCATION, location)])
}

async fn moved(State(hits): State<Hits>) -> StatusCode {
    hit(&hits);
    StatusCode::MOVED_PERMANENTLY
}

async fn to_data(State(hits): State<Hits>) -> impl IntoResponse {
    hit(&hits);
    (StatusCode::FOUND, [(header::LOCATION, INLINE_TARGET)])
}

async fn stats(State(hits): State<Hits>) -> Json<Stats> {
    Json(Stats {
        hits: hits.load(Ordering::SeqCst),
    })
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "not found")
}
