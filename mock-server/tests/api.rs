use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Stats, INLINE_TARGET, PAGE};
use tower::ServiceExt;

async fn body_string(response: axum::response::Response) -> String {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- pages ---

#[tokio::test]
async fn page_is_html_without_cache_control() {
    let resp = app().oneshot(get("/page")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(header::CACHE_CONTROL).is_none());
    assert_eq!(body_string(resp).await, PAGE);
}

#[tokio::test]
async fn root_serves_the_page() {
    let resp = app().oneshot(get("/")).await.unwrap();
    assert_eq!(body_string(resp).await, PAGE);
}

#[tokio::test]
async fn unknown_route_is_404_with_body() {
    let resp = app().oneshot(get("/missing")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(resp).await, "not found");
}

// --- cache directives ---

#[tokio::test]
async fn cached_sets_max_age() {
    let resp = app().oneshot(get("/cached/60")).await.unwrap();
    assert_eq!(resp.headers()[header::CACHE_CONTROL], "max-age=60");
    assert_eq!(body_string(resp).await, "hit 1");
}

#[tokio::test]
async fn no_store_sets_directive() {
    let resp = app().oneshot(get("/no-store")).await.unwrap();
    assert_eq!(resp.headers()[header::CACHE_CONTROL], "no-store");
}

// --- redirects ---

#[tokio::test]
async fn redirect_counts_down_to_page() {
    let resp = app().oneshot(get("/redirect/2")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "/redirect/1");

    let resp = app().oneshot(get("/redirect/0")).await.unwrap();
    assert_eq!(resp.headers()[header::LOCATION], "/page");
}

#[tokio::test]
async fn moved_has_no_location() {
    let resp = app().oneshot(get("/moved")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
    assert!(resp.headers().get(header::LOCATION).is_none());
}

#[tokio::test]
async fn to_data_points_at_inline_document() {
    let resp = app().oneshot(get("/to-data")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], INLINE_TARGET);
}

// --- shared hit counter ---

#[tokio::test]
async fn counter_and_stats_share_state() {
    use tower::Service;

    let mut app = app().into_service();

    for expected in ["hit 1", "hit 2"] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(get("/counter"))
            .await
            .unwrap();
        assert_eq!(body_string(resp).await, expected);
    }

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/stats"))
        .await
        .unwrap();
    let stats: Stats = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(stats, Stats { hits: 2 });
}
