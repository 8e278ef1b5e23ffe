//! CORS preflight and response-header behaviour over the wire.

use crate::{TestServer, disable_cors, strict_cors_xml};

#[tokio::test]
async fn test_should_grant_preflights_under_the_default_wildcard() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;

    let resp = server
        .client
        .request(reqwest::Method::OPTIONS, server.url("/b/key"))
        .header("origin", "https://anywhere.example")
        .header("access-control-request-method", "PUT")
        .send()
        .await
        .expect("preflight");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    assert!(resp.headers().get("access-control-allow-methods").is_some());

    server.close().await;
}

#[tokio::test]
async fn test_should_deny_unmatched_preflights_with_empty_403() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;

    // Pin the bucket to a single origin.
    let resp = server
        .client
        .put(server.url("/b?cors"))
        .body(strict_cors_xml("https://app.example"))
        .send()
        .await
        .expect("put cors");
    assert_eq!(resp.status(), 204);

    let resp = server
        .client
        .request(reqwest::Method::OPTIONS, server.url("/b/key"))
        .header("origin", "https://evil.example")
        .header("access-control-request-method", "GET")
        .send()
        .await
        .expect("preflight");
    assert_eq!(resp.status(), 403);
    assert!(resp.headers().get("access-control-allow-origin").is_none());
    assert!(resp.bytes().await.expect("body").is_empty());

    server.close().await;
}

#[tokio::test]
async fn test_should_echo_the_origin_for_non_wildcard_rules() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;
    server
        .client
        .put(server.url("/b?cors"))
        .body(strict_cors_xml("https://app.example"))
        .send()
        .await
        .expect("put cors");

    let resp = server
        .client
        .request(reqwest::Method::OPTIONS, server.url("/b/key"))
        .header("origin", "https://app.example")
        .header("access-control-request-method", "PUT")
        .header("access-control-request-headers", "Content-Type")
        .send()
        .await
        .expect("preflight");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("https://app.example")
    );
    assert_eq!(
        resp.headers()
            .get("access-control-allow-headers")
            .and_then(|v| v.to_str().ok()),
        Some("content-type")
    );
    assert_eq!(
        resp.headers()
            .get("access-control-max-age")
            .and_then(|v| v.to_str().ok()),
        Some("3000")
    );

    server.close().await;
}

#[tokio::test]
async fn test_should_decorate_normal_responses_for_matched_origins() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;
    server.put_object("b", "key", b"data", &[]).await;
    server
        .client
        .put(server.url("/b?cors"))
        .body(strict_cors_xml("https://app.example"))
        .send()
        .await
        .expect("put cors");

    let resp = server
        .client
        .get(server.url("/b/key"))
        .header("origin", "https://app.example")
        .send()
        .await
        .expect("get");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("https://app.example")
    );
    assert_eq!(
        resp.headers()
            .get("access-control-expose-headers")
            .and_then(|v| v.to_str().ok()),
        Some("ETag")
    );

    server.close().await;
}

#[tokio::test]
async fn test_should_expose_range_headers_on_partial_responses() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;
    server.put_object("b", "blob", &vec![1_u8; 1024], &[]).await;
    server
        .client
        .put(server.url("/b?cors"))
        .body(strict_cors_xml("https://app.example"))
        .send()
        .await
        .expect("put cors");

    let resp = server
        .client
        .get(server.url("/b/blob"))
        .header("origin", "https://app.example")
        .header("range", "bytes=0-9")
        .send()
        .await
        .expect("range get");
    assert_eq!(resp.status(), 206);
    let expose = resp
        .headers()
        .get("access-control-expose-headers")
        .and_then(|v| v.to_str().ok())
        .expect("expose header");
    assert!(expose.contains("Accept-Ranges"));
    assert!(expose.contains("Content-Range"));

    server.close().await;
}

#[tokio::test]
async fn test_should_deny_every_preflight_when_cors_is_disabled() {
    let server = TestServer::start_with(disable_cors).await;
    server.create_bucket("b").await;

    let resp = server
        .client
        .request(reqwest::Method::OPTIONS, server.url("/b/key"))
        .header("origin", "https://anywhere.example")
        .header("access-control-request-method", "GET")
        .send()
        .await
        .expect("preflight");
    assert_eq!(resp.status(), 403);

    server.close().await;
}

#[tokio::test]
async fn test_should_round_trip_cors_configuration_documents() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;

    // Unconfigured buckets answer the canned 404.
    let resp = server
        .client
        .get(server.url("/b?cors"))
        .send()
        .await
        .expect("get cors");
    assert_eq!(resp.status(), 404);

    server
        .client
        .put(server.url("/b?cors"))
        .body(strict_cors_xml("https://app.example"))
        .send()
        .await
        .expect("put cors");

    let resp = server
        .client
        .get(server.url("/b?cors"))
        .send()
        .await
        .expect("get cors");
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.expect("body");
    assert!(body.contains("<AllowedOrigin>https://app.example</AllowedOrigin>"));

    let resp = server
        .client
        .delete(server.url("/b?cors"))
        .send()
        .await
        .expect("delete cors");
    assert_eq!(resp.status(), 204);

    server.close().await;
}

#[tokio::test]
async fn test_should_reject_malformed_cors_documents() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;

    let resp = server
        .client
        .put(server.url("/b?cors"))
        .body("<CORSConfiguration><CORSRule></CORSRule></CORSConfiguration>")
        .send()
        .await
        .expect("put cors");
    assert_eq!(resp.status(), 400);
    assert!(
        resp.text()
            .await
            .expect("body")
            .contains("<Code>MalformedXML</Code>")
    );

    server.close().await;
}
