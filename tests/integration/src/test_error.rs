//! Error document shape and status-code mapping.

use crate::TestServer;

#[tokio::test]
async fn test_should_render_well_formed_error_documents() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .get(server.url("/no-such-bucket/no-such-key"))
        .send()
        .await
        .expect("get");
    assert_eq!(resp.status(), 404);
    assert_eq!(
        resp.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/xml")
    );

    let body = resp.text().await.expect("body");
    assert!(body.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(body.contains("<Error>"));
    assert!(body.contains("<Code>NoSuchBucket</Code>"));
    assert!(body.contains("<Message>"));
    assert!(body.contains("<RequestId>"));

    server.close().await;
}

#[tokio::test]
async fn test_should_distinguish_missing_keys_from_missing_buckets() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;

    let resp = server
        .client
        .get(server.url("/b/ghost"))
        .send()
        .await
        .expect("get");
    assert_eq!(resp.status(), 404);
    let body = resp.text().await.expect("body");
    assert!(body.contains("<Code>NoSuchKey</Code>"));
    assert!(body.contains("<Resource>ghost</Resource>"));

    server.close().await;
}

#[tokio::test]
async fn test_should_reject_unsupported_methods_with_405() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;

    let resp = server
        .client
        .request(reqwest::Method::PATCH, server.url("/b"))
        .send()
        .await
        .expect("patch");
    assert_eq!(resp.status(), 405);
    assert!(
        resp.text()
            .await
            .expect("body")
            .contains("<Code>MethodNotAllowed</Code>")
    );

    server.close().await;
}

#[tokio::test]
async fn test_should_stamp_a_request_id_on_every_response() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .get(server.url("/"))
        .send()
        .await
        .expect("list");
    assert!(resp.headers().get("x-amz-request-id").is_some());
    assert_eq!(
        resp.headers().get("server").and_then(|v| v.to_str().ok()),
        Some("s3dock")
    );

    server.close().await;
}

#[tokio::test]
async fn test_should_reject_malformed_bulk_delete_bodies() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;

    let resp = server
        .client
        .post(server.url("/b?delete"))
        .body("this is not xml")
        .send()
        .await
        .expect("bulk delete");
    assert_eq!(resp.status(), 400);
    assert!(
        resp.text()
            .await
            .expect("body")
            .contains("<Code>MalformedXML</Code>")
    );

    server.close().await;
}
