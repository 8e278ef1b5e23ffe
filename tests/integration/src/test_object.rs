//! Object reads, writes, copies, and deletes over the wire.

use crate::TestServer;

#[tokio::test]
async fn test_should_put_then_head_with_exact_wire_values() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;

    let resp = server
        .client
        .put(server.url("/b/text"))
        .body(&b"Hello!"[..])
        .send()
        .await
        .expect("put");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("etag").and_then(|v| v.to_str().ok()),
        Some("\"952d2c56d0485958336747bcdd98590d\"")
    );

    let resp = server
        .client
        .head(server.url("/b/text"))
        .send()
        .await
        .expect("head");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok()),
        Some("6")
    );
    assert_eq!(
        resp.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("binary/octet-stream")
    );
    assert!(resp.headers().get("last-modified").is_some());

    server.close().await;
}

#[tokio::test]
async fn test_should_serve_byte_ranges_as_partial_content() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;
    server.put_object("b", "image", &vec![7_u8; 65536], &[]).await;

    let resp = server
        .client
        .get(server.url("/b/image"))
        .header("range", "bytes=0-99")
        .send()
        .await
        .expect("range get");
    assert_eq!(resp.status(), 206);
    assert_eq!(
        resp.headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok()),
        Some("100")
    );
    assert_eq!(
        resp.headers()
            .get("accept-ranges")
            .and_then(|v| v.to_str().ok()),
        Some("bytes")
    );
    assert_eq!(
        resp.headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok()),
        Some("bytes 0-99/65536")
    );
    assert_eq!(resp.bytes().await.expect("body").len(), 100);

    server.close().await;
}

#[tokio::test]
async fn test_should_reject_unsatisfiable_ranges_with_416() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;
    server.put_object("b", "small", b"abc", &[]).await;

    let resp = server
        .client
        .get(server.url("/b/small"))
        .header("range", "bytes=100-200")
        .send()
        .await
        .expect("range get");
    assert_eq!(resp.status(), 416);

    server.close().await;
}

#[tokio::test]
async fn test_should_round_trip_user_metadata() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;
    server
        .put_object(
            "b",
            "tagged",
            b"data",
            &[("x-amz-meta-somekey", "value"), ("content-type", "image/jpeg")],
        )
        .await;

    let resp = server
        .client
        .get(server.url("/b/tagged"))
        .send()
        .await
        .expect("get");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get("x-amz-meta-somekey")
            .and_then(|v| v.to_str().ok()),
        Some("value")
    );
    assert_eq!(
        resp.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("image/jpeg")
    );

    server.close().await;
}

#[tokio::test]
async fn test_should_preserve_metadata_on_copy_without_directive() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;
    server
        .put_object(
            "b",
            "source",
            b"jpeg bytes",
            &[("x-amz-meta-somekey", "value"), ("content-type", "image/jpeg")],
        )
        .await;

    let resp = server
        .client
        .put(server.url("/b/copy"))
        .header("x-amz-copy-source", "/b/source")
        .send()
        .await
        .expect("copy");
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.expect("body");
    assert!(body.contains("<CopyObjectResult"));
    assert!(body.contains("<ETag>"));

    let resp = server
        .client
        .head(server.url("/b/copy"))
        .send()
        .await
        .expect("head copy");
    assert_eq!(
        resp.headers()
            .get("x-amz-meta-somekey")
            .and_then(|v| v.to_str().ok()),
        Some("value")
    );
    assert_eq!(
        resp.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("image/jpeg")
    );

    server.close().await;
}

#[tokio::test]
async fn test_should_reject_copy_onto_itself_without_replace() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;
    server.put_object("b", "key", b"data", &[]).await;

    let resp = server
        .client
        .put(server.url("/b/key"))
        .header("x-amz-copy-source", "/b/key")
        .send()
        .await
        .expect("self copy");
    assert_eq!(resp.status(), 400);
    assert!(
        resp.text()
            .await
            .expect("body")
            .contains("<Code>InvalidRequest</Code>")
    );

    // The same copy with REPLACE is legal.
    let resp = server
        .client
        .put(server.url("/b/key"))
        .header("x-amz-copy-source", "/b/key")
        .header("x-amz-metadata-directive", "REPLACE")
        .header("x-amz-meta-fresh", "yes")
        .send()
        .await
        .expect("replace copy");
    assert_eq!(resp.status(), 200);

    server.close().await;
}

#[tokio::test]
async fn test_should_verify_content_md5_on_put() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;

    let resp = server
        .client
        .put(server.url("/b/checked"))
        .header("content-md5", "AAAAAAAAAAAAAAAAAAAAAA==")
        .body(&b"Hello!"[..])
        .send()
        .await
        .expect("put");
    assert_eq!(resp.status(), 400);
    assert!(
        resp.text()
            .await
            .expect("body")
            .contains("<Code>InvalidDigest</Code>")
    );

    // The failed write left nothing behind.
    let resp = server
        .client
        .get(server.url("/b/checked"))
        .send()
        .await
        .expect("get");
    assert_eq!(resp.status(), 404);

    server.close().await;
}

#[tokio::test]
async fn test_should_delete_objects_idempotently() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;
    server.put_object("b", "doomed", b"x", &[]).await;

    let resp = server
        .client
        .delete(server.url("/b/doomed"))
        .send()
        .await
        .expect("delete");
    assert_eq!(resp.status(), 204);

    // Deleting again still answers 204.
    let resp = server
        .client
        .delete(server.url("/b/doomed"))
        .send()
        .await
        .expect("repeat delete");
    assert_eq!(resp.status(), 204);

    server.close().await;
}

#[tokio::test]
async fn test_should_bulk_delete_reporting_absent_keys_as_deleted() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;
    server.put_object("b", "real", b"x", &[]).await;

    let body = "<Delete>\
                  <Object><Key>real</Key></Object>\
                  <Object><Key>never-existed</Key></Object>\
                </Delete>";
    let resp = server
        .client
        .post(server.url("/b?delete"))
        .body(body)
        .send()
        .await
        .expect("bulk delete");
    assert_eq!(resp.status(), 200);
    let text = resp.text().await.expect("body");
    assert!(text.contains("<Deleted><Key>real</Key></Deleted>"));
    assert!(text.contains("<Deleted><Key>never-existed</Key></Deleted>"));
    assert!(!text.contains("<Error>"));

    server.close().await;
}

#[tokio::test]
async fn test_should_store_nested_keys_and_get_them_back() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;
    server
        .put_object("b", "photos/2024/march/cat.jpg", b"meow", &[])
        .await;

    let resp = server
        .client
        .get(server.url("/b/photos/2024/march/cat.jpg"))
        .send()
        .await
        .expect("get");
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.bytes().await.expect("body").as_ref(), b"meow");

    server.close().await;
}
