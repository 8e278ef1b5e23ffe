//! Multipart upload lifecycle over the wire.

use crate::TestServer;

fn extract(body: &str, tag: &str) -> String {
    let open = format!("<{tag}>");
    let start = body.find(&open).unwrap_or_else(|| panic!("no <{tag}>")) + open.len();
    let end = body[start..].find('<').expect("tag terminator") + start;
    body[start..end].to_owned()
}

#[tokio::test]
async fn test_should_assemble_parts_into_the_final_object() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;

    let resp = server
        .client
        .post(server.url("/b/assembled?uploads"))
        .header("content-type", "text/plain")
        .send()
        .await
        .expect("initiate");
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.expect("body");
    assert!(body.contains("<InitiateMultipartUploadResult"));
    let upload_id = extract(&body, "UploadId");

    let resp = server
        .client
        .put(server.url(&format!("/b/assembled?partNumber=1&uploadId={upload_id}")))
        .body(&b"hello "[..])
        .send()
        .await
        .expect("part 1");
    assert_eq!(resp.status(), 200);
    let etag1 = resp
        .headers()
        .get("etag")
        .and_then(|v| v.to_str().ok())
        .expect("etag")
        .to_owned();

    let resp = server
        .client
        .put(server.url(&format!("/b/assembled?partNumber=2&uploadId={upload_id}")))
        .body(&b"world"[..])
        .send()
        .await
        .expect("part 2");
    let etag2 = resp
        .headers()
        .get("etag")
        .and_then(|v| v.to_str().ok())
        .expect("etag")
        .to_owned();

    let complete = format!(
        "<CompleteMultipartUpload>\
           <Part><PartNumber>1</PartNumber><ETag>{etag1}</ETag></Part>\
           <Part><PartNumber>2</PartNumber><ETag>{etag2}</ETag></Part>\
         </CompleteMultipartUpload>"
    );
    let resp = server
        .client
        .post(server.url(&format!("/b/assembled?uploadId={upload_id}")))
        .body(complete)
        .send()
        .await
        .expect("complete");
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.expect("body");
    assert!(body.contains("<CompleteMultipartUploadResult"));

    // The assembled etag is a plain 32-hex MD5, quoted, no "-<n>" suffix.
    let etag = extract(&body, "ETag");
    let hex = etag.trim_matches('"');
    assert_eq!(hex.len(), 32);
    assert!(hex.bytes().all(|b| b.is_ascii_hexdigit()));

    let resp = server
        .client
        .get(server.url("/b/assembled"))
        .send()
        .await
        .expect("get assembled");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("text/plain")
    );
    assert_eq!(resp.bytes().await.expect("body").as_ref(), b"hello world");

    server.close().await;
}

#[tokio::test]
async fn test_should_reject_completion_with_out_of_order_parts() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;

    let resp = server
        .client
        .post(server.url("/b/key?uploads"))
        .send()
        .await
        .expect("initiate");
    let upload_id = extract(&resp.text().await.expect("body"), "UploadId");

    for n in [1, 2] {
        server
            .client
            .put(server.url(&format!("/b/key?partNumber={n}&uploadId={upload_id}")))
            .body(vec![b'x'; 8])
            .send()
            .await
            .expect("part");
    }

    let complete = "<CompleteMultipartUpload>\
           <Part><PartNumber>2</PartNumber></Part>\
           <Part><PartNumber>1</PartNumber></Part>\
         </CompleteMultipartUpload>";
    let resp = server
        .client
        .post(server.url(&format!("/b/key?uploadId={upload_id}")))
        .body(complete)
        .send()
        .await
        .expect("complete");
    assert_eq!(resp.status(), 400);
    assert!(
        resp.text()
            .await
            .expect("body")
            .contains("<Code>InvalidPartOrder</Code>")
    );

    server.close().await;
}

#[tokio::test]
async fn test_should_abort_an_upload_and_reject_further_parts() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;

    let resp = server
        .client
        .post(server.url("/b/key?uploads"))
        .send()
        .await
        .expect("initiate");
    let upload_id = extract(&resp.text().await.expect("body"), "UploadId");

    let resp = server
        .client
        .delete(server.url(&format!("/b/key?uploadId={upload_id}")))
        .send()
        .await
        .expect("abort");
    assert_eq!(resp.status(), 204);

    let resp = server
        .client
        .put(server.url(&format!("/b/key?partNumber=1&uploadId={upload_id}")))
        .body(&b"late"[..])
        .send()
        .await
        .expect("late part");
    assert_eq!(resp.status(), 404);
    assert!(
        resp.text()
            .await
            .expect("body")
            .contains("<Code>NoSuchUpload</Code>")
    );

    server.close().await;
}
