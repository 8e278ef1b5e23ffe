//! Bucket lifecycle over the wire.

use crate::TestServer;

#[tokio::test]
async fn test_should_create_list_and_delete_a_bucket() {
    let server = TestServer::start().await;

    server.create_bucket("alpha").await;

    let resp = server
        .client
        .get(server.url("/"))
        .send()
        .await
        .expect("list buckets");
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.expect("body");
    assert!(body.contains("<ListAllMyBucketsResult"));
    assert!(body.contains("<Name>alpha</Name>"));

    let resp = server
        .client
        .delete(server.url("/alpha"))
        .send()
        .await
        .expect("delete bucket");
    assert_eq!(resp.status(), 204);

    // Listing the deleted bucket answers NoSuchBucket.
    let resp = server
        .client
        .get(server.url("/alpha"))
        .send()
        .await
        .expect("list deleted");
    assert_eq!(resp.status(), 404);
    assert!(resp.text().await.expect("body").contains("<Code>NoSuchBucket</Code>"));

    server.close().await;
}

#[tokio::test]
async fn test_should_accept_repeated_bucket_creation() {
    let server = TestServer::start().await;
    server.create_bucket("alpha").await;
    server.create_bucket("alpha").await;
    server.close().await;
}

#[tokio::test]
async fn test_should_reject_invalid_bucket_names() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .put(server.url("/UpperCase"))
        .send()
        .await
        .expect("create");
    assert_eq!(resp.status(), 400);
    assert!(
        resp.text()
            .await
            .expect("body")
            .contains("<Code>InvalidBucketName</Code>")
    );

    server.close().await;
}

#[tokio::test]
async fn test_should_refuse_to_delete_a_full_bucket() {
    let server = TestServer::start().await;
    server.create_bucket("full").await;
    for i in 0..20 {
        server
            .put_object("full", &format!("key-{i:02}"), b"data", &[])
            .await;
    }

    let resp = server
        .client
        .delete(server.url("/full"))
        .send()
        .await
        .expect("delete");
    assert_eq!(resp.status(), 409);
    assert!(
        resp.text()
            .await
            .expect("body")
            .contains("<Code>BucketNotEmpty</Code>")
    );

    server.close().await;
}

#[tokio::test]
async fn test_should_answer_head_bucket_by_existence() {
    let server = TestServer::start().await;
    server.create_bucket("present").await;

    let resp = server
        .client
        .head(server.url("/present"))
        .send()
        .await
        .expect("head");
    assert_eq!(resp.status(), 200);

    let resp = server
        .client
        .head(server.url("/absent"))
        .send()
        .await
        .expect("head absent");
    assert_eq!(resp.status(), 404);

    server.close().await;
}

#[tokio::test]
async fn test_should_answer_canned_bucket_subresources() {
    let server = TestServer::start().await;
    server.create_bucket("alpha").await;

    let resp = server
        .client
        .get(server.url("/alpha?location"))
        .send()
        .await
        .expect("location");
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.expect("body").contains("LocationConstraint"));

    let resp = server
        .client
        .get(server.url("/alpha?acl"))
        .send()
        .await
        .expect("acl");
    assert_eq!(resp.status(), 200);
    assert!(
        resp.text()
            .await
            .expect("body")
            .contains("<Permission>FULL_CONTROL</Permission>")
    );

    let resp = server
        .client
        .get(server.url("/alpha?versioning"))
        .send()
        .await
        .expect("versioning");
    assert_eq!(resp.status(), 200);
    assert!(
        resp.text()
            .await
            .expect("body")
            .contains("VersioningConfiguration")
    );

    let resp = server
        .client
        .get(server.url("/alpha?policy"))
        .send()
        .await
        .expect("policy");
    assert_eq!(resp.status(), 404);
    assert!(
        resp.text()
            .await
            .expect("body")
            .contains("<Code>NoSuchBucketPolicy</Code>")
    );

    server.close().await;
}
