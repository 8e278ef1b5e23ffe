//! Listing semantics over the wire.

use crate::TestServer;

async fn seeded_server() -> TestServer {
    let server = TestServer::start().await;
    server.create_bucket("b").await;
    for key in ["akey1", "akey2", "akey3", "key/key1", "key1", "key2", "key3"] {
        server.put_object("b", key, b"x", &[]).await;
    }
    server
}

#[tokio::test]
async fn test_should_group_delimited_keys_into_common_prefixes() {
    let server = seeded_server().await;

    let resp = server
        .client
        .get(server.url("/b?delimiter=/"))
        .send()
        .await
        .expect("list");
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.expect("body");

    assert_eq!(body.matches("<Contents>").count(), 6);
    assert!(body.contains("<CommonPrefixes><Prefix>key/</Prefix></CommonPrefixes>"));
    assert!(body.contains("<IsTruncated>false</IsTruncated>"));

    server.close().await;
}

#[tokio::test]
async fn test_should_filter_by_prefix() {
    let server = seeded_server().await;

    let resp = server
        .client
        .get(server.url("/b?prefix=akey"))
        .send()
        .await
        .expect("list");
    let body = resp.text().await.expect("body");
    assert_eq!(body.matches("<Contents>").count(), 3);
    assert!(body.contains("<Key>akey1</Key>"));
    assert!(!body.contains("<Key>key1</Key>"));

    server.close().await;
}

#[tokio::test]
async fn test_should_paginate_v1_with_markers() {
    let server = seeded_server().await;

    let resp = server
        .client
        .get(server.url("/b?max-keys=3"))
        .send()
        .await
        .expect("first page");
    let body = resp.text().await.expect("body");
    assert_eq!(body.matches("<Contents>").count(), 3);
    assert!(body.contains("<IsTruncated>true</IsTruncated>"));
    assert!(body.contains("<NextMarker>akey3</NextMarker>"));

    let resp = server
        .client
        .get(server.url("/b?max-keys=10&marker=akey3"))
        .send()
        .await
        .expect("second page");
    let body = resp.text().await.expect("body");
    assert_eq!(body.matches("<Contents>").count(), 4);
    assert!(body.contains("<Key>key/key1</Key>"));
    assert!(body.contains("<IsTruncated>false</IsTruncated>"));

    server.close().await;
}

#[tokio::test]
async fn test_should_answer_v2_with_key_count_and_tokens() {
    let server = seeded_server().await;

    let resp = server
        .client
        .get(server.url("/b?list-type=2&max-keys=4"))
        .send()
        .await
        .expect("v2 list");
    let body = resp.text().await.expect("body");
    assert!(body.contains("<KeyCount>4</KeyCount>"));
    assert!(body.contains("<IsTruncated>true</IsTruncated>"));
    assert!(!body.contains("<Marker>"));

    let token_start = body
        .find("<NextContinuationToken>")
        .expect("token present")
        + "<NextContinuationToken>".len();
    let token_end = body[token_start..]
        .find('<')
        .expect("token terminator")
        + token_start;
    let token = &body[token_start..token_end];

    let resp = server
        .client
        .get(server.url(&format!("/b?list-type=2&continuation-token={token}")))
        .send()
        .await
        .expect("v2 second page");
    let body = resp.text().await.expect("body");
    assert!(body.contains("<KeyCount>3</KeyCount>"));
    assert!(body.contains("<IsTruncated>false</IsTruncated>"));

    server.close().await;
}

#[tokio::test]
async fn test_should_list_empty_bucket_with_zero_entries() {
    let server = TestServer::start().await;
    server.create_bucket("empty").await;

    let resp = server
        .client
        .get(server.url("/empty"))
        .send()
        .await
        .expect("list");
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.expect("body");
    assert!(!body.contains("<Contents>"));
    assert!(body.contains("<IsTruncated>false</IsTruncated>"));

    server.close().await;
}
