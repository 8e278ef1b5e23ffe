//! Static-website routing over the wire.

use crate::TestServer;

const WEBSITE_XML: &str = "<WebsiteConfiguration>\
      <IndexDocument><Suffix>index.html</Suffix></IndexDocument>\
    </WebsiteConfiguration>";

async fn website_server() -> TestServer {
    let server = TestServer::start().await;
    server.create_bucket("site").await;
    let resp = server
        .client
        .put(server.url("/site?website"))
        .body(WEBSITE_XML)
        .send()
        .await
        .expect("put website");
    assert_eq!(resp.status(), 204);
    server
        .put_object(
            "site",
            "index.html",
            b"<html>home</html>",
            &[("content-type", "text/html")],
        )
        .await;
    server
}

#[tokio::test]
async fn test_should_serve_the_index_document_for_the_bucket_root() {
    let server = website_server().await;

    let resp = server
        .client
        .get(server.url("/site/"))
        .send()
        .await
        .expect("get root");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("text/html")
    );
    assert_eq!(resp.bytes().await.expect("body").as_ref(), b"<html>home</html>");

    server.close().await;
}

#[tokio::test]
async fn test_should_serve_an_html_404_for_missing_keys() {
    let server = website_server().await;

    let resp = server
        .client
        .get(server.url("/site/missing"))
        .send()
        .await
        .expect("get missing");
    assert_eq!(resp.status(), 404);
    assert_eq!(
        resp.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("text/html")
    );
    let body = resp.text().await.expect("body");
    assert!(body.contains("404 Not Found"));

    server.close().await;
}

#[tokio::test]
async fn test_should_serve_nested_index_documents() {
    let server = website_server().await;
    server
        .put_object(
            "site",
            "docs/index.html",
            b"<html>docs</html>",
            &[("content-type", "text/html")],
        )
        .await;

    let resp = server
        .client
        .get(server.url("/site/docs/"))
        .send()
        .await
        .expect("get docs");
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.bytes().await.expect("body").as_ref(), b"<html>docs</html>");

    server.close().await;
}

#[tokio::test]
async fn test_should_keep_listing_queries_working_on_website_buckets() {
    let server = website_server().await;

    // SDK-style listing still reaches the listing engine.
    let resp = server
        .client
        .get(server.url("/site?list-type=2"))
        .send()
        .await
        .expect("list");
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.expect("body");
    assert!(body.contains("<ListBucketResult"));
    assert!(body.contains("<Key>index.html</Key>"));

    server.close().await;
}

#[tokio::test]
async fn test_should_round_trip_the_website_configuration_document() {
    let server = website_server().await;

    let resp = server
        .client
        .get(server.url("/site?website"))
        .send()
        .await
        .expect("get website");
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.expect("body");
    assert!(body.contains("<Suffix>index.html</Suffix>"));

    let resp = server
        .client
        .delete(server.url("/site?website"))
        .send()
        .await
        .expect("delete website");
    assert_eq!(resp.status(), 204);

    // With the configuration gone, the root is a plain listing again.
    let resp = server
        .client
        .get(server.url("/site"))
        .send()
        .await
        .expect("get root");
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.expect("body").contains("<ListBucketResult"));

    server.close().await;
}

#[tokio::test]
async fn test_should_enable_website_mode_globally_via_options() {
    let server = TestServer::start_with(|overrides| {
        overrides.index_document = Some("index.html".to_owned());
    })
    .await;
    server.create_bucket("anybucket").await;
    server
        .put_object(
            "anybucket",
            "index.html",
            b"<html>global</html>",
            &[("content-type", "text/html")],
        )
        .await;

    let resp = server
        .client
        .get(server.url("/anybucket/"))
        .send()
        .await
        .expect("get root");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.bytes().await.expect("body").as_ref(),
        b"<html>global</html>"
    );

    server.close().await;
}
