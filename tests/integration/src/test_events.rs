//! Event-bus behaviour observed against a live server.

use std::sync::{Arc, Mutex};

use s3dock_core::EventName;

use crate::TestServer;

#[tokio::test]
async fn test_should_emit_events_in_mutation_order() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;

    let seen: Arc<Mutex<Vec<(EventName, String)>>> = Arc::new(Mutex::new(Vec::new()));
    {
        let seen = Arc::clone(&seen);
        server.events().subscribe(move |record| {
            seen.lock()
                .expect("lock")
                .push((record.event_name, record.object_key.clone()));
        });
    }

    server.put_object("b", "one", b"data", &[]).await;

    let resp = server
        .client
        .put(server.url("/b/two"))
        .header("x-amz-copy-source", "/b/one")
        .send()
        .await
        .expect("copy");
    assert_eq!(resp.status(), 200);

    let resp = server
        .client
        .delete(server.url("/b/one"))
        .send()
        .await
        .expect("delete");
    assert_eq!(resp.status(), 204);

    let seen = seen.lock().expect("lock");
    assert_eq!(
        seen.as_slice(),
        &[
            (EventName::ObjectCreatedPut, "one".to_owned()),
            (EventName::ObjectCreatedCopy, "two".to_owned()),
            (EventName::ObjectRemovedDelete, "one".to_owned()),
        ]
    );
    drop(seen);

    server.close().await;
}

#[tokio::test]
async fn test_should_carry_size_and_etag_on_creation_events() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;

    let captured = Arc::new(Mutex::new(None));
    {
        let captured = Arc::clone(&captured);
        server.events().subscribe(move |record| {
            *captured.lock().expect("lock") = Some(record.clone());
        });
    }

    server.put_object("b", "sized", b"Hello!", &[]).await;

    let record = captured
        .lock()
        .expect("lock")
        .clone()
        .expect("event should have fired");
    assert_eq!(record.event_name, EventName::ObjectCreatedPut);
    assert_eq!(record.bucket_name, "b");
    assert_eq!(record.object_size, Some(6));
    assert_eq!(
        record.object_etag.as_deref(),
        Some("952d2c56d0485958336747bcdd98590d")
    );

    server.close().await;
}

#[tokio::test]
async fn test_should_not_emit_for_failed_or_noop_mutations() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;

    let count = Arc::new(Mutex::new(0_u32));
    {
        let count = Arc::clone(&count);
        server.events().subscribe(move |_| {
            *count.lock().expect("lock") += 1;
        });
    }

    // A put that fails digest validation never publishes.
    let resp = server
        .client
        .put(server.url("/b/rejected"))
        .header("content-md5", "AAAAAAAAAAAAAAAAAAAAAA==")
        .body(&b"data"[..])
        .send()
        .await
        .expect("bad put");
    assert_eq!(resp.status(), 400);

    // Deleting an absent key answers 204 but emits nothing.
    let resp = server
        .client
        .delete(server.url("/b/never-existed"))
        .send()
        .await
        .expect("noop delete");
    assert_eq!(resp.status(), 204);

    assert_eq!(*count.lock().expect("lock"), 0);

    server.close().await;
}

#[tokio::test]
async fn test_should_support_filtered_subscriptions() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;

    let deletes = Arc::new(Mutex::new(Vec::new()));
    {
        let deletes = Arc::clone(&deletes);
        server
            .events()
            .subscribe_to(EventName::ObjectRemovedDelete, move |record| {
                deletes.lock().expect("lock").push(record.object_key.clone());
            });
    }

    server.put_object("b", "kept", b"1", &[]).await;
    server.put_object("b", "dropped", b"2", &[]).await;
    server
        .client
        .delete(server.url("/b/dropped"))
        .send()
        .await
        .expect("delete");

    assert_eq!(deletes.lock().expect("lock").as_slice(), &["dropped".to_owned()]);

    server.close().await;
}

#[tokio::test]
async fn test_should_stop_delivery_after_cancellation() {
    let server = TestServer::start().await;
    server.create_bucket("b").await;

    let count = Arc::new(Mutex::new(0_u32));
    let handle = {
        let count = Arc::clone(&count);
        server.events().subscribe(move |_| {
            *count.lock().expect("lock") += 1;
        })
    };

    server.put_object("b", "first", b"1", &[]).await;
    handle.cancel();
    server.put_object("b", "second", b"2", &[]).await;

    assert_eq!(*count.lock().expect("lock"), 1);

    server.close().await;
}
