//! In-process notification bus for object mutations.
//!
//! Mutating operations publish one [`EventRecord`] after the on-disk rename
//! has succeeded and before the HTTP response is flushed. Delivery is
//! synchronous, in subscription order, and isolated: one misbehaving
//! subscriber cannot affect the others, and nothing backpressures the
//! publisher.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::warn;

/// The kinds of events the store emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    /// An object was written via PutObject or multipart completion.
    ObjectCreatedPut,
    /// An object was written via CopyObject.
    ObjectCreatedCopy,
    /// An object was removed.
    ObjectRemovedDelete,
}

impl EventName {
    /// The wire spelling of this event name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ObjectCreatedPut => "ObjectCreated:Put",
            Self::ObjectCreatedCopy => "ObjectCreated:Copy",
            Self::ObjectRemovedDelete => "ObjectRemoved:Delete",
        }
    }
}

impl std::fmt::Display for EventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One emitted notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// What happened.
    pub event_name: EventName,
    /// The bucket involved.
    pub bucket_name: String,
    /// The object key involved.
    pub object_key: String,
    /// Object size, present for creations.
    pub object_size: Option<u64>,
    /// Unquoted hex etag, present for creations.
    pub object_etag: Option<String>,
}

type Handler = Box<dyn Fn(&EventRecord) + Send + Sync>;

struct Subscriber {
    id: u64,
    handler: Handler,
}

#[derive(Default)]
struct BusState {
    subscribers: Vec<Subscriber>,
}

/// The bus itself. Cloning shares the subscriber list.
#[derive(Clone, Default)]
pub struct EventBus {
    state: Arc<Mutex<BusState>>,
    next_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.state.lock().subscribers.len())
            .finish()
    }
}

/// Cancellation handle returned by [`EventBus::subscribe`].
///
/// Dropping the handle does not unsubscribe; call [`cancel`](Self::cancel).
/// Cancellation is idempotent.
pub struct SubscriptionHandle {
    id: u64,
    state: Arc<Mutex<BusState>>,
}

impl std::fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("id", &self.id)
            .finish()
    }
}

impl SubscriptionHandle {
    /// Detach the subscriber from the bus.
    pub fn cancel(&self) {
        self.state.lock().subscribers.retain(|s| s.id != self.id);
    }
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for every event. Handlers run synchronously on
    /// the publishing task, in subscription order.
    pub fn subscribe(
        &self,
        handler: impl Fn(&EventRecord) + Send + Sync + 'static,
    ) -> SubscriptionHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.state.lock().subscribers.push(Subscriber {
            id,
            handler: Box::new(handler),
        });
        SubscriptionHandle {
            id,
            state: Arc::clone(&self.state),
        }
    }

    /// Register a handler for events with the given name only.
    pub fn subscribe_to(
        &self,
        event_name: EventName,
        handler: impl Fn(&EventRecord) + Send + Sync + 'static,
    ) -> SubscriptionHandle {
        self.subscribe_filtered(move |record| record.event_name == event_name, handler)
    }

    /// Register a handler gated by an arbitrary predicate over the record
    /// (event name, bucket, key, or anything else it carries).
    pub fn subscribe_filtered(
        &self,
        filter: impl Fn(&EventRecord) -> bool + Send + Sync + 'static,
        handler: impl Fn(&EventRecord) + Send + Sync + 'static,
    ) -> SubscriptionHandle {
        self.subscribe(move |record| {
            if filter(record) {
                handler(record);
            }
        })
    }

    /// Deliver a record to all current subscribers.
    ///
    /// A panicking subscriber is logged and skipped; the rest still run.
    pub fn publish(&self, record: &EventRecord) {
        let state = self.state.lock();
        for subscriber in &state.subscribers {
            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                (subscriber.handler)(record);
            }));
            if outcome.is_err() {
                warn!(
                    event = %record.event_name,
                    bucket = %record.bucket_name,
                    key = %record.object_key,
                    "event subscriber panicked; continuing with remaining subscribers"
                );
            }
        }
    }

    /// Drop every subscription. Called on server close.
    pub fn detach_all(&self) {
        self.state.lock().subscribers.clear();
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().subscribers.len()
    }
}
