//! Subscriber connection pool (best-effort fan-out writer).
//!
//! # Responsibilities
//! - Track the set of live subscriber channels
//! - Broadcast each structured payload to every subscriber, in pool order
//! - Prune subscribers whose channel reports it is closed
//!
//! # Design Decisions
//! - `RwLock`: broadcasts share the lock, subscribe/unsubscribe take it exclusively
//! - Closed channels found during a broadcast are removed after the read lock is released
//! - Per-subscriber failures never reach the log producer; the write always
//!   reports the full payload length

use std::fmt;
use std::io;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use uuid::Uuid;

use crate::observability::metrics;
use crate::sink::Sink;

/// Identity of a subscriber connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    /// Generate a new random ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Kind of message sent over a subscriber channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Binary,
}

/// Failure sending one message to one subscriber.
#[derive(Debug, Error)]
pub enum SendError {
    /// The channel is closing or closed; the subscriber will be pruned.
    #[error("subscriber channel closed")]
    Closed,

    /// The subscriber cannot accept the message right now; it is dropped.
    #[error("subscriber backpressure")]
    Backpressure,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl SendError {
    /// Only closed channels trigger removal from the pool.
    pub fn is_closed(&self) -> bool {
        matches!(self, SendError::Closed)
    }

    fn reason(&self) -> &'static str {
        match self {
            SendError::Closed => "closed",
            SendError::Backpressure => "backpressure",
            SendError::Io(_) => "io",
        }
    }
}

/// A duplex channel to one remote log consumer.
///
/// Owned by the transport that accepted it; the pool only holds a shared
/// handle while subscribed.
pub trait Subscriber: Send + Sync {
    fn id(&self) -> SubscriberId;

    /// Sends one message. May apply the channel's own backpressure briefly but
    /// must not block indefinitely.
    fn send(&self, kind: MessageKind, payload: &[u8]) -> Result<(), SendError>;
}

/// Dynamic, best-effort multi-writer over subscriber channels.
#[derive(Default)]
pub struct ConnectionPool {
    conns: RwLock<Vec<Arc<dyn Subscriber>>>,
}

impl ConnectionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `conn` to all future broadcasts.
    ///
    /// Subscribing the same handle twice without removing it makes it receive
    /// every payload twice.
    pub fn subscribe(&self, conn: Arc<dyn Subscriber>) {
        let id = conn.id();
        let count = {
            let mut conns = self.conns.write();
            conns.push(conn);
            conns.len()
        };
        metrics::record_subscribers(count);
        tracing::debug!(subscriber = %id, subscribers = count, "Subscriber added");
    }

    /// Unsubscribe the first entry with `id`. Idempotent.
    ///
    /// Returns true if an entry was removed.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let removed = {
            let mut conns = self.conns.write();
            match conns.iter().position(|c| c.id() == id) {
                Some(index) => {
                    conns.remove(index);
                    Some(conns.len())
                }
                None => None,
            }
        };
        match removed {
            Some(count) => {
                metrics::record_subscribers(count);
                tracing::debug!(subscriber = %id, subscribers = count, "Subscriber removed");
                true
            }
            None => false,
        }
    }

    /// Send `payload` to every subscriber as one text message.
    ///
    /// Always returns `payload.len()`.
    pub fn broadcast(&self, payload: &[u8]) -> usize {
        let mut closed = Vec::new();
        {
            let conns = self.conns.read();
            for conn in conns.iter() {
                if let Err(e) = conn.send(MessageKind::Text, payload) {
                    metrics::record_send_failure(e.reason());
                    if e.is_closed() {
                        closed.push(conn.id());
                    }
                }
            }
        }
        metrics::record_broadcast();

        for id in closed {
            if self.unsubscribe(id) {
                tracing::debug!(subscriber = %id, "Pruned closed subscriber");
            }
        }
        payload.len()
    }

    /// Current number of subscriptions.
    pub fn len(&self) -> usize {
        self.conns.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.conns.read().is_empty()
    }

    pub fn contains(&self, id: SubscriberId) -> bool {
        self.conns.read().iter().any(|c| c.id() == id)
    }

    /// IDs in pool order.
    pub fn subscriber_ids(&self) -> Vec<SubscriberId> {
        self.conns.read().iter().map(|c| c.id()).collect()
    }
}

impl Sink for ConnectionPool {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.broadcast(buf))
    }
}

impl fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("subscribers", &self.subscriber_ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Recorder {
        id: SubscriberId,
        received: Mutex<Vec<Vec<u8>>>,
        closed: AtomicBool,
        busy: AtomicBool,
    }

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                id: SubscriberId::new(),
                received: Mutex::new(Vec::new()),
                closed: AtomicBool::new(false),
                busy: AtomicBool::new(false),
            })
        }

        fn received(&self) -> Vec<Vec<u8>> {
            self.received.lock().clone()
        }
    }

    impl Subscriber for Recorder {
        fn id(&self) -> SubscriberId {
            self.id
        }

        fn send(&self, _kind: MessageKind, payload: &[u8]) -> Result<(), SendError> {
            if self.closed.load(Ordering::SeqCst) {
                return Err(SendError::Closed);
            }
            if self.busy.load(Ordering::SeqCst) {
                return Err(SendError::Backpressure);
            }
            self.received.lock().push(payload.to_vec());
            Ok(())
        }
    }

    #[test]
    fn empty_broadcast_succeeds() {
        let pool = ConnectionPool::new();
        assert_eq!(pool.broadcast(b"hello"), 5);
        assert!(pool.is_empty());
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let pool = ConnectionPool::new();
        let a = Recorder::new();
        pool.subscribe(a.clone());
        assert!(pool.unsubscribe(a.id));
        assert!(!pool.unsubscribe(a.id));
        assert!(!pool.unsubscribe(SubscriberId::new()));
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn unsubscribe_removes_first_match_only() {
        let pool = ConnectionPool::new();
        let a = Recorder::new();
        pool.subscribe(a.clone());
        pool.subscribe(a.clone());
        pool.broadcast(b"x");
        assert_eq!(a.received().len(), 2);

        pool.unsubscribe(a.id);
        assert_eq!(pool.len(), 1);
        assert!(pool.contains(a.id));
    }

    #[test]
    fn backpressure_does_not_prune() {
        let pool = ConnectionPool::new();
        let a = Recorder::new();
        let b = Recorder::new();
        pool.subscribe(a.clone());
        pool.subscribe(b.clone());

        a.busy.store(true, Ordering::SeqCst);
        assert_eq!(pool.broadcast(b"p"), 1);
        assert!(pool.contains(a.id));
        assert!(a.received().is_empty());
        assert_eq!(b.received(), vec![b"p".to_vec()]);
    }

    #[test]
    fn closed_subscriber_is_pruned_after_broadcast() {
        let pool = ConnectionPool::new();
        let a = Recorder::new();
        let b = Recorder::new();
        pool.subscribe(a.clone());
        pool.subscribe(b.clone());

        a.closed.store(true, Ordering::SeqCst);
        pool.broadcast(b"p2");
        assert_eq!(pool.subscriber_ids(), vec![b.id]);
        assert_eq!(b.received(), vec![b"p2".to_vec()]);
    }

    #[test]
    fn preserves_subscription_order() {
        let pool = ConnectionPool::new();
        let subs: Vec<_> = (0..4).map(|_| Recorder::new()).collect();
        for s in &subs {
            pool.subscribe(s.clone());
        }
        pool.unsubscribe(subs[1].id);
        assert_eq!(pool.subscriber_ids(), vec![subs[0].id, subs[2].id, subs[3].id]);
    }
}
