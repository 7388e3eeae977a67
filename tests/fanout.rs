//! Connection pool membership and best-effort broadcast.

use logfan::{ConnectionPool, Field};

mod common;
use common::RecordingSubscriber;

#[test]
fn membership_tracks_subscribes_minus_unsubscribes() {
    let pool = ConnectionPool::new();
    let subs: Vec<_> = (0..5).map(|_| RecordingSubscriber::new()).collect();

    for s in &subs {
        pool.subscribe(s.clone());
    }
    pool.unsubscribe(subs[0].id());
    pool.unsubscribe(subs[3].id());
    pool.unsubscribe(subs[3].id());

    assert_eq!(pool.len(), 3);
    assert_eq!(pool.subscriber_ids(), vec![subs[1].id(), subs[2].id(), subs[4].id()]);
}

#[test]
fn zero_subscriber_broadcast_is_a_no_op() {
    let pool = ConnectionPool::new();
    assert_eq!(pool.broadcast(b"{}"), 2);
    assert!(pool.is_empty());
}

#[test]
fn closed_subscriber_is_pruned_and_others_keep_receiving() {
    let pool = ConnectionPool::new();
    let a = RecordingSubscriber::new();
    let b = RecordingSubscriber::new();
    pool.subscribe(a.clone());
    pool.subscribe(b.clone());

    pool.broadcast(b"P1");
    assert_eq!(a.received(), vec![b"P1".to_vec()]);
    assert_eq!(b.received(), vec![b"P1".to_vec()]);

    a.close();
    assert_eq!(pool.broadcast(b"P2"), 2);
    assert!(!pool.contains(a.id()));
    assert_eq!(b.received(), vec![b"P1".to_vec(), b"P2".to_vec()]);

    pool.broadcast(b"P3");
    assert_eq!(a.received(), vec![b"P1".to_vec()]);
    assert_eq!(b.received(), vec![b"P1".to_vec(), b"P2".to_vec(), b"P3".to_vec()]);
}

#[test]
fn transport_and_pool_can_both_remove() {
    let (assembly, _console, _clock) = common::manual_assembly();
    let a = RecordingSubscriber::new();
    assembly.add_subscriber(a.clone());

    a.close();
    assembly.logger().named("job").named("status").info("closing", &[]);
    assert!(assembly.pool().is_empty());

    assembly.remove_subscriber(a.id());
    assert!(assembly.pool().is_empty());
}

#[test]
fn concurrent_logging_and_subscription_changes() {
    let (assembly, _console, _clock) = common::manual_assembly();
    let steady = RecordingSubscriber::new();
    assembly.add_subscriber(steady.clone());
    let status = assembly.logger().named("job").named("status");

    std::thread::scope(|scope| {
        for t in 0..4 {
            let status = status.clone();
            scope.spawn(move || {
                for i in 0..250 {
                    status.info("progress", &[Field::new("thread", t), Field::new("i", i)]);
                }
            });
        }
        let assembly = &assembly;
        scope.spawn(move || {
            for _ in 0..100 {
                let churn = RecordingSubscriber::new();
                assembly.add_subscriber(churn.clone());
                assembly.remove_subscriber(churn.id());
            }
        });
    });

    assert_eq!(steady.received().len(), 1000);
    assert_eq!(assembly.pool().len(), 1);
}
