//! Alert path: datagram → matcher → mailer, independent of the buffer

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use logman::actors::listener::{bind_socket, spawn_listeners};
use logman::alerts::AlertMatcher;
use logman::store::memory::MemoryStore;
use pretty_assertions::assert_eq;

use crate::helpers::*;

const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

#[tokio::test]
async fn matching_datagram_triggers_exactly_one_mail() {
    let dir = tempfile::tempdir().unwrap();
    let coordinator = spawn_test_coordinator(dir.path(), Arc::new(MemoryStore::new()));

    let mailer = Arc::new(RecordingMailer::default());
    let matcher = Arc::new(
        AlertMatcher::new(&[email_rule("ERROR.*", "error seen", "ops@x")], mailer.clone())
            .unwrap(),
    );

    let socket = Arc::new(bind_socket(LOCALHOST, 0).await.unwrap());
    let addr = socket.local_addr().unwrap();
    let _tasks = spawn_listeners(socket, 1, coordinator.clone(), matcher);

    let sender = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    sender.send_to(b"ERROR disk full", addr).unwrap();
    sender.send_to(b"INFO all fine", addr).unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0], (
        "ops@x".to_string(),
        "error seen".to_string(),
        "ERROR disk full".to_string(),
    ));
    drop(sent);

    // the non-alerting line still reached the buffer pipeline
    let stats = coordinator.stats().await.unwrap();
    assert_eq!(stats.lines_received, 2);

    coordinator.shutdown().await;
}

#[tokio::test]
async fn mailer_failure_is_swallowed_and_ingestion_continues() {
    let dir = tempfile::tempdir().unwrap();
    let coordinator = spawn_test_coordinator(dir.path(), Arc::new(MemoryStore::new()));

    let mailer = Arc::new(BrokenMailer::new());
    let matcher = Arc::new(
        AlertMatcher::new(&[email_rule("ERROR.*", "error seen", "ops@x")], mailer.clone())
            .unwrap(),
    );

    let socket = Arc::new(bind_socket(LOCALHOST, 0).await.unwrap());
    let addr = socket.local_addr().unwrap();
    let _tasks = spawn_listeners(socket, 1, coordinator.clone(), matcher);

    let sender = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    sender.send_to(b"ERROR one", addr).unwrap();
    sender.send_to(b"ERROR two", addr).unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;

    // both sends were attempted, both failures swallowed
    assert_eq!(*mailer.attempts.lock().unwrap(), 2);

    // the buffer pipeline never saw the failures
    let stats = coordinator.stats().await.unwrap();
    assert_eq!(stats.lines_received, 2);

    coordinator.flush_now().await;
    let content = std::fs::read_to_string(dir.path().join("temp.txt")).unwrap();
    assert_eq!(content, "\nERROR one\nERROR two");

    coordinator.shutdown().await;
}
