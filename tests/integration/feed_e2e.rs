//! Feed actor against a real TCP listener.

use std::time::Duration;

use htnview::actors::FeedActor;
use htnview::tea::Message;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::fixtures::{envelope_line, leaf, node, tea_plan};

const WAIT: Duration = Duration::from_secs(5);
const RETRY: Duration = Duration::from_millis(20);

async fn next(rx: &mut mpsc::UnboundedReceiver<Message>) -> Message {
    timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for feed message")
        .expect("feed channel closed")
}

#[tokio::test]
async fn test_snapshots_flow_from_socket_to_messages() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _handle = FeedActor::new(addr, tx).with_reconnect_interval(RETRY).spawn();

    let (mut socket, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();
    assert!(matches!(next(&mut rx).await, Message::FeedConnected));

    let updated = node("Make tea", "completed", vec![leaf("Serve", "completed")]);
    let mut payload = envelope_line(Some(&tea_plan()));
    payload.push_str("not json at all\n");
    payload.push_str("{\"event\":\"heartbeat\"}\n");
    payload.push_str(&envelope_line(Some(&updated)));
    socket.write_all(payload.as_bytes()).await.unwrap();

    match next(&mut rx).await {
        Message::SnapshotReceived(Some(tree)) => assert_eq!(tree, tea_plan()),
        other => panic!("unexpected message: {:?}", other),
    }
    match next(&mut rx).await {
        Message::SnapshotReceived(Some(tree)) => assert_eq!(tree, updated),
        other => panic!("unexpected message: {:?}", other),
    }
}

#[tokio::test]
async fn test_server_close_reports_disconnect_and_reconnects() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _handle = FeedActor::new(addr, tx).with_reconnect_interval(RETRY).spawn();

    let (socket, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();
    assert!(matches!(next(&mut rx).await, Message::FeedConnected));
    drop(socket);

    assert!(matches!(next(&mut rx).await, Message::FeedDisconnected(_)));

    let (_socket, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();
    assert!(matches!(next(&mut rx).await, Message::FeedConnected));
}

#[tokio::test]
async fn test_unreachable_planner_reports_reason() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().to_string()
    };
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _handle = FeedActor::new(addr, tx)
        .with_reconnect_interval(Duration::from_secs(60))
        .spawn();

    match next(&mut rx).await {
        Message::FeedDisconnected(reason) => assert!(!reason.is_empty()),
        other => panic!("unexpected message: {:?}", other),
    }
}

#[tokio::test]
async fn test_shutdown_releases_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = FeedActor::new(addr, tx).with_reconnect_interval(RETRY).spawn();

    let (mut socket, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();
    assert!(matches!(next(&mut rx).await, Message::FeedConnected));

    handle.shutdown();
    assert!(handle.is_cancelled());

    let mut buf = [0u8; 16];
    let read = timeout(WAIT, socket.read(&mut buf)).await.unwrap().unwrap();
    assert_eq!(read, 0, "actor should close its end of the socket");
}

#[tokio::test]
async fn test_dropping_handle_stops_actor() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = FeedActor::new(addr, tx).with_reconnect_interval(RETRY).spawn();

    let (mut socket, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();
    assert!(matches!(next(&mut rx).await, Message::FeedConnected));

    drop(handle);

    let mut buf = [0u8; 16];
    let read = timeout(WAIT, socket.read(&mut buf)).await.unwrap().unwrap();
    assert_eq!(read, 0);
}
