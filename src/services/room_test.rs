use super::*;
use serde_json::json;
use tokio::time::{Duration, timeout};

async fn recv_event(rx: &mut mpsc::Receiver<Event>) -> Event {
    timeout(Duration::from_millis(200), rx.recv())
        .await
        .expect("event receive timed out")
        .expect("event channel closed unexpectedly")
}

fn assert_no_event(rx: &mut mpsc::Receiver<Event>) {
    assert!(rx.try_recv().is_err(), "expected no event");
}

#[tokio::test]
async fn broadcast_reaches_only_members_of_that_room() {
    let rooms = Rooms::new();
    let (abc_id, xyz_id) = (Uuid::new_v4(), Uuid::new_v4());
    let (abc_tx, mut abc_rx) = mpsc::channel(8);
    let (xyz_tx, mut xyz_rx) = mpsc::channel(8);

    rooms.join("abc", abc_id, abc_tx).await;
    rooms.join("xyz", xyz_id, xyz_tx).await;

    let ev = Event::new("frame", json!({"n": 1}));
    assert_eq!(rooms.broadcast("abc", &ev, None).await, 1);

    assert_eq!(recv_event(&mut abc_rx).await, ev);
    assert_no_event(&mut xyz_rx);
}

#[tokio::test]
async fn broadcast_skips_excluded_sender() {
    let rooms = Rooms::new();
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let (tx_a, mut rx_a) = mpsc::channel(8);
    let (tx_b, mut rx_b) = mpsc::channel(8);
    rooms.join("abc", a, tx_a).await;
    rooms.join("abc", b, tx_b).await;

    let ev = Event::new("offer", json!({"sdp": "v=0"}));
    assert_eq!(rooms.broadcast("abc", &ev, Some(a)).await, 1);

    assert_eq!(recv_event(&mut rx_b).await.event, "offer");
    assert_no_event(&mut rx_a);
}

#[tokio::test]
async fn broadcast_to_unknown_room_reaches_nobody() {
    let rooms = Rooms::new();
    assert_eq!(rooms.broadcast("nobody-here", &Event::new("x", json!(null)), None).await, 0);
}

#[tokio::test]
async fn join_is_idempotent_and_multi_room() {
    let rooms = Rooms::new();
    let id = Uuid::new_v4();
    let (tx, _rx) = mpsc::channel(8);

    rooms.join("abc", id, tx.clone()).await;
    rooms.join("abc", id, tx.clone()).await;
    rooms.join("xyz", id, tx).await;

    assert_eq!(rooms.member_count("abc").await, 1);
    assert_eq!(rooms.rooms_of(id).await, vec!["abc".to_string(), "xyz".to_string()]);
}

#[tokio::test]
async fn leave_all_removes_member_and_drops_empty_rooms() {
    let rooms = Rooms::new();
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let (tx_a, _rx_a) = mpsc::channel(8);
    let (tx_b, _rx_b) = mpsc::channel(8);
    rooms.join("abc", a, tx_a.clone()).await;
    rooms.join("solo", a, tx_a).await;
    rooms.join("abc", b, tx_b).await;

    rooms.leave_all(a).await;

    assert!(rooms.rooms_of(a).await.is_empty());
    assert_eq!(rooms.member_count("abc").await, 1);
    assert_eq!(rooms.member_count("solo").await, 0);
    assert_eq!(rooms.inner.read().await.len(), 1);
}

#[tokio::test]
async fn full_member_channel_is_skipped() {
    let rooms = Rooms::new();
    let (slow, fast) = (Uuid::new_v4(), Uuid::new_v4());
    let (slow_tx, _slow_rx) = mpsc::channel(1);
    let (fast_tx, mut fast_rx) = mpsc::channel(8);
    rooms.join("abc", slow, slow_tx).await;
    rooms.join("abc", fast, fast_tx).await;

    let ev = Event::new("tick", json!(null));
    assert_eq!(rooms.broadcast("abc", &ev, None).await, 2);
    // Slow member's single slot is now taken.
    assert_eq!(rooms.broadcast("abc", &ev, None).await, 1);

    assert_eq!(recv_event(&mut fast_rx).await, ev);
    assert_eq!(recv_event(&mut fast_rx).await, ev);
}
