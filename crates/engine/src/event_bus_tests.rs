use super::*;
use racs_core::ProjectId;

fn state_event(id: i64, state: &str) -> Event {
    Event::ProjectState {
        id: ProjectId::new(id),
        state: state.to_string(),
    }
}

#[tokio::test]
async fn snapshot_is_returned_directly_not_broadcast() {
    let bus = EventBus::new();
    let (snapshot, mut rx) = bus.subscribe_with_snapshot(|| Event::ProjectList { projects: vec![] });
    assert!(matches!(snapshot, Event::ProjectList { .. }));

    bus.publish(state_event(1, "CLEAN_RUNNING"));
    bus.publish(state_event(1, "CLEAN_SUCCESS"));

    // The channel itself carries only live events; the snapshot never
    // appears on it.
    let first = rx.recv().await.unwrap();
    assert_eq!(first, state_event(1, "CLEAN_RUNNING"));
    let second = rx.recv().await.unwrap();
    assert_eq!(second, state_event(1, "CLEAN_SUCCESS"));
}

#[tokio::test]
async fn multiple_subscribers_each_get_their_own_snapshot_with_no_crosstalk() {
    let bus = EventBus::new();
    let (snap_a, mut a) = bus.subscribe_with_snapshot(|| Event::ProjectList { projects: vec![] });
    bus.publish(state_event(2, "CLONE_RUNNING"));
    let (snap_b, mut b) = bus.subscribe_with_snapshot(|| Event::ProjectList { projects: vec![] });
    bus.publish(state_event(2, "CLONE_SUCCESS"));

    assert!(matches!(snap_a, Event::ProjectList { .. }));
    assert!(matches!(snap_b, Event::ProjectList { .. }));

    // a was already subscribed when b joined; b's snapshot must not leak
    // onto a's channel as a spurious extra event.
    assert_eq!(a.recv().await.unwrap(), state_event(2, "CLONE_RUNNING"));
    assert_eq!(a.recv().await.unwrap(), state_event(2, "CLONE_SUCCESS"));

    // b subscribed after the first publish, so it never sees it.
    assert_eq!(b.recv().await.unwrap(), state_event(2, "CLONE_SUCCESS"));
}

#[tokio::test]
async fn publish_with_no_subscribers_does_not_error() {
    let bus = EventBus::new();
    bus.publish(state_event(3, "PUSH_SUCCESS"));
}
