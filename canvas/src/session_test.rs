use frames::Point;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

fn seeded() -> StdRng {
    StdRng::seed_from_u64(11)
}

fn join(lobby: &str) -> ClientMessage {
    ClientMessage::Join { lobby_id: lobby.to_owned() }
}

// =============================================================
// Connect / join
// =============================================================

#[test]
fn connect_stores_identity_and_hue_then_joins() {
    let mut gw = ConnectionGateway::new("ABCD", GatePolicy::Drop);
    let out = gw.on_connected("c-1", &mut seeded());

    assert_eq!(out, vec![join("ABCD")]);
    assert_eq!(gw.session().local_id.as_deref(), Some("c-1"));
    let hue = gw.session().local_hue.expect("hue");
    assert!((0.0..360.0).contains(&hue));
    assert!(!gw.is_joined());
}

#[test]
fn join_is_never_gated() {
    let mut gw = ConnectionGateway::new("ABCD", GatePolicy::Drop);
    assert_eq!(gw.submit(join("ABCD")), Some(join("ABCD")));
}

#[test]
fn acknowledgment_opens_the_gate() {
    let mut gw = ConnectionGateway::new("L", GatePolicy::Drop);
    gw.on_connected("c-1", &mut seeded());
    assert!(gw.on_joined().is_empty());
    assert!(gw.is_joined());

    let mv = ClientMessage::Move(Point::new(1.0, 2.0));
    assert_eq!(gw.submit(mv.clone()), Some(mv));
}

#[test]
fn reconnect_repeats_connect_sequence_with_new_identity() {
    let mut rng = seeded();
    let mut gw = ConnectionGateway::new("L", GatePolicy::Drop);
    gw.on_connected("c-1", &mut rng);
    gw.on_joined();
    gw.on_disconnected();
    assert!(gw.is_joined());

    let out = gw.on_connected("c-2", &mut rng);
    assert_eq!(out, vec![join("L")]);
    assert_eq!(gw.session().local_id.as_deref(), Some("c-2"));
}

#[test]
fn reconnect_closes_the_gate_until_the_new_join_is_acknowledged() {
    let mut rng = seeded();
    let mut gw = ConnectionGateway::new("L", GatePolicy::Drop);
    gw.on_connected("c-1", &mut rng);
    gw.on_joined();
    gw.on_disconnected();
    gw.on_connected("c-2", &mut rng);

    let mv = ClientMessage::Move(Point::new(1.0, 2.0));
    assert!(!gw.is_joined());
    assert_eq!(gw.submit(mv.clone()), None);

    gw.on_joined();
    assert_eq!(gw.submit(mv.clone()), Some(mv));
}

// =============================================================
// Gating
// =============================================================

#[test]
fn drop_policy_discards_everything_before_join() {
    let mut gw = ConnectionGateway::new("L", GatePolicy::Drop);
    gw.on_connected("c-1", &mut seeded());

    let intents = [
        ClientMessage::Move(Point::new(1.0, 1.0)),
        ClientMessage::DragStart { id: "A".to_owned(), at: Point::new(1.0, 1.0) },
        ClientMessage::DragMove(Point::new(2.0, 2.0)),
        ClientMessage::DragEnd { velocity: None },
        ClientMessage::Leave,
    ];
    for intent in intents {
        assert_eq!(gw.submit(intent), None);
    }
    assert_eq!(gw.pending_len(), 0);
    assert!(gw.on_joined().is_empty());
}

#[test]
fn queue_policy_flushes_in_order_on_join() {
    let mut gw = ConnectionGateway::new("L", GatePolicy::QueueUntilJoined);
    gw.on_connected("c-1", &mut seeded());

    let a = ClientMessage::Move(Point::new(1.0, 1.0));
    let b = ClientMessage::DragStart { id: "A".to_owned(), at: Point::new(1.0, 1.0) };
    assert_eq!(gw.submit(a.clone()), None);
    assert_eq!(gw.submit(b.clone()), None);
    assert_eq!(gw.pending_len(), 2);

    assert_eq!(gw.on_joined(), vec![a, b]);
    assert_eq!(gw.pending_len(), 0);
}

#[test]
fn queue_policy_keeps_only_the_latest_position_in_a_run() {
    let mut gw = ConnectionGateway::new("L", GatePolicy::QueueUntilJoined);
    gw.on_connected("c-1", &mut seeded());

    for i in 0..100_000 {
        gw.submit(ClientMessage::Move(Point::new(f64::from(i), 0.0)));
    }
    assert_eq!(gw.pending_len(), 1);

    let start = ClientMessage::DragStart { id: "A".to_owned(), at: Point::new(1.0, 1.0) };
    gw.submit(start.clone());
    gw.submit(ClientMessage::DragMove(Point::new(2.0, 2.0)));
    gw.submit(ClientMessage::DragMove(Point::new(3.0, 3.0)));

    assert_eq!(
        gw.on_joined(),
        vec![
            ClientMessage::Move(Point::new(99_999.0, 0.0)),
            start,
            ClientMessage::DragMove(Point::new(3.0, 3.0)),
        ]
    );
}

#[test]
fn queue_policy_is_bounded() {
    let mut gw = ConnectionGateway::new("L", GatePolicy::QueueUntilJoined);
    gw.on_connected("c-1", &mut seeded());

    for i in 0..(MAX_PENDING * 2) {
        gw.submit(ClientMessage::DragStart { id: format!("o-{i}"), at: Point::default() });
        gw.submit(ClientMessage::Move(Point::default()));
    }
    assert_eq!(gw.pending_len(), MAX_PENDING);
}

#[test]
fn leave_is_gated_like_other_intents() {
    let mut gw = ConnectionGateway::new("L", GatePolicy::Drop);
    assert_eq!(gw.leave(), None);
    gw.on_joined();
    assert_eq!(gw.leave(), Some(ClientMessage::Leave));
}

#[test]
fn transport_failures_leave_session_untouched() {
    let mut gw = ConnectionGateway::new("L", GatePolicy::Drop);
    gw.on_connected("c-1", &mut seeded());
    let before = gw.session().clone();

    gw.on_transport_error("reset by peer");
    gw.on_rejected("lobby full");

    assert_eq!(gw.session(), &before);
}
