use super::*;

// =============================================================
// Parsing
// =============================================================

#[test]
fn minimal_config_fills_defaults() {
    let cfg = ClientConfig::from_json(r#"{ "ws_url": "ws://localhost:3000/ws", "lobby_id": "ABCD" }"#).expect("parse");
    assert_eq!(cfg.canvas_id, "canvas");
    assert_eq!(cfg.sprite_base_url, "/sprites/");
    assert_eq!(cfg.cursor_icon, "cursor.png");
    assert_eq!(cfg.gate, GatePolicy::Drop);
    assert_eq!(cfg.stale, StalePolicy::Retain);
    assert_eq!(cfg.footprint, HitFootprint::AxisAligned);
}

#[test]
fn policies_parse_from_snake_case() {
    let cfg = ClientConfig::from_json(
        r#"{ "lobby_id": "L", "gate": "queue", "stale": "prune", "footprint": "rotated" }"#,
    )
    .expect("parse");
    let engine = cfg.engine_config().expect("engine config");
    assert_eq!(engine.gate, GatePolicy::QueueUntilJoined);
    assert_eq!(engine.stale, StalePolicy::Prune);
    assert_eq!(engine.footprint, HitFootprint::Rotated);
    assert_eq!(engine.lobby_id, "L");
}

#[test]
fn queue_policy_accepts_its_long_name() {
    let cfg = ClientConfig::from_json(r#"{ "gate": "queue_until_joined" }"#).expect("parse");
    assert_eq!(cfg.gate, GatePolicy::QueueUntilJoined);
}

#[test]
fn malformed_json_is_config_error() {
    let err = ClientConfig::from_json("{ not json").expect_err("invalid");
    assert!(matches!(err, StartError::Config(_)));
}

#[test]
fn unknown_policy_is_config_error() {
    let err = ClientConfig::from_json(r#"{ "gate": "maybe" }"#).expect_err("invalid");
    assert!(matches!(err, StartError::Config(_)));
}

// =============================================================
// Lobby
// =============================================================

#[test]
fn missing_or_blank_lobby_is_rejected() {
    let cfg = ClientConfig::default();
    assert!(matches!(cfg.lobby(), Err(StartError::MissingLobby)));

    let blank = ClientConfig { lobby_id: Some("   ".to_owned()), ..ClientConfig::default() };
    assert!(matches!(blank.engine_config(), Err(StartError::MissingLobby)));
}

#[test]
fn lobby_is_trimmed() {
    let cfg = ClientConfig { lobby_id: Some(" ABCD ".to_owned()), ..ClientConfig::default() };
    assert_eq!(cfg.lobby().expect("lobby"), "ABCD");
}

// =============================================================
// Sprite URLs
// =============================================================

#[test]
fn relative_sprite_joins_base_with_single_slash() {
    let cfg = ClientConfig::default();
    assert_eq!(cfg.sprite_url("crate.png"), "/sprites/crate.png");

    let bare = ClientConfig { sprite_base_url: "https://cdn.example/a".to_owned(), ..ClientConfig::default() };
    assert_eq!(bare.sprite_url("crate.png"), "https://cdn.example/a/crate.png");
}

#[test]
fn absolute_sprite_is_untouched() {
    let cfg = ClientConfig::default();
    assert_eq!(cfg.sprite_url("/img/ball.png"), "/img/ball.png");
    assert_eq!(cfg.sprite_url("https://x/y.png"), "https://x/y.png");
    assert_eq!(cfg.sprite_url("data:image/png;base64,AA"), "data:image/png;base64,AA");
}
