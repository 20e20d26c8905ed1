#![allow(clippy::float_cmp)]

use clap::Parser;

use super::*;

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

// =============================================================
// Argument parsing
// =============================================================

#[test]
fn watch_parses_with_defaults() {
    let cli = Cli::try_parse_from(["physboard-cli", "--lobby", "ABCD", "watch"]).expect("parse");
    assert_eq!(cli.ws_url, "ws://127.0.0.1:3000/ws");
    assert_eq!(cli.gate, GatePolicy::Drop);
    assert_eq!(cli.stale, StalePolicy::Retain);
    assert_eq!(cli.footprint, HitFootprint::AxisAligned);
    assert!(matches!(cli.command, Command::Watch(WatchArgs { seconds: 10 })));
}

#[test]
fn policies_map_into_engine_config() {
    let cli = Cli::try_parse_from([
        "physboard-cli",
        "--lobby",
        "L",
        "--gate",
        "queue",
        "--stale",
        "prune",
        "--footprint",
        "rotated",
        "watch",
    ])
    .expect("parse");
    let config = cli.engine_config();
    assert_eq!(config.lobby_id, "L");
    assert_eq!(config.gate, GatePolicy::QueueUntilJoined);
    assert_eq!(config.stale, StalePolicy::Prune);
    assert_eq!(config.footprint, HitFootprint::Rotated);
}

#[test]
fn unknown_policy_name_is_rejected() {
    let err = Cli::try_parse_from(["physboard-cli", "--lobby", "L", "--gate", "maybe", "watch"]).expect_err("invalid");
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}

// =============================================================
// Errors
// =============================================================

#[test]
fn socket_failures_after_connect_are_not_reported_as_connect_errors() {
    let err = CliError::from(WsError::ConnectionClosed);
    assert!(matches!(err, CliError::Ws(_)));
    assert!(err.to_string().starts_with("websocket error"));
}

#[test]
fn throw_accepts_negative_deltas() {
    let cli = Cli::try_parse_from(["physboard-cli", "--lobby", "L", "throw", "crate-1", "--dx", "-50", "--dy", "-25"])
        .expect("parse");
    let Command::Throw(args) = cli.command else {
        panic!("expected throw");
    };
    assert_eq!(args.id, "crate-1");
    assert_eq!(args.dx, -50.0);
    assert_eq!(args.dy, -25.0);
}

// =============================================================
// Gesture geometry
// =============================================================

#[test]
fn orbit_starts_east_of_center_and_quarters_south() {
    let c = Point::new(100.0, 100.0);
    assert!(close(orbit_point(c, 10.0, 4.0, 0.0), Point::new(110.0, 100.0)));
    assert!(close(orbit_point(c, 10.0, 4.0, 1.0), Point::new(100.0, 110.0)));
}

#[test]
fn degenerate_period_stays_put() {
    let c = Point::new(0.0, 0.0);
    assert_eq!(orbit_point(c, 5.0, 0.0, 3.0), Point::new(5.0, 0.0));
}

#[test]
fn throw_path_ends_at_full_delta() {
    let path = throw_path(Point::new(500.0, 500.0), Point::new(100.0, -40.0), 4);
    assert_eq!(path.len(), 4);
    assert!(close(path[0], Point::new(525.0, 490.0)));
    assert!(close(path[3], Point::new(600.0, 460.0)));
}

#[test]
fn zero_steps_still_moves_once() {
    let path = throw_path(Point::default(), Point::new(10.0, 0.0), 0);
    assert_eq!(path, vec![Point::new(10.0, 0.0)]);
}
