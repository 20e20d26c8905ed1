use serde_json::json;

use super::*;

fn envelope(status: i32, data: Option<prost_types::Value>) -> Vec<u8> {
    Envelope {
        id: "srv-1".to_owned(),
        parent_id: None,
        ts: 1,
        lobby_id: Some("ABCD".to_owned()),
        from: Some("server".to_owned()),
        syscall: "world:snapshot".to_owned(),
        status,
        data,
    }
    .encode_to_vec()
}

// =============================================================
// Status
// =============================================================

#[test]
fn status_wire_numbers_are_shared_with_the_server() {
    assert_eq!(i32::from(Status::Request), 0);
    assert_eq!(i32::from(Status::Done), 1);
    assert_eq!(i32::from(Status::Error), 2);
    assert_eq!(i32::from(Status::Item), 3);
    assert_eq!(Status::try_from(3).expect("status"), Status::Item);
}

#[test]
fn unknown_status_fails_decode() {
    let err = decode_frame(&envelope(9, None)).expect_err("status");
    assert!(matches!(err, CodecError::InvalidStatus(9)));
}

// =============================================================
// Client intents
// =============================================================

#[test]
fn drag_start_request_survives_the_codec() {
    let data = json!({ "id": "crate-1", "x": 505.5, "y": 499.25 });
    let sent = Frame::request("object:drag:start", Some("ABCD"), 1_700_000_000_000, data);
    let got = decode_frame(&encode_frame(&sent)).expect("decode");

    assert_eq!(got, sent);
    assert_eq!(got.status, Status::Request);
    assert_eq!(got.lobby_id.as_deref(), Some("ABCD"));
}

#[test]
fn bodiless_drag_end_keeps_an_empty_object() {
    let sent = Frame::request("object:drag:end", Some("ABCD"), 5, json!({}));
    let got = decode_frame(&encode_frame(&sent)).expect("decode");
    assert_eq!(got.data, json!({}));
}

#[test]
fn every_request_gets_a_fresh_id() {
    let a = Frame::request("cursor:move", Some("L"), 7, json!({ "x": 1.0, "y": 2.0 }));
    let b = Frame::request("cursor:move", Some("L"), 7, json!({ "x": 1.0, "y": 2.0 }));
    assert_ne!(a.id, b.id);
    assert!(a.parent_id.is_none());
}

// =============================================================
// Server pushes
// =============================================================

#[test]
fn snapshot_push_keeps_object_order_and_nulls() {
    let mut sent = Frame::push(
        "world:snapshot",
        Status::Item,
        9,
        json!({
            "objects": [
                { "id": "b", "x": 1.0, "y": 2.0, "angle": 0.5, "sprite": "ball.png" },
                { "id": "a", "x": 3.0, "y": 4.0, "angle": 0.0, "sprite": null, "width": 40.0, "height": 20.0 }
            ],
            "anchors": [{ "x": 10.0, "y": 20.0 }]
        }),
    );
    sent.from = Some("server".to_owned());

    let got = decode_frame(&encode_frame(&sent)).expect("decode");
    assert_eq!(got, sent);
    assert_eq!(got.data["objects"][0]["id"], "b");
    assert!(got.data["objects"][1]["sprite"].is_null());
}

#[test]
fn join_rejection_keeps_its_correlation() {
    let mut sent = Frame::push("lobby:join", Status::Error, 3, json!({ "message": "lobby full" }));
    sent.parent_id = Some("req-1".to_owned());

    let got = decode_frame(&encode_frame(&sent)).expect("decode");
    assert_eq!(got.status, Status::Error);
    assert_eq!(got.parent_id.as_deref(), Some("req-1"));
    assert_eq!(got.data["message"], "lobby full");
}

// =============================================================
// Malformed input
// =============================================================

#[test]
fn garbage_bytes_fail_decode() {
    let err = decode_frame(&[0xff, 0x00, 0x01]).expect_err("garbage");
    assert!(matches!(err, CodecError::Decode(_)));
}

#[test]
fn missing_payload_reads_as_empty_object() {
    let frame = decode_frame(&envelope(Status::Done.into(), None)).expect("decode");
    assert_eq!(frame.data, json!({}));
    assert_eq!(frame.from.as_deref(), Some("server"));
}

#[test]
fn bare_scalar_payload_is_rejected() {
    let scalar = prost_types::Value { kind: Some(prost_types::value::Kind::StringValue("hi".to_owned())) };
    let err = decode_frame(&envelope(Status::Item.into(), Some(scalar))).expect_err("scalar");
    assert!(matches!(err, CodecError::PayloadNotObject));
}
