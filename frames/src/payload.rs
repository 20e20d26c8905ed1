//! JSON payload ↔ `google.protobuf.Value` bridge.
//!
//! Lobby payloads are always JSON objects built from strings, numbers, nulls,
//! nested objects (points, object states) and arrays of those. They ride in
//! the envelope as a `Struct`. Decoding consumes the wire value so strings
//! and field maps move instead of being cloned.

use prost_types::value::Kind;
use prost_types::{ListValue, NullValue, Struct};
use serde_json::{Map, Number, Value};

use crate::CodecError;

/// Wrap a payload for the wire. Scalars outside an object never occur in
/// this protocol; they are carried as-is rather than rejected on send.
pub(crate) fn encode(data: &Value) -> prost_types::Value {
    prost_types::Value { kind: Some(kind_of(data)) }
}

/// Unwrap a frame payload. A missing payload is an empty object.
///
/// # Errors
///
/// [`CodecError::PayloadNotObject`] when the top level is anything but a
/// `Struct`.
pub(crate) fn decode(data: Option<prost_types::Value>) -> Result<Value, CodecError> {
    match data.and_then(|v| v.kind) {
        None => Ok(Value::Object(Map::new())),
        Some(Kind::StructValue(fields)) => Ok(Value::Object(object(fields))),
        Some(_) => Err(CodecError::PayloadNotObject),
    }
}

fn kind_of(value: &Value) -> Kind {
    match value {
        Value::Null => Kind::NullValue(NullValue::NullValue.into()),
        Value::Bool(b) => Kind::BoolValue(*b),
        // Coordinates are f64 throughout; integer literals widen.
        Value::Number(n) => n.as_f64().map_or(Kind::NullValue(NullValue::NullValue.into()), Kind::NumberValue),
        Value::String(s) => Kind::StringValue(s.clone()),
        Value::Array(items) => Kind::ListValue(ListValue { values: items.iter().map(encode).collect() }),
        Value::Object(map) => {
            Kind::StructValue(Struct { fields: map.iter().map(|(k, v)| (k.clone(), encode(v))).collect() })
        }
    }
}

fn object(fields: Struct) -> Map<String, Value> {
    fields.fields.into_iter().map(|(k, v)| (k, value(v))).collect()
}

fn value(wire: prost_types::Value) -> Value {
    match wire.kind {
        None | Some(Kind::NullValue(_)) => Value::Null,
        Some(Kind::BoolValue(b)) => Value::Bool(b),
        // Non-finite numbers have no JSON form.
        Some(Kind::NumberValue(n)) => Number::from_f64(n).map_or(Value::Null, Value::Number),
        Some(Kind::StringValue(s)) => Value::String(s),
        Some(Kind::ListValue(list)) => Value::Array(list.values.into_iter().map(value).collect()),
        Some(Kind::StructValue(fields)) => Value::Object(object(fields)),
    }
}
