//! JSON canonicalization and decoded-value equality.

use serde::{ser, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

const INDENT: &[u8] = b"    ";

/// Serialize `value` to canonical JSON.
///
/// Returns the pretty-printed text (object keys sorted, four-space indent)
/// together with its decoded form. NaN and infinite floats are an error rather
/// than being encoded as `null`.
pub fn marshal_json<T: Serialize + ?Sized>(value: &T) -> Result<(String, Value), serde_json::Error> {
    crate::dump::ensure_json_floats(value).map_err(<serde_json::Error as ser::Error>::custom)?;
    let decoded = serde_json::to_value(value)?;
    let text = to_pretty_json(&decoded)?;
    Ok((text, decoded))
}

/// Pretty-print an already decoded value with the canonical indentation.
pub fn to_pretty_json(value: &Value) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Structural equality of two decoded JSON documents.
///
/// Object key order never matters. Numbers are compared as `f64` as soon as
/// either side is a float, so `1` equals `1.0`; integers are compared exactly.
pub fn json_equal(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(e), Value::Number(a)) => {
            if e.is_f64() || a.is_f64() {
                e.as_f64() == a.as_f64()
            } else {
                e == a
            }
        }
        (Value::Array(e), Value::Array(a)) => {
            e.len() == a.len() && e.iter().zip(a).all(|(e, a)| json_equal(e, a))
        }
        (Value::Object(e), Value::Object(a)) => {
            e.len() == a.len()
                && e.iter()
                    .all(|(key, e)| a.get(key).is_some_and(|a| json_equal(e, a)))
        }
        (e, a) => e == a,
    }
}
