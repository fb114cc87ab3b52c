// Snapshot field extraction — the single normalization boundary.
//
// Documents arrive as untyped JSON maps written by mobile clients of varying
// vintage: meal flags show up as numbers or numeric strings, names go missing,
// amounts are null. Every field read in the detectors goes through as_num or
// as_str, so no detector ever branches on a raw missing/null value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The full field-value mapping of a document at a point in time, as
/// delivered by the event source. Read-only once received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentSnapshot(serde_json::Map<String, Value>);

impl DocumentSnapshot {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<serde_json::Map<String, Value>> for DocumentSnapshot {
    fn from(fields: serde_json::Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Read a numeric field, coercing to 0 on anything that isn't a number.
///
/// Numbers pass through (floats truncate toward zero). Strings parse with
/// base-10 integer-prefix semantics: optional sign plus the longest leading
/// digit run, so "1" and " 42abc" parse while "abc" and "" default to 0.
/// The snapshot itself may be absent (document didn't exist yet) — that
/// reads as 0 too.
pub fn as_num(snapshot: Option<&DocumentSnapshot>, key: &str) -> i64 {
    match snapshot.and_then(|s| s.get(key)) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => parse_int_prefix(s),
        _ => 0,
    }
}

/// Read a string field, coercing missing/null/falsy values to "".
///
/// Falsy means null, empty string, the number 0, or `false` — all of those
/// read as "". Everything else stringifies: numbers without quotes, `true`
/// as "true".
pub fn as_str(snapshot: Option<&DocumentSnapshot>, key: &str) -> String {
    match snapshot.and_then(|s| s.get(key)) {
        Some(v) => value_to_string(v),
        None => String::new(),
    }
}

/// Stringify a JSON value the way a dynamic client would display it.
/// Null and falsy values become "".
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(false) => String::new(),
        Value::Bool(true) => "true".to_string(),
        Value::Number(n) => {
            if n.as_f64() == Some(0.0) {
                String::new()
            } else {
                n.to_string()
            }
        }
        Value::String(s) => s.clone(),
        // Arrays/objects don't appear in these documents; JSON text is a
        // sane fallback if one ever does.
        other => other.to_string(),
    }
}

/// Base-10 integer-prefix parse: optional sign, then the longest run of
/// leading ASCII digits. No digits means 0.
fn parse_int_prefix(s: &str) -> i64 {
    let s = s.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0;
    }
    // A digit run long enough to overflow i64 isn't a meal flag or an
    // amount anyone typed; saturate rather than wrap.
    digits.parse::<i64>().map(|n| sign * n).unwrap_or(i64::MAX)
}
