//! Minimal JSON text encoder for the transport payloads this SDK emits.
//!
//! Operates on the `serde_json::Value` trees built by the model types.
//! Object members with `null` values are omitted entirely so the receiving
//! collaborator applies its own defaults; key order is iteration order
//! (insertion order under the `preserve_order` feature), never sorted.

use serde_json::Value;

/// Serialize a structured value to JSON text.
///
/// Invoked on `Value::Null` at top level this returns the literal `null`;
/// a null member inside an object is omitted instead of rendered.
pub fn serialize(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_string(out, s),
        Value::Object(map) => {
            out.push('{');
            let mut first = true;
            for (key, member) in map {
                if member.is_null() {
                    continue;
                }
                if !first {
                    out.push(',');
                }
                first = false;
                write_string(out, key);
                out.push(':');
                write_value(out, member);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
    }
}

/// Quote a string, escaping quotes, backslashes, and control characters.
/// Inputs needing no escapes serialize byte-identically to plain quoting.
fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mapping_preserves_insertion_order() {
        let value = json!({"a": 1, "b": "s", "c": true});
        assert_eq!(serialize(&value), r#"{"a":1,"b":"s","c":true}"#);
    }

    #[test]
    fn test_null_members_omitted() {
        let value = json!({"a": null, "b": 2});
        assert_eq!(serialize(&value), r#"{"b":2}"#);
    }

    #[test]
    fn test_all_members_null_yields_empty_object() {
        let value = json!({"a": null, "b": null});
        assert_eq!(serialize(&value), "{}");
    }

    #[test]
    fn test_top_level_null() {
        assert_eq!(serialize(&Value::Null), "null");
    }

    #[test]
    fn test_sequences() {
        let value = json!([1, "two", false, [3]]);
        assert_eq!(serialize(&value), r#"[1,"two",false,[3]]"#);
    }

    #[test]
    fn test_numbers_render_canonically() {
        assert_eq!(serialize(&json!(1)), "1");
        assert_eq!(serialize(&json!(1.5)), "1.5");
        assert_eq!(serialize(&json!(-42)), "-42");
    }

    #[test]
    fn test_safe_strings_unchanged() {
        assert_eq!(serialize(&json!("plain text")), r#""plain text""#);
    }

    #[test]
    fn test_strings_escaped() {
        assert_eq!(serialize(&json!("a\"b")), r#""a\"b""#);
        assert_eq!(serialize(&json!("line\nbreak")), r#""line\nbreak""#);
        assert_eq!(serialize(&json!("back\\slash")), r#""back\\slash""#);
        assert_eq!(serialize(&json!("bell\u{07}")), r#""bell\u0007""#);
    }

    #[test]
    fn test_nested_objects() {
        let value = json!({"outer": {"inner": null, "kept": 1}});
        assert_eq!(serialize(&value), r#"{"outer":{"kept":1}}"#);
    }
}
