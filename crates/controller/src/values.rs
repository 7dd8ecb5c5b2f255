//! Coercion of loosely typed JSON values into record fields.

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use serde_json::Value;
use std::io;

/// JSON formatter emitting `", "` and `": "` separators and escaping every
/// non-ASCII character as `\uXXXX`. This is the text form downstream
/// renderers already expect for product payloads.
struct SpacedAsciiFormatter;

impl Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Encode a value as JSON text with spaced separators and ASCII escapes.
pub fn to_json_text<T>(value: &T) -> String
where
    T: Serialize + ?Sized,
{
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, SpacedAsciiFormatter);
    match value.serialize(&mut ser) {
        Ok(()) => String::from_utf8(buf).unwrap_or_default(),
        Err(_) => String::new(),
    }
}

/// Text form of a value: strings verbatim, everything else as JSON text.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => to_json_text(other),
    }
}

/// Text form of an optional field; missing and `null` become empty text.
pub fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(v) => value_to_text(v),
    }
}

/// Truthiness of a loosely typed value: `null`, `false`, zero, and empty
/// strings, arrays, and objects are all falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Discount as text, empty unless the value is truthy.
pub fn discount_text(value: Option<&Value>) -> String {
    match value {
        Some(v) if is_truthy(v) => value_to_text(v),
        _ => String::new(),
    }
}

/// Cart entries from an optional field. Anything but an array is treated
/// as an empty cart.
pub fn cart_entries(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items.clone(),
        None | Some(Value::Null) => Vec::new(),
        Some(other) => {
            tracing::debug!(kind = value_kind(other), "Ignoring non-list cart payload");
            Vec::new()
        }
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_text_uses_spaced_separators() {
        let v = json!([{"id": 1, "name": "Frosted Blue"}, 2]);
        assert_eq!(to_json_text(&v), r#"[{"id": 1, "name": "Frosted Blue"}, 2]"#);
    }

    #[test]
    fn test_json_text_preserves_key_order() {
        let v: Value = serde_json::from_str(r#"{"z": 1, "a": 2}"#).unwrap();
        assert_eq!(to_json_text(&v), r#"{"z": 1, "a": 2}"#);
    }

    #[test]
    fn test_json_text_escapes_non_ascii() {
        assert_eq!(to_json_text(&json!("Café")), r#""Caf\u00e9""#);
        assert_eq!(to_json_text(&json!("🎨")), r#""\ud83c\udfa8""#);
        assert_eq!(to_json_text(&json!("a\"b\n")), r#""a\"b\n""#);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!(15)));
        assert!(is_truthy(&json!("0")));
    }

    #[test]
    fn test_discount_text() {
        assert_eq!(discount_text(Some(&json!(10))), "10");
        assert_eq!(discount_text(Some(&json!(12.5))), "12.5");
        assert_eq!(discount_text(Some(&json!("20"))), "20");
        assert_eq!(discount_text(Some(&json!(0))), "");
        assert_eq!(discount_text(None), "");
    }

    #[test]
    fn test_field_text_and_cart_entries() {
        assert_eq!(field_text(None), "");
        assert_eq!(field_text(Some(&json!(null))), "");
        assert_eq!(field_text(Some(&json!({"k": "v"}))), r#"{"k": "v"}"#);
        assert_eq!(cart_entries(Some(&json!([{"sku": "x"}]))), vec![json!({"sku": "x"})]);
        assert!(cart_entries(Some(&json!("full"))).is_empty());
    }
}
