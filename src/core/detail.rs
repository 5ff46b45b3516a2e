//! Detail payload serialization
//!
//! Arbitrary per-call payloads are introspected into the closed [`Detail`]
//! variant type at the call boundary, then rendered as indented JSON-like
//! text. Conversion never fails: a value `serde_json` cannot structurally
//! serialize falls back to its debug string, wrapped as a JSON string
//! literal.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Closed variant type for structured log payloads.
///
/// Mappings preserve declaration order; sets are sorted by their canonical
/// rendering at construction so output is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Sequence(Vec<Detail>),
    Mapping(Vec<(String, Detail)>),
    Set(Vec<Detail>),
    Opaque(String),
}

impl Detail {
    /// Introspect any serializable value into a `Detail`.
    ///
    /// Structural serialization failures are not errors: the value is
    /// re-rendered via its debug representation instead.
    pub fn from_serialize<T: Serialize + fmt::Debug>(value: &T) -> Detail {
        match serde_json::to_value(value) {
            Ok(v) => v.into(),
            Err(_) => Detail::Opaque(format!("{:?}", value)),
        }
    }

    /// Wrap a display-only value as an opaque string payload.
    pub fn opaque(value: impl fmt::Display) -> Detail {
        Detail::Opaque(value.to_string())
    }

    /// Build a set payload. Elements are sorted by canonical rendering so
    /// repeated serialization of the same set yields identical text.
    pub fn set(items: impl IntoIterator<Item = Detail>) -> Detail {
        let mut items: Vec<Detail> = items.into_iter().collect();
        items.sort_by(|a, b| a.canonical().cmp(&b.canonical()));
        Detail::Set(items)
    }

    /// Build a mapping payload from key-value pairs, preserving their order.
    pub fn mapping(pairs: impl IntoIterator<Item = (String, Detail)>) -> Detail {
        Detail::Mapping(pairs.into_iter().collect())
    }

    /// Render as indented JSON-like text, `indent` spaces per nesting level.
    pub fn render(&self, indent: usize) -> String {
        let mut out = String::new();
        self.render_into(&mut out, indent, 0);
        out
    }

    fn render_into(&self, out: &mut String, indent: usize, depth: usize) {
        let pad = " ".repeat(indent * (depth + 1));
        let close_pad = " ".repeat(indent * depth);
        match self {
            Detail::Null => out.push_str("null"),
            Detail::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Detail::Number(n) => out.push_str(&n.to_string()),
            Detail::Text(s) | Detail::Opaque(s) => out.push_str(&escape_string(s)),
            Detail::Sequence(items) | Detail::Set(items) => {
                if items.is_empty() {
                    out.push_str("[]");
                    return;
                }
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push('\n');
                    out.push_str(&pad);
                    item.render_into(out, indent, depth + 1);
                }
                out.push('\n');
                out.push_str(&close_pad);
                out.push(']');
            }
            Detail::Mapping(pairs) => {
                if pairs.is_empty() {
                    out.push_str("{}");
                    return;
                }
                out.push('{');
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push('\n');
                    out.push_str(&pad);
                    out.push_str(&escape_string(key));
                    out.push_str(": ");
                    value.render_into(out, indent, depth + 1);
                }
                out.push('\n');
                out.push_str(&close_pad);
                out.push('}');
            }
        }
    }

    /// Single-line rendering used as a sort key for set elements.
    fn canonical(&self) -> String {
        match self {
            Detail::Sequence(items) | Detail::Set(items) => {
                let inner: Vec<String> = items.iter().map(|i| i.canonical()).collect();
                format!("[{}]", inner.join(","))
            }
            Detail::Mapping(pairs) => {
                let inner: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| format!("{}:{}", escape_string(k), v.canonical()))
                    .collect();
                format!("{{{}}}", inner.join(","))
            }
            other => {
                let mut out = String::new();
                other.render_into(&mut out, 0, 0);
                out
            }
        }
    }
}

/// JSON string literal escaping. String serialization cannot fail for
/// valid UTF-8, but a manual quote is kept as a non-panicking fallback.
fn escape_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

impl From<Value> for Detail {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Detail::Null,
            Value::Bool(b) => Detail::Bool(b),
            Value::Number(n) => Detail::Number(n),
            Value::String(s) => Detail::Text(s),
            Value::Array(items) => Detail::Sequence(items.into_iter().map(Detail::from).collect()),
            Value::Object(map) => Detail::Mapping(
                map.into_iter().map(|(k, v)| (k, Detail::from(v))).collect(),
            ),
        }
    }
}

impl From<bool> for Detail {
    fn from(b: bool) -> Self {
        Detail::Bool(b)
    }
}

impl From<i32> for Detail {
    fn from(i: i32) -> Self {
        Detail::Number(i.into())
    }
}

impl From<i64> for Detail {
    fn from(i: i64) -> Self {
        Detail::Number(i.into())
    }
}

impl From<u32> for Detail {
    fn from(i: u32) -> Self {
        Detail::Number(i.into())
    }
}

impl From<u64> for Detail {
    fn from(i: u64) -> Self {
        Detail::Number(i.into())
    }
}

impl From<f64> for Detail {
    fn from(f: f64) -> Self {
        serde_json::Number::from_f64(f)
            .map(Detail::Number)
            .unwrap_or(Detail::Null)
    }
}

impl From<&str> for Detail {
    fn from(s: &str) -> Self {
        Detail::Text(s.to_string())
    }
}

impl From<String> for Detail {
    fn from(s: String) -> Self {
        Detail::Text(s)
    }
}

impl<T: Into<Detail>> From<Vec<T>> for Detail {
    fn from(items: Vec<T>) -> Self {
        Detail::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Detail {
    // Display uses the default two-space indent.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_scalars_render() {
        assert_eq!(Detail::Null.render(2), "null");
        assert_eq!(Detail::from(true).render(2), "true");
        assert_eq!(Detail::from(42).render(2), "42");
        assert_eq!(Detail::from(2.5).render(2), "2.5");
        assert_eq!(Detail::from("hi").render(2), "\"hi\"");
    }

    #[test]
    fn test_mapping_preserves_declared_order() {
        let detail = Detail::mapping([
            ("zebra".to_string(), Detail::from(1)),
            ("apple".to_string(), Detail::from(2)),
            ("mango".to_string(), Detail::from(3)),
        ]);
        let text = detail.render(2);
        let zebra = text.find("zebra").unwrap();
        let apple = text.find("apple").unwrap();
        let mango = text.find("mango").unwrap();
        assert!(zebra < apple && apple < mango);
    }

    #[test]
    fn test_nested_indentation() {
        let detail = Detail::mapping([(
            "outer".to_string(),
            Detail::Sequence(vec![Detail::from(1), Detail::from(2)]),
        )]);
        let expected = "{\n  \"outer\": [\n    1,\n    2\n  ]\n}";
        assert_eq!(detail.render(2), expected);
    }

    #[test]
    fn test_set_order_is_deterministic() {
        let a = Detail::set([Detail::from("b"), Detail::from("a"), Detail::from("c")]);
        let b = Detail::set([Detail::from("c"), Detail::from("a"), Detail::from("b")]);
        assert_eq!(a.render(2), b.render(2));
    }

    #[test]
    fn test_render_is_deterministic() {
        let detail = Detail::mapping([
            ("k".to_string(), Detail::Sequence(vec![Detail::Null, Detail::from(7)])),
            ("s".to_string(), Detail::set([Detail::from(3), Detail::from(1)])),
        ]);
        assert_eq!(detail.render(4), detail.render(4));
    }

    #[test]
    fn test_from_serialize_structural() {
        #[derive(serde::Serialize, Debug)]
        struct Payload {
            user_id: u32,
            active: bool,
        }
        let detail = Detail::from_serialize(&Payload {
            user_id: 7,
            active: true,
        });
        let text = detail.render(2);
        assert!(text.contains("\"user_id\": 7"));
        assert!(text.contains("\"active\": true"));
    }

    #[test]
    fn test_from_serialize_fallback_never_fails() {
        // Maps with non-string keys cannot be structurally serialized;
        // the value must fall back to its debug string instead.
        let mut bad: HashMap<(i32, i32), i32> = HashMap::new();
        bad.insert((1, 2), 3);
        let detail = Detail::from_serialize(&bad);
        assert!(matches!(detail, Detail::Opaque(_)));
        let text = detail.render(2);
        assert!(text.starts_with('"'));
    }

    #[test]
    fn test_opaque_renders_as_string_literal() {
        let detail = Detail::opaque("plain display text");
        assert_eq!(detail.render(2), "\"plain display text\"");
    }

    #[test]
    fn test_text_escaping() {
        let detail = Detail::from("line1\nline2 \"quoted\"");
        assert_eq!(detail.render(2), "\"line1\\nline2 \\\"quoted\\\"\"");
    }

    #[test]
    fn test_empty_collections() {
        assert_eq!(Detail::Sequence(vec![]).render(2), "[]");
        assert_eq!(Detail::Mapping(vec![]).render(2), "{}");
        assert_eq!(Detail::set(Vec::new()).render(2), "[]");
    }

    #[test]
    fn test_from_json_value() {
        let value: Value = serde_json::from_str(r#"{"a": [1, null], "b": "x"}"#).unwrap();
        let detail = Detail::from(value);
        let text = detail.render(2);
        assert!(text.contains("\"a\": ["));
        assert!(text.contains("null"));
        assert!(text.contains("\"b\": \"x\""));
    }
}
