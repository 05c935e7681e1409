//! Conversion between `Document` and text.
//!
//! `Document` implements serde's `Serialize` and `Deserialize` directly so
//! that key order survives a round trip through any serde format. Sequences
//! serialize as arrays. Maps serialize as objects unless their keys are
//! exactly `"0"` to `"n-1"` in order, in which case they are written as
//! arrays; a map left with sparse integer keys after a delete stays an
//! object.
//!
//! The printers at the bottom of this module produce the text nestpath
//! writes to disk: a compact single-line form and an indented form that keeps
//! short all-scalar containers on one line.

use super::node::{is_list_shaped, Document, Map, Number};
use crate::error::Result;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Document::Null => serializer.serialize_unit(),
            Document::Bool(b) => serializer.serialize_bool(*b),
            Document::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Document::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Document::String(s) => serializer.serialize_str(s),
            Document::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Document::Map(map) if is_list_shaped(map) => {
                let mut seq = serializer.serialize_seq(Some(map.len()))?;
                for item in map.values() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Document::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any JSON-compatible value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Document, E> {
        Ok(Document::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Document, E> {
        Ok(Document::Number(Number::Integer(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Document, E> {
        Ok(match i64::try_from(v) {
            Ok(i) => Document::Number(Number::Integer(i)),
            Err(_) => Document::Number(Number::Float(v as f64)),
        })
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Document, E> {
        Ok(Document::Number(Number::Float(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Document, E> {
        Ok(Document::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Document, E> {
        Ok(Document::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Document, E> {
        Ok(Document::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Document, E> {
        Ok(Document::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> std::result::Result<Document, D::Error> {
        Document::deserialize(d)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Document, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Document::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Document, A::Error> {
        let mut map = Map::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<MapKey, Document>()? {
            map.insert(key.0, value);
        }
        Ok(Document::Map(map))
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(DocumentVisitor)
    }
}

/// A map key; YAML allows scalar keys of any type, which are stringified.
struct MapKey(String);

struct MapKeyVisitor;

impl<'de> Visitor<'de> for MapKeyVisitor {
    type Value = MapKey;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a scalar map key")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<MapKey, E> {
        Ok(MapKey(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<MapKey, E> {
        Ok(MapKey(String::new()))
    }
}

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(MapKeyVisitor)
    }
}

/// Parses JSON text into a document.
///
/// # Example
///
/// ```
/// use nestpath::document::codec::parse_json;
///
/// let doc = parse_json(r#"{"b": 1, "a": [true, null]}"#).unwrap();
/// assert_eq!(doc.keys(), vec!["b", "a"]);
/// ```
pub fn parse_json(text: &str) -> Result<Document> {
    Ok(serde_json::from_str(text)?)
}

/// Parses YAML text into a document. Non-string keys are stringified.
pub fn parse_yaml(text: &str) -> Result<Document> {
    Ok(serde_yaml::from_str(text)?)
}

/// Parses newline-delimited JSON into a sequence. Blank lines are skipped.
pub fn parse_json_lines(text: &str) -> Result<Document> {
    let mut lines = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        lines.push(parse_json(line)?);
    }
    Ok(Document::Sequence(lines))
}

/// Serializes a document to a compact single-line JSON string.
pub fn to_json_compact(doc: &Document) -> String {
    match doc {
        Document::Map(map) if is_list_shaped(map) => compact_array(map.values()),
        Document::Map(map) => {
            if map.is_empty() {
                return "{}".to_string();
            }
            let parts: Vec<String> = map
                .iter()
                .map(|(key, value)| {
                    format!("\"{}\":{}", escape_json_string(key), to_json_compact(value))
                })
                .collect();
            format!("{{{}}}", parts.join(","))
        }
        Document::Sequence(items) => compact_array(items.iter()),
        scalar => serialize_scalar(scalar),
    }
}

fn compact_array<'a>(items: impl Iterator<Item = &'a Document>) -> String {
    let parts: Vec<String> = items.map(to_json_compact).collect();
    format!("[{}]", parts.join(","))
}

/// Serializes a document to indented JSON.
///
/// Containers whose children are all scalars stay on one line when that line
/// fits in 80 characters.
pub fn to_json_pretty(doc: &Document, indent_size: usize) -> String {
    serialize_node(doc, indent_size, 0)
}

fn serialize_node(doc: &Document, indent_size: usize, current_depth: usize) -> String {
    let indent = " ".repeat(indent_size * current_depth);
    let next_indent = " ".repeat(indent_size * (current_depth + 1));

    match doc {
        Document::Map(map) if is_list_shaped(map) => {
            let items: Vec<&Document> = map.values().collect();
            serialize_array(&items, indent_size, current_depth)
        }
        Document::Map(map) => {
            if map.is_empty() {
                return "{}".to_string();
            }

            if map.values().all(|v| !v.is_container()) {
                let parts: Vec<String> = map
                    .iter()
                    .map(|(k, v)| format!("\"{}\": {}", escape_json_string(k), serialize_scalar(v)))
                    .collect();
                let compact = format!("{{{}}}", parts.join(", "));
                if compact.len() <= 80 {
                    return compact;
                }
            }

            let mut result = "{\n".to_string();
            for (i, (key, value)) in map.iter().enumerate() {
                result.push_str(&next_indent);
                result.push_str(&format!("\"{}\": ", escape_json_string(key)));
                result.push_str(&serialize_node(value, indent_size, current_depth + 1));
                if i < map.len() - 1 {
                    result.push(',');
                }
                result.push('\n');
            }
            result.push_str(&indent);
            result.push('}');
            result
        }
        Document::Sequence(items) => {
            let items: Vec<&Document> = items.iter().collect();
            serialize_array(&items, indent_size, current_depth)
        }
        scalar => serialize_scalar(scalar),
    }
}

fn serialize_array(items: &[&Document], indent_size: usize, current_depth: usize) -> String {
    if items.is_empty() {
        return "[]".to_string();
    }

    if items.iter().all(|v| !v.is_container()) {
        let parts: Vec<String> = items.iter().map(|v| serialize_scalar(v)).collect();
        let compact = format!("[{}]", parts.join(", "));
        if compact.len() <= 80 {
            return compact;
        }
    }

    let indent = " ".repeat(indent_size * current_depth);
    let next_indent = " ".repeat(indent_size * (current_depth + 1));
    let mut result = "[\n".to_string();
    for (i, item) in items.iter().enumerate() {
        result.push_str(&next_indent);
        result.push_str(&serialize_node(item, indent_size, current_depth + 1));
        if i < items.len() - 1 {
            result.push(',');
        }
        result.push('\n');
    }
    result.push_str(&indent);
    result.push(']');
    result
}

/// Serializes a non-container value. Containers fall back to compact form.
fn serialize_scalar(doc: &Document) -> String {
    match doc {
        Document::String(s) => format!("\"{}\"", escape_json_string(s)),
        Document::Number(Number::Integer(i)) => i.to_string(),
        Document::Number(Number::Float(f)) => {
            if !f.is_finite() {
                "null".to_string()
            } else if f.fract() == 0.0 && f.abs() < 1e16 {
                // keep floats distinguishable from integers on reload
                format!("{:.1}", f)
            } else {
                f.to_string()
            }
        }
        Document::Bool(b) => b.to_string(),
        Document::Null => "null".to_string(),
        container => to_json_compact(container),
    }
}

fn escape_json_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\x08' => result.push_str("\\b"),
            '\x0C' => result.push_str("\\f"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }

    result
}
