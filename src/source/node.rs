//! Order-preserving JSON tree for token documents.
//!
//! `serde_json::Value` keeps only the last of two equal keys, which would turn
//! a duplicate token definition into a silent overwrite. [`SourceNode`] keeps
//! every entry in document order so the loader can reject duplicates with the
//! offending path.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};

/// A parsed JSON node.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceNode {
    /// Object entries in document order, duplicates included.
    Object(Vec<(String, SourceNode)>),
    /// String value.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Any other JSON value, tagged with its kind (`null`, `boolean`, `array`).
    Other(&'static str),
}

impl SourceNode {
    /// Parse a JSON document.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Object entries, if this node is an object.
    pub fn entries(&self) -> Option<&[(String, SourceNode)]> {
        match self {
            SourceNode::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// First entry named `key`, if this node is an object.
    pub fn get(&self, key: &str) -> Option<&SourceNode> {
        self.entries()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Human-readable kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceNode::Object(_) => "object",
            SourceNode::Text(_) => "string",
            SourceNode::Number(_) => "number",
            SourceNode::Other(kind) => kind,
        }
    }
}

impl From<serde_json::Value> for SourceNode {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Object(map) => {
                SourceNode::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
            Value::String(s) => SourceNode::Text(s),
            Value::Number(n) => n
                .as_f64()
                .map_or(SourceNode::Other("number"), SourceNode::Number),
            Value::Bool(_) => SourceNode::Other("boolean"),
            Value::Null => SourceNode::Other("null"),
            Value::Array(_) => SourceNode::Other("array"),
        }
    }
}

impl<'de> Deserialize<'de> for SourceNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = SourceNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON token document")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(SourceNode::Other("boolean"))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(SourceNode::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(SourceNode::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(SourceNode::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(SourceNode::Text(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(SourceNode::Text(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(SourceNode::Other("null"))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(SourceNode::Other("null"))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(SourceNode::Other("array"))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            let value = map.next_value::<SourceNode>()?;
            entries.push((key, value));
        }
        Ok(SourceNode::Object(entries))
    }
}
