//! JSON format adapter
//!
//! Direct structural mapping: objects, arrays, and leaves translate
//! one-to-one to traversal nodes, with type inference coming from the JSON
//! types themselves. Key order is preserved end to end.

use super::FormatAdapter;
use crate::domain::errors::VeilError;
use crate::domain::node::{Node, Scalar};
use crate::domain::result::Result;
use serde_json::{Map, Value};

/// JSON parse/serialize boundary.
#[derive(Debug, Default)]
pub struct JsonAdapter;

impl JsonAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl FormatAdapter for JsonAdapter {
    fn parse(&self, raw: &[u8]) -> Result<Node> {
        let value: Value = serde_json::from_slice(raw)?;
        Ok(node_from_value(&value))
    }

    fn serialize(&self, node: &Node, original_raw: &[u8]) -> Result<Vec<u8>> {
        let value = value_from_node(node);
        let mut out = if looks_pretty(original_raw) {
            serde_json::to_vec_pretty(&value)
        } else {
            serde_json::to_vec(&value)
        }
        .map_err(|e| VeilError::Serialization(e.to_string()))?;

        if original_raw.ends_with(b"\n") {
            out.push(b'\n');
        }
        Ok(out)
    }
}

fn node_from_value(value: &Value) -> Node {
    match value {
        Value::Null => Node::Scalar(Scalar::Null),
        Value::Bool(b) => Node::Scalar(Scalar::Bool(*b)),
        Value::Number(n) => Node::Scalar(Scalar::Number(n.clone())),
        Value::String(s) => Node::Scalar(Scalar::String(s.clone())),
        Value::Array(items) => Node::Array(items.iter().map(node_from_value).collect()),
        Value::Object(map) => Node::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), node_from_value(v)))
                .collect(),
        ),
    }
}

fn value_from_node(node: &Node) -> Value {
    match node {
        Node::Scalar(Scalar::Null) => Value::Null,
        Node::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
        Node::Scalar(Scalar::Number(n)) => Value::Number(n.clone()),
        Node::Scalar(Scalar::String(s)) => Value::String(s.clone()),
        Node::Array(items) => Value::Array(items.iter().map(value_from_node).collect()),
        Node::Object(entries) => {
            let mut map = Map::with_capacity(entries.len());
            for (k, v) in entries {
                map.insert(k.clone(), value_from_node(v));
            }
            Value::Object(map)
        }
    }
}

/// A document is considered pretty-printed when its trimmed body spans
/// multiple lines.
fn looks_pretty(raw: &[u8]) -> bool {
    let trimmed = raw
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map(|start| {
            let end = raw.iter().rposition(|b| !b.is_ascii_whitespace()).unwrap_or(start);
            &raw[start..=end]
        })
        .unwrap_or(&[]);
    trimmed.contains(&b'\n')
}
