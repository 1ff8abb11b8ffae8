//! XML format adapter
//!
//! Elements map to Objects keyed by tag name; adjacent repeated sibling
//! tags collapse into an Array, attributes live under the reserved `@name`
//! namespace, and mixed content keeps its text chunks under the reserved
//! `#text` key so attributes and elements stay addressable via distinct
//! paths. An element with neither attributes nor element children is its
//! text scalar directly.
//!
//! Element order is preserved exactly (non-adjacent repeats stay separate
//! entries). Comments and processing instructions are not carried over;
//! the XML declaration is.

use super::FormatAdapter;
use crate::domain::errors::VeilError;
use crate::domain::node::{Node, Scalar};
use crate::domain::result::Result;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;

/// Reserved key prefix for element attributes.
pub const ATTRIBUTE_PREFIX: &str = "@";

/// Reserved key for text chunks of mixed-content elements.
pub const TEXT_KEY: &str = "#text";

/// XML parse/serialize boundary.
#[derive(Debug, Default)]
pub struct XmlAdapter;

impl XmlAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl FormatAdapter for XmlAdapter {
    fn parse(&self, raw: &[u8]) -> Result<Node> {
        let mut reader = Reader::from_reader(raw);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();

        loop {
            match read_event(&mut reader, &mut buf)? {
                Event::Start(e) => {
                    let tag = name_to_string(e.name().as_ref());
                    let attrs = collect_attrs(&e)?;
                    let root = read_element(&mut reader, attrs)?;
                    return Ok(Node::Object(vec![(tag, root)]));
                }
                Event::Empty(e) => {
                    let tag = name_to_string(e.name().as_ref());
                    let attrs = collect_attrs(&e)?;
                    return Ok(Node::Object(vec![(tag, element_node(attr_entries(attrs)))]));
                }
                Event::Decl(_) | Event::Comment(_) | Event::DocType(_) | Event::PI(_) => {}
                Event::Text(t) => {
                    let text = unescape_text(&t)?;
                    if !text.trim().is_empty() {
                        return Err(VeilError::Parse(
                            "invalid XML: text content outside the root element".to_string(),
                        ));
                    }
                }
                Event::Eof => {
                    return Err(VeilError::Parse(
                        "invalid XML: document has no root element".to_string(),
                    ))
                }
                other => {
                    return Err(VeilError::Parse(format!(
                        "invalid XML: unexpected {other:?} before the root element"
                    )))
                }
            }
            buf.clear();
        }
    }

    fn serialize(&self, node: &Node, original_raw: &[u8]) -> Result<Vec<u8>> {
        let entries = match node {
            Node::Object(entries) if entries.len() == 1 => entries,
            _ => {
                return Err(VeilError::Serialization(
                    "XML document must have a single root element".to_string(),
                ))
            }
        };
        let (tag, root) = &entries[0];

        let indent = body_is_multiline(original_raw);
        let cursor = Cursor::new(Vec::new());
        let mut writer = if indent {
            Writer::new_with_indent(cursor, b' ', 2)
        } else {
            Writer::new(cursor)
        };
        write_element(&mut writer, tag, root)?;
        let body = writer.into_inner().into_inner();

        let mut out = Vec::with_capacity(original_raw.len());
        if let Some((decl, newline_after)) = declaration(original_raw) {
            out.extend_from_slice(decl);
            if newline_after {
                out.push(b'\n');
            }
        }
        out.extend_from_slice(&body);
        if original_raw.ends_with(b"\n") {
            out.push(b'\n');
        }
        Ok(out)
    }
}

fn read_event<'b>(reader: &mut Reader<&[u8]>, buf: &'b mut Vec<u8>) -> Result<Event<'b>> {
    reader.read_event_into(buf).map_err(|e| {
        VeilError::Parse(format!(
            "invalid XML at byte {}: {e}",
            reader.buffer_position()
        ))
    })
}

/// Read the content of an element whose start tag has been consumed.
fn read_element(reader: &mut Reader<&[u8]>, attrs: Vec<(String, String)>) -> Result<Node> {
    let mut entries = attr_entries(attrs);
    let mut buf = Vec::new();

    loop {
        match read_event(reader, &mut buf)? {
            Event::Start(e) => {
                let tag = name_to_string(e.name().as_ref());
                let child_attrs = collect_attrs(&e)?;
                let child = read_element(reader, child_attrs)?;
                push_child(&mut entries, tag, child);
            }
            Event::Empty(e) => {
                let tag = name_to_string(e.name().as_ref());
                let child_attrs = collect_attrs(&e)?;
                push_child(&mut entries, tag, element_node(attr_entries(child_attrs)));
            }
            Event::Text(t) => {
                let text = unescape_text(&t)?;
                entries.push((TEXT_KEY.to_string(), Node::string(text)));
            }
            Event::CData(t) => {
                let text = String::from_utf8_lossy(&t).into_owned();
                entries.push((TEXT_KEY.to_string(), Node::string(text)));
            }
            Event::End(_) => break,
            Event::Eof => {
                return Err(VeilError::Parse(format!(
                    "invalid XML: unexpected end of input at byte {}",
                    reader.buffer_position()
                )))
            }
            // comments and processing instructions inside elements are dropped
            _ => {}
        }
        buf.clear();
    }

    Ok(element_node(entries))
}

fn attr_entries(attrs: Vec<(String, String)>) -> Vec<(String, Node)> {
    attrs
        .into_iter()
        .map(|(key, value)| (format!("{ATTRIBUTE_PREFIX}{key}"), Node::string(value)))
        .collect()
}

/// Collapse an element's collected entries into its node form.
fn element_node(mut entries: Vec<(String, Node)>) -> Node {
    if entries.is_empty() {
        return Node::string("");
    }
    if entries.len() == 1 && entries[0].0 == TEXT_KEY {
        return entries.remove(0).1;
    }
    Node::Object(entries)
}

/// Append a child element, collapsing adjacent repeated tags into an Array.
fn push_child(entries: &mut Vec<(String, Node)>, tag: String, child: Node) {
    if let Some((last_key, last_node)) = entries.last_mut() {
        if *last_key == tag {
            if let Node::Array(items) = last_node {
                items.push(child);
            } else {
                let prev = std::mem::replace(last_node, Node::Array(Vec::new()));
                if let Node::Array(items) = last_node {
                    items.push(prev);
                    items.push(child);
                }
            }
            return;
        }
    }
    entries.push((tag, child));
}

fn collect_attrs(e: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr =
            attr.map_err(|err| VeilError::Parse(format!("invalid XML attribute: {err}")))?;
        let key = name_to_string(attr.key.as_ref());
        let value = attr
            .unescape_value()
            .map_err(|err| VeilError::Parse(format!("invalid XML attribute value: {err}")))?
            .into_owned();
        attrs.push((key, value));
    }
    Ok(attrs)
}

fn unescape_text(t: &BytesText<'_>) -> Result<String> {
    Ok(t.unescape()
        .map_err(|e| VeilError::Parse(format!("invalid XML text: {e}")))?
        .into_owned())
}

fn name_to_string(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

fn write_element<W: std::io::Write>(writer: &mut Writer<W>, tag: &str, node: &Node) -> Result<()> {
    match node {
        // repeated sibling elements share the parent's tag
        Node::Array(items) => {
            for item in items {
                write_element(writer, tag, item)?;
            }
            Ok(())
        }
        Node::Scalar(scalar) => {
            let text = scalar_text(scalar);
            if text.is_empty() {
                writer
                    .write_event(Event::Empty(BytesStart::new(tag)))
                    .map_err(|e| VeilError::Serialization(e.to_string()))
            } else {
                writer
                    .write_event(Event::Start(BytesStart::new(tag)))
                    .map_err(|e| VeilError::Serialization(e.to_string()))?;
                writer
                    .write_event(Event::Text(BytesText::new(&text)))
                    .map_err(|e| VeilError::Serialization(e.to_string()))?;
                writer
                    .write_event(Event::End(BytesEnd::new(tag)))
                    .map_err(|e| VeilError::Serialization(e.to_string()))
            }
        }
        Node::Object(entries) => {
            let mut attrs = Vec::new();
            let mut has_content = false;
            for (key, value) in entries {
                if let Some(attr_name) = key.strip_prefix(ATTRIBUTE_PREFIX) {
                    let Node::Scalar(s) = value else {
                        return Err(VeilError::Serialization(format!(
                            "XML attribute '{attr_name}' must be a scalar"
                        )));
                    };
                    attrs.push((attr_name.to_string(), s.lexical()));
                } else {
                    has_content = true;
                }
            }

            let mut start = BytesStart::new(tag);
            for (key, value) in &attrs {
                start.push_attribute((key.as_str(), value.as_str()));
            }

            if !has_content {
                return writer
                    .write_event(Event::Empty(start))
                    .map_err(|e| VeilError::Serialization(e.to_string()));
            }

            writer
                .write_event(Event::Start(start))
                .map_err(|e| VeilError::Serialization(e.to_string()))?;
            for (key, value) in entries {
                if key.starts_with(ATTRIBUTE_PREFIX) {
                    continue;
                }
                if key == TEXT_KEY {
                    let Node::Scalar(s) = value else {
                        return Err(VeilError::Serialization(
                            "XML text content must be a scalar".to_string(),
                        ));
                    };
                    writer
                        .write_event(Event::Text(BytesText::new(&scalar_text(s))))
                        .map_err(|e| VeilError::Serialization(e.to_string()))?;
                } else {
                    write_element(writer, key, value)?;
                }
            }
            writer
                .write_event(Event::End(BytesEnd::new(tag)))
                .map_err(|e| VeilError::Serialization(e.to_string()))
        }
    }
}

fn scalar_text(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Null => String::new(),
        other => other.lexical(),
    }
}

/// The verbatim XML declaration and whether a line break follows it.
fn declaration(raw: &[u8]) -> Option<(&[u8], bool)> {
    let start = raw.iter().position(|b| !b.is_ascii_whitespace())?;
    let rest = &raw[start..];
    if !rest.starts_with(b"<?xml") {
        return None;
    }
    let end = rest.windows(2).position(|w| w == b"?>")? + 2;
    let newline_after = rest.get(end).is_some_and(|&b| b == b'\n' || b == b'\r');
    Some((&rest[..end], newline_after))
}

/// Whether the document body spans multiple lines (indentation hint).
fn body_is_multiline(raw: &[u8]) -> bool {
    let start = raw.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(0);
    let mut body = &raw[start..];
    if body.starts_with(b"<?xml") {
        if let Some(end) = body.windows(2).position(|w| w == b"?>") {
            body = &body[end + 2..];
        }
    }
    let body = match body.iter().rposition(|b| !b.is_ascii_whitespace()) {
        Some(end) => &body[..=end],
        None => return false,
    };
    body.iter()
        .skip_while(|b| b.is_ascii_whitespace())
        .any(|&b| b == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> XmlAdapter {
        XmlAdapter::new()
    }

    #[test]
    fn test_text_only_element_is_scalar() {
        let node = adapter().parse(b"<root><name>John</name></root>").unwrap();
        let expected = Node::Object(vec![(
            "root".to_string(),
            Node::Object(vec![("name".to_string(), Node::string("John"))]),
        )]);
        assert_eq!(node, expected);
    }

    #[test]
    fn test_attributes_under_reserved_namespace() {
        let node = adapter()
            .parse(b"<root><user id=\"7\"><name>John</name></user></root>")
            .unwrap();
        let expected = Node::Object(vec![(
            "root".to_string(),
            Node::Object(vec![(
                "user".to_string(),
                Node::Object(vec![
                    ("@id".to_string(), Node::string("7")),
                    ("name".to_string(), Node::string("John")),
                ]),
            )]),
        )]);
        assert_eq!(node, expected);
    }

    #[test]
    fn test_repeated_siblings_become_array() {
        let node = adapter()
            .parse(b"<root><item>a</item><item>b</item></root>")
            .unwrap();
        let expected = Node::Object(vec![(
            "root".to_string(),
            Node::Object(vec![(
                "item".to_string(),
                Node::Array(vec![Node::string("a"), Node::string("b")]),
            )]),
        )]);
        assert_eq!(node, expected);
    }

    #[test]
    fn test_mixed_content_keeps_text_key() {
        let node = adapter()
            .parse(b"<root><note lang=\"en\">hello</note></root>")
            .unwrap();
        let expected = Node::Object(vec![(
            "root".to_string(),
            Node::Object(vec![(
                "note".to_string(),
                Node::Object(vec![
                    ("@lang".to_string(), Node::string("en")),
                    ("#text".to_string(), Node::string("hello")),
                ]),
            )]),
        )]);
        assert_eq!(node, expected);
    }

    #[test]
    fn test_compact_round_trip() {
        let raw = b"<root><user id=\"7\"><name>John</name><tag/></user></root>";
        let a = adapter();
        let node = a.parse(raw).unwrap();
        let out = a.serialize(&node, raw).unwrap();
        assert_eq!(out, raw.to_vec());
    }

    #[test]
    fn test_indented_round_trip_with_declaration() {
        let raw = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<users>\n  <user id=\"1\">\n    <name>John</name>\n  </user>\n</users>\n";
        let a = adapter();
        let node = a.parse(raw).unwrap();
        let out = a.serialize(&node, raw).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), String::from_utf8(raw.to_vec()).unwrap());
    }

    #[test]
    fn test_element_order_preserved_for_non_adjacent_repeats() {
        let raw = b"<root><a>1</a><b>2</b><a>3</a></root>";
        let a = adapter();
        let node = a.parse(raw).unwrap();
        // non-adjacent repeats stay separate entries in document order
        let out = a.serialize(&node, raw).unwrap();
        assert_eq!(out, raw.to_vec());
    }

    #[test]
    fn test_escaped_text_round_trip() {
        let raw = b"<root><note>a &amp; b</note></root>";
        let a = adapter();
        let node = a.parse(raw).unwrap();
        let Node::Object(entries) = &node else {
            panic!("expected object");
        };
        let Node::Object(children) = &entries[0].1 else {
            panic!("expected root children");
        };
        assert_eq!(children[0].1, Node::string("a & b"));
        let out = a.serialize(&node, raw).unwrap();
        assert_eq!(out, raw.to_vec());
    }

    #[test]
    fn test_malformed_xml_fails_fast() {
        let err = adapter().parse(b"<root><open></root>").unwrap_err();
        assert!(matches!(err, VeilError::Parse(_)));
    }

    #[test]
    fn test_empty_input_fails() {
        let err = adapter().parse(b"").unwrap_err();
        assert!(err.to_string().contains("no root element"));
    }
}
