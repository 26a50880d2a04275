//! Compact XML <-> structured value conversion.
//!
//! The compact convention maps each element name to a key in its parent
//! object. Attributes live under [`ATTRIBUTES_KEY`], text under [`TEXT_KEY`],
//! CDATA under [`CDATA_KEY`] and the XML declaration under
//! [`DECLARATION_KEY`]. A second sibling with the same name turns the key's
//! value into an array. Comments are dropped and whitespace-only text between
//! elements is ignored.
//!
//! ```text
//! <profile name="x">             {"profile": {
//!     <layerHeight>0.2</...>        "_attributes": {"name": "x"},
//!     <tc name="a"/>                "layerHeight": {"_text": "0.2"},
//!     <tc name="b"/>                "tc": [{"_attributes": {"name": "a"}},
//! </profile>                               {"_attributes": {"name": "b"}}]}}
//! ```
//!
//! Rendering is the inverse, with fixed indentation. Scalar values that are
//! not wrapped in `_text` render as element text too, so JSON fragments may
//! write `"setting": 210` instead of `"setting": {"_text": "210"}`.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};

pub const ATTRIBUTES_KEY: &str = "_attributes";
pub const TEXT_KEY: &str = "_text";
pub const CDATA_KEY: &str = "_cdata";
pub const DECLARATION_KEY: &str = "_declaration";
pub const DOCTYPE_KEY: &str = "_doctype";

/// Indentation unit used when rendering.
pub const INDENT: &str = "    ";

/// Parse XML text into its compact structured form.
///
/// Errors are returned as display strings; callers attach the source path.
pub fn parse(raw: &str) -> Result<Value, String> {
    let mut reader = Reader::from_str(raw);
    let mut stack: Vec<(String, Map<String, Value>)> = Vec::new();
    let mut document = Map::new();

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Decl(decl) => {
                let mut attrs = Map::new();
                let version = decl.version().map_err(|e| e.to_string())?;
                attrs.insert("version".into(), lossy(&version).into());
                if let Some(encoding) = decl.encoding() {
                    let encoding = encoding.map_err(|e| e.to_string())?;
                    attrs.insert("encoding".into(), lossy(&encoding).into());
                }
                if let Some(standalone) = decl.standalone() {
                    let standalone = standalone.map_err(|e| e.to_string())?;
                    attrs.insert("standalone".into(), lossy(&standalone).into());
                }
                let mut node = Map::new();
                node.insert(ATTRIBUTES_KEY.into(), Value::Object(attrs));
                document.insert(DECLARATION_KEY.into(), Value::Object(node));
            }
            Event::DocType(doctype) => {
                let text = lossy(&doctype).trim().to_string();
                document.insert(DOCTYPE_KEY.into(), Value::String(text));
            }
            Event::Start(element) => {
                let node = open_element(&element)?;
                stack.push((element_name(&element), node));
            }
            Event::Empty(element) => {
                let node = open_element(&element)?;
                let parent = stack.last_mut().map(|(_, map)| map).unwrap_or(&mut document);
                attach(parent, element_name(&element), Value::Object(node));
            }
            Event::End(end) => {
                let end_name = lossy(end.name().as_ref()).into_owned();
                let (name, node) = stack
                    .pop()
                    .ok_or_else(|| format!("unexpected closing tag </{end_name}>"))?;
                let parent = stack.last_mut().map(|(_, map)| map).unwrap_or(&mut document);
                attach(parent, name, Value::Object(node));
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| e.to_string())?;
                if text.trim().is_empty() {
                    continue;
                }
                let Some((_, node)) = stack.last_mut() else {
                    return Err(format!("text outside the root element: {}", text.trim()));
                };
                append_text(node, TEXT_KEY, &text);
            }
            Event::CData(cdata) => {
                let text = lossy(&cdata.into_inner()).into_owned();
                if let Some((_, node)) = stack.last_mut() {
                    append_text(node, CDATA_KEY, &text);
                }
            }
            Event::Eof => break,
            // comments and processing instructions are dropped
            _ => {}
        }
    }

    if let Some((name, _)) = stack.last() {
        return Err(format!("unclosed element <{name}>"));
    }

    Ok(Value::Object(document))
}

fn lossy(bytes: &[u8]) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

fn element_name(element: &BytesStart<'_>) -> String {
    lossy(element.name().as_ref()).into_owned()
}

fn open_element(element: &BytesStart<'_>) -> Result<Map<String, Value>, String> {
    let mut attrs = Map::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|e| e.to_string())?;
        attrs.insert(key, Value::String(value.into_owned()));
    }

    let mut node = Map::new();
    if !attrs.is_empty() {
        node.insert(ATTRIBUTES_KEY.into(), Value::Object(attrs));
    }
    Ok(node)
}

fn attach(parent: &mut Map<String, Value>, name: String, child: Value) {
    match parent.get_mut(&name) {
        Some(Value::Array(siblings)) => siblings.push(child),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, child]);
        }
        None => {
            parent.insert(name, child);
        }
    }
}

fn append_text(node: &mut Map<String, Value>, key: &str, text: &str) {
    match node.get_mut(key) {
        Some(Value::String(existing)) => existing.push_str(text),
        _ => {
            node.insert(key.into(), Value::String(text.to_string()));
        }
    }
}

/// Render a compact structured value back to XML text.
pub fn render(document: &Value) -> String {
    let mut out = String::new();
    if let Value::Object(map) = document {
        write_children(&mut out, map, 0, true);
    }
    out
}

/// Write every child of `node` at `depth`.
fn write_children(out: &mut String, node: &Map<String, Value>, depth: usize, mut first_line: bool) {
    for (key, value) in node {
        let items: &[Value] = match value {
            Value::Array(items) => items,
            single => std::slice::from_ref(single),
        };
        for item in items {
            match key.as_str() {
                ATTRIBUTES_KEY => continue,
                DECLARATION_KEY => {
                    out.push_str("<?xml");
                    if let Some(attrs) = item.get(ATTRIBUTES_KEY).and_then(Value::as_object) {
                        write_attributes(out, attrs);
                    }
                    out.push_str("?>");
                }
                DOCTYPE_KEY => {
                    write_indentation(out, depth, first_line);
                    out.push_str("<!DOCTYPE ");
                    out.push_str(&scalar_text(item));
                    out.push('>');
                }
                TEXT_KEY => out.push_str(&escape_text(&scalar_text(item))),
                CDATA_KEY => {
                    out.push_str("<![CDATA[");
                    out.push_str(&scalar_text(item).replace("]]>", "]]]]><![CDATA[>"));
                    out.push_str("]]>");
                }
                name => {
                    write_indentation(out, depth, first_line);
                    write_element(out, name, item, depth);
                }
            }
            first_line = first_line && out.is_empty();
        }
    }
}

fn write_element(out: &mut String, name: &str, element: &Value, depth: usize) {
    let node = match element {
        Value::Null => {
            out.push_str(&format!("<{name}/>"));
            return;
        }
        Value::String(s) if s.is_empty() => {
            out.push_str(&format!("<{name}/>"));
            return;
        }
        Value::Object(node) => node,
        scalar => {
            let text = escape_text(&scalar_text(scalar));
            out.push_str(&format!("<{name}>{text}</{name}>"));
            return;
        }
    };

    out.push('<');
    out.push_str(name);
    if let Some(attrs) = node.get(ATTRIBUTES_KEY).and_then(Value::as_object) {
        write_attributes(out, attrs);
    }
    if !has_content(node, true) {
        out.push_str("/>");
        return;
    }
    out.push('>');
    write_children(out, node, depth + 1, false);
    if has_content(node, false) {
        write_indentation(out, depth, false);
    }
    out.push_str(&format!("</{name}>"));
}

/// Whether `node` has anything besides attributes. Text and CDATA only count
/// when `any_content` is set; otherwise this answers "does the closing tag go
/// on its own line".
fn has_content(node: &Map<String, Value>, any_content: bool) -> bool {
    node.keys().any(|key| match key.as_str() {
        ATTRIBUTES_KEY => false,
        TEXT_KEY | CDATA_KEY => any_content,
        _ => true,
    })
}

fn write_attributes(out: &mut String, attrs: &Map<String, Value>) {
    for (key, value) in attrs {
        if value.is_null() {
            continue;
        }
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&scalar_text(value).replace('"', "&quot;"));
        out.push('"');
    }
}

fn write_indentation(out: &mut String, depth: usize, first_line: bool) {
    if !first_line {
        out.push('\n');
    }
    out.push_str(&INDENT.repeat(depth));
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn escape_text(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
