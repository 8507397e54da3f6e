//! Re-emits a document tree as HTML text.
//!
//! Serialization is faithful rather than pretty: no whitespace is inserted
//! or removed, so preformatted content survives a parse/serialize round
//! trip.

use crate::dom::{Document, ElementNode, Node, NodeHandle};

/// Void (self-closing) elements; they get no closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "meta", "img", "br", "hr", "input", "link", "area", "base", "col", "embed", "param", "source",
    "track", "wbr",
];

/// Elements whose text content is emitted verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &["style", "script"];

pub fn serialize_document(document: &Document) -> String {
    let mut out = String::new();
    if let Some(doctype) = &*document.doctype.borrow() {
        out.push_str("<!DOCTYPE ");
        out.push_str(&doctype.name);
        if !doctype.public_id.is_empty() {
            out.push_str(" PUBLIC \"");
            out.push_str(&doctype.public_id);
            out.push_str("\" \"");
            out.push_str(&doctype.system_id);
            out.push('"');
        } else if !doctype.system_id.is_empty() {
            out.push_str(" SYSTEM \"");
            out.push_str(&doctype.system_id);
            out.push('"');
        }
        out.push_str(">\n");
    }
    serialize_node(&document.root, false, &mut out);
    out
}

fn serialize_node(node: &NodeHandle, raw_text: bool, out: &mut String) {
    match *node.borrow() {
        Node::DocumentRoot(ref root) => {
            for child in &root.children {
                serialize_node(child, false, out);
            }
        }
        Node::Text(ref text) => {
            if raw_text {
                out.push_str(text);
            } else {
                push_escaped_text(text, out);
            }
        }
        Node::Comment(ref text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        Node::Element(ref elem) => serialize_element(elem, out),
    }
}

fn serialize_element(elem: &ElementNode, out: &mut String) {
    out.push('<');
    out.push_str(&elem.tag);
    for (name, value) in &elem.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        push_escaped_attr(value, out);
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&elem.tag.as_str()) {
        return;
    }

    let raw = RAW_TEXT_ELEMENTS.contains(&elem.tag.as_str());
    for child in &elem.children {
        serialize_node(child, raw, out);
    }

    out.push_str("</");
    out.push_str(&elem.tag);
    out.push('>');
}

fn push_escaped_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn push_escaped_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// Escapes `&`, `<` and `>` for embedding in HTML text content.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped_text(text, &mut out);
    out
}
