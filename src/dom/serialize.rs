//! Tree back to markup text.

use super::parser::{is_raw_text, is_void};
use super::{Document, Element, Node};

pub fn serialize_document(doc: &Document) -> String {
    let mut out = String::new();
    if let Some(d) = &doc.doctype {
        out.push_str("<!");
        out.push_str(d);
        out.push('>');
    }
    write_element(&doc.html, &mut out);
    out
}

pub fn serialize_nodes(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Element(el) => write_element(el, out),
        Node::Text(t) => out.push_str(&escape_text(t)),
        Node::Comment(c) => {
            out.push_str("<!--");
            out.push_str(c);
            out.push_str("-->");
        }
        Node::Doctype(d) => {
            out.push_str("<!");
            out.push_str(d);
            out.push('>');
        }
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    for attr in &el.attrs {
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        out.push_str(&escape_attr(&attr.value));
        out.push('"');
    }
    out.push('>');
    if is_void(&el.name) {
        return;
    }
    if is_raw_text(&el.name) {
        // Raw-text content was never entity-decoded; emit it verbatim.
        for child in &el.children {
            if let Node::Text(t) = child {
                out.push_str(t);
            }
        }
    } else {
        for child in &el.children {
            write_node(child, out);
        }
    }
    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
}

fn escape_text(s: &str) -> String {
    if !s.contains(['&', '<', '>']) {
        return s.to_string();
    }
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    if !s.contains(['&', '"']) {
        return s.to_string();
    }
    s.replace('&', "&amp;").replace('"', "&quot;")
}
