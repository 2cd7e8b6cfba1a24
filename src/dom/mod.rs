//! Owned markup tree
//!
//! Nodes own their children exclusively; there are no parent pointers.
//! Structural edits work by rebuilding a node's child vector, which keeps
//! every splice-style operation a plain `Vec` manipulation.

mod parser;
mod serialize;

pub use parser::{parse_document, parse_fragment};
pub use serialize::{serialize_document, serialize_nodes};

/// A single name/value attribute pair. Values are always text; a value may be
/// a placeholder token minted by the render session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

/// An element with an ordered attribute list and ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<Attr>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    Doctype(String),
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Look up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }

    /// Set an attribute, replacing an existing value of the same name.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name == name) {
            attr.value = value.to_string();
        } else {
            self.attrs.push(Attr {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
    }

    /// Concatenated text of the element's direct text children.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            if let Node::Text(t) = child {
                out.push_str(t);
            }
        }
        out
    }
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// A full document: optional doctype plus the `html` root, which always
/// contains exactly one `head` and one `body` after parsing.
#[derive(Debug, Clone)]
pub struct Document {
    pub doctype: Option<String>,
    pub html: Element,
}

impl Document {
    fn section(&self, name: &str) -> Option<&Element> {
        self.html
            .children
            .iter()
            .find_map(|n| n.as_element().filter(|el| el.name == name))
    }

    pub fn head(&self) -> Option<&Element> {
        self.section("head")
    }

    pub fn body(&self) -> Option<&Element> {
        self.section("body")
    }

    pub fn body_mut(&mut self) -> Option<&mut Element> {
        self.html
            .children
            .iter_mut()
            .filter_map(|n| n.as_element_mut())
            .find(|el| el.name == "body")
    }

    /// Borrow head and body mutably at the same time.
    pub fn head_body_mut(&mut self) -> Option<(&mut Element, &mut Element)> {
        let mut head = None;
        let mut body = None;
        for node in self.html.children.iter_mut() {
            if let Node::Element(el) = node {
                match el.name.as_str() {
                    "head" => head = Some(el),
                    "body" => body = Some(el),
                    _ => {}
                }
            }
        }
        match (head, body) {
            (Some(h), Some(b)) => Some((h, b)),
            _ => None,
        }
    }
}
