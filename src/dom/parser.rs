//! Permissive markup parser: text in, owned node tree out.
//!
//! This is deliberately a small forgiving scanner, not a full HTML5
//! tokenizer. Unclosed elements are closed at end of input, stray end tags
//! are ignored, and unknown constructs fall back to text.

use super::{Attr, Document, Element, Node};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

// Elements whose content is taken verbatim up to the matching end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "title", "textarea"];

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub(crate) fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

/// Parse markup into a list of sibling nodes with no document wrapper.
pub fn parse_fragment(input: &str) -> Vec<Node> {
    parse_nodes(input)
}

/// Parse markup into a full document, synthesizing the `html`/`head`/`body`
/// shell when the input is a bare fragment. An authored `<head>` or `<body>`
/// is merged into the synthesized shell.
pub fn parse_document(input: &str) -> Document {
    let mut doctype = None;
    let mut items = Vec::new();

    // Unwrap a top-level <html> element if one was authored.
    let mut html_attrs = Vec::new();
    for node in parse_nodes(input) {
        match node {
            Node::Doctype(d) => {
                if doctype.is_none() {
                    doctype = Some(d);
                }
            }
            Node::Element(el) if el.name == "html" => {
                html_attrs = el.attrs;
                items.extend(el.children);
            }
            other => items.push(other),
        }
    }

    let mut head = Element::new("head");
    let mut body = Element::new("body");
    for node in items {
        match node {
            Node::Doctype(d) => {
                if doctype.is_none() {
                    doctype = Some(d);
                }
            }
            Node::Element(el) if el.name == "head" => {
                head.attrs.extend(el.attrs);
                head.children.extend(el.children);
            }
            Node::Element(el) if el.name == "body" => {
                body.attrs.extend(el.attrs);
                body.children.extend(el.children);
            }
            other => body.children.push(other),
        }
    }

    let mut html = Element::new("html");
    html.attrs = html_attrs;
    html.children = vec![Node::Element(head), Node::Element(body)];
    Document { doctype, html }
}

fn parse_nodes(input: &str) -> Vec<Node> {
    let mut r = Reader { input, pos: 0 };
    // Index 0 is a synthetic root; real elements stack above it.
    let mut stack: Vec<Element> = vec![Element::new("#fragment")];

    while !r.eof() {
        if r.starts_with("<!--") {
            r.bump(4);
            let text = r.take_until_str("-->").to_string();
            r.skip_str("-->");
            append(&mut stack, Node::Comment(text));
        } else if r.starts_with("<!") {
            r.bump(2);
            let text = r.take_until_char('>').trim().to_string();
            r.skip_char('>');
            append(&mut stack, Node::Doctype(text));
        } else if r.starts_with("</") {
            r.bump(2);
            let name = r.take_tag_name();
            r.take_until_char('>');
            r.skip_char('>');
            close_element(&mut stack, &name);
        } else if r.at_start_tag() {
            r.bump(1);
            let name = r.take_tag_name();
            let (attrs, self_closing) = r.take_attrs();
            let mut el = Element::new(name);
            el.attrs = attrs;
            if is_void(&el.name) || self_closing {
                append(&mut stack, Node::Element(el));
            } else if is_raw_text(&el.name) {
                let raw = r.take_raw_text(&el.name);
                if !raw.is_empty() {
                    el.children.push(Node::Text(raw));
                }
                append(&mut stack, Node::Element(el));
            } else {
                stack.push(el);
            }
        } else {
            let text = r.take_text();
            if !text.is_empty() {
                append(&mut stack, Node::Text(decode_entities(text)));
            }
        }
    }

    // Close anything still open at end of input.
    while stack.len() > 1 {
        if let Some(el) = stack.pop() {
            if let Some(parent) = stack.last_mut() {
                parent.children.push(Node::Element(el));
            }
        }
    }
    stack.pop().map(|root| root.children).unwrap_or_default()
}

fn append(stack: &mut [Element], node: Node) {
    if let Some(top) = stack.last_mut() {
        top.children.push(node);
    }
}

fn close_element(stack: &mut Vec<Element>, name: &str) {
    let name = name.to_ascii_lowercase();
    let Some(open_at) = stack.iter().rposition(|el| el.name == name) else {
        return;
    };
    if open_at == 0 {
        return;
    }
    while stack.len() > open_at {
        if let Some(el) = stack.pop() {
            if let Some(parent) = stack.last_mut() {
                parent.children.push(Node::Element(el));
            }
        }
    }
}

struct Reader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn starts_with(&self, pat: &str) -> bool {
        self.rest().starts_with(pat)
    }

    fn bump(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    fn at_start_tag(&self) -> bool {
        let mut chars = self.rest().chars();
        chars.next() == Some('<') && matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
    }

    fn take_until_str(&mut self, pat: &str) -> &'a str {
        let rest = self.rest();
        match rest.find(pat) {
            Some(i) => {
                self.pos += i;
                &rest[..i]
            }
            None => {
                self.pos = self.input.len();
                rest
            }
        }
    }

    fn take_until_char(&mut self, c: char) -> &'a str {
        let rest = self.rest();
        match rest.find(c) {
            Some(i) => {
                self.pos += i;
                &rest[..i]
            }
            None => {
                self.pos = self.input.len();
                rest
            }
        }
    }

    fn skip_str(&mut self, pat: &str) {
        if self.starts_with(pat) {
            self.pos += pat.len();
        }
    }

    fn skip_char(&mut self, c: char) {
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let end = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
        self.pos += end;
    }

    fn take_tag_name(&mut self) -> String {
        let rest = self.rest();
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')))
            .unwrap_or(rest.len());
        self.pos += end;
        rest[..end].to_ascii_lowercase()
    }

    /// Text run up to the next construct that looks like markup.
    fn take_text(&mut self) -> &'a str {
        let rest = self.rest();
        let first = match rest.chars().next() {
            Some(c) => c.len_utf8(),
            None => return "",
        };
        let mut i = first;
        loop {
            match rest[i..].find('<') {
                Some(j) => {
                    let at = i + j;
                    let after = rest[at + 1..].chars().next();
                    if matches!(after, Some(c) if c.is_ascii_alphabetic() || c == '/' || c == '!' || c == '?')
                    {
                        self.pos += at;
                        return &rest[..at];
                    }
                    i = at + 1;
                }
                None => {
                    self.pos = self.input.len();
                    return rest;
                }
            }
        }
    }

    fn take_attrs(&mut self) -> (Vec<Attr>, bool) {
        let mut attrs = Vec::new();
        loop {
            self.skip_whitespace();
            if self.eof() {
                return (attrs, false);
            }
            if self.starts_with("/>") {
                self.bump(2);
                return (attrs, true);
            }
            if self.starts_with(">") {
                self.bump(1);
                return (attrs, false);
            }
            if self.starts_with("/") {
                self.bump(1);
                continue;
            }

            let rest = self.rest();
            let end = rest
                .find(|c: char| c.is_whitespace() || matches!(c, '=' | '>' | '/'))
                .unwrap_or(rest.len());
            if end == 0 {
                // Stray character where an attribute name was expected.
                let skip = rest.chars().next().map(|c| c.len_utf8()).unwrap_or(1);
                self.bump(skip);
                continue;
            }
            let name = rest[..end].to_ascii_lowercase();
            self.pos += end;

            self.skip_whitespace();
            let value = if self.starts_with("=") {
                self.bump(1);
                self.skip_whitespace();
                if self.starts_with("\"") {
                    self.bump(1);
                    let v = self.take_until_char('"');
                    self.skip_char('"');
                    decode_entities(v)
                } else if self.starts_with("'") {
                    self.bump(1);
                    let v = self.take_until_char('\'');
                    self.skip_char('\'');
                    decode_entities(v)
                } else {
                    let rest = self.rest();
                    let end = rest
                        .find(|c: char| c.is_whitespace() || c == '>')
                        .unwrap_or(rest.len());
                    self.pos += end;
                    decode_entities(&rest[..end])
                }
            } else {
                String::new()
            };
            attrs.push(Attr { name, value });
        }
    }

    /// Verbatim content of a raw-text element, consuming its end tag.
    fn take_raw_text(&mut self, name: &str) -> String {
        let rest = self.rest();
        let close = format!("</{name}");
        match rest.to_ascii_lowercase().find(&close) {
            Some(i) => {
                let text = rest[..i].to_string();
                self.pos += i;
                self.take_until_char('>');
                self.skip_char('>');
                text
            }
            None => {
                self.pos = self.input.len();
                rest.to_string()
            }
        }
    }
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(i) = rest.find('&') {
        out.push_str(&rest[..i]);
        rest = &rest[i..];
        match rest.find(';') {
            Some(end) if end <= 32 => match resolve_entity(&rest[1..end]) {
                Some(decoded) => {
                    out.push_str(&decoded);
                    rest = &rest[end + 1..];
                }
                None => {
                    out.push('&');
                    rest = &rest[1..];
                }
            },
            _ => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn resolve_entity(name: &str) -> Option<String> {
    match name {
        "amp" => Some("&".to_string()),
        "lt" => Some("<".to_string()),
        "gt" => Some(">".to_string()),
        "quot" => Some("\"".to_string()),
        "apos" => Some("'".to_string()),
        "nbsp" => Some("\u{a0}".to_string()),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = if let Some(hex) = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X'))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                digits.parse::<u32>().ok()?
            };
            char::from_u32(code).map(|c| c.to_string())
        }
    }
}
