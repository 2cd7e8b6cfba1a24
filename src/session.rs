//! Per-render-call state.
//!
//! One `RenderSession` lives for exactly one top-level render: it owns the
//! placeholder-token registry and the instance-id counter, so overlapping
//! renders never share tokens or counters.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::dom::Attr;

const TOKEN_PREFIX: &str = "__b_";

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"__b_\d+").unwrap());
static SPREAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\.\.\s?(__b_\d+)").unwrap());

/// Value registry plus the counters scoped to one top-level render call.
#[derive(Debug, Default)]
pub struct RenderSession {
    values: HashMap<String, Value>,
    place: usize,
    instances: usize,
}

impl RenderSession {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Encode a value for inlining into markup text. Strings and numbers are
    /// inlined unchanged; everything else is stored under a fresh token.
    pub fn encode(&mut self, value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => {
                let token = format!("{TOKEN_PREFIX}{}", self.place);
                self.place += 1;
                self.values.insert(token.clone(), other.clone());
                token
            }
        }
    }

    /// Resolve raw attribute text back to a value. Registered tokens yield
    /// the original value; anything else is plain text.
    pub fn decode(&self, raw: &str) -> Value {
        if raw.starts_with(TOKEN_PREFIX) {
            if let Some(value) = self.values.get(raw) {
                return value.clone();
            }
        }
        Value::String(raw.to_string())
    }

    pub(crate) fn next_instance(&mut self) -> usize {
        let n = self.instances;
        self.instances += 1;
        n
    }

    /// Interleave literal parts with encoded values, then expand attribute
    /// spreads (`...<token>` where the token resolves to an object).
    pub(crate) fn compose(&mut self, strings: &[&str], values: &[Value]) -> String {
        let mut raw = String::new();
        for (i, part) in strings.iter().enumerate() {
            raw.push_str(part);
            if let Some(value) = values.get(i) {
                raw.push_str(&self.encode(value));
            }
        }
        for value in values.iter().skip(strings.len()) {
            raw.push_str(&self.encode(value));
        }
        self.expand_spreads(&raw)
    }

    fn expand_spreads(&mut self, raw: &str) -> String {
        if !raw.contains("...") {
            return raw.to_string();
        }
        let spreads: Vec<(usize, usize, String)> = SPREAD
            .captures_iter(raw)
            .filter_map(|caps| {
                let all = caps.get(0)?;
                Some((all.start(), all.end(), caps.get(1)?.as_str().to_string()))
            })
            .collect();
        let mut out = String::with_capacity(raw.len());
        let mut last = 0;
        for (start, end, token) in spreads {
            out.push_str(&raw[last..start]);
            out.push_str(&self.spread_attrs(&token));
            last = end;
        }
        out.push_str(&raw[last..]);
        out
    }

    /// Serialize an object value as attribute text: camelCase keys become
    /// kebab-case names, `true` a boolean attribute, false/null are omitted.
    fn spread_attrs(&mut self, token: &str) -> String {
        let Some(Value::Object(map)) = self.values.get(token).cloned() else {
            return String::new();
        };
        let mut parts = Vec::new();
        for (key, value) in &map {
            let name = kebab_case(key);
            match value {
                Value::Bool(true) => parts.push(format!(r#"{name}="{name}""#)),
                Value::Bool(false) | Value::Null => {}
                Value::String(s) => parts.push(format!(r#"{name}="{}""#, escape_attr_text(s))),
                Value::Number(n) => parts.push(format!(r#"{name}="{n}""#)),
                other => {
                    let nested = self.encode(other);
                    parts.push(format!(r#"{name}="{nested}""#));
                }
            }
        }
        parts.join(" ")
    }
}

/// Remove placeholder tokens that were never consumed as attribute values.
/// Last-resort cleanup, not an expected path.
pub(crate) fn strip_tokens(text: &str) -> String {
    TOKEN.replace_all(text, "").into_owned()
}

fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn escape_attr_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;")
}

/// Ambient read-only data shared by all render functions in one document
/// render. There is no mutating accessor, so render functions cannot write
/// to it.
#[derive(Debug, Clone, Default)]
pub struct Store {
    state: Map<String, Value>,
}

impl Store {
    /// Build a store from a JSON object; any other value yields an empty
    /// store.
    pub fn new(initial: Value) -> Self {
        match initial {
            Value::Object(state) => Self { state },
            _ => Self::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }

    pub fn as_object(&self) -> &Map<String, Value> {
        &self.state
    }
}

/// Cooperative mutable bag threaded through one document walk: a parent
/// render can stash values that its descendants read.
#[derive(Debug, Clone, Default)]
pub struct Context {
    entries: Map<String, Value>,
}

impl Context {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    pub fn as_object(&self) -> &Map<String, Value> {
        &self.entries
    }
}

/// Decoded attributes of one custom element, keyed by attribute name.
#[derive(Debug, Clone, Default)]
pub struct AttrMap {
    entries: Map<String, Value>,
}

impl AttrMap {
    pub(crate) fn from_attrs(attrs: &[Attr], session: &RenderSession) -> Self {
        let mut entries = Map::new();
        for attr in attrs {
            entries.insert(attr.name.clone(), session.decode(&attr.value));
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }
}
