//! Render-function registry and the custom-element grammar.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::session::{AttrMap, Context, RenderSession, Store};

/// ASCII reduction of the custom-element name grammar: lowercase start, at
/// least one hyphen.
static CUSTOM_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9._]*-[a-z0-9._-]*$").unwrap());

/// Hyphenated names reserved by the platform; never treated as expandable.
const RESERVED_TAGS: &[&str] = &[
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

/// Whether a tag name has the expandable custom-element shape.
pub fn is_custom_element(tag: &str) -> bool {
    CUSTOM_TAG.is_match(tag) && !RESERVED_TAGS.contains(&tag)
}

/// Error type render functions report failures with; the engine wraps it
/// with the offending tag name.
pub type RenderFnError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type RenderResult = Result<RenderOutput, RenderFnError>;

/// What a render function hands back.
#[derive(Debug)]
pub enum RenderOutput {
    /// Markup text, ready to parse.
    Markup(String),
    /// A result that is not synchronously available. The engine rejects
    /// this eagerly instead of embedding a placeholder for it.
    Pending,
}

impl From<String> for RenderOutput {
    fn from(markup: String) -> Self {
        RenderOutput::Markup(markup)
    }
}

impl From<&str> for RenderOutput {
    fn from(markup: &str) -> Self {
        RenderOutput::Markup(markup.to_string())
    }
}

/// Everything a render function sees for one expansion.
pub struct RenderArgs<'a> {
    /// Decoded attributes of the element being expanded.
    pub attrs: &'a AttrMap,
    /// Ambient read-only data for the whole document render.
    pub store: &'a Store,
    /// Mutable bag shared with descendant expansions.
    pub context: &'a mut Context,
    /// Unique id for this expansion instance.
    pub instance_id: &'a str,
    pub(crate) session: &'a mut RenderSession,
}

impl RenderArgs<'_> {
    /// Compose nested markup, routing non-text values through the session's
    /// value registry so they survive the parse/serialize round trip.
    pub fn html(&mut self, strings: &[&str], values: &[Value]) -> String {
        self.session.compose(strings, values)
    }
}

/// A registered render capability for one tag.
pub trait Render {
    fn render(&self, args: RenderArgs<'_>) -> RenderResult;
}

impl<F> Render for F
where
    F: Fn(RenderArgs<'_>) -> RenderResult,
{
    fn render(&self, args: RenderArgs<'_>) -> RenderResult {
        self(args)
    }
}

/// Tag name to render function. Registering a tag twice replaces the earlier
/// entry.
#[derive(Default)]
pub struct ElementRegistry {
    elements: HashMap<String, Box<dyn Render>>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tag: impl Into<String>, renderer: impl Render + 'static) {
        self.elements.insert(tag.into(), Box::new(renderer));
    }

    pub fn get(&self, tag: &str) -> Option<&dyn Render> {
        self.elements.get(tag).map(|r| r.as_ref())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.elements.contains_key(tag)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(|k| k.as_str())
    }
}

impl fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("ElementRegistry")
            .field("elements", &names)
            .finish()
    }
}
