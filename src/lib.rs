//! prelight - server-side expansion of custom elements
//!
//! Expands a document containing hyphenated custom-element tags into
//! fully-resolved static markup, without a browser: every registered tag is
//! replaced by the markup its render function produces, authored children
//! are projected into the declared slots, and style/script/link nodes
//! discovered along the way are deduplicated and hoisted to their canonical
//! document locations. Pages work before any client script runs.
//!
//! # Example
//!
//! ```rust
//! use prelight::{Enhancer, RenderArgs, RenderResult};
//!
//! fn my_greeting(args: RenderArgs) -> RenderResult {
//!     let name = args.attrs.get_str("name").unwrap_or("world");
//!     Ok(format!("<h1>Hello {name}</h1><slot></slot>").into())
//! }
//!
//! let enhancer = Enhancer::new()
//!     .templates(false)
//!     .element("my-greeting", my_greeting);
//! let html = enhancer
//!     .render_str(r#"<my-greeting name="kim"><p>bye</p></my-greeting>"#)
//!     .unwrap();
//! assert!(html.contains("<h1>Hello kim</h1><p>bye</p>"));
//! ```

pub mod dom;
mod error;
mod expand;
mod registry;
mod session;

pub use error::EnhanceError;
pub use expand::effects::{EffectOrigin, ScriptTransform, StyleTransform, TransformCtx};
pub use registry::{
    is_custom_element, ElementRegistry, Render, RenderArgs, RenderFnError, RenderOutput,
    RenderResult,
};
pub use session::{AttrMap, Context, RenderSession, Store};

// Re-exported for convenience: interpolated values are plain JSON values.
pub use serde_json::{json, Value};

use dom::{Element, Node};
use expand::Expander;
use session::RenderSession as Session;

const DEFAULT_DEPTH_LIMIT: usize = 256;

/// One configured render pass. Build it once, render any number of
/// documents; every call gets its own isolated session.
pub struct Enhancer {
    pub(crate) elements: ElementRegistry,
    pub(crate) store: Store,
    pub(crate) script_transforms: Vec<ScriptTransform>,
    pub(crate) style_transforms: Vec<StyleTransform>,
    pub(crate) id_fn: Option<Box<dyn Fn(usize) -> String>>,
    pub(crate) body_content: bool,
    pub(crate) enhanced_attr: bool,
    pub(crate) keep_unslotted_inserts: bool,
    pub(crate) strict: bool,
    pub(crate) templates: bool,
    pub(crate) depth_limit: usize,
}

impl Default for Enhancer {
    fn default() -> Self {
        Self {
            elements: ElementRegistry::new(),
            store: Store::default(),
            script_transforms: Vec::new(),
            style_transforms: Vec::new(),
            id_fn: None,
            body_content: false,
            enhanced_attr: false,
            keep_unslotted_inserts: false,
            strict: false,
            templates: true,
            depth_limit: DEFAULT_DEPTH_LIMIT,
        }
    }
}

impl Enhancer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a render function for one custom tag.
    pub fn element(mut self, tag: impl Into<String>, renderer: impl Render + 'static) -> Self {
        self.elements.register(tag, renderer);
        self
    }

    /// Replace the whole registry at once.
    pub fn elements(mut self, elements: ElementRegistry) -> Self {
        self.elements = elements;
        self
    }

    /// Ambient read-only data available to every render function.
    pub fn initial_state<T: serde::Serialize>(mut self, state: T) -> Self {
        let value = serde_json::to_value(state).unwrap_or(Value::Null);
        self.store = Store::new(value);
        self
    }

    /// Append a script transform; transforms run in registration order.
    pub fn script_transform(
        mut self,
        transform: impl Fn(&TransformCtx<'_>) -> String + 'static,
    ) -> Self {
        self.script_transforms.push(Box::new(transform));
        self
    }

    /// Append a style transform; transforms run in registration order.
    pub fn style_transform(
        mut self,
        transform: impl Fn(&TransformCtx<'_>) -> String + 'static,
    ) -> Self {
        self.style_transforms.push(Box::new(transform));
        self
    }

    /// Generate per-instance ids from the session's expansion counter.
    pub fn instance_ids(mut self, f: impl Fn(usize) -> String + 'static) -> Self {
        self.id_fn = Some(Box::new(f));
        self
    }

    /// Return only the body's first element instead of the full document.
    /// Usually paired with `templates(false)`.
    pub fn body_content(mut self, on: bool) -> Self {
        self.body_content = on;
        self
    }

    /// Mark every expanded custom element with an `enhanced` attribute.
    pub fn enhanced_attr(mut self, on: bool) -> Self {
        self.enhanced_attr = on;
        self
    }

    /// Leave named-slot inserts duplicated among the unslotted children
    /// instead of moving them out of their authored position.
    pub fn keep_unslotted_inserts(mut self, on: bool) -> Self {
        self.keep_unslotted_inserts = on;
        self
    }

    /// Strict mode errors on custom tags with no registered render function;
    /// lenient mode (the default) leaves them unexpanded.
    pub fn strict(mut self, on: bool) -> Self {
        self.strict = on;
        self
    }

    /// Emit a `<template id="<tag>-template">` per expanded definition at
    /// the top of the body, for client-side hydration.
    pub fn templates(mut self, on: bool) -> Self {
        self.templates = on;
        self
    }

    /// Cap on nested custom-element expansions; guards against components
    /// that re-introduce themselves forever.
    pub fn depth_limit(mut self, limit: usize) -> Self {
        self.depth_limit = limit;
        self
    }

    /// Render literal markup parts interleaved with values. Strings and
    /// numbers are inlined; any other value is routed through the session's
    /// value registry and survives the parse/serialize round trip.
    pub fn render(&self, strings: &[&str], values: &[Value]) -> Result<String, EnhanceError> {
        let mut session = Session::new();
        let raw = session.compose(strings, values);
        let mut doc = dom::parse_document(&raw);
        let mut expander = Expander::new(self, &mut session);

        {
            let body = doc.body_mut().ok_or(EnhanceError::MalformedDocument)?;
            expander.expand_children(&mut body.children, 0)?;
        }

        if self.templates {
            let tags = expander.expanded.clone();
            let mut rendered = Vec::with_capacity(tags.len());
            for tag in &tags {
                let fragment = expander.render_definition(tag)?;
                let mut tpl = Element::new("template");
                tpl.set_attr("id", &format!("{tag}-template"));
                tpl.children = fragment;
                rendered.push(Node::Element(tpl));
            }
            let body = doc.body_mut().ok_or(EnhanceError::MalformedDocument)?;
            body.children.splice(0..0, rendered);
        }

        let effects = expander.effects;
        let (head, body) = doc
            .head_body_mut()
            .ok_or(EnhanceError::MalformedDocument)?;
        effects.flush(head, body);

        let out = if self.body_content {
            let body = doc.body().ok_or(EnhanceError::MalformedDocument)?;
            match body.children.iter().find(|n| n.as_element().is_some()) {
                Some(node) => dom::serialize_nodes(std::slice::from_ref(node)),
                None => String::new(),
            }
        } else {
            dom::serialize_document(&doc)
        };
        Ok(session::strip_tokens(&out))
    }

    /// Render plain markup with no interpolated values.
    pub fn render_str(&self, markup: &str) -> Result<String, EnhanceError> {
        self.render(&[markup], &[])
    }
}

impl std::fmt::Debug for Enhancer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enhancer")
            .field("elements", &self.elements)
            .field("store", &self.store)
            .field("script_transforms", &self.script_transforms.len())
            .field("style_transforms", &self.style_transforms.len())
            .field("body_content", &self.body_content)
            .field("enhanced_attr", &self.enhanced_attr)
            .field("keep_unslotted_inserts", &self.keep_unslotted_inserts)
            .field("strict", &self.strict)
            .field("templates", &self.templates)
            .field("depth_limit", &self.depth_limit)
            .finish()
    }
}
