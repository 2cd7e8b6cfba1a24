//! Side-effect collection and hoisting.
//!
//! Each expansion may produce `style`, `script`, and `link` nodes. They are
//! pulled out of the fragment before slot projection, run through the
//! configured transform pipelines, and queued. After the whole document walk
//! the queue is flushed once: scripts to the end of the body, styles merged
//! into a single element in the head, links to the head.

use std::collections::HashSet;

use crate::dom::{Attr, Element, Node};

/// Where a collected node came from: a per-instance occurrence in the page
/// markup, or the once-per-definition template render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectOrigin {
    Markup,
    Template,
}

/// What a transform function sees for one style or script node.
pub struct TransformCtx<'a> {
    /// Attributes of the node being transformed.
    pub attrs: &'a [Attr],
    /// Raw text content, as produced by the previous transform in the chain.
    pub raw: &'a str,
    /// Tag name of the custom element whose expansion produced the node.
    pub tag_name: &'a str,
    pub origin: EffectOrigin,
}

pub type ScriptTransform = Box<dyn Fn(&TransformCtx<'_>) -> String>;
pub type StyleTransform = Box<dyn Fn(&TransformCtx<'_>) -> String>;

#[derive(Debug, Default)]
pub struct EffectCollector {
    scripts: Vec<Element>,
    styles: Vec<Element>,
    links: Vec<Element>,
}

impl EffectCollector {
    /// Remove direct-child style/script/link nodes from `fragment` and queue
    /// the survivors of the transform pipelines.
    pub fn collect(
        &mut self,
        fragment: &mut Vec<Node>,
        tag_name: &str,
        origin: EffectOrigin,
        script_transforms: &[ScriptTransform],
        style_transforms: &[StyleTransform],
    ) {
        let mut kept = Vec::with_capacity(fragment.len());
        for node in fragment.drain(..) {
            match node {
                Node::Element(el) if el.name == "script" => {
                    if let Some(el) = transform(el, tag_name, origin, script_transforms, true) {
                        self.scripts.push(el);
                    }
                }
                Node::Element(el) if el.name == "style" => {
                    if let Some(el) = transform(el, tag_name, origin, style_transforms, false) {
                        self.styles.push(el);
                    }
                }
                Node::Element(el) if el.name == "link" => {
                    self.links.push(el);
                }
                other => kept.push(other),
            }
        }
        *fragment = kept;
    }

    /// Dedup everything collected over the walk and hoist it into place.
    pub fn flush(self, head: &mut Element, body: &mut Element) {
        // Scripts: keyed by external source when present, else literal text;
        // first-seen order at the end of the body.
        let mut seen = HashSet::new();
        for el in self.scripts {
            let key = el
                .attr("src")
                .map(str::to_string)
                .unwrap_or_else(|| el.text());
            if seen.insert(key) {
                body.children.push(Node::Element(el));
            }
        }

        // Styles: dedup by text, @import entries ahead of the rest, one
        // merged element in the head.
        let mut seen = HashSet::new();
        let mut imports = Vec::new();
        let mut rules = Vec::new();
        for el in self.styles {
            let css = el.text();
            if seen.insert(css.clone()) {
                if css.trim_start().starts_with("@import") {
                    imports.push(css);
                } else {
                    rules.push(css);
                }
            }
        }
        if !imports.is_empty() || !rules.is_empty() {
            let mut style = Element::new("style");
            let merged: Vec<String> = imports.into_iter().chain(rules).collect();
            style.children.push(Node::Text(merged.join("\n")));
            head.children.push(Node::Element(style));
        }

        // Links: dedup by attribute-sorted canonical serialization.
        let mut seen = HashSet::new();
        for el in self.links {
            let mut pairs: Vec<String> = el
                .attrs
                .iter()
                .map(|a| format!("{}={}", a.name, a.value))
                .collect();
            pairs.sort_unstable();
            if seen.insert(pairs.join(";")) {
                head.children.push(Node::Element(el));
            }
        }
    }
}

fn transform(
    mut el: Element,
    tag_name: &str,
    origin: EffectOrigin,
    transforms: &[ScriptTransform],
    keep_external: bool,
) -> Option<Element> {
    let mut raw = el.text();
    for t in transforms {
        raw = t(&TransformCtx {
            attrs: &el.attrs,
            raw: &raw,
            tag_name,
            origin,
        });
    }
    if raw.trim().is_empty() {
        // External scripts legitimately carry no text.
        if keep_external && el.has_attr("src") {
            el.children.clear();
            return Some(el);
        }
        return None;
    }
    el.children = vec![Node::Text(raw)];
    Some(el)
}
