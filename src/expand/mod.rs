//! Tree walker and render invoker.
//!
//! A single depth-first pass over the body: each custom element is expanded
//! before the walk descends into its (replaced) children, which is what makes
//! one pass sufficient for arbitrarily nested custom elements.

pub mod effects;
pub mod slots;

use crate::dom::{self, Element, Node};
use crate::error::EnhanceError;
use crate::registry::{is_custom_element, RenderArgs, RenderOutput};
use crate::session::{AttrMap, Context, RenderSession};
use crate::Enhancer;

use effects::{EffectCollector, EffectOrigin};

pub(crate) struct Expander<'e> {
    config: &'e Enhancer,
    session: &'e mut RenderSession,
    context: Context,
    pub(crate) effects: EffectCollector,
    /// Unique expanded tag names, first-seen order.
    pub(crate) expanded: Vec<String>,
}

impl<'e> Expander<'e> {
    pub(crate) fn new(config: &'e Enhancer, session: &'e mut RenderSession) -> Self {
        Self {
            config,
            session,
            context: Context::default(),
            effects: EffectCollector::default(),
            expanded: Vec::new(),
        }
    }

    /// Walk a child list, expanding registered custom elements in place and
    /// continuing into their replaced children.
    pub(crate) fn expand_children(
        &mut self,
        children: &mut Vec<Node>,
        depth: usize,
    ) -> Result<(), EnhanceError> {
        for node in children.iter_mut() {
            let Node::Element(el) = node else { continue };
            if is_custom_element(&el.name) {
                if self.config.elements.contains(&el.name) {
                    if depth >= self.config.depth_limit {
                        return Err(EnhanceError::DepthExceeded {
                            tag: el.name.clone(),
                            limit: self.config.depth_limit,
                        });
                    }
                    self.expand_element(el)?;
                    if !self.expanded.iter().any(|t| t == &el.name) {
                        self.expanded.push(el.name.clone());
                    }
                    if self.config.enhanced_attr {
                        el.set_attr("enhanced", "✨");
                    }
                    self.expand_children(&mut el.children, depth + 1)?;
                    continue;
                }
                if self.config.strict {
                    return Err(EnhanceError::UnknownElement {
                        tag: el.name.clone(),
                    });
                }
                // Lenient: leave the tag unexpanded, keep walking inside it.
            }
            self.expand_children(&mut el.children, depth)?;
        }
        Ok(())
    }

    fn expand_element(&mut self, el: &mut Element) -> Result<(), EnhanceError> {
        let attrs = AttrMap::from_attrs(&el.attrs, self.session);
        let markup = self.invoke(&el.name, &attrs)?;
        let mut fragment = dom::parse_fragment(&markup);
        self.effects.collect(
            &mut fragment,
            &el.name,
            EffectOrigin::Markup,
            &self.config.script_transforms,
            &self.config.style_transforms,
        );
        let light = std::mem::take(&mut el.children);
        slots::project(light, &mut fragment, self.config.keep_unslotted_inserts);
        el.children = fragment;
        Ok(())
    }

    /// Render one tag's definition for the `<template>` emission pass; its
    /// side effects are collected with template origin and the slot-bearing
    /// fragment comes back untouched.
    pub(crate) fn render_definition(&mut self, tag: &str) -> Result<Vec<Node>, EnhanceError> {
        let attrs = AttrMap::default();
        let markup = self.invoke(tag, &attrs)?;
        let mut fragment = dom::parse_fragment(&markup);
        self.effects.collect(
            &mut fragment,
            tag,
            EffectOrigin::Template,
            &self.config.script_transforms,
            &self.config.style_transforms,
        );
        Ok(fragment)
    }

    fn invoke(&mut self, tag: &str, attrs: &AttrMap) -> Result<String, EnhanceError> {
        let renderer = self
            .config
            .elements
            .get(tag)
            .ok_or_else(|| EnhanceError::UnknownElement {
                tag: tag.to_string(),
            })?;
        let seq = self.session.next_instance();
        let instance_id = match &self.config.id_fn {
            Some(f) => f(seq),
            None => format!("i{seq}"),
        };
        let args = RenderArgs {
            attrs,
            store: &self.config.store,
            context: &mut self.context,
            instance_id: &instance_id,
            session: &mut *self.session,
        };
        match renderer.render(args) {
            Ok(RenderOutput::Markup(markup)) => Ok(markup),
            Ok(RenderOutput::Pending) => Err(EnhanceError::IllegalAsyncRender {
                tag: tag.to_string(),
            }),
            Err(err) => Err(EnhanceError::RenderFailure {
                tag: tag.to_string(),
                message: err.to_string(),
            }),
        }
    }
}
