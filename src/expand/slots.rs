//! Slot projection: merge a custom element's authored (light) children into
//! its freshly rendered fragment.
//!
//! Discovery stays local to one expansion: the search for slots never
//! crosses into a nested custom element, whose own expansion will handle its
//! own slots.

use crate::dom::{Element, Node};
use crate::registry::is_custom_element;

/// Default wrapper tag synthesized around multi-root fallback content.
const FALLBACK_WRAPPER: &str = "span";

/// Project `light` children into `fragment`, resolving every slot in place.
///
/// Policies (deliberate, see DESIGN.md): the first insert in document order
/// wins a named slot and later inserts for the same name are dropped; the
/// first unnamed slot receives all unslotted light children and later
/// unnamed slots collapse to nothing. With `keep_inserts`, named inserts
/// additionally stay among the unslotted children instead of being moved.
pub fn project(light: Vec<Node>, fragment: &mut Vec<Node>, keep_inserts: bool) {
    let mut inserts: Vec<(String, Option<Node>)> = Vec::new();
    let mut unslotted: Vec<Node> = Vec::new();

    for node in light {
        let target = node
            .as_element()
            .and_then(|el| el.attr("slot"))
            .map(str::to_string);
        match target {
            Some(name) => {
                if keep_inserts {
                    unslotted.push(node.clone());
                }
                inserts.push((name, Some(node)));
            }
            None => unslotted.push(node),
        }
    }

    let mut unnamed = Some(unslotted);
    resolve(fragment, &mut inserts, &mut unnamed);
}

fn resolve(
    children: &mut Vec<Node>,
    inserts: &mut [(String, Option<Node>)],
    unnamed: &mut Option<Vec<Node>>,
) {
    let old = std::mem::take(children);
    for node in old {
        match node {
            Node::Element(el) if el.name == "slot" => {
                children.extend(fill_slot(el, inserts, unnamed));
            }
            Node::Element(mut el) => {
                if !is_custom_element(&el.name) {
                    resolve(&mut el.children, inserts, unnamed);
                }
                children.push(Node::Element(el));
            }
            other => children.push(other),
        }
    }
}

fn fill_slot(
    slot: Element,
    inserts: &mut [(String, Option<Node>)],
    unnamed: &mut Option<Vec<Node>>,
) -> Vec<Node> {
    match slot.attr("name") {
        Some(name) => {
            let name = name.to_string();
            // First matching insert wins; all others for this name are
            // consumed so they never resurface.
            let mut winner = None;
            for (target, node) in inserts.iter_mut() {
                if *target == name {
                    match node.take() {
                        Some(n) if winner.is_none() => winner = Some(n),
                        _ => {}
                    }
                }
            }
            match winner {
                Some(node) => vec![node],
                None => fallback(slot, &name),
            }
        }
        None => unnamed.take().unwrap_or_default(),
    }
}

/// Synthesize output for a named slot that found no insert, from its own
/// default content.
fn fallback(slot: Element, name: &str) -> Vec<Node> {
    let wrapper_tag = slot
        .attr("as")
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_WRAPPER.to_string());
    let element_roots = slot
        .children
        .iter()
        .filter(|n| n.as_element().is_some())
        .count();

    if element_roots == 1 {
        // Exactly one root element: tag it with the slot name directly.
        let mut out = slot.children;
        for node in out.iter_mut() {
            if let Node::Element(el) = node {
                el.set_attr("slot", name);
            }
        }
        out
    } else {
        // Empty or multi-root default content gets a synthetic container.
        let mut wrapper = Element::new(wrapper_tag);
        wrapper.set_attr("slot", name);
        wrapper.children = slot.children;
        vec![Node::Element(wrapper)]
    }
}
