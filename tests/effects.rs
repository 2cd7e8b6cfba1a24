//! Side-effect hoisting through the full pipeline: dedup, transform
//! pipelines, and the once-per-definition pattern.

use pretty_assertions::assert_eq;
use prelight::{EffectOrigin, Enhancer, RenderArgs, RenderResult, TransformCtx};

fn my_widget(args: RenderArgs) -> RenderResult {
    let _ = args;
    Ok(concat!(
        "<style>my-widget { display: block }</style>",
        "<h1>Widget</h1>",
        "<script>customElements.define('my-widget', class extends HTMLElement {})</script>"
    )
    .into())
}

#[test]
fn scripts_and_styles_hoist_once_for_repeated_instances() {
    let enhancer = Enhancer::new()
        .templates(false)
        .element("my-widget", my_widget);
    let out = enhancer
        .render_str("<my-widget></my-widget><my-widget></my-widget>")
        .unwrap();
    assert_eq!(out.matches("customElements.define").count(), 1);
    assert_eq!(out.matches("display: block").count(), 1);
    // Both instances keep their markup.
    assert_eq!(out.matches("<h1>Widget</h1>").count(), 2);
    // Script lands at the end of the body, style in the head.
    assert!(out.contains("</script></body></html>"));
    assert!(out.contains("<head><style>"));
}

#[test]
fn effects_are_removed_from_instance_markup() {
    let enhancer = Enhancer::new()
        .templates(false)
        .element("my-widget", my_widget);
    let out = enhancer.render_str("<my-widget></my-widget>").unwrap();
    assert!(out.contains("<my-widget><h1>Widget</h1></my-widget>"));
}

#[test]
fn import_styles_are_hoisted_ahead_of_rules() {
    fn imports(args: RenderArgs) -> RenderResult {
        let _ = args;
        Ok(r#"<style>@import url("base.css");</style><i>x</i>"#.into())
    }
    fn rules(args: RenderArgs) -> RenderResult {
        let _ = args;
        Ok("<style>b { color: red }</style><i>y</i>".into())
    }

    let enhancer = Enhancer::new()
        .templates(false)
        .element("my-rules", rules)
        .element("my-imports", imports);
    // Rules render first; the @import entry must still end up ahead.
    let out = enhancer
        .render_str("<my-rules></my-rules><my-imports></my-imports>")
        .unwrap();
    let style_start = out.find("<style>").unwrap();
    let import_at = out.find("@import").unwrap();
    let rule_at = out.find("b { color: red }").unwrap();
    assert!(import_at > style_start);
    assert!(import_at < rule_at);
    assert_eq!(out.matches("<style>").count(), 1);
}

#[test]
fn links_hoist_to_the_head_and_dedup() {
    fn linked(args: RenderArgs) -> RenderResult {
        let _ = args;
        Ok(r#"<link rel="stylesheet" href="w.css"><p>hi</p>"#.into())
    }

    let enhancer = Enhancer::new()
        .templates(false)
        .element("my-linked", linked);
    let out = enhancer
        .render_str("<my-linked></my-linked><my-linked></my-linked>")
        .unwrap();
    assert_eq!(out.matches("w.css").count(), 1);
    assert!(out.contains(r#"<head><link rel="stylesheet" href="w.css"></head>"#));
}

#[test]
fn script_transforms_chain_over_raw_text() {
    fn minify(ctx: &TransformCtx) -> String {
        ctx.raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }
    fn tag_comment(ctx: &TransformCtx) -> String {
        format!("/* {} */ {}", ctx.tag_name, ctx.raw)
    }

    let enhancer = Enhancer::new()
        .templates(false)
        .script_transform(minify)
        .script_transform(tag_comment)
        .element("my-widget", my_widget);
    let out = enhancer.render_str("<my-widget></my-widget>").unwrap();
    assert!(out.contains("/* my-widget */ customElements.define"));
}

#[test]
fn style_transform_can_emit_once_per_definition() {
    // Drop per-instance styles, keep the per-definition occurrence: the
    // "emit once per definition" idiom from the transform contract.
    fn once_per_definition(ctx: &TransformCtx) -> String {
        match ctx.origin {
            EffectOrigin::Template => ctx.raw.to_string(),
            EffectOrigin::Markup => String::new(),
        }
    }

    let enhancer = Enhancer::new()
        .style_transform(once_per_definition)
        .element("my-widget", my_widget);
    let out = enhancer
        .render_str("<my-widget></my-widget><my-widget></my-widget>")
        .unwrap();
    assert_eq!(out.matches("display: block").count(), 1);

    // With templates disabled there is no definition render, so nothing
    // survives the transform.
    let no_templates = Enhancer::new()
        .templates(false)
        .style_transform(once_per_definition)
        .element("my-widget", my_widget);
    let out = no_templates.render_str("<my-widget></my-widget>").unwrap();
    assert!(!out.contains("<style>"));
}

#[test]
fn templates_do_not_duplicate_effects() {
    let enhancer = Enhancer::new().element("my-widget", my_widget);
    let out = enhancer.render_str("<my-widget></my-widget>").unwrap();
    // The definition template render contributes the same script/style text,
    // which dedup collapses into single hoisted copies.
    assert_eq!(out.matches("customElements.define").count(), 1);
    assert_eq!(out.matches("display: block").count(), 1);
    // The emitted template itself carries neither.
    assert!(out.contains(r#"<template id="my-widget-template"><h1>Widget</h1></template>"#));
}
