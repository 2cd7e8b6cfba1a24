//! Slot projection through the full pipeline: named and unnamed fills,
//! fallback synthesis, and the documented multi-insert policy.

use pretty_assertions::assert_eq;
use prelight::{Enhancer, RenderArgs, RenderResult};

fn strip(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn my_paragraph(args: RenderArgs) -> RenderResult {
    let _ = args;
    Ok(r#"<p><slot name="my-text">My default text</slot></p>"#.into())
}

fn my_content(args: RenderArgs) -> RenderResult {
    let _ = args;
    Ok(r#"<h2>My Content</h2><slot name="title"><h3>Title</h3></slot><slot></slot>"#.into())
}

fn harness(tag: &str, renderer: fn(RenderArgs) -> RenderResult) -> Enhancer {
    Enhancer::new().templates(false).element(tag, renderer)
}

#[test]
fn named_slot_is_filled_by_its_insert() {
    let out = harness("my-paragraph", my_paragraph)
        .render_str(r#"<my-paragraph><span slot="my-text">Slotted</span></my-paragraph>"#)
        .unwrap();
    assert_eq!(
        strip(&out),
        strip(
            r#"<html><head></head><body>
                 <my-paragraph><p><span slot="my-text">Slotted</span></p></my-paragraph>
               </body></html>"#
        )
    );
}

#[test]
fn unslotted_children_fill_the_unnamed_slot_in_order() {
    let out = harness("my-content", my_content)
        .render_str(
            r#"<my-content>
                 <h1>YOLO</h1>
                 <h4 slot="title">Custom title</h4>
               </my-content>"#,
        )
        .unwrap();
    assert_eq!(
        strip(&out),
        strip(
            r#"<html><head></head><body>
                 <my-content>
                   <h2>My Content</h2>
                   <h4 slot="title">Custom title</h4>
                   <h1>YOLO</h1>
                 </my-content>
               </body></html>"#
        )
    );
}

#[test]
fn unused_named_slot_with_single_root_gets_the_slot_attribute() {
    let out = harness("my-content", my_content)
        .render_str("<my-content></my-content>")
        .unwrap();
    assert!(strip(&out).contains(&strip(r#"<h3 slot="title">Title</h3>"#)));
    assert!(!out.contains("<slot"));
}

#[test]
fn unused_named_slot_with_multiple_roots_gets_wrapped() {
    fn multi(args: RenderArgs) -> RenderResult {
        let _ = args;
        Ok(r#"<slot name="meta"><i>a</i><i>b</i></slot>"#.into())
    }
    let out = harness("my-multi", multi)
        .render_str("<my-multi></my-multi>")
        .unwrap();
    assert!(out.contains(r#"<span slot="meta"><i>a</i><i>b</i></span>"#));
}

#[test]
fn unused_named_slot_with_empty_default_gets_an_empty_wrapper() {
    fn empty(args: RenderArgs) -> RenderResult {
        let _ = args;
        Ok(r#"<slot name="meta"></slot>"#.into())
    }
    let out = harness("my-empty", empty)
        .render_str("<my-empty></my-empty>")
        .unwrap();
    assert!(out.contains(r#"<span slot="meta"></span>"#));
}

#[test]
fn wrapper_tag_override_is_honored() {
    fn with_as(args: RenderArgs) -> RenderResult {
        let _ = args;
        Ok(r#"<slot name="meta" as="div"><i>a</i><i>b</i></slot>"#.into())
    }
    let out = harness("my-as", with_as)
        .render_str("<my-as></my-as>")
        .unwrap();
    assert!(out.contains(r#"<div slot="meta"><i>a</i><i>b</i></div>"#));
}

#[test]
fn first_insert_wins_a_contested_named_slot() {
    let out = harness("my-paragraph", my_paragraph)
        .render_str(
            r#"<my-paragraph>
                 <b slot="my-text">first</b>
                 <b slot="my-text">second</b>
               </my-paragraph>"#,
        )
        .unwrap();
    assert!(out.contains(r#"<b slot="my-text">first</b>"#));
    assert!(!out.contains("second"));
}

#[test]
fn inserts_for_unknown_slots_are_dropped() {
    let out = harness("my-paragraph", my_paragraph)
        .render_str(r#"<my-paragraph><b slot="nope">lost</b></my-paragraph>"#)
        .unwrap();
    assert!(!out.contains("lost"));
    // The named slot still falls back to its default content.
    assert!(out.contains("My default text"));
}

#[test]
fn authored_markup_never_survives_outside_slots() {
    fn closed(args: RenderArgs) -> RenderResult {
        let _ = args;
        Ok("<p>only this</p>".into())
    }
    let out = harness("my-closed", closed)
        .render_str("<my-closed><h1>gone</h1></my-closed>")
        .unwrap();
    assert!(!out.contains("gone"));
    assert!(out.contains("<my-closed><p>only this</p></my-closed>"));
}

#[test]
fn slot_fill_reaches_into_nested_rendered_elements() {
    fn my_list(args: RenderArgs) -> RenderResult {
        let _ = args;
        Ok(r#"<slot name="title"><h4>My list</h4></slot><ul></ul>"#.into())
    }
    fn my_list_container(args: RenderArgs) -> RenderResult {
        let _ = args;
        Ok(concat!(
            r#"<h2>My List Container</h2>"#,
            r#"<slot name="title"><h3>Title</h3></slot>"#,
            r#"<my-list><h4 slot="title">Content List</h4></my-list>"#
        )
        .into())
    }

    let enhancer = Enhancer::new()
        .templates(false)
        .element("my-list", my_list)
        .element("my-list-container", my_list_container);
    let out = enhancer
        .render_str(
            r#"<my-list-container><span slot="title">YOLO</span></my-list-container>"#,
        )
        .unwrap();
    assert_eq!(
        strip(&out),
        strip(
            r#"<html><head></head><body>
                 <my-list-container>
                   <h2>My List Container</h2>
                   <span slot="title">YOLO</span>
                   <my-list>
                     <h4 slot="title">Content List</h4>
                     <ul></ul>
                   </my-list>
                 </my-list-container>
               </body></html>"#
        )
    );
}

#[test]
fn keep_unslotted_inserts_leaves_content_duplicated() {
    let enhancer = Enhancer::new()
        .templates(false)
        .keep_unslotted_inserts(true)
        .element("my-content", my_content);
    let out = enhancer
        .render_str(r#"<my-content><h4 slot="title">dup</h4></my-content>"#)
        .unwrap();
    assert_eq!(out.matches(r#"<h4 slot="title">dup</h4>"#).count(), 2);
}
