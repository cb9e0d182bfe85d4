use super::*;
use crate::snapshot::dom::DomRect;

fn card() -> DomElement {
    DomElement::new("div")
        .with_class("card")
        .with_class("is-hovered")
        .with_class("tilt-active")
        .with_style("backgroundColor", "rgb(20, 30, 40)")
        .with_style("border-radius", "12px")
        .with_rect(DomRect::new(10.0, 20.0, 200.0, 280.0))
        .with_child(
            DomElement::new("span")
                .with_class("name")
                .with_class("hover")
                .with_style("color", "white")
                .with_text("Fire & <Ice>"),
        )
        .with_child(DomElement::new("canvas").with_class("glare"))
        .with_child(DomElement::new("img").with_attr("src", "/cards/a.png"))
}

#[test]
fn none_without_a_layout_box() {
    assert!(build_markup(&DomElement::new("div")).is_none());
    let flat = DomElement::new("div").with_rect(DomRect::new(0.0, 0.0, 100.0, 0.0));
    assert!(build_markup(&flat).is_none());
}

#[test]
fn inlines_computed_styles_at_every_level() {
    let m = build_markup(&card()).unwrap();
    assert_eq!(
        m.tree.attributes.get("style").map(String::as_str),
        Some("background-color: rgb(20, 30, 40); border-radius: 12px;")
    );
    let DomNode::Element(span) = &m.tree.children[0] else {
        panic!("expected span");
    };
    assert_eq!(span.attributes.get("style").map(String::as_str), Some("color: white;"));
    assert_eq!((m.width, m.height), (200.0, 280.0));
}

#[test]
fn strips_transient_classes_and_canvas_overlays() {
    let m = build_markup(&card()).unwrap();
    assert_eq!(m.tree.classes, vec!["card".to_string()]);
    assert_eq!(m.tree.children.len(), 2);
    assert!(!m.markup.contains("canvas"));
    assert!(!m.markup.contains("is-hovered"));
    assert!(!m.markup.contains("tilt-active"));
}

#[test]
fn serializes_escaped_xhtml() {
    let m = build_markup(&card()).unwrap();
    assert!(m.markup.starts_with("<div xmlns=\"http://www.w3.org/1999/xhtml\" class=\"card\""));
    assert!(m.markup.contains("Fire &amp; &lt;Ice&gt;"));
    assert!(m.markup.contains("<img src=\"/cards/a.png\"/>"));
    assert!(m.markup.ends_with("</div>"));
}

#[test]
fn source_element_is_untouched() {
    let src = card();
    let before = src.clone();
    build_markup(&src).unwrap();
    assert_eq!(src, before);
}
