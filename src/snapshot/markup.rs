//! Self-contained markup for a captured card element.
//!
//! The capture is cloned and every element gets its computed style inlined, so the result no
//! longer depends on page stylesheets. Interaction-state classes and overlay canvases are
//! removed so the skin shows the card at rest.

use std::fmt::Write as _;

use crate::snapshot::dom::{DomElement, DomNode};

/// Classes that only exist while the pointer interacts with a card.
pub const TRANSIENT_CLASSES: &[&str] = &[
    "hover",
    "is-hovered",
    "active",
    "is-active",
    "dragging",
    "is-dragging",
    "focus",
    "focused",
    "tilt-active",
];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// Serialized card markup plus the cleaned tree it was produced from.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotMarkup {
    pub markup: String,
    pub tree: DomElement,
    pub width: f64,
    pub height: f64,
}

/// Build snapshot markup for `element`. `None` when it has no layout box or a zero-sized one.
pub fn build_markup(element: &DomElement) -> Option<SnapshotMarkup> {
    let rect = element.rect?;
    if rect.is_empty() {
        return None;
    }

    let mut clone = element.clone();
    inline_styles(element, &mut clone);

    let mut markup = String::new();
    write_element(&mut markup, &clone, true);
    Some(SnapshotMarkup {
        markup,
        tree: clone,
        width: rect.width,
        height: rect.height,
    })
}

/// Walk source and clone in lockstep, copying computed style into the clone.
fn inline_styles(source: &DomElement, clone: &mut DomElement) {
    let inline = style_attribute(source);
    if inline.is_empty() {
        clone.attributes.remove("style");
    } else {
        clone.attributes.insert("style".to_string(), inline);
    }
    clone
        .classes
        .retain(|c| !TRANSIENT_CLASSES.contains(&c.as_str()));

    for (src, dst) in source.children.iter().zip(clone.children.iter_mut()) {
        if let (DomNode::Element(s), DomNode::Element(d)) = (src, dst) {
            inline_styles(s, d);
        }
    }
    clone
        .children
        .retain(|c| !matches!(c, DomNode::Element(e) if e.tag.eq_ignore_ascii_case("canvas")));
}

fn style_attribute(el: &DomElement) -> String {
    let mut out = String::new();
    for (k, v) in &el.computed_style {
        if !out.is_empty() {
            out.push(' ');
        }
        let _ = write!(out, "{}: {};", kebab_case(k), v.trim());
    }
    out
}

fn kebab_case(name: &str) -> String {
    if name.starts_with("--") {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn write_element(out: &mut String, el: &DomElement, root: bool) {
    let tag = el.tag.to_ascii_lowercase();
    out.push('<');
    out.push_str(&tag);
    if root {
        let _ = write!(out, " xmlns=\"{XHTML_NS}\"");
    }
    if !el.classes.is_empty() {
        out.push_str(" class=\"");
        escape_into(out, &el.classes.join(" "), true);
        out.push('"');
    }
    for (k, v) in &el.attributes {
        if k == "class" || k == "xmlns" {
            continue;
        }
        let _ = write!(out, " {k}=\"");
        escape_into(out, v, true);
        out.push('"');
    }

    if VOID_ELEMENTS.contains(&tag.as_str()) {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in &el.children {
        match child {
            DomNode::Element(e) => write_element(out, e, false),
            DomNode::Text { text } => escape_into(out, text, false),
        }
    }
    let _ = write!(out, "</{tag}>");
}

fn escape_into(out: &mut String, s: &str, attr: bool) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/snapshot/markup.rs"]
mod tests;
