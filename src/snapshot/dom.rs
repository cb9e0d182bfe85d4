use std::collections::BTreeMap;

use crate::foundation::error::CardSkinResult;

/// Layout box of an element relative to the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DomRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DomRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

/// Host capture of a live DOM subtree.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DomNode {
    Element(DomElement),
    Text { text: String },
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DomElement {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub classes: Vec<String>,
    /// Resolved style properties (`getComputedStyle`), keyed by CSS property name.
    pub computed_style: BTreeMap<String, String>,
    pub rect: Option<DomRect>,
    pub children: Vec<DomNode>,
}

impl DomElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn from_json_str(s: &str) -> CardSkinResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.computed_style.insert(property.into(), value.into());
        self
    }

    pub fn with_rect(mut self, rect: DomRect) -> Self {
        self.rect = Some(rect);
        self
    }

    pub fn with_child(mut self, child: DomElement) -> Self {
        self.children.push(DomNode::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(DomNode::Text { text: text.into() });
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Computed style lookup accepting either `kebab-case` or `camelCase` names.
    pub fn style(&self, property: &str) -> Option<&str> {
        self.computed_style
            .get(property)
            .or_else(|| self.computed_style.get(&camel_case(property)))
            .map(String::as_str)
    }

    /// Concatenated text of this subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(el: &DomElement, out: &mut String) {
    for child in &el.children {
        match child {
            DomNode::Text { text } => out.push_str(text),
            DomNode::Element(e) => collect_text(e, out),
        }
    }
}

fn camel_case(kebab: &str) -> String {
    let mut out = String::with_capacity(kebab.len());
    let mut upper = false;
    for ch in kebab.chars() {
        if ch == '-' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/snapshot/dom.rs"]
mod tests;
