use std::fmt::Write as _;
use std::sync::Arc;

use crate::foundation::core::Rgba8;
use crate::render::texture::Texture;
use crate::snapshot::dom::{DomElement, DomNode, DomRect};
use crate::snapshot::markup::SnapshotMarkup;

const SAMPLE_GRID: u32 = 5;

/// Why a snapshot could not be used.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum SnapshotFailure {
    /// The raster surface became unreadable (cross-origin content).
    #[error("snapshot canvas is tainted: {0}")]
    Tainted(String),
    /// Every sampled pixel was transparent.
    #[error("snapshot rasterized blank")]
    Blank,
    /// Anything else; the card keeps whatever texture it had.
    #[error("snapshot failed: {0}")]
    Failed(String),
}

impl SnapshotFailure {
    /// Hard failures disable the snapshot path for the whole context.
    pub fn is_hard(&self) -> bool {
        matches!(self, Self::Tainted(_) | Self::Blank)
    }
}

/// Markup wrapped for rasterization at a given resolution.
#[derive(Clone, Debug)]
pub struct SnapshotDocument {
    markup: Arc<SnapshotMarkup>,
    width: f64,
    height: f64,
    scale: f64,
}

impl SnapshotDocument {
    pub fn new(markup: &Arc<SnapshotMarkup>, width: f64, height: f64, scale: f64) -> Self {
        let sane = |v: f64| if v.is_finite() && v > 0.0 { v } else { 1.0 };
        Self {
            markup: markup.clone(),
            width: sane(width),
            height: sane(height),
            scale: sane(scale),
        }
    }

    pub fn markup(&self) -> &SnapshotMarkup {
        &self.markup
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        let px = |v: f64| ((v * self.scale).ceil().max(1.0) as u32).min(u32::from(u16::MAX));
        (px(self.width), px(self.height))
    }

    /// `<svg><foreignObject>` wrapper around the markup.
    pub fn svg_source(&self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\">\
             <foreignObject x=\"0\" y=\"0\" width=\"100%\" height=\"100%\">{m}</foreignObject>\
             </svg>",
            w = self.width,
            h = self.height,
            m = self.markup.markup,
        )
    }

    /// The wrapper as an `image/svg+xml` data URI.
    pub fn data_uri(&self) -> String {
        let svg = self.svg_source();
        let mut out = String::with_capacity(svg.len() + 32);
        out.push_str("data:image/svg+xml;charset=utf-8,");
        for b in svg.bytes() {
            if b.is_ascii_alphanumeric() || b"-_.!~*'()".contains(&b) {
                out.push(b as char);
            } else {
                let _ = write!(out, "%{b:02X}");
            }
        }
        out
    }
}

/// Host capability that turns snapshot documents into pixels.
pub trait SnapshotRasterizer: Send {
    fn rasterize(&mut self, doc: &SnapshotDocument) -> Result<Texture, SnapshotFailure>;
}

/// Rasterize and validate.
#[tracing::instrument(level = "debug", skip_all, fields(w = doc.width(), h = doc.height(), scale = doc.scale()))]
pub fn rasterize_snapshot(
    rasterizer: &mut dyn SnapshotRasterizer,
    doc: &SnapshotDocument,
) -> Result<Texture, SnapshotFailure> {
    let texture = rasterizer.rasterize(doc)?;
    validate_snapshot(&texture)?;
    Ok(texture)
}

/// Sample a 5x5 grid; all-transparent means the snapshot came out blank.
pub fn validate_snapshot(texture: &Texture) -> Result<(), SnapshotFailure> {
    let (w, h) = (texture.width(), texture.height());
    for gy in 0..SAMPLE_GRID {
        for gx in 0..SAMPLE_GRID {
            let x = ((2 * gx + 1) * w) / (2 * SAMPLE_GRID);
            let y = ((2 * gy + 1) * h) / (2 * SAMPLE_GRID);
            if texture.pixel(x, y)[3] != 0 {
                return Ok(());
            }
        }
    }
    Err(SnapshotFailure::Blank)
}

/// Paints the captured box tree (backgrounds, radii, borders, opacity, text) with resvg.
///
/// `resvg` has no HTML engine, so the inlined markup is not interpreted; the captured layout
/// boxes and computed styles are drawn as SVG primitives instead.
pub struct ResvgSnapshotRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for ResvgSnapshotRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResvgSnapshotRasterizer")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl Default for ResvgSnapshotRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResvgSnapshotRasterizer {
    pub fn new() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Use an explicit font file instead of system fonts.
    pub fn with_font_bytes(bytes: Vec<u8>) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_font_data(bytes);
        Self {
            fontdb: Arc::new(db),
        }
    }
}

impl SnapshotRasterizer for ResvgSnapshotRasterizer {
    fn rasterize(&mut self, doc: &SnapshotDocument) -> Result<Texture, SnapshotFailure> {
        let svg = box_tree_svg(&doc.markup().tree, doc.width(), doc.height());
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts)
            .map_err(|e| SnapshotFailure::Failed(format!("parse snapshot svg: {e}")))?;

        let (pw, ph) = doc.pixel_size();
        let mut pixmap = resvg::tiny_skia::Pixmap::new(pw, ph)
            .ok_or_else(|| SnapshotFailure::Failed("failed to allocate snapshot pixmap".into()))?;
        let scale = doc.scale() as f32;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        Texture::from_premul_rgba8(pixmap.data(), pw, ph, doc.scale())
            .map_err(|e| SnapshotFailure::Failed(e.to_string()))
    }
}

/// SVG document drawing `root` and its descendants relative to `root`'s layout box.
pub(crate) fn box_tree_svg(root: &DomElement, width: f64, height: f64) -> String {
    let origin = root.rect.unwrap_or_default();
    let mut out = String::new();
    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
         viewBox=\"0 0 {width} {height}\">"
    );
    paint_element(&mut out, root, origin, origin);
    out.push_str("</svg>");
    out
}

fn paint_element(out: &mut String, el: &DomElement, origin: DomRect, parent_box: DomRect) {
    if el.style("display") == Some("none") || el.style("visibility") == Some("hidden") {
        return;
    }
    let own_box = el.rect.unwrap_or(parent_box);
    let (x, y) = (own_box.x - origin.x, own_box.y - origin.y);
    let (w, h) = (own_box.width, own_box.height);

    let opacity = el
        .style("opacity")
        .and_then(|v| v.trim().parse::<f64>().ok())
        .map(|v| v.clamp(0.0, 1.0));
    match opacity {
        Some(o) => {
            let _ = write!(out, "<g opacity=\"{o}\">");
        }
        None => out.push_str("<g>"),
    }

    if el.rect.is_some() && w > 0.0 && h > 0.0 {
        let radius = el.style("border-radius").and_then(parse_px).unwrap_or(0.0);
        if let Some(bg) = el.style("background-color").and_then(parse_css_color)
            && bg.a > 0
        {
            let _ = write!(
                out,
                "<rect x=\"{x}\" y=\"{y}\" width=\"{w}\" height=\"{h}\" rx=\"{radius}\" \
                 fill=\"{}\" fill-opacity=\"{}\"/>",
                hex(bg),
                f64::from(bg.a) / 255.0
            );
        }
        let border_w = el
            .style("border-width")
            .or_else(|| el.style("border-top-width"))
            .and_then(parse_px)
            .unwrap_or(0.0);
        let border_c = el
            .style("border-color")
            .or_else(|| el.style("border-top-color"))
            .and_then(parse_css_color);
        if border_w > 0.0
            && let Some(c) = border_c
            && c.a > 0
        {
            let half = border_w / 2.0;
            let _ = write!(
                out,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" fill=\"none\" \
                 stroke=\"{}\" stroke-opacity=\"{}\" stroke-width=\"{border_w}\"/>",
                x + half,
                y + half,
                (w - border_w).max(0.0),
                (h - border_w).max(0.0),
                (radius - half).max(0.0),
                hex(c),
                f64::from(c.a) / 255.0
            );
        }
    }

    let text: String = el
        .children
        .iter()
        .filter_map(|c| match c {
            DomNode::Text { text } => Some(text.as_str()),
            DomNode::Element(_) => None,
        })
        .collect();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if !text.is_empty() {
        paint_text(out, el, &text, x, y, w);
    }

    for child in &el.children {
        if let DomNode::Element(e) = child {
            paint_element(out, e, origin, own_box);
        }
    }
    out.push_str("</g>");
}

fn paint_text(out: &mut String, el: &DomElement, text: &str, x: f64, y: f64, w: f64) {
    let size = el.style("font-size").and_then(parse_px).unwrap_or(16.0);
    let color = el
        .style("color")
        .and_then(parse_css_color)
        .unwrap_or(Rgba8::BLACK);
    let pad = el.style("padding-left").and_then(parse_px).unwrap_or(0.0);
    let pad_top = el.style("padding-top").and_then(parse_px).unwrap_or(0.0);
    let weight = match el.style("font-weight").map(str::trim) {
        Some("bold") | Some("bolder") => 700,
        Some(v) => v.parse::<u16>().unwrap_or(400),
        None => 400,
    };
    let (anchor, tx) = match el.style("text-align").map(str::trim) {
        Some("center") => ("middle", x + w / 2.0),
        Some("right") | Some("end") => ("end", x + w - pad),
        _ => ("start", x + pad),
    };

    let _ = write!(
        out,
        "<text x=\"{tx}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"{size}\" \
         font-weight=\"{weight}\" text-anchor=\"{anchor}\" fill=\"{}\" fill-opacity=\"{}\">",
        y + pad_top + size,
        hex(color),
        f64::from(color.a) / 255.0
    );
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out.push_str("</text>");
}

fn hex(c: Rgba8) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

/// First length in a CSS value, in px (`12px`, `12`, `12px 4px`).
pub(crate) fn parse_px(v: &str) -> Option<f64> {
    let first = v.split_whitespace().next()?;
    let n = first.strip_suffix("px").unwrap_or(first);
    n.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()` and a few keywords.
pub(crate) fn parse_css_color(v: &str) -> Option<Rgba8> {
    let v = v.trim().to_ascii_lowercase();
    match v.as_str() {
        "transparent" => return Some(Rgba8::TRANSPARENT),
        "white" => return Some(Rgba8::WHITE),
        "black" => return Some(Rgba8::BLACK),
        "red" => return Some(Rgba8::opaque(255, 0, 0)),
        "green" => return Some(Rgba8::opaque(0, 128, 0)),
        "blue" => return Some(Rgba8::opaque(0, 0, 255)),
        "gold" => return Some(Rgba8::opaque(255, 215, 0)),
        "gray" | "grey" => return Some(Rgba8::opaque(128, 128, 128)),
        _ => {}
    }

    if let Some(hex) = v.strip_prefix('#') {
        let nibble = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        return match hex.len() {
            3 => Some(Rgba8::opaque(nibble(0)? * 17, nibble(1)? * 17, nibble(2)? * 17)),
            6 => Some(Rgba8::opaque(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Rgba8::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        };
    }

    let inner = v
        .strip_prefix("rgba(")
        .or_else(|| v.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let parts: Vec<&str> = inner
        .split([',', ' ', '/'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if parts.len() < 3 {
        return None;
    }
    let channel = |s: &str| s.parse::<f64>().ok().map(|c| c.round().clamp(0.0, 255.0) as u8);
    let alpha = match parts.get(3) {
        Some(a) => {
            let a = match a.strip_suffix('%') {
                Some(p) => p.parse::<f64>().ok()? / 100.0,
                None => a.parse::<f64>().ok()?,
            };
            (a.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        None => 255,
    };
    Some(Rgba8::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/snapshot/raster.rs"]
mod tests;
