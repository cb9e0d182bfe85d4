use super::*;

fn engine() -> Option<TextLayoutEngine> {
    let font = discover_system_font()?;
    TextLayoutEngine::new(&font).ok()
}

#[test]
fn garbage_font_bytes_are_rejected() {
    let src = FontSource::from_bytes(vec![1, 2, 3, 4]);
    assert!(TextLayoutEngine::new(&src).is_err());
}

#[test]
fn brush_converts_from_rgba8() {
    let b = TextBrushRgba8::from(Rgba8::new(1, 2, 3, 4));
    assert_eq!((b.r, b.g, b.b, b.a), (1, 2, 3, 4));
}

#[test]
fn fitted_layout_shrinks_long_text() {
    // Hosts without any system font skip text entirely.
    let Some(mut text) = engine() else {
        return;
    };
    let brush = TextBrushRgba8::from(Rgba8::WHITE);
    let long = "Ancient Phoenix of the Ever Burning Crimson Skies";
    let big = text.layout(long, 24.0, brush, Some(120.0));
    let fitted = text.layout_fitted(long, 24.0, 8.0, brush, 120.0, big.height() / 2.0);
    assert!(fitted.height() < big.height());
}

#[test]
fn drawing_text_marks_pixels() {
    let Some(mut text) = engine() else {
        return;
    };
    let layout = text.layout("Phoenix", 20.0, TextBrushRgba8::from(Rgba8::WHITE), Some(100.0));
    let mut ctx = vello_cpu::RenderContext::new(100, 40);
    text.draw(&mut ctx, &layout, vello_cpu::kurbo::Affine::IDENTITY, (4.0, 4.0));
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(100, 40);
    ctx.render_to_pixmap(&mut pixmap);
    assert!(pixmap.data_as_u8_slice().chunks_exact(4).any(|px| px[3] > 0));
}
