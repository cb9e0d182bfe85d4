use super::*;

fn checker(w: u32, h: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            let v = if (x + y) % 2 == 0 { 255 } else { 0 };
            out.extend_from_slice(&[v, v, v, 255]);
        }
    }
    out
}

#[test]
fn from_bytes_keeps_dimensions_and_pixels() {
    let bytes = checker(3, 2);
    let tex = Texture::from_premul_rgba8(&bytes, 3, 2, 2.0).unwrap();
    assert_eq!((tex.width(), tex.height()), (3, 2));
    assert_eq!(tex.pixels(), bytes.as_slice());
    assert_eq!(tex.pixel(0, 0), [255, 255, 255, 255]);
    assert_eq!(tex.pixel(1, 0), [0, 0, 0, 255]);
    assert_eq!(tex.pixel(9, 9), [0, 0, 0, 0]);
    assert_eq!(tex.logical_size(), (1.5, 1.0));
}

#[test]
fn ids_are_unique_and_fingerprints_follow_content() {
    let bytes = checker(4, 4);
    let a = Texture::from_premul_rgba8(&bytes, 4, 4, 1.0).unwrap();
    let b = Texture::from_premul_rgba8(&bytes, 4, 4, 1.0).unwrap();
    assert_ne!(a.id(), b.id());
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn rejects_mismatched_or_empty_buffers() {
    assert!(Texture::from_premul_rgba8(&[0u8; 15], 2, 2, 1.0).is_err());
    assert!(Texture::from_premul_rgba8(&[], 0, 0, 1.0).is_err());
    assert!(Texture::from_premul_rgba8(&[0u8; 4], 70_000, 1, 1.0).is_err());
}

#[test]
fn bad_scale_falls_back_to_one() {
    let tex = Texture::from_premul_rgba8(&[0u8; 4], 1, 1, f64::NAN).unwrap();
    assert_eq!(tex.scale(), 1.0);
}

#[test]
fn render_texture_fills_shapes() {
    let tex = render_texture(8, 8, 1.0, |ctx| {
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 0, 0, 255));
        let path = shape_to_cpu_path(&kurbo::Rect::new(0.0, 0.0, 4.0, 8.0));
        ctx.fill_path(&path);
    })
    .unwrap();
    assert_eq!(tex.pixel(1, 4), [255, 0, 0, 255]);
    assert_eq!(tex.pixel(6, 4), [0, 0, 0, 0]);
}
