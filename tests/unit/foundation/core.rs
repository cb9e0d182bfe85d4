use super::*;

#[test]
fn premul_rounds_like_the_compositor() {
    let c = Rgba8::new(100, 50, 200, 128);
    assert_eq!(
        c.premul(),
        [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
    assert_eq!(Rgba8::TRANSPARENT.premul(), [0, 0, 0, 0]);
}

#[test]
fn with_opacity_clamps() {
    assert_eq!(Rgba8::WHITE.with_opacity(0.5).a, 128);
    assert_eq!(Rgba8::WHITE.with_opacity(3.0).a, 255);
    assert_eq!(Rgba8::WHITE.with_opacity(f32::NAN).a, 0);
}

#[test]
fn card_size_rejects_degenerate_dimensions() {
    assert!(CardSize::new(0.0, 10.0).is_err());
    assert!(CardSize::new(10.0, f64::INFINITY).is_err());
    assert!(CardSize::new(200.0, 280.0).is_ok());
}

#[test]
fn pixel_size_rounds_up() {
    let size = CardSize::new(200.0, 280.0).unwrap();
    assert_eq!(size.pixel_size(1.0).unwrap(), (200, 280));
    assert_eq!(size.pixel_size(1.5).unwrap(), (300, 420));
    assert_eq!(size.pixel_size(0.333).unwrap(), (67, 94));
    assert!(size.pixel_size(0.0).is_err());
    assert!(size.pixel_size(1000.0).is_err());
}

#[test]
fn tier_display() {
    assert_eq!(Tier::Small.to_string(), "small");
    assert_eq!(Tier::Large.to_string(), "large");
}
