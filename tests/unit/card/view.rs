use super::*;
use crate::render::projection::{PerspectiveProjection, SkewProjection};

fn tuning() -> ViewTuning {
    ViewTuning::from_options(&EngineOptions::default())
}

fn view() -> CardView {
    let small = Texture::from_premul_rgba8(&[0, 0, 0, 255], 1, 1, 1.0).unwrap();
    let model = CardVisualModel::builder("Phoenix").build();
    CardView::new(
        model,
        CardLayout::new(100.0, 50.0, 200.0, 280.0),
        small,
        Box::new(SkewProjection::default()),
        tuning(),
    )
}

#[test]
fn tokens_are_per_tier_and_monotonic() {
    let mut t = TierTokens::default();
    assert_eq!(t.bump(Tier::Large), 1);
    assert_eq!(t.bump(Tier::Large), 2);
    assert_eq!(t.current(Tier::Small), 0);
    assert_eq!(t.bump(Tier::Small), 1);
    assert_eq!(t.current(Tier::Large), 2);
}

#[test]
fn pointer_sets_tilt_targets_and_hover_transitions() {
    let mut v = view();
    assert_eq!(v.set_pointer_local(200.0, 140.0, true), HoverTransition::Entered);
    // Right edge, vertical center.
    assert_eq!(v.pointer(), Vec2::new(1.0, 0.0));
    assert_eq!(v.tilt_target(), Vec2::new(0.0, 12.0));
    assert_eq!(v.set_pointer_local(0.0, 0.0, true), HoverTransition::Unchanged);
    assert_eq!(v.tilt_target(), Vec2::new(-12.0, -12.0));

    assert_eq!(v.set_pointer_local(0.0, 0.0, false), HoverTransition::Left);
    assert_eq!(v.tilt_target(), Vec2::ZERO);
    assert_eq!(v.scale_target(), 1.0);
}

#[test]
fn update_damps_exponentially() {
    let mut v = view();
    v.set_hovered(true);
    assert!((v.scale_target() - 1.08).abs() < 1e-12);

    v.update(0.1);
    let expected = 1.0 + 0.08 * (1.0 - (-10.0f64 * 0.1).exp());
    assert!((v.scale() - expected).abs() < 1e-12);

    for _ in 0..200 {
        v.update(0.05);
    }
    assert!((v.scale() - 1.08).abs() < 1e-6);
}

#[test]
fn update_zero_is_idempotent() {
    let mut v = view();
    v.set_pointer_local(150.0, 20.0, true);
    v.update(0.03);
    let a = v.update(0.0);
    let tilt = v.tilt();
    let b = v.update(0.0);
    assert_eq!(a, b);
    assert_eq!(v.tilt(), tilt);
}

#[test]
fn hovered_cards_rise_and_show_glare() {
    let mut v = view();
    let rest = v.update(0.016);
    assert_eq!(rest.z_index, 0);
    assert_eq!(rest.glare.alpha, 0.0);

    v.set_pointer_local(200.0, 0.0, true);
    for _ in 0..100 {
        v.update(0.05);
    }
    let f = v.frame();
    assert_eq!(f.z_index, HOVER_Z_BOOST);
    assert!(f.glare.alpha > 0.3);
    assert!(f.shadow.alpha > rest.shadow.alpha);
}

#[test]
fn display_uses_large_only_while_hovered() {
    let mut v = view();
    let large = Texture::from_premul_rgba8(&[255, 255, 255, 255], 1, 1, 2.0).unwrap();
    v.large = Some(large.clone());
    assert_eq!(v.display_texture().id(), v.small.id());
    v.set_hovered(true);
    assert_eq!(v.display_texture().id(), large.id());
}

#[test]
fn layout_override_and_sanitizing() {
    let mut v = view();
    v.set_layout(CardLayout::new(0.0, 0.0, f64::NAN, -1.0).with_scale(0.5).with_hover_scale(2.0));
    assert_eq!((v.layout().width, v.layout().height), (1.0, 1.0));
    v.set_hovered(true);
    assert_eq!(v.scale_target(), 1.0);
}

#[test]
fn projection_strategy_is_fixed_at_creation() {
    let small = Texture::from_premul_rgba8(&[0, 0, 0, 255], 1, 1, 1.0).unwrap();
    let v = CardView::new(
        CardVisualModel::builder("A").build(),
        CardLayout::default(),
        small,
        Box::new(PerspectiveProjection { distance: 900.0 }),
        tuning(),
    );
    assert_eq!(v.projection_name(), "perspective");
    assert!(matches!(v.frame().geometry, CardGeometry::Quad(_)));
}
