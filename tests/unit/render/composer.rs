use super::*;

fn card() -> CardSize {
    CardSize::new(100.0, 140.0).unwrap()
}

fn creature() -> CardVisualModel {
    CardVisualModel::builder("Phoenix")
        .id("phoenix")
        .tag("flying")
        .stats(3, 4, 2)
        .build()
}

fn art() -> ArtImage {
    let mut bytes = Vec::new();
    for y in 0..8u8 {
        for x in 0..8u8 {
            bytes.extend_from_slice(&[x * 30, y * 30, 200, 255]);
        }
    }
    ArtImage::from_premul_rgba8(&bytes, 8, 8).unwrap()
}

#[test]
fn pixel_size_is_card_times_scale() {
    let mut c = CardComposer::without_text(card(), 0.06);
    let t = c.compose(&creature(), 1.5, None).unwrap();
    assert_eq!((t.width(), t.height()), (150, 210));
    assert_eq!(t.scale(), 1.5);
}

#[test]
fn scale_is_reduced_to_fit_the_texture_bound() {
    let mut c = CardComposer::without_text(card(), 0.06);
    c.set_max_texture_dim(70);
    assert_eq!(c.effective_scale(4.0), 0.5);
    let t = c.compose(&creature(), 4.0, None).unwrap();
    assert_eq!((t.width(), t.height()), (50, 70));
}

#[test]
fn same_inputs_give_identical_pixels() {
    let mut a = CardComposer::without_text(card(), 0.06);
    let mut b = CardComposer::without_text(card(), 0.06);
    let art = art();
    let t1 = a.compose(&creature(), 1.0, Some(&art)).unwrap();
    let t2 = b.compose(&creature(), 1.0, Some(&art)).unwrap();
    let t3 = a.compose(&creature(), 1.0, Some(&art)).unwrap();
    assert_ne!(t1.id(), t2.id());
    assert_eq!(t1.pixels(), t2.pixels());
    assert_eq!(t1.pixels(), t3.pixels());
}

#[test]
fn art_and_placeholder_differ_inside_the_window() {
    let mut c = CardComposer::without_text(card(), 0.06);
    let with_art = c.compose(&creature(), 1.0, Some(&art())).unwrap();
    let without = c.compose(&creature(), 1.0, None).unwrap();
    let art_rect = c.face_layout().art;
    let (x, y) = (art_rect.center().x as u32, (art_rect.y1 - 10.0) as u32);
    assert_ne!(with_art.pixel(x, y), without.pixel(x, y));
    // Frame is unaffected by art.
    assert_eq!(with_art.pixel(50, 1), without.pixel(50, 1));
}

#[test]
fn rounded_corners_stay_transparent() {
    let mut c = CardComposer::without_text(card(), 0.1);
    let t = c.compose(&creature(), 1.0, None).unwrap();
    assert_eq!(t.pixel(0, 0)[3], 0);
    assert_eq!(t.pixel(50, 70)[3], 255);
}

#[test]
fn badges_are_drawn_only_for_creatures() {
    let mut c = CardComposer::without_text(card(), 0.06);
    let spell = CardVisualModel::builder("Bolt")
        .category(CardCategory::Spell)
        .stats(1, 9, 9)
        .build();
    let health = c.face_layout().health_badge();
    let (hx, hy) = (health.x as u32, health.y as u32);

    let creature_face = c.compose(&creature(), 1.0, None).unwrap();
    let spell_face = c.compose(&spell, 1.0, None).unwrap();
    let px = creature_face.pixel(hx, hy);
    assert_eq!(&px[..3], &[192, 38, 44]);
    assert_ne!(&spell_face.pixel(hx, hy)[..3], &[192, 38, 44]);
}

#[test]
fn category_changes_the_tint() {
    let mut c = CardComposer::without_text(card(), 0.06);
    let trap = CardVisualModel::builder("Pit").category(CardCategory::Trap).build();
    let a = c.compose(&creature(), 1.0, None).unwrap();
    let b = c.compose(&trap, 1.0, None).unwrap();
    let x = (c.face_layout().border * 1.5) as u32;
    assert_ne!(a.pixel(x, 70), b.pixel(x, 70));
}

#[test]
fn rejects_bad_scale() {
    let mut c = CardComposer::without_text(card(), 0.06);
    assert!(c.compose(&creature(), 0.0, None).is_err());
    assert!(c.compose(&creature(), f64::NAN, None).is_err());
}
