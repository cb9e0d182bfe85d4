use std::sync::Arc;

use super::*;

fn pool() -> SharedResourcePool {
    SharedResourcePool::new(CardSize::new(100.0, 140.0).unwrap(), 0.06)
}

#[test]
fn shadow_and_glare_are_built_once() {
    let p = pool();
    let a = p.shared_shadow().unwrap();
    let b = p.shared_shadow().unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    let g1 = p.shared_glare().unwrap();
    let g2 = p.shared_glare().unwrap();
    assert!(Arc::ptr_eq(&g1, &g2));
}

#[test]
fn shadow_covers_card_plus_padding_and_fades_out() {
    let p = pool();
    let s = p.shared_shadow().unwrap();
    let pad = p.shadow_padding();
    assert_eq!(s.width(), (100.0 + pad * 2.0).ceil() as u32);
    assert_eq!(s.height(), (140.0 + pad * 2.0).ceil() as u32);

    let center = s.pixel(s.width() / 2, s.height() / 2);
    assert_eq!(&center[..3], &[0, 0, 0]);
    assert!(center[3] > 100);
    assert!(s.pixel(0, 0)[3] < center[3] / 4);
}

#[test]
fn glare_is_brightest_on_the_diagonal() {
    let p = pool();
    let g = p.shared_glare().unwrap();
    assert_eq!((g.width(), g.height()), (100, 140));
    let on = g.pixel(50, 70)[3];
    let off = g.pixel(99, 0)[3];
    assert!(on > 200);
    assert!(off < on / 2);
}
