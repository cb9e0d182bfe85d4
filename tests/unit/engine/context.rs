use std::sync::Arc;

use super::*;

#[test]
fn init_validates_options() {
    let bad = EngineOptions {
        card_width: 0.0,
        ..EngineOptions::default()
    };
    assert!(RenderResourceContext::init(bad).is_err());
    assert!(RenderResourceContext::init(EngineOptions::default()).is_ok());
}

#[test]
fn snapshot_switch_is_one_way() {
    let mut ctx = RenderResourceContext::init(EngineOptions::default()).unwrap();
    assert!(ctx.snapshot_enabled());
    assert!(ctx.disable_snapshot("tainted"));
    assert!(!ctx.disable_snapshot("blank"));
    assert!(!ctx.snapshot_enabled());
    assert_eq!(ctx.snapshot_disabled_reason(), Some("tainted"));
}

#[test]
fn snapshot_respects_the_option() {
    let ctx = RenderResourceContext::init(EngineOptions {
        use_dom_snapshot_skin: false,
        ..EngineOptions::default()
    })
    .unwrap();
    assert!(!ctx.snapshot_enabled());
    assert_eq!(ctx.snapshot_disabled_reason(), None);
}

#[test]
fn dispose_drops_caches_and_rebuilds_the_pool_lazily() {
    let mut ctx = RenderResourceContext::init(EngineOptions {
        card_width: 40.0,
        card_height: 56.0,
        ..EngineOptions::default()
    })
    .unwrap();
    let before = ctx.pool().shared_glare().unwrap();
    let mut arena = crate::card::arena::CardArena::new();
    ctx.art.request("/a.png", arena.insert(()));
    assert_eq!(ctx.stats().art_loads_started, 1);

    ctx.dispose();
    assert!(ctx.art_cache().is_empty());
    let after = ctx.pool().shared_glare().unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
}
