use std::sync::Mutex;

use super::*;
use crate::model::card::CardCategory;
use crate::render::cpu::CpuRenderer;
use crate::snapshot::dom::DomRect;
use crate::snapshot::raster::SnapshotFailure;

fn small_options() -> EngineOptions {
    EngineOptions {
        card_width: 40.0,
        card_height: 56.0,
        small_scale: 1.0,
        large_scale: 2.0,
        ..EngineOptions::default()
    }
}

fn engine_with(options: EngineOptions) -> CardEngine {
    CardEngine::builder()
        .renderer(CpuRenderer::new())
        .options(options)
        .without_text()
        .viewport(160, 120)
        .build()
        .unwrap()
}

fn model(name: &str) -> CardVisualModel {
    CardVisualModel::builder(name)
        .category(CardCategory::Creature)
        .stats(1, 2, 3)
        .build()
}

/// Records started loads; tests deliver them by hand.
#[derive(Clone, Default)]
struct Manual(Arc<Mutex<Vec<(String, CompletionSender)>>>);

impl ArtLoader for Manual {
    fn start(&mut self, url: &str, done: CompletionSender) {
        self.0.lock().unwrap().push((url.to_string(), done));
    }
}

struct Scripted(Vec<Result<Texture, SnapshotFailure>>, Arc<Mutex<usize>>);

impl SnapshotRasterizer for Scripted {
    fn rasterize(&mut self, doc: &SnapshotDocument) -> Result<Texture, SnapshotFailure> {
        *self.1.lock().unwrap() += 1;
        if self.0.is_empty() {
            let (w, h) = doc.pixel_size();
            let px = [9, 9, 9, 255].repeat((w * h) as usize);
            return Ok(Texture::from_premul_rgba8(&px, w, h, doc.scale()).unwrap());
        }
        self.0.remove(0)
    }
}

fn dom() -> DomElement {
    dom_with_width(40.0)
}

fn dom_with_width(width: f64) -> DomElement {
    DomElement::new("div")
        .with_style("background-color", "#336699")
        .with_rect(DomRect::new(0.0, 0.0, width, 56.0))
}

fn snapshot_engine(
    script: Vec<Result<Texture, SnapshotFailure>>,
) -> (CardEngine, Arc<Mutex<usize>>) {
    let calls = Arc::new(Mutex::new(0));
    let engine = CardEngine::builder()
        .renderer(CpuRenderer::new())
        .options(small_options())
        .snapshot_rasterizer(Scripted(script, calls.clone()))
        .without_text()
        .build()
        .unwrap();
    (engine, calls)
}

fn with_dom(element: DomElement) -> CreateCardOpts {
    CreateCardOpts {
        dom_source: Some(element),
        layout: None,
    }
}

#[test]
fn build_requires_a_renderer() {
    let err = CardEngine::builder().build().unwrap_err();
    assert!(err.is_fatal());
    assert!(
        CardEngine::builder()
            .renderer(CpuRenderer::new().with_max_texture_dim(0))
            .build()
            .is_err()
    );
}

#[test]
fn create_card_is_displayable_immediately() {
    let mut engine = engine_with(small_options());
    let id = engine.create_card(model("Imp"), CreateCardOpts::default()).unwrap();

    let card = engine.card(id).unwrap();
    let small = card.small_texture().unwrap();
    assert_eq!((small.width(), small.height()), (40, 56));
    assert_eq!(card.display_texture().unwrap().id(), small.id());
    assert!(card.large_texture().is_none());
    assert_eq!(card.projection_name(), "skew");
    assert!(engine.scene().contains(id));
    assert_eq!(engine.stats().cards_created, 1);
}

#[test]
fn large_texture_arrives_on_the_tick_after_its_job_runs() {
    let mut engine = engine_with(small_options());
    let id = engine.create_card(model("Imp"), CreateCardOpts::default()).unwrap();
    assert!(engine.set_pointer_local(id, 30.0, 10.0, true));
    assert!(engine.card(id).unwrap().is_large_pending());
    assert_eq!(engine.queued_jobs(), 1);
    assert!(engine.has_queued_job(id, Tier::Large));
    assert_eq!(engine.card(id).unwrap().pointer(), Vec2::new(0.5, -1.0 + 20.0 / 56.0));

    let r = engine.tick(0.016);
    assert_eq!(r.jobs_run, 1);
    assert!(engine.card(id).unwrap().large_texture().is_none());

    let r = engine.tick(0.016);
    assert_eq!(r.completions_applied, 1);
    let card = engine.card(id).unwrap();
    let large = card.large_texture().unwrap();
    assert_eq!((large.width(), large.height()), (80, 112));
    assert_eq!(card.display_texture().unwrap().id(), large.id());
    assert!(!card.is_large_pending());
    assert_eq!(engine.hi_res_cards(), vec![id]);
}

#[test]
fn pointer_out_keeps_large_by_default() {
    let mut engine = engine_with(small_options());
    let id = engine.create_card(model("Imp"), CreateCardOpts::default()).unwrap();
    engine.set_hovered(id, true);
    engine.tick(0.0);
    engine.tick(0.0);
    engine.set_hovered(id, false);

    let card = engine.card(id).unwrap();
    assert!(card.large_texture().is_some());
    assert_eq!(card.display_texture().unwrap().id(), card.small_texture().unwrap().id());

    // Re-hover reuses the resident texture without a new job.
    engine.set_hovered(id, true);
    assert_eq!(engine.queued_jobs(), 0);
}

#[test]
fn stale_large_result_is_discarded() {
    let mut engine = engine_with(EngineOptions {
        destroy_hi_res_on_pointer_out: true,
        ..small_options()
    });
    let id = engine.create_card(model("Imp"), CreateCardOpts::default()).unwrap();
    engine.set_hovered(id, true);
    engine.tick(0.0);
    engine.set_hovered(id, false);
    engine.set_hovered(id, true);

    let r = engine.tick(0.0);
    assert_eq!(r.stale_discarded, 1);
    assert!(engine.card(id).unwrap().large_texture().is_none());

    engine.tick(0.0);
    let card = engine.card(id).unwrap();
    assert!(card.large_texture().is_some());
    assert_eq!(card.token(Tier::Large), 3);
}

#[test]
fn destroyed_card_ignores_late_results() {
    let mut engine = engine_with(small_options());
    let id = engine.create_card(model("Imp"), CreateCardOpts::default()).unwrap();
    engine.set_hovered(id, true);
    engine.tick(0.0);
    let revision = engine.scene().revision();
    assert!(engine.destroy(id));
    assert!(!engine.scene().contains(id));
    let revision_after_destroy = engine.scene().revision();
    assert!(revision_after_destroy > revision);

    let r = engine.tick(0.0);
    assert_eq!(r.stale_discarded, 1);
    assert_eq!(engine.scene().revision(), revision_after_destroy);
    assert!(engine.hi_res_cards().is_empty());
    assert!(engine.card(id).is_none());
    assert!(!engine.set_hovered(id, true));
    assert!(!engine.destroy(id));
}

#[test]
fn art_completion_recomposes_waiting_cards() {
    let loader = Manual::default();
    let mut engine = CardEngine::builder()
        .renderer(CpuRenderer::new())
        .options(small_options())
        .art_loader(loader.clone())
        .without_text()
        .build()
        .unwrap();
    let m = CardVisualModel::builder("Phoenix").art_url("/cards/phoenix.png").build();
    let id = engine.create_card(m, CreateCardOpts::default()).unwrap();
    let before = engine.card(id).unwrap().small_texture().unwrap().fingerprint();

    let (url, tx) = loader.0.lock().unwrap().pop().unwrap();
    let art = ArtImage::from_straight_rgba8(&[255, 200, 0, 255].repeat(16), 4, 4).unwrap();
    assert!(tx.art_loaded(url, Ok(art)));

    engine.tick(0.0); // art applied, small rescheduled and run
    engine.tick(0.0); // recomposed small applied
    let card = engine.card(id).unwrap();
    assert!(card.art().is_some());
    assert_ne!(card.small_texture().unwrap().fingerprint(), before);
}

#[test]
fn failed_art_keeps_placeholder() {
    let mut engine = engine_with(small_options());
    let m = CardVisualModel::builder("Ghost").art_url("/missing.png").build();
    let id = engine.create_card(m, CreateCardOpts::default()).unwrap();
    engine.tick(0.0);
    assert!(engine.card(id).unwrap().art().is_none());
    assert_eq!(engine.stats().art_load_failures, 1);
    assert!(engine.context().art_cache().has_failed("/missing.png"));
}

#[test]
fn snapshot_skin_replaces_the_small_texture() {
    let calls = Arc::new(Mutex::new(0));
    let mut engine = CardEngine::builder()
        .renderer(CpuRenderer::new())
        .options(small_options())
        .snapshot_rasterizer(Scripted(Vec::new(), calls.clone()))
        .without_text()
        .build()
        .unwrap();
    let id = engine
        .create_card(
            model("Imp"),
            CreateCardOpts {
                dom_source: Some(dom()),
                layout: None,
            },
        )
        .unwrap();
    assert!(engine.card(id).unwrap().uses_snapshot_skin());
    engine.tick(0.0);
    engine.tick(0.0);
    assert_eq!(*calls.lock().unwrap(), 1);
    let card = engine.card(id).unwrap();
    assert_eq!(card.small_texture().unwrap().pixel(3, 3), [9, 9, 9, 255]);
    assert_eq!(engine.stats().snapshots_applied, 1);
}

#[test]
fn soft_snapshot_failure_keeps_composed_texture() {
    let calls = Arc::new(Mutex::new(0));
    let mut engine = CardEngine::builder()
        .renderer(CpuRenderer::new())
        .options(small_options())
        .snapshot_rasterizer(Scripted(
            vec![Err(SnapshotFailure::Failed("decode".into()))],
            calls,
        ))
        .without_text()
        .build()
        .unwrap();
    let opts = CreateCardOpts {
        dom_source: Some(dom()),
        layout: None,
    };
    let id = engine.create_card(model("Imp"), opts).unwrap();
    let composed = engine.card(id).unwrap().small_texture().unwrap().id();
    engine.tick(0.0);
    engine.tick(0.0);
    assert!(engine.context().snapshot_enabled());
    assert_eq!(engine.card(id).unwrap().small_texture().unwrap().id(), composed);
    assert_eq!(engine.stats().snapshot_failures, 1);
}

#[test]
fn eviction_releases_least_recent_unhovered() {
    let mut engine = engine_with(EngineOptions {
        hi_res_cache_max: 1,
        ..small_options()
    });
    let a = engine.create_card(model("A"), CreateCardOpts::default()).unwrap();
    let b = engine.create_card(model("B"), CreateCardOpts::default()).unwrap();

    engine.set_hovered(a, true);
    engine.tick(0.0);
    engine.tick(0.0);
    engine.set_hovered(a, false);
    engine.set_hovered(b, true);

    assert_eq!(engine.hi_res_cards(), vec![b]);
    assert!(engine.card(a).unwrap().large_texture().is_none());
    assert_eq!(engine.stats().evictions, 1);
    assert_eq!(engine.stats().large_textures_released, 1);
}

#[test]
fn replace_model_rebuilds_resident_tiers() {
    let mut engine = engine_with(small_options());
    let id = engine.create_card(model("Imp"), CreateCardOpts::default()).unwrap();
    engine.set_hovered(id, true);
    engine.tick(0.0);
    engine.tick(0.0);

    let spell = CardVisualModel::builder("Bolt").category(CardCategory::Spell).build();
    assert!(engine.replace_model(id, spell));
    assert_eq!(engine.queued_jobs(), 2);
    engine.tick(0.0);
    engine.tick(0.0);
    let card = engine.card(id).unwrap();
    assert_eq!(card.model().unwrap().name(), "Bolt");
    assert_eq!(card.token(Tier::Small), 1);
    assert_eq!(card.token(Tier::Large), 2);
    assert!(card.large_texture().is_some());
}

#[test]
fn tick_writes_interpolated_frames_into_the_scene() {
    let mut engine = engine_with(small_options());
    let layout = CardLayout::new(20.0, 20.0, 40.0, 56.0).with_z_index(3);
    let id = engine
        .create_card(
            model("Imp"),
            CreateCardOpts {
                dom_source: None,
                layout: Some(layout),
            },
        )
        .unwrap();
    engine.set_pointer_local(id, 40.0, 0.0, true);
    for _ in 0..30 {
        engine.tick(1.0 / 60.0);
    }
    let node = engine.scene().get(id).unwrap();
    assert_eq!(node.z_index, 3 + crate::card::view::HOVER_Z_BOOST);
    assert!(node.glare.alpha > 0.0);
    let card = engine.card(id).unwrap();
    assert!(card.scale() > 1.0);
    assert!(card.tilt().y > 0.0);
}

#[test]
fn dispose_destroys_everything() {
    let mut engine = engine_with(small_options());
    engine.create_card(model("A"), CreateCardOpts::default()).unwrap();
    engine.create_card(model("B"), CreateCardOpts::default()).unwrap();
    engine.dispose();
    assert!(engine.is_disposed());
    assert_eq!(engine.card_count(), 0);
    assert!(engine.scene().is_empty());
    assert_eq!(engine.stats().cards_destroyed, 2);
    assert!(
        engine
            .create_card(model("C"), CreateCardOpts::default())
            .is_err()
    );
}

#[test]
fn render_produces_a_viewport_frame() {
    let mut engine = engine_with(small_options());
    let layout = CardLayout::new(10.0, 10.0, 40.0, 56.0);
    engine
        .create_card(
            model("Imp"),
            CreateCardOpts {
                dom_source: None,
                layout: Some(layout),
            },
        )
        .unwrap();
    engine.tick(0.0);
    let frame = engine.render().unwrap();
    assert_eq!((frame.width, frame.height), (160, 120));
    assert_eq!(frame.pixel(30, 38)[3], 255);
    assert_eq!(frame.pixel(150, 110), [0, 0, 0, 0]);
}

#[test]
fn hard_snapshot_failure_stops_the_rest_of_the_batch() {
    let (mut engine, calls) =
        snapshot_engine(vec![Err(SnapshotFailure::Tainted("cross-origin".into()))]);
    let a = engine.create_card(model("A"), with_dom(dom())).unwrap();
    let b = engine.create_card(model("B"), with_dom(dom())).unwrap();
    let c = engine.create_card(model("C"), with_dom(dom())).unwrap();

    engine.tick(0.0);
    assert_eq!(*calls.lock().unwrap(), 1);
    assert!(!engine.context().snapshot_enabled());
    assert_eq!(engine.stats().snapshot_failures, 1);
    for id in [a, b, c] {
        assert!(!engine.card(id).unwrap().uses_snapshot_skin());
    }

    for _ in 0..3 {
        engine.tick(0.0);
    }
    assert_eq!(*calls.lock().unwrap(), 1);
    assert_eq!(engine.queued_jobs(), 0);
}

#[test]
fn dom_refresh_converges_to_the_last_element() {
    let (mut engine, calls) = snapshot_engine(Vec::new());
    let id = engine.create_card(model("Imp"), with_dom(dom())).unwrap();
    engine.set_hovered(id, true);
    engine.tick(0.0);
    engine.tick(0.0);
    assert_eq!(engine.card(id).unwrap().large_texture().unwrap().width(), 80);

    assert!(engine.refresh_dom_snapshot_from_element(id, &dom_with_width(30.0)));
    engine.tick(0.0); // first refresh rasterized, results in flight
    assert!(engine.refresh_dom_snapshot_from_element(id, &dom_with_width(36.0)));
    assert_eq!(engine.queued_jobs(), 2);

    let r = engine.tick(0.0);
    assert_eq!(r.stale_discarded, 2);
    assert_eq!(r.completions_applied, 0);
    engine.tick(0.0);

    let card = engine.card(id).unwrap();
    assert_eq!(card.small_texture().unwrap().width(), 36);
    assert_eq!(card.large_texture().unwrap().width(), 72);
    assert_eq!(card.token(Tier::Small), 3);
    assert_eq!(card.token(Tier::Large), 3);
    assert_eq!(*calls.lock().unwrap(), 6);
}

#[test]
fn dom_refresh_queued_twice_runs_once_per_tier() {
    let (mut engine, calls) = snapshot_engine(Vec::new());
    let id = engine.create_card(model("Imp"), with_dom(dom())).unwrap();
    engine.tick(0.0);
    engine.tick(0.0);
    assert_eq!(*calls.lock().unwrap(), 1);

    engine.refresh_dom_snapshot_from_element(id, &dom_with_width(30.0));
    engine.refresh_dom_snapshot_from_element(id, &dom_with_width(36.0));
    assert_eq!(engine.queued_jobs(), 1);
    engine.tick(0.0);
    engine.tick(0.0);
    assert_eq!(*calls.lock().unwrap(), 2);
    assert_eq!(engine.card(id).unwrap().small_texture().unwrap().width(), 36);
}

#[test]
fn dom_refresh_is_refused_when_snapshots_are_off() {
    let calls = Arc::new(Mutex::new(0));
    let mut engine = CardEngine::builder()
        .renderer(CpuRenderer::new())
        .options(EngineOptions {
            use_dom_snapshot_skin: false,
            ..small_options()
        })
        .snapshot_rasterizer(Scripted(Vec::new(), calls.clone()))
        .without_text()
        .build()
        .unwrap();
    let id = engine.create_card(model("Imp"), with_dom(dom())).unwrap();
    let small = engine.card(id).unwrap().small_texture().unwrap().id();

    assert!(!engine.refresh_dom_snapshot_from_element(id, &dom_with_width(30.0)));
    assert_eq!(engine.queued_jobs(), 0);
    engine.tick(0.0);
    engine.tick(0.0);
    let card = engine.card(id).unwrap();
    assert_eq!(card.small_texture().unwrap().id(), small);
    assert_eq!(card.token(Tier::Small), 0);
    assert_eq!(*calls.lock().unwrap(), 0);
}

#[test]
fn set_layout_never_rebuilds_textures() {
    let mut engine = engine_with(small_options());
    let id = engine.create_card(model("Imp"), CreateCardOpts::default()).unwrap();
    engine.set_hovered(id, true);
    engine.tick(0.0);
    engine.tick(0.0);

    let (small, large, shown) = {
        let card = engine.card(id).unwrap();
        (
            card.token(Tier::Small),
            card.token(Tier::Large),
            card.display_texture().unwrap().id(),
        )
    };
    assert!(engine.set_layout(id, CardLayout::new(60.0, 30.0, 50.0, 70.0).with_scale(1.2)));
    assert_eq!(engine.queued_jobs(), 0);
    engine.tick(0.016);

    let card = engine.card(id).unwrap();
    assert_eq!(card.token(Tier::Small), small);
    assert_eq!(card.token(Tier::Large), large);
    assert_eq!(card.display_texture().unwrap().id(), shown);
    assert_eq!(engine.scene().get(id).unwrap().width, 50.0);
}

#[test]
fn failed_large_build_frees_its_lru_slot() {
    let (mut engine, _calls) = snapshot_engine(vec![
        Ok(Texture::from_premul_rgba8(&[9, 9, 9, 255].repeat(40 * 56), 40, 56, 1.0).unwrap()),
        Err(SnapshotFailure::Failed("decode".into())),
    ]);
    let id = engine.create_card(model("Imp"), with_dom(dom())).unwrap();
    engine.tick(0.0);
    engine.set_hovered(id, true);
    assert_eq!(engine.hi_res_cards(), vec![id]);

    engine.tick(0.0);
    engine.tick(0.0);
    let card = engine.card(id).unwrap();
    assert!(card.large_texture().is_none());
    assert!(!card.is_large_pending());
    assert!(engine.hi_res_cards().is_empty());
    assert!(engine.context().snapshot_enabled());
}
