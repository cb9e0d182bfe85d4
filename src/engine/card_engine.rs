use std::sync::Arc;
use std::sync::mpsc;

use crate::assets::art_cache::ArtRequest;
use crate::assets::decode::ArtImage;
use crate::assets::loader::{ArtLoader, NullArtLoader};
use crate::cache::hires_lru::HiResLru;
use crate::card::arena::{CardArena, CardId};
use crate::card::view::{CardFrame, CardLayout, CardView, HoverTransition, ViewTuning};
use crate::config::EngineOptions;
use crate::engine::context::{EngineStats, RenderResourceContext};
use crate::engine::jobs::{
    Completion, CompletionSender, JobQueue, SkinSource, TextureCompletion, TextureJob,
    TextureOutcome, completion_channel,
};
use crate::engine::ticker::Ticker;
use crate::foundation::core::{Tier, Vec2};
use crate::foundation::error::{CardSkinError, CardSkinResult};
use crate::model::card::CardVisualModel;
use crate::render::backend::{FrameRGBA, Renderer, RendererCaps};
use crate::render::composer::CardComposer;
use crate::render::projection::select_projection;
use crate::render::texture::Texture;
use crate::scene::{Scene, SceneNode};
use crate::snapshot::dom::DomElement;
use crate::snapshot::markup::build_markup;
use crate::snapshot::raster::{
    SnapshotDocument, SnapshotFailure, SnapshotRasterizer, rasterize_snapshot,
};

/// Options for [`CardEngine::create_card`].
#[derive(Clone, Debug, Default)]
pub struct CreateCardOpts {
    /// Live element to snapshot instead of composing, when snapshots are enabled.
    pub dom_source: Option<DomElement>,
    /// Defaults to the engine card size at the origin.
    pub layout: Option<CardLayout>,
}

/// What one [`CardEngine::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Results that reached a live card. Stale ones only count in `stale_discarded`.
    pub completions_applied: usize,
    pub stale_discarded: usize,
    pub jobs_run: usize,
    pub evicted: usize,
}

pub struct CardEngineBuilder {
    renderer: Option<Box<dyn Renderer>>,
    options: EngineOptions,
    art_loader: Option<Box<dyn ArtLoader>>,
    snapshot: Option<Box<dyn SnapshotRasterizer>>,
    font_bytes: Option<Vec<u8>>,
    draw_text: bool,
    viewport: (u32, u32),
}

impl Default for CardEngineBuilder {
    fn default() -> Self {
        Self {
            renderer: None,
            options: EngineOptions::default(),
            art_loader: None,
            snapshot: None,
            font_bytes: None,
            draw_text: true,
            viewport: (1280, 720),
        }
    }
}

impl CardEngineBuilder {
    pub fn renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn art_loader(mut self, loader: impl ArtLoader + 'static) -> Self {
        self.art_loader = Some(Box::new(loader));
        self
    }

    pub fn snapshot_rasterizer(mut self, rasterizer: impl SnapshotRasterizer + 'static) -> Self {
        self.snapshot = Some(Box::new(rasterizer));
        self
    }

    /// Font for composed card text. Without it a system sans-serif is looked up.
    pub fn font_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.font_bytes = Some(bytes);
        self
    }

    /// Compose faces without any text (no font lookup at all).
    pub fn without_text(mut self) -> Self {
        self.draw_text = false;
        self
    }

    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = (width, height);
        self
    }

    pub fn build(self) -> CardSkinResult<CardEngine> {
        let renderer = self
            .renderer
            .ok_or_else(|| CardSkinError::precondition("a renderer is required"))?;
        let caps = renderer.capabilities();
        if caps.max_texture_dim == 0 {
            return Err(CardSkinError::precondition(
                "renderer reports max_texture_dim == 0",
            ));
        }

        let ctx = RenderResourceContext::init(self.options)?;
        let card = ctx.options().card_size()?;
        let corner = ctx.options().corner_radius;
        let mut composer = if self.draw_text {
            CardComposer::new(card, self.font_bytes, corner)
        } else {
            CardComposer::without_text(card, corner)
        };
        composer.set_max_texture_dim(caps.max_texture_dim);

        let scene = Scene::new(self.viewport.0, self.viewport.1)?;
        let (completion_tx, completion_rx) = completion_channel();
        let lru = HiResLru::new(ctx.options().hi_res_cache_max);
        let ticker = Ticker::new(ctx.options().max_frame_dt);

        tracing::debug!(
            perspective = caps.perspective_mesh,
            max_texture_dim = caps.max_texture_dim,
            text = composer.has_text(),
            "card engine ready"
        );

        Ok(CardEngine {
            renderer,
            caps,
            ctx,
            composer,
            art_loader: self
                .art_loader
                .unwrap_or_else(|| Box::new(NullArtLoader)),
            snapshot: self.snapshot,
            cards: CardArena::new(),
            lru,
            jobs: JobQueue::default(),
            completion_tx,
            completion_rx,
            scene,
            ticker,
            disposed: false,
        })
    }
}

/// Owns every card, their textures and the shared per-frame loop.
///
/// Single-threaded: all mutation goes through `&mut self`. Async work reports back through the
/// completion channel and is applied at the start of the next [`CardEngine::tick`].
pub struct CardEngine {
    renderer: Box<dyn Renderer>,
    caps: RendererCaps,
    ctx: RenderResourceContext,
    composer: CardComposer,
    art_loader: Box<dyn ArtLoader>,
    snapshot: Option<Box<dyn SnapshotRasterizer>>,
    cards: CardArena<CardView>,
    lru: HiResLru<CardId>,
    jobs: JobQueue,
    completion_tx: CompletionSender,
    completion_rx: mpsc::Receiver<Completion>,
    scene: Scene,
    ticker: Ticker,
    disposed: bool,
}

impl std::fmt::Debug for CardEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardEngine")
            .field("caps", &self.caps)
            .field("cards", &self.cards.len())
            .field("hi_res", &self.lru.len())
            .field("queued_jobs", &self.jobs.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl CardEngine {
    pub fn builder() -> CardEngineBuilder {
        CardEngineBuilder::default()
    }

    pub fn options(&self) -> &EngineOptions {
        self.ctx.options()
    }

    pub fn capabilities(&self) -> RendererCaps {
        self.caps
    }

    pub fn context(&self) -> &RenderResourceContext {
        &self.ctx
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn stats(&self) -> EngineStats {
        self.ctx.stats()
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn card_ids(&self) -> Vec<CardId> {
        self.cards.ids()
    }

    /// Cards holding a large texture, least recently used first.
    pub fn hi_res_cards(&self) -> Vec<CardId> {
        self.lru.iter().collect()
    }

    pub fn queued_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// A texture job for `id` and `tier` is waiting for a tick.
    pub fn has_queued_job(&self, id: CardId, tier: Tier) -> bool {
        self.jobs.is_pending(id, tier)
    }

    /// Handle for host-driven loaders that deliver results from other threads.
    pub fn completion_sender(&self) -> CompletionSender {
        self.completion_tx.clone()
    }

    pub fn is_alive(&self, id: CardId) -> bool {
        self.cards.contains(id)
    }

    pub fn card(&mut self, id: CardId) -> Option<CardHandle<'_>> {
        if !self.cards.contains(id) {
            return None;
        }
        Some(CardHandle { engine: self, id })
    }

    fn tier_scale(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Small => self.ctx.options().small_scale,
            Tier::Large => self.ctx.options().large_scale,
        }
    }

    /// Create a card. The small texture is composed right away so the card is displayable
    /// immediately; snapshot skins and artwork arrive on later ticks.
    #[tracing::instrument(level = "debug", skip_all, fields(card = model.id()))]
    pub fn create_card(
        &mut self,
        model: CardVisualModel,
        opts: CreateCardOpts,
    ) -> CardSkinResult<CardId> {
        if self.disposed {
            return Err(CardSkinError::precondition("engine has been disposed"));
        }
        let options = self.ctx.options();
        let layout = opts.layout.unwrap_or_else(|| {
            CardLayout::new(0.0, 0.0, options.card_width, options.card_height)
        });
        let projection =
            select_projection(self.caps.perspective_mesh, options.perspective_distance);
        let tuning = ViewTuning::from_options(options);
        let scale = self.tier_scale(Tier::Small);

        let cached_art = model.art_url().and_then(|url| self.ctx.art.get(url));
        let small = self
            .composer
            .compose(&model, scale, cached_art.as_deref())?;
        self.ctx.stats.small_textures_built += 1;

        let art_url = model.art_url().map(str::to_owned);
        let view = CardView::new(model, layout, small, projection, tuning);
        let id = self.cards.insert(view);
        self.ctx.stats.cards_created += 1;

        if let Some(url) = art_url {
            self.request_art(id, &url, cached_art);
        }
        if let Some(el) = opts.dom_source {
            self.try_snapshot_skin(id, &el);
        }
        self.attach(id);
        Ok(id)
    }

    fn attach(&mut self, id: CardId) {
        let Some(view) = self.cards.get(id) else {
            return;
        };
        let frame = view.frame();
        let layout = view.layout();
        let node = SceneNode {
            texture: view.display_texture().clone(),
            geometry: frame.geometry,
            width: layout.width,
            height: layout.height,
            corner_radius: view.corner_radius(),
            z_index: frame.z_index,
            glare: frame.glare,
            shadow: frame.shadow,
        };
        self.scene.attach(id, node);
    }

    fn request_art(&mut self, id: CardId, url: &str, cached: Option<Arc<ArtImage>>) {
        let Some(view) = self.cards.get_mut(id) else {
            return;
        };
        if let Some(img) = cached {
            view.art = Some(img);
            return;
        }
        match self.ctx.art.request(url, id) {
            ArtRequest::Ready(img) => view.art = Some(img),
            ArtRequest::Pending => view.art_waiting = Some(url.to_owned()),
            ArtRequest::StartLoad => {
                view.art_waiting = Some(url.to_owned());
                self.art_loader.start(url, self.completion_tx.clone());
            }
            ArtRequest::Failed => {}
        }
    }

    /// Switch `id` to a snapshot skin if the path is enabled. Returns whether jobs were queued.
    fn try_snapshot_skin(&mut self, id: CardId, element: &DomElement) -> bool {
        if self.snapshot.is_none() || !self.ctx.snapshot_enabled() {
            return false;
        }
        let Some(markup) = build_markup(element) else {
            tracing::debug!(card = %id, "snapshot source has no layout box; composing");
            return false;
        };
        let Some(view) = self.cards.get_mut(id) else {
            return false;
        };
        view.skin = SkinSource::Snapshot(Arc::new(markup));
        self.schedule_resident(id);
        true
    }

    fn schedule(&mut self, id: CardId, tier: Tier) {
        let Some(view) = self.cards.get_mut(id) else {
            return;
        };
        let token = view.tokens.bump(tier);
        if tier == Tier::Large {
            view.large_pending = true;
        }
        self.jobs.push(TextureJob {
            card: id,
            tier,
            token,
            source: view.skin.clone(),
        });
    }

    /// Rebuild the small tier, and the large tier when resident or pending.
    fn schedule_resident(&mut self, id: CardId) {
        let Some(view) = self.cards.get(id) else {
            return;
        };
        let large = view.large.is_some() || view.large_pending;
        self.schedule(id, Tier::Small);
        if large {
            self.schedule(id, Tier::Large);
        }
    }

    fn sync_display(&mut self, id: CardId) {
        if let Some(view) = self.cards.get(id) {
            self.scene.set_texture(id, view.display_texture().clone());
        }
    }

    pub fn set_layout(&mut self, id: CardId, layout: CardLayout) -> bool {
        let Some(view) = self.cards.get_mut(id) else {
            return false;
        };
        view.set_layout(layout);
        let layout = view.layout();
        let corner = view.corner_radius();
        self.scene
            .set_size(id, layout.width, layout.height, corner);
        true
    }

    /// Pointer moved over (or off) a card; `x`/`y` are card-local.
    pub fn set_pointer_local(&mut self, id: CardId, x: f64, y: f64, hovered: bool) -> bool {
        let Some(view) = self.cards.get_mut(id) else {
            return false;
        };
        let transition = view.set_pointer_local(x, y, hovered);
        self.on_hover_transition(id, transition);
        true
    }

    pub fn set_hovered(&mut self, id: CardId, hovered: bool) -> bool {
        let Some(view) = self.cards.get_mut(id) else {
            return false;
        };
        let transition = view.set_hovered(hovered);
        self.on_hover_transition(id, transition);
        true
    }

    fn on_hover_transition(&mut self, id: CardId, transition: HoverTransition) {
        match transition {
            HoverTransition::Entered => {
                self.ensure_large_texture(id);
            }
            HoverTransition::Left => {
                if self.ctx.options().destroy_hi_res_on_pointer_out {
                    self.release_large_texture(id);
                } else {
                    self.sync_display(id);
                }
            }
            HoverTransition::Unchanged => {}
        }
    }

    /// Make sure a large texture exists or is on its way, and mark the card recently used.
    pub fn ensure_large_texture(&mut self, id: CardId) -> bool {
        let Some(view) = self.cards.get(id) else {
            return false;
        };
        if view.large.is_none() && !view.large_pending {
            self.schedule(id, Tier::Large);
        }
        self.lru.touch(id);
        self.sync_display(id);
        self.evict();
        true
    }

    /// Drop the large texture (if any), cancel pending large results and show the small tier.
    pub fn release_large_texture(&mut self, id: CardId) -> bool {
        let Some(view) = self.cards.get_mut(id) else {
            return false;
        };
        view.tokens.bump(Tier::Large);
        view.large_pending = false;
        let old = view.large.take();
        self.lru.remove(id);
        if let Some(old) = old {
            self.renderer.texture_released(old.id());
            self.ctx.stats.large_textures_released += 1;
        }
        self.sync_display(id);
        true
    }

    /// Rebuild the snapshot markup from a changed element and re-rasterize resident tiers.
    pub fn refresh_dom_snapshot_from_element(&mut self, id: CardId, element: &DomElement) -> bool {
        self.cards.contains(id) && self.try_snapshot_skin(id, element)
    }

    /// Swap the card's model, re-request art if it changed and rebuild resident tiers.
    pub fn replace_model(&mut self, id: CardId, model: CardVisualModel) -> bool {
        let Some(view) = self.cards.get_mut(id) else {
            return false;
        };
        let old_url = view.model.art_url().map(str::to_owned);
        let new_url = model.art_url().map(str::to_owned);
        view.model = model;
        if old_url != new_url {
            if let Some(waiting) = view.art_waiting.take() {
                self.ctx.art.unlisten(&waiting, id);
            }
            view.art = None;
            if let Some(url) = new_url {
                let cached = self.ctx.art.get(&url);
                self.request_art(id, &url, cached);
            }
        }
        self.schedule_resident(id);
        true
    }

    /// Tombstone the card and free everything it holds. Outstanding results for it are ignored.
    pub fn destroy(&mut self, id: CardId) -> bool {
        let Some(view) = self.cards.remove(id) else {
            return false;
        };
        if let Some(url) = &view.art_waiting {
            self.ctx.art.unlisten(url, id);
        }
        self.jobs.remove_card(id);
        if let Some(large) = &view.large {
            self.renderer.texture_released(large.id());
            self.ctx.stats.large_textures_released += 1;
        }
        self.lru.remove(id);
        self.scene.detach(id);
        self.renderer.texture_released(view.small.id());
        self.ctx.stats.cards_destroyed += 1;
        true
    }

    /// Derive `dt` from a host timestamp (seconds) and tick.
    pub fn frame(&mut self, timestamp_s: f64) -> TickReport {
        let dt = self.ticker.advance(timestamp_s);
        self.tick(dt)
    }

    /// One pass of the shared loop: apply finished work, run queued jobs, interpolate every
    /// card, evict.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn tick(&mut self, dt: f64) -> TickReport {
        let mut report = TickReport::default();
        if self.disposed {
            return report;
        }
        self.apply_completions(&mut report);
        self.run_jobs(&mut report);

        let frames: Vec<(CardId, CardFrame)> = self
            .cards
            .iter_mut()
            .map(|(id, view)| (id, view.update(dt)))
            .collect();
        for (id, f) in frames {
            self.scene.set_frame(id, f.geometry, f.z_index, f.glare, f.shadow);
        }

        report.evicted = self.evict();
        report
    }

    fn evict(&mut self) -> usize {
        let cards = &self.cards;
        let evicted = self
            .lru
            .evict_if_needed(|id| cards.get(id).is_some_and(|v| v.is_hovered()));
        for &id in &evicted {
            tracing::debug!(card = %id, "evicting large texture");
            self.ctx.stats.evictions += 1;
            self.release_large_texture(id);
        }
        evicted.len()
    }

    fn apply_completions(&mut self, report: &mut TickReport) {
        while let Ok(msg) = self.completion_rx.try_recv() {
            let applied = match msg {
                Completion::ArtLoaded { url, result } => {
                    self.apply_art(&url, result);
                    true
                }
                Completion::Texture(c) => self.apply_texture(c),
            };
            if applied {
                report.completions_applied += 1;
            } else {
                report.stale_discarded += 1;
            }
        }
    }

    fn apply_art(&mut self, url: &str, result: CardSkinResult<ArtImage>) {
        let failed = result.is_err();
        let done = self.ctx.art.complete(url, result);
        if failed {
            self.ctx.stats.art_load_failures += 1;
        }
        for id in done.waiters {
            let Some(view) = self.cards.get_mut(id) else {
                continue;
            };
            view.art_waiting = None;
            let Some(img) = &done.image else {
                continue;
            };
            view.art = Some(img.clone());
            if matches!(view.skin, SkinSource::Compose) {
                self.schedule_resident(id);
            }
        }
    }

    /// Returns `false` when the result was stale and discarded.
    fn apply_texture(&mut self, c: TextureCompletion) -> bool {
        let Some(view) = self.cards.get_mut(c.card) else {
            tracing::debug!(card = %c.card, tier = %c.tier, "discarding result for destroyed card");
            self.ctx.stats.stale_results_discarded += 1;
            return false;
        };
        if view.tokens.current(c.tier) != c.token {
            tracing::debug!(card = %c.card, tier = %c.tier, "discarding stale texture result");
            self.ctx.stats.stale_results_discarded += 1;
            return false;
        }

        match c.outcome {
            TextureOutcome::Ready(texture) => {
                if matches!(view.skin, SkinSource::Snapshot(_)) {
                    self.ctx.stats.snapshots_applied += 1;
                }
                let old = match c.tier {
                    Tier::Small => {
                        self.ctx.stats.small_textures_built += 1;
                        Some(std::mem::replace(&mut view.small, texture))
                    }
                    Tier::Large => {
                        self.ctx.stats.large_textures_built += 1;
                        view.large_pending = false;
                        view.large.replace(texture)
                    }
                };
                if let Some(old) = old {
                    self.renderer.texture_released(old.id());
                }
            }
            TextureOutcome::SnapshotFailed(failure) => {
                if failure.is_hard() {
                    self.disable_snapshot_path(&failure);
                } else {
                    self.ctx.stats.snapshot_failures += 1;
                    tracing::warn!(card = %c.card, error = %failure, "snapshot failed; keeping current texture");
                    self.large_tier_failed(c.card, c.tier);
                }
            }
            TextureOutcome::ComposeFailed(msg) => {
                self.ctx.stats.compose_failures += 1;
                tracing::warn!(card = %c.card, tier = %c.tier, error = %msg, "compose failed; keeping current texture");
                self.large_tier_failed(c.card, c.tier);
            }
        }
        self.sync_display(c.card);
        true
    }

    /// A large build failed: stop waiting for it and free its LRU slot if nothing is resident.
    fn large_tier_failed(&mut self, id: CardId, tier: Tier) {
        if tier != Tier::Large {
            return;
        }
        let Some(view) = self.cards.get_mut(id) else {
            return;
        };
        view.large_pending = false;
        if view.large.is_none() {
            self.lru.remove(id);
        }
    }

    fn disable_snapshot_path(&mut self, failure: &SnapshotFailure) {
        self.ctx.stats.snapshot_failures += 1;
        self.ctx.disable_snapshot(failure.to_string());
        self.fall_back_to_composer();
    }

    /// Snapshots are off for good: every snapshot-skinned card is recomposed.
    fn fall_back_to_composer(&mut self) {
        let ids: Vec<CardId> = self
            .cards
            .iter_mut()
            .filter(|(_, v)| matches!(v.skin, SkinSource::Snapshot(_)))
            .map(|(id, v)| {
                v.skin = SkinSource::Compose;
                id
            })
            .collect();
        for id in ids {
            self.schedule_resident(id);
        }
    }

    fn run_jobs(&mut self, report: &mut TickReport) {
        let budget = self.ctx.options().jobs_per_frame;
        let mut ran = 0;
        while ran < budget {
            let Some(job) = self.jobs.pop() else {
                break;
            };
            let live = self
                .cards
                .get(job.card)
                .is_some_and(|v| v.tokens.current(job.tier) == job.token);
            if !live {
                self.ctx.stats.stale_results_discarded += 1;
                report.stale_discarded += 1;
                continue;
            }

            let outcome = self.run_job(&job);
            ran += 1;
            self.ctx.stats.jobs_run += 1;

            // Turn snapshots off before the next job so the rest of the batch composes.
            if let TextureOutcome::SnapshotFailed(failure) = &outcome
                && failure.is_hard()
            {
                self.disable_snapshot_path(failure);
                continue;
            }
            self.completion_tx.send(Completion::Texture(TextureCompletion {
                card: job.card,
                tier: job.tier,
                token: job.token,
                outcome,
            }));
        }
        report.jobs_run = ran;
    }

    fn run_job(&mut self, job: &TextureJob) -> TextureOutcome {
        let scale = self.tier_scale(job.tier);
        let snapshot_ok = self.ctx.snapshot_enabled();
        let Some(view) = self.cards.get(job.card) else {
            return TextureOutcome::ComposeFailed("card destroyed".into());
        };

        if let SkinSource::Snapshot(markup) = &job.source
            && snapshot_ok
            && let Some(rasterizer) = self.snapshot.as_mut()
        {
            let longest = markup.width.max(markup.height);
            let fit = f64::from(self.caps.max_texture_dim) / longest;
            let doc = SnapshotDocument::new(markup, markup.width, markup.height, scale.min(fit));
            return match rasterize_snapshot(rasterizer.as_mut(), &doc) {
                Ok(texture) => TextureOutcome::Ready(texture),
                Err(failure) => TextureOutcome::SnapshotFailed(failure),
            };
        }

        match self
            .composer
            .compose(&view.model, scale, view.art.as_deref())
        {
            Ok(texture) => TextureOutcome::Ready(texture),
            Err(err) => TextureOutcome::ComposeFailed(err.to_string()),
        }
    }

    pub fn render(&mut self) -> CardSkinResult<FrameRGBA> {
        self.renderer.render(&self.scene, self.ctx.pool())
    }

    /// Destroy every card and drop shared resources. Later `create_card` calls fail.
    pub fn dispose(&mut self) {
        for id in self.cards.ids() {
            self.destroy(id);
        }
        self.jobs.clear();
        while self.completion_rx.try_recv().is_ok() {}
        self.lru.clear();
        self.scene.clear();
        self.ctx.dispose();
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

/// Borrowed view of one live card.
pub struct CardHandle<'a> {
    engine: &'a mut CardEngine,
    id: CardId,
}

impl CardHandle<'_> {
    fn view(&self) -> Option<&CardView> {
        self.engine.cards.get(self.id)
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn model(&self) -> Option<&CardVisualModel> {
        self.view().map(|v| &v.model)
    }

    pub fn layout(&self) -> Option<CardLayout> {
        self.view().map(CardView::layout)
    }

    pub fn is_hovered(&self) -> bool {
        self.view().is_some_and(CardView::is_hovered)
    }

    pub fn tilt(&self) -> Vec2 {
        self.view().map_or(Vec2::ZERO, CardView::tilt)
    }

    pub fn tilt_target(&self) -> Vec2 {
        self.view().map_or(Vec2::ZERO, CardView::tilt_target)
    }

    pub fn scale(&self) -> f64 {
        self.view().map_or(0.0, CardView::scale)
    }

    pub fn scale_target(&self) -> f64 {
        self.view().map_or(0.0, CardView::scale_target)
    }

    /// Normalized pointer offset in `-1..=1` on both axes.
    pub fn pointer(&self) -> Vec2 {
        self.view().map_or(Vec2::ZERO, CardView::pointer)
    }

    pub fn frame(&self) -> Option<CardFrame> {
        self.view().map(CardView::frame)
    }

    pub fn small_texture(&self) -> Option<&Texture> {
        self.view().map(|v| &v.small)
    }

    pub fn large_texture(&self) -> Option<&Texture> {
        self.view().and_then(|v| v.large.as_ref())
    }

    pub fn display_texture(&self) -> Option<&Texture> {
        self.view().map(CardView::display_texture)
    }

    pub fn is_large_pending(&self) -> bool {
        self.view().is_some_and(|v| v.large_pending)
    }

    pub fn token(&self, tier: Tier) -> u64 {
        self.view().map_or(0, |v| v.tokens.current(tier))
    }

    pub fn art(&self) -> Option<Arc<ArtImage>> {
        self.view().and_then(|v| v.art.clone())
    }

    pub fn uses_snapshot_skin(&self) -> bool {
        self.view()
            .is_some_and(|v| matches!(v.skin, SkinSource::Snapshot(_)))
    }

    pub fn projection_name(&self) -> &'static str {
        self.view().map_or("", CardView::projection_name)
    }

    pub fn set_layout(&mut self, layout: CardLayout) -> bool {
        self.engine.set_layout(self.id, layout)
    }

    pub fn set_pointer_local(&mut self, x: f64, y: f64, hovered: bool) -> bool {
        self.engine.set_pointer_local(self.id, x, y, hovered)
    }

    pub fn set_hovered(&mut self, hovered: bool) -> bool {
        self.engine.set_hovered(self.id, hovered)
    }

    pub fn ensure_large_texture(&mut self) -> bool {
        self.engine.ensure_large_texture(self.id)
    }

    pub fn release_large_texture(&mut self) -> bool {
        self.engine.release_large_texture(self.id)
    }

    pub fn refresh_dom_snapshot_from_element(&mut self, element: &DomElement) -> bool {
        self.engine.refresh_dom_snapshot_from_element(self.id, element)
    }

    pub fn replace_model(&mut self, model: CardVisualModel) -> bool {
        self.engine.replace_model(self.id, model)
    }

    pub fn destroy(self) -> bool {
        self.engine.destroy(self.id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/card_engine.rs"]
mod tests;
