use crate::assets::art_cache::ArtTextureCache;
use crate::card::arena::CardId;
use crate::config::EngineOptions;
use crate::foundation::error::CardSkinResult;
use crate::render::pool::SharedResourcePool;

/// Counters describing what an engine has done so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    pub cards_created: u64,
    pub cards_destroyed: u64,
    pub jobs_run: u64,
    pub small_textures_built: u64,
    pub large_textures_built: u64,
    pub large_textures_released: u64,
    pub evictions: u64,
    pub snapshots_applied: u64,
    pub snapshot_failures: u64,
    pub compose_failures: u64,
    pub stale_results_discarded: u64,
    pub art_loads_started: u64,
    pub art_load_failures: u64,
}

/// Process-independent home for what would otherwise be global state: options, the shared
/// texture pool, the artwork cache and the snapshot kill switch.
#[derive(Debug)]
pub struct RenderResourceContext {
    options: EngineOptions,
    pool: SharedResourcePool,
    pub(crate) art: ArtTextureCache<CardId>,
    snapshot_disabled: Option<String>,
    pub(crate) stats: EngineStats,
}

impl RenderResourceContext {
    pub fn init(options: EngineOptions) -> CardSkinResult<Self> {
        options.validate()?;
        let pool = SharedResourcePool::new(options.card_size()?, options.corner_radius);
        Ok(Self {
            options,
            pool,
            art: ArtTextureCache::new(),
            snapshot_disabled: None,
            stats: EngineStats::default(),
        })
    }

    /// Drop cached artwork and shared textures. The context stays usable; the pool rebuilds
    /// lazily.
    pub fn dispose(&mut self) {
        self.art.clear();
        self.pool = SharedResourcePool::new(self.pool.card_size(), self.options.corner_radius);
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn pool(&self) -> &SharedResourcePool {
        &self.pool
    }

    pub fn art_cache(&self) -> &ArtTextureCache<CardId> {
        &self.art
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            art_loads_started: self.art.loads_started(),
            ..self.stats
        }
    }

    /// Snapshot skins are wanted and nothing has switched them off.
    pub fn snapshot_enabled(&self) -> bool {
        self.options.use_dom_snapshot_skin && self.snapshot_disabled.is_none()
    }

    pub fn snapshot_disabled_reason(&self) -> Option<&str> {
        self.snapshot_disabled.as_deref()
    }

    /// Turn the snapshot path off for good. Returns `true` the first time.
    pub fn disable_snapshot(&mut self, reason: impl Into<String>) -> bool {
        if self.snapshot_disabled.is_some() {
            return false;
        }
        let reason = reason.into();
        tracing::warn!(%reason, "dom snapshot skin disabled; falling back to the composer");
        self.snapshot_disabled = Some(reason);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/context.rs"]
mod tests;
