//! Texture composition and caching for many pointer-reactive card visuals drawn at once.
//!
//! Every card keeps an always-resident small texture and, while hovered, a large one tracked by
//! a bounded LRU. Faces come from the procedural [`CardComposer`] or from a snapshot of the live
//! card element ([`SnapshotRasterizer`]). One shared [`CardEngine::tick`] interpolates tilt, scale
//! and glare over the cached textures; asynchronous results are guarded by per-tier tokens and
//! generational [`CardId`]s so late results never touch destroyed or superseded state.
#![forbid(unsafe_code)]

mod assets;
mod cache;
mod card;
mod config;
mod engine;
mod foundation;
mod model;
mod render;
mod scene;
mod snapshot;

pub use assets::art_cache::{ArtCompletion, ArtRequest, ArtTextureCache};
pub use assets::decode::{ArtImage, decode_image};
pub use assets::loader::{ArtLoader, FsArtLoader, NullArtLoader, normalize_art_url};
pub use cache::hires_lru::HiResLru;
pub use card::arena::CardId;
pub use card::view::{CardFrame, CardLayout, HOVER_Z_BOOST, HoverTransition, TierTokens};
pub use config::EngineOptions;
pub use engine::context::{EngineStats, RenderResourceContext};
pub use engine::card_engine::{CardEngine, CardEngineBuilder, CardHandle, CreateCardOpts, TickReport};
pub use engine::jobs::{Completion, CompletionSender, TextureCompletion};
pub use engine::ticker::Ticker;
pub use foundation::core::{Affine, CardSize, Point, Rect, Rgba8, Tier, Vec2};
pub use foundation::error::{CardSkinError, CardSkinResult};
pub use foundation::math::{damp, damp_factor, normalize_signed, pixel_fingerprint};
pub use model::card::{CardCategory, CardModelBuilder, CardModelSpec, CardVisualModel};
pub use render::backend::{FrameRGBA, Renderer, RendererCaps};
pub use render::composer::{ART_BOTTOM, CardComposer, FaceLayout};
pub use render::cpu::CpuRenderer;
pub use render::pool::SharedResourcePool;
pub use render::projection::{
    CardGeometry, CardProjection, PerspectiveProjection, ProjectionInput, SkewProjection,
    select_projection,
};
pub use render::texture::{Texture, TextureId};
pub use scene::{GlareOverlay, Scene, SceneNode, ShadowParams};
pub use snapshot::dom::{DomElement, DomNode, DomRect};
pub use snapshot::markup::{SnapshotMarkup, TRANSIENT_CLASSES, build_markup};
pub use snapshot::raster::{
    ResvgSnapshotRasterizer, SnapshotDocument, SnapshotFailure, SnapshotRasterizer,
    rasterize_snapshot, validate_snapshot,
};
