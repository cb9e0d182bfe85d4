//! Engine configuration.
//!
//! Options are plain data with serde defaults so a host can pass a partial JSON object. Keys use
//! camelCase to match the host-side option names; unknown keys are rejected so typos surface
//! instead of silently falling back to defaults.

use std::path::Path;

use anyhow::Context;

use crate::foundation::core::CardSize;
use crate::foundation::error::{CardSkinError, CardSkinResult};

/// Configuration recognized by [`crate::CardEngine`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EngineOptions {
    /// Base card face width in logical units.
    pub card_width: f64,
    /// Base card face height in logical units.
    pub card_height: f64,
    /// Resolution multiplier for the always-resident tier.
    pub small_scale: f64,
    /// Resolution multiplier for the hover tier.
    pub large_scale: f64,
    /// Try the DOM snapshot skin before falling back to the composer.
    pub use_dom_snapshot_skin: bool,
    /// Bound on resident large textures (hovered cards may exceed it).
    pub hi_res_cache_max: usize,
    /// Free a card's large texture as soon as the pointer leaves it.
    pub destroy_hi_res_on_pointer_out: bool,
    /// Scale multiplier applied while hovered.
    pub hover_scale: f64,
    /// Tilt at the card edge, in degrees.
    pub max_tilt_degrees: f64,
    /// Exponential damping rate for tilt, per second.
    pub tilt_damping_rate: f64,
    /// Exponential damping rate for scale, per second.
    pub scale_damping_rate: f64,
    /// Camera distance used by the perspective projection, in logical units.
    pub perspective_distance: f64,
    /// Card corner radius as a fraction of card width.
    pub corner_radius: f64,
    /// Glare overlay alpha at full hover with the pointer at an edge.
    pub glare_max_alpha: f64,
    /// Texture jobs executed per tick.
    pub jobs_per_frame: usize,
    /// Upper clamp for timestamp-derived frame deltas, in seconds.
    pub max_frame_dt: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            card_width: 200.0,
            card_height: 280.0,
            small_scale: 1.0,
            large_scale: 2.0,
            use_dom_snapshot_skin: true,
            hi_res_cache_max: 4,
            destroy_hi_res_on_pointer_out: false,
            hover_scale: 1.08,
            max_tilt_degrees: 12.0,
            tilt_damping_rate: 14.0,
            scale_damping_rate: 10.0,
            perspective_distance: 900.0,
            corner_radius: 0.06,
            glare_max_alpha: 0.35,
            jobs_per_frame: 4,
            max_frame_dt: 0.25,
        }
    }
}

impl EngineOptions {
    /// Parse options from a JSON object; missing keys take their defaults.
    pub fn from_json_str(s: &str) -> CardSkinResult<Self> {
        let opts: Self = serde_json::from_str(s)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Read and parse an options JSON file.
    pub fn from_path(path: &Path) -> CardSkinResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read options '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn card_size(&self) -> CardSkinResult<CardSize> {
        CardSize::new(self.card_width, self.card_height)
    }

    pub fn validate(&self) -> CardSkinResult<()> {
        self.card_size()?;
        for (name, v) in [
            ("smallScale", self.small_scale),
            ("largeScale", self.large_scale),
            ("perspectiveDistance", self.perspective_distance),
            ("maxFrameDt", self.max_frame_dt),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(CardSkinError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        for (name, v) in [
            ("tiltDampingRate", self.tilt_damping_rate),
            ("scaleDampingRate", self.scale_damping_rate),
            ("maxTiltDegrees", self.max_tilt_degrees),
            ("cornerRadius", self.corner_radius),
            ("glareMaxAlpha", self.glare_max_alpha),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(CardSkinError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if !self.hover_scale.is_finite() || self.hover_scale < 1.0 {
            return Err(CardSkinError::validation(
                "hoverScale must be finite and >= 1",
            ));
        }
        if self.corner_radius > 0.5 {
            return Err(CardSkinError::validation("cornerRadius must be <= 0.5"));
        }
        if self.glare_max_alpha > 1.0 {
            return Err(CardSkinError::validation("glareMaxAlpha must be <= 1"));
        }
        if self.jobs_per_frame == 0 {
            return Err(CardSkinError::validation("jobsPerFrame must be > 0"));
        }
        Ok(())
    }

    /// Apply `CARDSKIN_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup. Unparseable values are ignored.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(n) = lookup("CARDSKIN_HIRES_CACHE_MAX").and_then(|v| v.trim().parse().ok()) {
            self.hi_res_cache_max = n;
        }
        if let Some(n) = lookup("CARDSKIN_JOBS_PER_FRAME")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
        {
            self.jobs_per_frame = n;
        }
        if let Some(b) = lookup("CARDSKIN_DOM_SNAPSHOT").and_then(|v| parse_flag(&v)) {
            self.use_dom_snapshot_skin = b;
        }
        self
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/options.rs"]
mod tests;
