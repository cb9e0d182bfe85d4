use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::error::CardSkinResult;

static NEXT_GENERATED_ID: AtomicU64 = AtomicU64::new(1);

/// Card category; drives the frame tint and whether stat badges are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardCategory {
    #[default]
    Creature,
    Spell,
    Trap,
}

impl CardCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Creature => "Creature",
            Self::Spell => "Spell",
            Self::Trap => "Trap",
        }
    }
}

/// Loosely typed card description as produced by game state or JSON.
///
/// Numeric fields accept numbers or numeric strings; anything else coerces to 0.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardModelSpec {
    pub id: Option<String>,
    pub name: String,
    #[serde(alias = "art", alias = "artwork")]
    pub art_url: Option<String>,
    pub category: CardCategory,
    #[serde(alias = "abilities")]
    pub tags: Vec<String>,
    #[serde(alias = "mana")]
    pub cost: serde_json::Value,
    pub attack: serde_json::Value,
    pub health: serde_json::Value,
}

/// Immutable visual description of one card face.
///
/// A changed game state produces a new model; existing models are never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "CardModelSpec", rename_all = "camelCase")]
pub struct CardVisualModel {
    id: String,
    name: String,
    art_url: Option<String>,
    category: CardCategory,
    tags: Vec<String>,
    cost: u32,
    attack: u32,
    health: u32,
}

impl From<CardModelSpec> for CardVisualModel {
    fn from(spec: CardModelSpec) -> Self {
        let id = spec
            .id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(generated_id);
        let art_url = spec
            .art_url
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let tags = spec
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        Self {
            id,
            name: spec.name.trim().to_string(),
            art_url,
            category: spec.category,
            tags,
            cost: coerce_stat(&spec.cost),
            attack: coerce_stat(&spec.attack),
            health: coerce_stat(&spec.health),
        }
    }
}

impl CardVisualModel {
    /// Start a model with the given display name; everything else defaults.
    pub fn builder(name: impl Into<String>) -> CardModelBuilder {
        CardModelBuilder {
            spec: CardModelSpec {
                name: name.into(),
                ..CardModelSpec::default()
            },
        }
    }

    pub fn from_json_str(s: &str) -> CardSkinResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Parse a JSON array of card models.
    pub fn list_from_json_str(s: &str) -> CardSkinResult<Vec<Self>> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn art_url(&self) -> Option<&str> {
        self.art_url.as_deref()
    }

    pub fn category(&self) -> CardCategory {
        self.category
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn attack(&self) -> u32 {
        self.attack
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Whether the face carries cost/attack/health badges.
    pub fn shows_stat_badges(&self) -> bool {
        self.category == CardCategory::Creature
    }

    /// "Creature - Flying" style type line.
    pub fn type_line(&self) -> String {
        match self.tags.first() {
            Some(tag) => format!("{} - {}", self.category.label(), title_case(tag)),
            None => self.category.label().to_string(),
        }
    }

    /// Ability names shown in the text zone (at most four).
    pub fn ability_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.tags.iter().take(4).map(|t| title_case(t))
    }
}

/// Builder over [`CardModelSpec`] that finishes with the same coercion as deserialization.
#[derive(Clone, Debug)]
pub struct CardModelBuilder {
    spec: CardModelSpec,
}

impl CardModelBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.spec.id = Some(id.into());
        self
    }

    pub fn art_url(mut self, url: impl Into<String>) -> Self {
        self.spec.art_url = Some(url.into());
        self
    }

    pub fn category(mut self, category: CardCategory) -> Self {
        self.spec.category = category;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.spec.tags.push(tag.into());
        self
    }

    pub fn stats(mut self, cost: i64, attack: i64, health: i64) -> Self {
        self.spec.cost = cost.into();
        self.spec.attack = attack.into();
        self.spec.health = health.into();
        self
    }

    pub fn build(self) -> CardVisualModel {
        self.spec.into()
    }
}

fn generated_id() -> String {
    let n = NEXT_GENERATED_ID.fetch_add(1, Ordering::Relaxed);
    format!("card-{n}")
}

fn coerce_stat(v: &serde_json::Value) -> u32 {
    let f = match v {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if !f.is_finite() || f <= 0.0 {
        return 0;
    }
    f.trunc().min(f64::from(u32::MAX)) as u32
}

fn title_case(s: &str) -> String {
    s.split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "../../tests/unit/model/card.rs"]
mod tests;
