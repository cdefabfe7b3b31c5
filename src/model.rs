//! Value types shared across the roll pipeline.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::text::normalize_category;

/// Lowest rarity a level can be configured to.
pub const MIN_LEVEL: f64 = 0.1;
/// Highest rarity a level can be configured to.
pub const MAX_LEVEL: f64 = 10.0;

/// Catalog collection an item is drawn from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Abilities,
    Items,
    Traits,
    Skills,
    Familiars,
    #[default]
    Random,
}

impl Category {
    /// Every category in menu order.
    pub const ALL: [Category; 6] = [
        Category::Abilities,
        Category::Items,
        Category::Traits,
        Category::Skills,
        Category::Familiars,
        Category::Random,
    ];

    /// The concrete collections, in the priority order used to resolve the
    /// origin of a random-pool pick.
    pub const COLLECTIONS: [Category; 5] = [
        Category::Abilities,
        Category::Items,
        Category::Traits,
        Category::Skills,
        Category::Familiars,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Abilities => "abilities",
            Category::Items => "items",
            Category::Traits => "traits",
            Category::Skills => "skills",
            Category::Familiars => "familiars",
            Category::Random => "random",
        }
    }

    /// Singular label for history rows, e.g. `Ability`.
    pub fn display_name(self) -> String {
        normalize_category(self.as_str())
    }

    /// Index into [`Category::COLLECTIONS`]; `None` for `Random`.
    pub(crate) fn collection_index(self) -> Option<usize> {
        Category::COLLECTIONS.iter().position(|&c| c == self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rarity band: the sampler centers on `ave` and stays inside `[min, max)`.
///
/// No ordering between the three fields is enforced.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Levels {
    pub min: f64,
    pub ave: f64,
    pub max: f64,
}

impl Levels {
    /// Build a band with every field clamped to `[MIN_LEVEL, MAX_LEVEL]`.
    pub fn new(min: f64, ave: f64, max: f64) -> Self {
        Self {
            min: clamp_level(min),
            ave: clamp_level(ave),
            max: clamp_level(max),
        }
    }

    /// Replace one field from user-typed text. Unparsable input counts as
    /// zero and is then clamped like any other value.
    pub fn with_field(self, field: LevelField, text: &str) -> Self {
        let value = text.trim().parse::<f64>().ok().filter(|v| v.is_finite());
        let value = clamp_level(value.unwrap_or(0.0));
        match field {
            LevelField::Min => Self { min: value, ..self },
            LevelField::Ave => Self { ave: value, ..self },
            LevelField::Max => Self { max: value, ..self },
        }
    }
}

impl Default for Levels {
    fn default() -> Self {
        Self {
            min: MIN_LEVEL,
            ave: 5.0,
            max: MAX_LEVEL,
        }
    }
}

fn clamp_level(value: f64) -> f64 {
    value.clamp(MIN_LEVEL, MAX_LEVEL)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LevelField {
    Min,
    Ave,
    Max,
}

/// Trait implemented by the `TicketPreset` derive macro.
pub trait TicketPreset: Copy + 'static {
    /// All presets in declaration order.
    const ALL: &'static [Self];

    /// The rarity band this preset applies.
    fn levels(self) -> Levels;

    /// Display color as `#rrggbb`.
    fn color(self) -> &'static str;
}

/// Preset rarity bands, weakest first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, chaos_gacha_macros::TicketPreset)]
#[serde(rename_all = "lowercase")]
pub enum Ticket {
    #[levels(0.1, 1.3, 3.3)]
    #[color("#8D5524")]
    Bronze,
    #[levels(0.5, 2.3, 4.3)]
    #[color("#c2bfb8")]
    Silver,
    #[levels(1.5, 3.3, 5.3)]
    #[color("#FFD700")]
    Golden,
    #[levels(2.5, 4.3, 6.3)]
    #[color("#77cfbc")]
    Platinum,
    #[levels(3.5, 5.3, 7.3)]
    #[color("#73e4fe")]
    Diamond,
    #[levels(4.5, 6.3, 8.3)]
    #[color("#e36131")]
    Legendary,
    #[levels(5.5, 7.3, 9.3)]
    #[color("#9400D3")]
    Mythical,
    #[levels(6.5, 8.3, 10)]
    #[color("#ff0019")]
    Divine,
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Ticket::Bronze => "Bronze",
            Ticket::Silver => "Silver",
            Ticket::Golden => "Golden",
            Ticket::Platinum => "Platinum",
            Ticket::Diamond => "Diamond",
            Ticket::Legendary => "Legendary",
            Ticket::Mythical => "Mythical",
            Ticket::Divine => "Divine",
        };
        f.write_str(name)
    }
}

/// A raw catalog entry as it appears in the static data files.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CatalogRecord {
    pub title: String,
    #[serde(deserialize_with = "deserialize_rarity")]
    pub rarity: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tier: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub color: Option<String>,
}

/// A rolled item. Always a fresh copy; catalog records are never handed out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub description: String,
    pub tier: String,
    /// Rounded to one decimal; serialized as display text (`"3.0"`).
    #[serde(
        serialize_with = "serialize_rarity",
        deserialize_with = "deserialize_rarity"
    )]
    pub rarity: f64,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Item {
    pub fn rarity_label(&self) -> String {
        format!("{:.1}", self.rarity)
    }

    /// Plain-text rendering for clipboard export.
    pub fn share_text(&self) -> String {
        format!(
            "Title: {}\nRarity: {}\nDescription: {}",
            self.title,
            self.rarity_label(),
            self.description
        )
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRarity {
    Number(f64),
    Text(String),
}

/// Catalog files carry rarity either as a number or as a numeric string.
fn deserialize_rarity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawRarity::deserialize(deserializer)? {
        RawRarity::Number(n) => Ok(n),
        RawRarity::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("invalid rarity {s:?}"))),
    }
}

fn serialize_rarity<S>(rarity: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{rarity:.1}"))
}
