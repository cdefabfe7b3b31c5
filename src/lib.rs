//! # chaos_gacha
//!
//! The rarity roll engine behind a collectible "gacha" roller: pick a
//! category and a rarity band, roll, get an item.
//!
//! A roll runs in three stages:
//!
//! 1. **Preferences**: content-exclusion flags are read from an injected
//!    [`PreferenceStore`]. Reads fail open.
//! 2. **Rarity**: the band `{min, ave, max}` becomes a target rarity via a
//!    [`RarityLadder`]: rungs `0.1` apart, each weighted
//!    `exponent^(-|ave - v|)`, sampled by cumulative subtraction.
//! 3. **Selection**: catalog items within `±0.5` of the target, then `±1.0`,
//!    then the whole filtered pool; one is picked uniformly and copied into a
//!    canonical [`Item`].
//!
//! When the catalog has nothing to offer, or a stage fails, the engine falls
//! back to a synthetic item and, as a last resort, to a fixed emergency item.
//! [`GachaEngine::roll`] therefore never fails.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chaos_gacha::{Catalog, Category, GachaEngine, Levels, MemoryStore};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = GachaEngine::new(Arc::new(Catalog::bundled()?), Arc::new(MemoryStore::new()));
//! let mut rng = rand::rng();
//! let outcome = engine.roll(Category::Items, Levels::new(1.0, 5.0, 9.0), &mut rng).await;
//! println!("{} ({:.1})", outcome.item.title, outcome.actual_rarity);
//! # Ok(()) }
//! ```
//!
//! ## Tickets
//!
//! Preset bands are declared with the [`TicketPreset`] derive from the
//! companion `chaos_gacha_macros` crate:
//!
//! ```rust,ignore
//! use chaos_gacha::{Ticket, TicketPreset};
//!
//! let band = Ticket::Golden.levels(); // {1.5, 3.3, 5.3}
//! ```
//!
//! ## Sessions
//!
//! A [`GachaSession`] is the state owner for one UI surface: current item,
//! selected band and category, and a newest-first [`RollHistory`] capped at
//! 100 entries. It refuses a roll while another is still in flight.
//!
//! ---
//!
//! `rand` integration uses the modern `Rng::random()` / `random_range()` APIs

// Lets the derive macros name this crate as `chaos_gacha::...` from inside it.
extern crate self as chaos_gacha;

mod catalog;
mod config;
mod engine;
mod error;
mod fallback;
mod history;
mod ladder;
mod model;
mod preferences;
mod sampler;
mod selector;
mod session;
mod text;

/// A minimal interface for “index samplers”.
/// Implemented by `RarityLadder` (weighted) and `UniformSampler` (equal odds).
#[allow(clippy::len_without_is_empty)]
pub trait IndexSampler {
    fn len(&self) -> usize;
    fn sample_index<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> usize;
}

pub use catalog::{Catalog, CatalogBuilder, CatalogEntry};
pub use config::RollConfig;
pub use engine::GachaEngine;
pub use error::{CatalogError, ConfigError, RollError, SampleError, SessionError, StorageError};
pub use fallback::{RollOutcome, RollSource, emergency_item, generate_fallback};
pub use history::{DEFAULT_HISTORY_CAP, RollHistory, RollLogEntry};
pub use ladder::{DEFAULT_EXPONENT, RarityLadder, RaritySampler, STEP, round_tenth, sample_rarity};
pub use model::{
    CatalogRecord, Category, Item, LevelField, Levels, MAX_LEVEL, MIN_LEVEL, Ticket, TicketPreset,
};
pub use preferences::{
    CHARACTER_TAG, ContentFilters, FilterStatus, MemoryStore, PreferenceGate, PreferenceKey,
    PreferenceStore, TECH_TAG,
};
pub use sampler::UniformSampler;
pub use selector::{ItemSelector, canonicalize};
pub use session::GachaSession;
pub use text::{normalize_category, normalize_text};

/// Derive macro imported from `chaos_gacha_macros`.
/// See the crate-level example for usage.
pub use chaos_gacha_macros::TicketPreset;
