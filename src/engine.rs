//! The roll orchestrator: preferences, sampling and selection composed into a
//! single call that always produces an item.
//!
//! [`GachaEngine::try_roll`] is the happy path and reports why it could not
//! draw from the catalog as a [`RollError`]. [`GachaEngine::roll`] matches on
//! that reason, falls back to a synthetic item, and as a last resort returns
//! the emergency item.

use std::sync::Arc;

use rand::Rng;

use crate::catalog::Catalog;
use crate::config::RollConfig;
use crate::error::{ConfigError, RollError};
use crate::fallback::{RollOutcome, RollSource, emergency_item, generate_fallback};
use crate::ladder::RaritySampler;
use crate::model::{Category, Levels};
use crate::preferences::{PreferenceGate, PreferenceStore};
use crate::selector::ItemSelector;

#[derive(Debug, Clone)]
pub struct GachaEngine {
    catalog: Arc<Catalog>,
    preferences: PreferenceGate,
    sampler: RaritySampler,
    selector: ItemSelector,
    config: RollConfig,
}

impl GachaEngine {
    /// Engine with the default [`RollConfig`].
    pub fn new(catalog: Arc<Catalog>, store: Arc<dyn PreferenceStore>) -> Self {
        let config = RollConfig::default();
        Self {
            catalog,
            preferences: PreferenceGate::new(store),
            sampler: RaritySampler::default(),
            selector: ItemSelector::new(config.tolerances.clone()),
            config,
        }
    }

    pub fn with_config(
        catalog: Arc<Catalog>,
        store: Arc<dyn PreferenceStore>,
        config: RollConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let sampler =
            RaritySampler::new(config.exponent).map_err(|_| ConfigError::Exponent(config.exponent))?;
        Ok(Self {
            catalog,
            preferences: PreferenceGate::new(store),
            sampler,
            selector: ItemSelector::new(config.tolerances.clone()),
            config,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn preferences(&self) -> &PreferenceGate {
        &self.preferences
    }

    pub fn config(&self) -> &RollConfig {
        &self.config
    }

    /// Draw from the catalog or say why not.
    ///
    /// The returned `actual_rarity` is the sampled target; the item's own
    /// rarity may differ by up to the widest tolerance, or more when the
    /// whole pool was used.
    pub async fn try_roll<R: Rng + ?Sized>(
        &self,
        category: Category,
        levels: Levels,
        rng: &mut R,
    ) -> Result<RollOutcome, RollError> {
        let filters = self.preferences.active_filters().await;

        let source = self.catalog.pool(category);
        if source.is_empty() {
            return Err(RollError::DataUnavailable { category });
        }
        let pool = filters.apply(source);
        if pool.is_empty() {
            return Err(RollError::FilteredToEmpty { category });
        }

        let target = self.sampler.sample(levels, rng)?;
        let item = self.selector.select(category, target, &pool, rng)?;
        tracing::debug!(%category, target_rarity = target, title = %item.title, "rolled catalog item");

        Ok(RollOutcome {
            item,
            actual_rarity: target,
            source: RollSource::Catalog,
        })
    }

    /// Roll, recovering from every failure. Always returns an item.
    pub async fn roll<R: Rng + ?Sized>(
        &self,
        category: Category,
        levels: Levels,
        rng: &mut R,
    ) -> RollOutcome {
        match self.try_roll(category, levels, rng).await {
            Ok(outcome) => outcome,
            Err(err) => self.recover(category, levels, &err, rng),
        }
    }

    fn recover<R: Rng + ?Sized>(
        &self,
        category: Category,
        levels: Levels,
        err: &RollError,
        rng: &mut R,
    ) -> RollOutcome {
        match err {
            RollError::DataUnavailable { .. } => {
                tracing::debug!(%category, "no catalog data, using fallback");
            }
            RollError::FilteredToEmpty { .. } => {
                tracing::warn!(%category, "all items filtered out by user preferences, using fallback");
            }
            RollError::NoCandidates | RollError::Sample(_) => {
                tracing::error!(%category, %err, "roll failed, using fallback");
            }
        }

        match generate_fallback(&self.sampler, levels, rng) {
            Ok(outcome) => outcome,
            Err(fallback_err) => {
                tracing::error!(%category, %fallback_err, "fallback failed, using emergency item");
                emergency_item(category)
            }
        }
    }
}
