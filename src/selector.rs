//! Picking a concrete catalog item near a target rarity.

use rand::Rng;

use crate::IndexSampler;
use crate::catalog::{Catalog, CatalogEntry};
use crate::error::RollError;
use crate::ladder::round_tenth;
use crate::model::{Category, Item};
use crate::preferences::ContentFilters;
use crate::sampler::UniformSampler;
use crate::text::normalize_text;

// Rarities are one-decimal values; keep `|3.6 - 3.1|` inside a 0.5 window.
const WINDOW_EPSILON: f64 = 1e-9;

/// Selects items with tolerance widening: each window in turn, then the
/// whole pool.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSelector {
    tolerances: Vec<f64>,
}

impl ItemSelector {
    pub fn new(tolerances: Vec<f64>) -> Self {
        Self { tolerances }
    }

    /// Candidates for `target`: the first non-empty tolerance window, or the
    /// whole pool. Never returns anything outside `pool`.
    pub fn candidates<'a>(&self, pool: &[&'a CatalogEntry], target: f64) -> Vec<&'a CatalogEntry> {
        for &tolerance in &self.tolerances {
            let within: Vec<_> = pool
                .iter()
                .copied()
                .filter(|e| (e.record.rarity - target).abs() <= tolerance + WINDOW_EPSILON)
                .collect();
            if !within.is_empty() {
                return within;
            }
        }
        pool.to_vec()
    }

    /// Pick uniformly among the candidates for `target` and canonicalize.
    ///
    /// `pool` is expected to be the already-filtered source pool of
    /// `category`; an empty one is reported as [`RollError::NoCandidates`].
    pub fn select<R: Rng + ?Sized>(
        &self,
        category: Category,
        target: f64,
        pool: &[&CatalogEntry],
        rng: &mut R,
    ) -> Result<Item, RollError> {
        let candidates = self.candidates(pool, target);
        let pick = UniformSampler::new(candidates.len()).map_err(|_| RollError::NoCandidates)?;
        let entry = candidates[pick.sample_index(rng)];
        Ok(canonicalize(entry, category))
    }

    /// Resolve the pool for `category`, apply `filters` and select.
    pub fn select_from_catalog<R: Rng + ?Sized>(
        &self,
        catalog: &Catalog,
        category: Category,
        target: f64,
        filters: ContentFilters,
        rng: &mut R,
    ) -> Result<Item, RollError> {
        let pool = filters.apply(catalog.pool(category));
        self.select(category, target, &pool, rng)
    }
}

impl Default for ItemSelector {
    fn default() -> Self {
        Self::new(vec![0.5, 1.0])
    }
}

/// Copy an entry into a rolled [`Item`]: normalized description, one-decimal
/// rarity, and a concrete category. A pick from the `random` pool takes the
/// collection it was loaded from.
pub fn canonicalize(entry: &CatalogEntry, category: Category) -> Item {
    let record = &entry.record;
    let category = match category {
        Category::Random => entry.origin,
        specific => specific,
    };
    Item {
        title: record.title.clone(),
        description: normalize_text(&record.description),
        tier: record.tier.clone(),
        rarity: round_tenth(record.rarity),
        category,
        color: record.color.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::record;
    use rand::{SeedableRng, rngs::StdRng};

    fn entries(category: Category, rarities: &[f64]) -> Vec<CatalogEntry> {
        rarities
            .iter()
            .enumerate()
            .map(|(i, &r)| CatalogEntry {
                record: record(&format!("{category}-{i}"), r, "#(Tech) gizmo, v2."),
                origin: category,
            })
            .collect()
    }

    #[test]
    fn narrow_window_first() {
        let entries = entries(Category::Items, &[1.0, 3.4, 3.6, 4.4, 8.0]);
        let pool: Vec<_> = entries.iter().collect();
        let selector = ItemSelector::default();

        let hits: Vec<f64> = selector
            .candidates(&pool, 3.1)
            .iter()
            .map(|e| e.record.rarity)
            .collect();
        assert_eq!(hits, [3.4, 3.6]);
    }

    #[test]
    fn widens_then_falls_back_to_everything() {
        let entries = entries(Category::Items, &[1.0, 8.0]);
        let pool: Vec<_> = entries.iter().collect();
        let selector = ItemSelector::default();

        let widened: Vec<f64> = selector
            .candidates(&pool, 2.0)
            .iter()
            .map(|e| e.record.rarity)
            .collect();
        assert_eq!(widened, [1.0]);

        assert_eq!(selector.candidates(&pool, 5.0).len(), 2);
    }

    #[test]
    fn selection_stays_in_pool() {
        let entries = entries(Category::Skills, &[0.5, 2.0, 4.5, 6.0, 9.5]);
        let pool: Vec<_> = entries.iter().collect();
        let titles: Vec<&str> = entries.iter().map(|e| e.record.title.as_str()).collect();
        let selector = ItemSelector::default();
        let mut rng = StdRng::seed_from_u64(42);

        for step in 0..100 {
            let target = step as f64 / 10.0;
            let item = selector.select(Category::Skills, target, &pool, &mut rng).unwrap();
            assert!(titles.contains(&item.title.as_str()));
            assert_eq!(item.category, Category::Skills);
        }
    }

    #[test]
    fn empty_pool_is_no_candidates() {
        let selector = ItemSelector::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            selector.select(Category::Items, 3.0, &[], &mut rng),
            Err(RollError::NoCandidates)
        );
    }

    #[test]
    fn canonical_copy() {
        let mut entry = entries(Category::Familiars, &[3.25]).remove(0);
        entry.record.color = Some("#fff".into());

        let item = canonicalize(&entry, Category::Random);
        assert_eq!(item.category, Category::Familiars);
        assert_eq!(item.description, "Tech gizmo v2");
        assert_eq!(item.rarity_label(), "3.3");
        assert_eq!(item.color.as_deref(), Some("#fff"));
        // the catalog entry is untouched
        assert_eq!(entry.record.description, "#(Tech) gizmo, v2.");

        assert_eq!(canonicalize(&entry, Category::Items).category, Category::Items);
    }

    #[test]
    fn random_pool_resolves_origin() {
        let catalog = Catalog::builder()
            .records(Category::Traits, [record("Lucky", 5.0, "")])
            .unwrap()
            .build();
        let selector = ItemSelector::default();
        let mut rng = StdRng::seed_from_u64(3);
        let item = selector
            .select_from_catalog(&catalog, Category::Random, 5.0, ContentFilters::default(), &mut rng)
            .unwrap();
        assert_eq!(item.category, Category::Traits);
    }

    #[test]
    fn filters_are_applied_before_matching() {
        let catalog = Catalog::builder()
            .records(
                Category::Items,
                [
                    record("Gadget", 5.0, "#(Tech) beeps"),
                    record("Rock", 9.0, "a rock"),
                ],
            )
            .unwrap()
            .build();
        let filters = ContentFilters {
            exclude_character_drops: false,
            exclude_tech_drops: true,
        };
        let selector = ItemSelector::default();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..20 {
            let item = selector
                .select_from_catalog(&catalog, Category::Items, 5.0, filters, &mut rng)
                .unwrap();
            assert_eq!(item.title, "Rock");
        }
    }
}
