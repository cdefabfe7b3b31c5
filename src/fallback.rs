//! Placeholder items for rolls that cannot draw from the catalog.

use rand::Rng;

use crate::error::SampleError;
use crate::ladder::RaritySampler;
use crate::model::{Category, Item, Levels};

pub const FALLBACK_TITLE: &str = "Fallback Item";
pub const FALLBACK_DESCRIPTION: &str =
    "This is a fallback item generated due to lack of available data.";
pub const EMERGENCY_TITLE: &str = "Error Recovery Item";
pub const EMERGENCY_DESCRIPTION: &str = "Something went wrong while rolling; this item stands in.";
pub const EMERGENCY_RARITY: f64 = 1.0;
/// Tier label of synthesized items.
pub const NO_TIER: &str = "N/A";

/// Where a roll's item came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RollSource {
    Catalog,
    Fallback,
    Emergency,
}

/// What a roll hands back to its caller.
#[derive(Clone, Debug, PartialEq)]
pub struct RollOutcome {
    pub item: Item,
    /// The sampled target rarity, not necessarily the item's own.
    pub actual_rarity: f64,
    pub source: RollSource,
}

/// A synthetic item whose rarity is still drawn from `levels`.
pub fn generate_fallback<R: Rng + ?Sized>(
    sampler: &RaritySampler,
    levels: Levels,
    rng: &mut R,
) -> Result<RollOutcome, SampleError> {
    let rarity = sampler.sample(levels, rng)?;
    Ok(RollOutcome {
        item: Item {
            title: FALLBACK_TITLE.to_owned(),
            description: FALLBACK_DESCRIPTION.to_owned(),
            tier: NO_TIER.to_owned(),
            rarity,
            category: Category::Random,
            color: None,
        },
        actual_rarity: rarity,
        source: RollSource::Fallback,
    })
}

/// The terminal fallback. Cannot fail.
pub fn emergency_item(category: Category) -> RollOutcome {
    RollOutcome {
        item: Item {
            title: EMERGENCY_TITLE.to_owned(),
            description: EMERGENCY_DESCRIPTION.to_owned(),
            tier: NO_TIER.to_owned(),
            rarity: EMERGENCY_RARITY,
            category,
            color: None,
        },
        actual_rarity: EMERGENCY_RARITY,
        source: RollSource::Emergency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn fallback_rarity_comes_from_levels() {
        let sampler = RaritySampler::default();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let outcome = generate_fallback(&sampler, Levels::new(1.0, 5.0, 9.0), &mut rng).unwrap();
            assert_eq!(outcome.item.tier, NO_TIER);
            assert_eq!(outcome.item.category, Category::Random);
            assert_eq!(outcome.item.rarity, outcome.actual_rarity);
            assert!((1.0..=9.0).contains(&outcome.actual_rarity));
        }
    }

    #[test]
    fn fallback_propagates_sampling_errors() {
        let sampler = RaritySampler::default();
        let mut rng = StdRng::seed_from_u64(5);
        let levels = Levels {
            min: 1.0,
            ave: f64::NAN,
            max: 9.0,
        };
        assert!(generate_fallback(&sampler, levels, &mut rng).is_err());
    }

    #[test]
    fn emergency_keeps_requested_category() {
        let outcome = emergency_item(Category::Skills);
        assert_eq!(outcome.item.title, EMERGENCY_TITLE);
        assert_eq!(outcome.item.category, Category::Skills);
        assert_eq!(outcome.actual_rarity, 1.0);
        assert_eq!(outcome.source, RollSource::Emergency);
    }
}
