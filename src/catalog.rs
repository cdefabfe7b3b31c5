//! Static, read-only item collections.
//!
//! Loaded once and shared by every roll. Each entry remembers which
//! collection it came from, so a pick from the combined `random` pool can be
//! attributed without searching the collections again.

use serde_json::from_str;

use crate::error::CatalogError;
use crate::model::{CatalogRecord, Category};

/// A catalog record tagged with its origin collection at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub record: CatalogRecord,
    pub origin: Category,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    collections: [Vec<CatalogEntry>; 5],
}

impl Catalog {
    /// An empty catalog; every roll against it falls back.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The small catalog compiled into the crate.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::builder()
            .json(Category::Abilities, include_str!("../data/abilities.json"))?
            .json(Category::Items, include_str!("../data/items.json"))?
            .json(Category::Traits, include_str!("../data/traits.json"))?
            .json(Category::Skills, include_str!("../data/skills.json"))?
            .json(Category::Familiars, include_str!("../data/familiars.json"))
            .map(CatalogBuilder::build)
    }

    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// One collection; empty for `Random`, which has no storage of its own.
    pub fn collection(&self, category: Category) -> &[CatalogEntry] {
        match category.collection_index() {
            Some(i) => &self.collections[i],
            None => &[],
        }
    }

    /// The source pool a roll in `category` draws from. `Random` is the
    /// union of every collection in priority order.
    pub fn pool(&self, category: Category) -> Vec<&CatalogEntry> {
        match category {
            Category::Random => self.collections.iter().flatten().collect(),
            other => self.collection(other).iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.collections.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
pub struct CatalogBuilder {
    collections: [Vec<CatalogEntry>; 5],
}

impl CatalogBuilder {
    /// Append records to a collection.
    ///
    /// # Errors
    /// * [`CatalogError::NotACollection`] for `Random`.
    /// * [`CatalogError::NonFiniteRarity`] if a record's rarity is `NaN`/∞.
    pub fn records<I>(mut self, category: Category, records: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = CatalogRecord>,
    {
        let index = category
            .collection_index()
            .ok_or(CatalogError::NotACollection(category))?;
        for record in records {
            if !record.rarity.is_finite() {
                return Err(CatalogError::NonFiniteRarity {
                    category,
                    title: record.title,
                });
            }
            self.collections[index].push(CatalogEntry {
                record,
                origin: category,
            });
        }
        Ok(self)
    }

    /// Append a JSON array of records to a collection.
    pub fn json(self, category: Category, json: &str) -> Result<Self, CatalogError> {
        let records: Vec<CatalogRecord> =
            from_str(json).map_err(|source| CatalogError::Parse { category, source })?;
        self.records(category, records)
    }

    pub fn build(self) -> Catalog {
        let catalog = Catalog {
            collections: self.collections,
        };
        tracing::debug!(items = catalog.len(), "catalog loaded");
        catalog
    }
}
