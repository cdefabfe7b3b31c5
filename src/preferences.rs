//! Content-exclusion preferences and the storage they live in.
//!
//! Values are JSON booleans stored as strings under fixed keys. Reads are
//! fail-open: a missing key, a malformed value or a storage error all decode
//! to the key's default, so a broken store never blocks content.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;

use crate::catalog::CatalogEntry;
use crate::error::StorageError;

/// Description prefix marking character drops.
pub const CHARACTER_TAG: &str = "#(Character)";
/// Description prefix marking tech drops.
pub const TECH_TAG: &str = "#(Tech)";

/// Asynchronous string key-value storage.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError>;
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local store, used by tests and the demo.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

/// The persisted boolean preferences.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    ExcludeCharacterDrops,
    ExcludeTechDrops,
    DarkTheme,
}

impl PreferenceKey {
    pub fn as_str(self) -> &'static str {
        match self {
            PreferenceKey::ExcludeCharacterDrops => "excludeCharacterDrops",
            PreferenceKey::ExcludeTechDrops => "excludeTechDrops",
            PreferenceKey::DarkTheme => "isDarkTheme",
        }
    }

    /// Value used when the key is unset or unreadable.
    pub fn default_value(self) -> bool {
        matches!(self, PreferenceKey::DarkTheme)
    }
}

/// Which tagged content a roll must skip.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentFilters {
    pub exclude_character_drops: bool,
    pub exclude_tech_drops: bool,
}

impl ContentFilters {
    pub fn is_active(&self) -> bool {
        self.exclude_character_drops || self.exclude_tech_drops
    }

    /// Whether an entry survives the filters. Tags are matched on the raw
    /// description, before any normalization.
    pub fn admits(&self, entry: &CatalogEntry) -> bool {
        let description = entry.record.description.as_str();
        if self.exclude_character_drops && description.starts_with(CHARACTER_TAG) {
            return false;
        }
        if self.exclude_tech_drops && description.starts_with(TECH_TAG) {
            return false;
        }
        true
    }

    pub fn apply<'a>(&self, pool: Vec<&'a CatalogEntry>) -> Vec<&'a CatalogEntry> {
        if !self.is_active() {
            return pool;
        }
        pool.into_iter().filter(|e| self.admits(e)).collect()
    }
}

/// Filters plus theme, for status display. Not consumed by selection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FilterStatus {
    pub filters: ContentFilters,
    pub is_dark_theme: bool,
}

impl FilterStatus {
    /// Indicator text, e.g. `Filtering: Character, Tech drops`; `None` when
    /// nothing is filtered.
    pub fn summary(&self) -> Option<String> {
        let mut active = Vec::new();
        if self.filters.exclude_character_drops {
            active.push("Character");
        }
        if self.filters.exclude_tech_drops {
            active.push("Tech");
        }
        if active.is_empty() {
            None
        } else {
            Some(format!("Filtering: {} drops", active.join(", ")))
        }
    }
}

/// Reads content filters from an injected store.
#[derive(Clone)]
pub struct PreferenceGate {
    store: Arc<dyn PreferenceStore>,
}

impl PreferenceGate {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    pub async fn active_filters(&self) -> ContentFilters {
        ContentFilters {
            exclude_character_drops: self.flag(PreferenceKey::ExcludeCharacterDrops).await,
            exclude_tech_drops: self.flag(PreferenceKey::ExcludeTechDrops).await,
        }
    }

    pub async fn filter_status(&self) -> FilterStatus {
        FilterStatus {
            filters: self.active_filters().await,
            is_dark_theme: self.flag(PreferenceKey::DarkTheme).await,
        }
    }

    /// Read one flag, falling back to its default on any failure.
    pub async fn flag(&self, key: PreferenceKey) -> bool {
        match self.store.get_item(key.as_str()).await {
            Ok(Some(raw)) => match serde_json::from_str::<bool>(&raw) {
                Ok(value) => value,
                Err(err) => {
                    tracing::warn!(key = key.as_str(), %err, "malformed preference value, using default");
                    key.default_value()
                }
            },
            Ok(None) => key.default_value(),
            Err(err) => {
                tracing::warn!(key = key.as_str(), %err, "failed to read preference, using default");
                key.default_value()
            }
        }
    }

    /// Persist a toggle as a JSON boolean.
    pub async fn set_flag(&self, key: PreferenceKey, value: bool) -> Result<(), StorageError> {
        self.store.set_item(key.as_str(), value.to_string()).await
    }
}

impl std::fmt::Debug for PreferenceGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceGate").finish_non_exhaustive()
    }
}
