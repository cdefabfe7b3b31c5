use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ladder::round_tenth;
use crate::model::Item;

/// Default number of rolls kept.
pub const DEFAULT_HISTORY_CAP: usize = 100;

/// One recorded roll. Immutable once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RollLogEntry {
    pub id: String,
    pub item: Item,
    pub timestamp: DateTime<Utc>,
    pub rarity: f64,
}

/// Newest-first roll log that silently drops its oldest entries past `cap`.
#[derive(Clone, Debug)]
pub struct RollHistory {
    entries: VecDeque<RollLogEntry>,
    cap: usize,
}

impl RollHistory {
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            entries: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Record a snapshot of `item` at the front, evicting past the cap.
    pub fn record(&mut self, item: Item, rarity: f64) -> &RollLogEntry {
        self.entries.push_front(RollLogEntry {
            id: Uuid::new_v4().to_string(),
            item,
            timestamp: Utc::now(),
            rarity,
        });
        self.entries.truncate(self.cap);
        &self.entries[0]
    }

    pub fn entries(&self) -> impl Iterator<Item = &RollLogEntry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&RollLogEntry> {
        self.entries.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&RollLogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Mean recorded rarity at one decimal; `0.0` for an empty log.
    pub fn average_rarity(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.entries.iter().map(|e| e.rarity).sum();
        round_tenth(sum / self.entries.len() as f64)
    }
}

impl Default for RollHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAP)
    }
}
