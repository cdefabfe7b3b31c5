//! The state owner a UI surface talks to.
//!
//! A session holds the current selection, the roll history and a busy flag.
//! Only one roll runs at a time per session: a second request while the
//! first is still awaiting preferences is refused rather than queued, so
//! history appends never race.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::Rng;

use crate::engine::GachaEngine;
use crate::error::SessionError;
use crate::fallback::RollOutcome;
use crate::history::{RollHistory, RollLogEntry};
use crate::model::{Category, Item, LevelField, Levels, Ticket, TicketPreset};

#[derive(Debug)]
struct SessionState {
    current_item: Option<Item>,
    levels: Levels,
    category: Category,
    ticket: Option<Ticket>,
    history: RollHistory,
}

#[derive(Debug)]
pub struct GachaSession {
    engine: GachaEngine,
    state: Mutex<SessionState>,
    rolling: AtomicBool,
}

/// Clears the busy flag when the roll finishes, however it finishes.
struct RollGuard<'a>(&'a AtomicBool);

impl<'a> RollGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RollGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl GachaSession {
    pub fn new(engine: GachaEngine) -> Self {
        let history = RollHistory::new(engine.config().history_cap);
        Self {
            engine,
            state: Mutex::new(SessionState {
                current_item: None,
                levels: Levels::default(),
                category: Category::default(),
                ticket: None,
                history,
            }),
            rolling: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn engine(&self) -> &GachaEngine {
        &self.engine
    }

    pub fn is_rolling(&self) -> bool {
        self.rolling.load(Ordering::Acquire)
    }

    /// Roll with the current category and levels, make the result current
    /// and record it.
    ///
    /// # Errors
    /// [`SessionError::RollInProgress`] if another roll has not finished yet.
    pub async fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<RollOutcome, SessionError> {
        let _guard = RollGuard::acquire(&self.rolling).ok_or(SessionError::RollInProgress)?;
        let (category, levels) = {
            let state = self.lock();
            (state.category, state.levels)
        };

        let outcome = self.engine.roll(category, levels, rng).await;

        let mut state = self.lock();
        state.current_item = Some(outcome.item.clone());
        state
            .history
            .record(outcome.item.clone(), outcome.actual_rarity);
        Ok(outcome)
    }

    pub fn current_item(&self) -> Option<Item> {
        self.lock().current_item.clone()
    }

    pub fn levels(&self) -> Levels {
        self.lock().levels
    }

    /// Replace the band; values are clamped and the ticket is deselected.
    pub fn set_levels(&self, levels: Levels) {
        let mut state = self.lock();
        state.levels = Levels::new(levels.min, levels.ave, levels.max);
        state.ticket = None;
    }

    /// Edit one level from user-typed text.
    pub fn set_level(&self, field: LevelField, text: &str) {
        let mut state = self.lock();
        state.levels = state.levels.with_field(field, text);
        state.ticket = None;
    }

    pub fn category(&self) -> Category {
        self.lock().category
    }

    pub fn set_category(&self, category: Category) {
        self.lock().category = category;
    }

    pub fn ticket(&self) -> Option<Ticket> {
        self.lock().ticket
    }

    /// Load a ticket's preset band.
    pub fn apply_ticket(&self, ticket: Ticket) {
        let mut state = self.lock();
        state.levels = ticket.levels();
        state.ticket = Some(ticket);
    }

    /// Snapshot of the history, newest first.
    pub fn history(&self) -> Vec<RollLogEntry> {
        self.lock().history.entries().cloned().collect()
    }

    pub fn total_rolls(&self) -> usize {
        self.lock().history.len()
    }

    pub fn average_rarity(&self) -> f64 {
        self.lock().history.average_rarity()
    }

    /// Make a past roll the current item again. Returns it, or `None` if the
    /// id is no longer in the history.
    pub fn select_from_history(&self, id: &str) -> Option<Item> {
        let mut state = self.lock();
        let item = state.history.find(id)?.item.clone();
        state.current_item = Some(item.clone());
        Some(item)
    }

    pub fn clear_history(&self) {
        self.lock().history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::catalog::Catalog;
    use crate::config::RollConfig;
    use crate::fallback::RollSource;
    use crate::preferences::MemoryStore;
    use crate::preferences::tests::SlowStore;
    use rand::{SeedableRng, rngs::StdRng};

    fn session() -> GachaSession {
        let engine = GachaEngine::new(
            Arc::new(Catalog::bundled().unwrap()),
            Arc::new(MemoryStore::new()),
        );
        GachaSession::new(engine)
    }

    #[test]
    fn defaults() {
        let session = session();
        assert_eq!(session.levels(), Levels { min: 0.1, ave: 5.0, max: 10.0 });
        assert_eq!(session.category(), Category::Random);
        assert_eq!(session.ticket(), None);
        assert_eq!(session.current_item(), None);
        assert_eq!(session.total_rolls(), 0);
        assert!(!session.is_rolling());
    }

    #[test]
    fn tickets_and_level_edits() {
        let session = session();
        session.apply_ticket(Ticket::Platinum);
        assert_eq!(session.ticket(), Some(Ticket::Platinum));
        assert_eq!(session.levels(), Levels { min: 2.5, ave: 4.3, max: 6.3 });

        session.set_level(LevelField::Max, "12");
        assert_eq!(session.ticket(), None);
        assert_eq!(session.levels().max, 10.0);

        session.set_levels(Levels { min: -1.0, ave: 3.0, max: 4.0 });
        assert_eq!(session.levels().min, 0.1);
    }

    #[tokio::test]
    async fn rolls_update_current_item_and_history() {
        let session = session();
        session.set_category(Category::Traits);
        session.apply_ticket(Ticket::Golden);
        let mut rng = StdRng::seed_from_u64(42);

        let outcome = session.roll(&mut rng).await.unwrap();
        assert_eq!(outcome.source, RollSource::Catalog);
        assert_eq!(outcome.item.category, Category::Traits);
        assert_eq!(session.current_item(), Some(outcome.item.clone()));

        let history = session.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].item, outcome.item);
        assert_eq!(history[0].rarity, outcome.actual_rarity);
        assert!(!session.is_rolling());
    }

    #[tokio::test]
    async fn history_keeps_last_hundred() {
        let session = session();
        let mut rng = StdRng::seed_from_u64(1);
        let mut last = None;
        for _ in 0..101 {
            last = Some(session.roll(&mut rng).await.unwrap());
        }
        let history = session.history();
        assert_eq!(history.len(), 100);
        assert_eq!(history[0].item, last.unwrap().item);
    }

    #[tokio::test]
    async fn select_from_history_and_clear() {
        let session = session();
        let mut rng = StdRng::seed_from_u64(2);
        let first = session.roll(&mut rng).await.unwrap();
        session.roll(&mut rng).await.unwrap();

        let first_id = session.history()[1].id.clone();
        assert_eq!(session.select_from_history(&first_id), Some(first.item.clone()));
        assert_eq!(session.current_item(), Some(first.item));
        assert!(session.average_rarity() > 0.0);

        session.clear_history();
        assert_eq!(session.total_rolls(), 0);
        assert_eq!(session.select_from_history(&first_id), None);
    }

    #[tokio::test]
    async fn overlapping_roll_is_refused() {
        let engine = GachaEngine::new(
            Arc::new(Catalog::bundled().unwrap()),
            Arc::new(SlowStore::default()),
        );
        let session = GachaSession::new(engine);
        let mut first_rng = StdRng::seed_from_u64(1);
        let mut second_rng = StdRng::seed_from_u64(2);

        let (first, second) = tokio::join!(session.roll(&mut first_rng), session.roll(&mut second_rng));
        let (landed, refused) = match (first, second) {
            (Ok(outcome), Err(err)) | (Err(err), Ok(outcome)) => (outcome, err),
            other => panic!("expected exactly one roll to land: {other:?}"),
        };
        assert_eq!(refused, SessionError::RollInProgress);

        let history = session.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].item, landed.item);
        assert_eq!(history[0].rarity, landed.actual_rarity);

        // the flag is released once the first roll lands
        let third = session.roll(&mut second_rng).await.unwrap();
        assert_eq!(session.history()[0].item, third.item);
    }

    #[tokio::test]
    async fn history_cap_follows_config() {
        let config = RollConfig {
            history_cap: 3,
            ..RollConfig::default()
        };
        let engine = GachaEngine::with_config(
            Arc::new(Catalog::bundled().unwrap()),
            Arc::new(MemoryStore::new()),
            config,
        )
        .unwrap();
        let session = GachaSession::new(engine);
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..5 {
            session.roll(&mut rng).await.unwrap();
        }
        assert_eq!(session.total_rolls(), 3);
    }
}
