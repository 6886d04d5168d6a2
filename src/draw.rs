// Draw engine: elimination-style lucky draw over a roster snapshot.
//
// State machine: Idle -> Spinning -> Settled (-> Spinning ...). The cosmetic
// spin timer lives in the orchestrator; the engine itself only tracks phases,
// the active pool, and the winner log. Every spin carries a generation number
// so that a cancelled or superseded cycle can never settle.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::roster::Participant;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Phase of the draw state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawPhase {
    /// No draw has settled yet in this session.
    Idle,
    /// A spin is in flight; settlement is pending.
    Spinning,
    /// The last spin settled on a winner.
    Settled,
}

/// One settled draw. Append-only; the log is newest-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerRecord {
    pub participant_id: String,
    pub name: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrawError {
    /// `begin_spin` on an empty active pool. No state change.
    #[error("every participant has already been drawn")]
    PoolExhausted,

    /// `begin_spin` while a spin is already in flight.
    #[error("a draw is already in progress")]
    SpinInProgress,

    /// Settlement arrived for a superseded spin (reset or restart happened
    /// in between). The event must be dropped without settling.
    #[error("stale spin generation {got} (current {current})")]
    StaleSpin { got: u64, current: u64 },

    /// Settlement computed on an empty pool. The in-flight draw is aborted.
    #[error("draw settled on an empty pool")]
    MissingSelection,
}

// ---------------------------------------------------------------------------
// DrawEngine
// ---------------------------------------------------------------------------

/// Lucky-draw session over a fixed roster snapshot.
#[derive(Debug, Clone)]
pub struct DrawEngine {
    /// The roster snapshot taken when this session started. `reset()`
    /// restores the pool from here.
    snapshot: Vec<Participant>,
    /// Participants still eligible to win. Always a subset of `snapshot`.
    pool: Vec<Participant>,
    /// Newest-first log of settlements.
    winners: Vec<WinnerRecord>,
    allow_repeat: bool,
    phase: DrawPhase,
    /// Bumped on every `begin_spin` and `reset`; settlement is only honored
    /// for the generation handed out by the most recent `begin_spin`.
    generation: u64,
}

impl DrawEngine {
    pub fn new(snapshot: Vec<Participant>, allow_repeat: bool) -> Self {
        DrawEngine {
            pool: snapshot.clone(),
            snapshot,
            winners: Vec::new(),
            allow_repeat,
            phase: DrawPhase::Idle,
            generation: 0,
        }
    }

    /// Start a spin. Valid only when the pool is non-empty and no spin is
    /// already in flight. Returns the generation token the orchestrator must
    /// pass back to `settle`.
    pub fn begin_spin(&mut self) -> Result<u64, DrawError> {
        if self.phase == DrawPhase::Spinning {
            return Err(DrawError::SpinInProgress);
        }
        if self.pool.is_empty() {
            return Err(DrawError::PoolExhausted);
        }
        self.generation += 1;
        self.phase = DrawPhase::Spinning;
        Ok(self.generation)
    }

    /// Candidate name to flash at the given spin tick. Cosmetic only; the
    /// actual winner comes from `settle`.
    pub fn candidate(&self, tick: usize) -> Option<&str> {
        if self.pool.is_empty() {
            return None;
        }
        Some(self.pool[tick % self.pool.len()].name.as_str())
    }

    /// Settle the spin for the given generation: draw a uniformly random
    /// index into the pool, prepend the winner to the log, and (in
    /// non-repeat mode) remove the winner from the pool by id.
    pub fn settle<R: Rng>(&mut self, generation: u64, rng: &mut R) -> Result<WinnerRecord, DrawError> {
        if generation != self.generation {
            debug!(
                "dropping settlement for stale spin generation {} (current {})",
                generation, self.generation
            );
            return Err(DrawError::StaleSpin {
                got: generation,
                current: self.generation,
            });
        }
        if self.pool.is_empty() {
            // Abort the in-flight draw; fall back to the pre-spin phase.
            self.phase = self.prior_phase();
            return Err(DrawError::MissingSelection);
        }

        let index = rng.random_range(0..self.pool.len());
        let winner = self.pool[index].clone();
        let record = WinnerRecord {
            participant_id: winner.id.clone(),
            name: winner.name.clone(),
            timestamp: Utc::now(),
        };
        self.winners.insert(0, record.clone());

        if !self.allow_repeat {
            self.pool.retain(|p| p.id != winner.id);
        }
        self.phase = DrawPhase::Settled;
        Ok(record)
    }

    /// Reinitialize the pool to the full snapshot and clear the winner log.
    /// Available in any phase; invalidates any in-flight spin.
    pub fn reset(&mut self) {
        self.pool = self.snapshot.clone();
        self.winners.clear();
        self.phase = DrawPhase::Idle;
        self.generation += 1;
    }

    /// Takes effect on the next settlement, never retroactively.
    pub fn set_allow_repeat(&mut self, allow: bool) {
        self.allow_repeat = allow;
    }

    pub fn allow_repeat(&self) -> bool {
        self.allow_repeat
    }

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    pub fn pool(&self) -> &[Participant] {
        &self.pool
    }

    pub fn winners(&self) -> &[WinnerRecord] {
        &self.winners
    }

    pub fn last_winner(&self) -> Option<&WinnerRecord> {
        self.winners.first()
    }

    /// The snapshot this session was started from. The orchestrator compares
    /// it against the live roster to decide whether the session is stale.
    pub fn snapshot(&self) -> &[Participant] {
        &self.snapshot
    }

    pub fn current_generation(&self) -> u64 {
        self.generation
    }

    /// Phase to fall back to when an in-flight draw is aborted.
    fn prior_phase(&self) -> DrawPhase {
        if self.winners.is_empty() {
            DrawPhase::Idle
        } else {
            DrawPhase::Settled
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn participants(n: usize) -> Vec<Participant> {
        (1..=n)
            .map(|i| Participant {
                id: format!("p{:06}", i),
                name: format!("Name {i}"),
            })
            .collect()
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    #[test]
    fn new_engine_starts_idle_with_full_pool() {
        let engine = DrawEngine::new(participants(3), false);
        assert_eq!(engine.phase(), DrawPhase::Idle);
        assert_eq!(engine.pool().len(), 3);
        assert!(engine.winners().is_empty());
    }

    #[test]
    fn begin_spin_transitions_to_spinning() {
        let mut engine = DrawEngine::new(participants(3), false);
        let generation = engine.begin_spin().unwrap();
        assert_eq!(engine.phase(), DrawPhase::Spinning);
        assert_eq!(generation, engine.current_generation());
    }

    #[test]
    fn begin_spin_while_spinning_is_rejected() {
        let mut engine = DrawEngine::new(participants(3), false);
        engine.begin_spin().unwrap();
        assert_eq!(engine.begin_spin(), Err(DrawError::SpinInProgress));
        assert_eq!(engine.phase(), DrawPhase::Spinning);
    }

    #[test]
    fn begin_spin_on_empty_pool_is_pool_exhausted() {
        let mut engine = DrawEngine::new(Vec::new(), false);
        assert_eq!(engine.begin_spin(), Err(DrawError::PoolExhausted));
        assert_eq!(engine.phase(), DrawPhase::Idle);
    }

    #[test]
    fn settle_removes_winner_without_repeat() {
        let mut engine = DrawEngine::new(participants(3), false);
        let mut rng = rng();
        let generation = engine.begin_spin().unwrap();
        let record = engine.settle(generation, &mut rng).unwrap();
        assert_eq!(engine.phase(), DrawPhase::Settled);
        assert_eq!(engine.pool().len(), 2);
        assert!(!engine.pool().iter().any(|p| p.id == record.participant_id));
        assert_eq!(engine.winners().len(), 1);
    }

    #[test]
    fn settle_keeps_pool_with_repeat() {
        let mut engine = DrawEngine::new(participants(3), true);
        let mut rng = rng();
        for _ in 0..10 {
            let generation = engine.begin_spin().unwrap();
            engine.settle(generation, &mut rng).unwrap();
            assert_eq!(engine.pool().len(), 3);
        }
        assert_eq!(engine.winners().len(), 10);
    }

    #[test]
    fn winner_log_is_newest_first() {
        let mut engine = DrawEngine::new(participants(3), false);
        let mut rng = rng();
        let mut order = Vec::new();
        for _ in 0..3 {
            let generation = engine.begin_spin().unwrap();
            let record = engine.settle(generation, &mut rng).unwrap();
            order.push(record.participant_id);
        }
        let log_ids: Vec<_> = engine.winners().iter().map(|w| w.participant_id.clone()).collect();
        order.reverse();
        assert_eq!(log_ids, order);
    }

    #[test]
    fn n_draws_exhaust_pool_of_n() {
        // 3 participants, 3 draws -> empty pool, log of 3,
        // distinct winners covering the snapshot, 4th spin fails.
        let snapshot = participants(3);
        let snapshot_ids: HashSet<_> = snapshot.iter().map(|p| p.id.clone()).collect();
        let mut engine = DrawEngine::new(snapshot, false);
        let mut rng = rng();
        for _ in 0..3 {
            let generation = engine.begin_spin().unwrap();
            engine.settle(generation, &mut rng).unwrap();
        }
        assert!(engine.pool().is_empty());
        assert_eq!(engine.winners().len(), 3);
        let winner_ids: HashSet<_> =
            engine.winners().iter().map(|w| w.participant_id.clone()).collect();
        assert_eq!(winner_ids, snapshot_ids);
        assert_eq!(engine.begin_spin(), Err(DrawError::PoolExhausted));
        assert_eq!(engine.phase(), DrawPhase::Settled);
    }

    #[test]
    fn reset_restores_pool_and_clears_log() {
        let mut engine = DrawEngine::new(participants(3), false);
        let mut rng = rng();
        let generation = engine.begin_spin().unwrap();
        engine.settle(generation, &mut rng).unwrap();
        engine.reset();
        assert_eq!(engine.phase(), DrawPhase::Idle);
        assert_eq!(engine.pool().len(), 3);
        assert!(engine.winners().is_empty());
    }

    #[test]
    fn reset_invalidates_in_flight_spin() {
        let mut engine = DrawEngine::new(participants(3), false);
        let mut rng = rng();
        let generation = engine.begin_spin().unwrap();
        engine.reset();
        let result = engine.settle(generation, &mut rng);
        assert!(matches!(result, Err(DrawError::StaleSpin { .. })));
        // The cancelled cycle must not have settled anything.
        assert!(engine.winners().is_empty());
        assert_eq!(engine.pool().len(), 3);
    }

    #[test]
    fn stale_settlement_after_new_spin_is_dropped() {
        let mut engine = DrawEngine::new(participants(3), true);
        let mut rng = rng();
        let first = engine.begin_spin().unwrap();
        engine.settle(first, &mut rng).unwrap();
        let second = engine.begin_spin().unwrap();
        // A late event for the first spin must not settle again.
        assert!(matches!(engine.settle(first, &mut rng), Err(DrawError::StaleSpin { .. })));
        assert_eq!(engine.winners().len(), 1);
        // The current spin still settles normally.
        engine.settle(second, &mut rng).unwrap();
        assert_eq!(engine.winners().len(), 2);
    }

    #[test]
    fn allow_repeat_takes_effect_on_next_settlement() {
        let mut engine = DrawEngine::new(participants(3), false);
        let mut rng = rng();
        let generation = engine.begin_spin().unwrap();
        engine.settle(generation, &mut rng).unwrap();
        assert_eq!(engine.pool().len(), 2);

        engine.set_allow_repeat(true);
        let generation = engine.begin_spin().unwrap();
        engine.settle(generation, &mut rng).unwrap();
        // Pool unchanged by the repeat-mode settlement; the earlier removal
        // is not undone.
        assert_eq!(engine.pool().len(), 2);
    }

    #[test]
    fn candidate_cycles_through_pool() {
        let engine = DrawEngine::new(participants(3), false);
        assert_eq!(engine.candidate(0), Some("Name 1"));
        assert_eq!(engine.candidate(1), Some("Name 2"));
        assert_eq!(engine.candidate(2), Some("Name 3"));
        assert_eq!(engine.candidate(3), Some("Name 1"));
    }

    #[test]
    fn candidate_on_empty_pool_is_none() {
        let engine = DrawEngine::new(Vec::new(), false);
        assert_eq!(engine.candidate(0), None);
    }

    #[test]
    fn settlement_is_roughly_uniform() {
        // Distributional property: over many repeat-mode draws from a pool
        // of 4, each participant should win close to a quarter of the time.
        // Deterministic because the rng is seeded.
        let mut engine = DrawEngine::new(participants(4), true);
        let mut rng = rng();
        let mut counts: std::collections::HashMap<String, usize> = Default::default();
        let draws = 10_000;
        for _ in 0..draws {
            let generation = engine.begin_spin().unwrap();
            let record = engine.settle(generation, &mut rng).unwrap();
            *counts.entry(record.participant_id).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), 4);
        let expected = draws / 4;
        for (id, count) in counts {
            let deviation = (count as i64 - expected as i64).abs();
            assert!(
                deviation < (expected as i64) / 5,
                "participant {} won {} times; expected near {}",
                id,
                count,
                expected
            );
        }
    }
}
