//! Round: one committed set of matches plus completion tracking.

use crate::models::game::Match;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based, contiguous across the tournament.
    pub number: u32,
    pub matches: Vec<Match>,
    /// Flips to true once every match has a result; never reset.
    pub is_complete: bool,
    /// Batches whose matches all have results; shrinks again if a pending match is added.
    pub completed_batches: BTreeSet<u32>,
    pub generated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Scored vs total matches in a round.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundProgress {
    pub completed: usize,
    pub total: usize,
    pub percentage: u32,
}

impl Round {
    pub fn new(number: u32, matches: Vec<Match>) -> Self {
        let mut round = Self {
            number,
            matches,
            is_complete: false,
            completed_batches: BTreeSet::new(),
            generated_at: Utc::now(),
            completed_at: None,
        };
        round.refresh_completion();
        round
    }

    pub fn pending_count(&self) -> usize {
        self.matches.iter().filter(|m| m.result.is_pending()).count()
    }

    pub fn all_results_in(&self) -> bool {
        self.pending_count() == 0
    }

    /// Rebuild the set of fully scored batches and flip `is_complete` once all results are in.
    pub fn refresh_completion(&mut self) {
        let mut batches: BTreeMap<u32, bool> = BTreeMap::new();
        for m in self.matches.iter().filter(|m| !m.is_bye()) {
            let done = batches.entry(m.batch).or_insert(true);
            *done &= !m.result.is_pending();
        }
        self.completed_batches = batches
            .into_iter()
            .filter_map(|(batch, done)| done.then_some(batch))
            .collect();
        if !self.is_complete && self.all_results_in() {
            self.is_complete = true;
            self.completed_at = Some(Utc::now());
        }
    }

    pub fn progress(&self) -> RoundProgress {
        let total = self.matches.len();
        let completed = total - self.pending_count();
        let percentage = if total > 0 {
            ((completed as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };
        RoundProgress {
            completed,
            total,
            percentage,
        }
    }
}
