//! Match (game) and MatchResult for one-on-one games.

use crate::models::competitor::{Color, CompetitorId};
use serde::{Deserialize, Serialize};

/// Outcome of a single match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    WhiteWin,
    BlackWin,
    Draw,
    Bye,
    #[default]
    Pending,
}

impl MatchResult {
    pub fn is_pending(self) -> bool {
        self == MatchResult::Pending
    }

    /// Points earned by the competitor holding `color`. Byes and pending games score nothing here.
    pub fn points_for(self, color: Color) -> f64 {
        match (self, color) {
            (MatchResult::WhiteWin, Color::White) | (MatchResult::BlackWin, Color::Black) => 1.0,
            (MatchResult::Draw, _) => 0.5,
            _ => 0.0,
        }
    }
}

/// A single pairing on a board. A bye has `white == black` and board/batch 0.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// 1-based board within the batch (0 until assigned, and for byes).
    pub board: u32,
    /// 1-based batch (0 until assigned, and for byes).
    pub batch: u32,
    pub white: CompetitorId,
    pub black: CompetitorId,
    pub result: MatchResult,
}

impl Match {
    /// New pending match with no board yet.
    pub fn new(white: CompetitorId, black: CompetitorId) -> Self {
        Self {
            board: 0,
            batch: 0,
            white,
            black,
            result: MatchResult::Pending,
        }
    }

    pub fn bye(competitor: CompetitorId) -> Self {
        Self {
            board: 0,
            batch: 0,
            white: competitor,
            black: competitor,
            result: MatchResult::Bye,
        }
    }

    pub fn is_bye(&self) -> bool {
        self.result == MatchResult::Bye
    }

    pub fn involves(&self, id: CompetitorId) -> bool {
        self.white == id || self.black == id
    }

    /// Color held by `id` in this match, if they play in it.
    pub fn color_of(&self, id: CompetitorId) -> Option<Color> {
        if self.is_bye() {
            None
        } else if self.white == id {
            Some(Color::White)
        } else if self.black == id {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// The other side of the board from `id`.
    pub fn opponent_of(&self, id: CompetitorId) -> Option<CompetitorId> {
        match self.color_of(id)? {
            Color::White => Some(self.black),
            Color::Black => Some(self.white),
        }
    }

    /// Competitor identities occupied by this match (one for a bye).
    pub fn participants(&self) -> Vec<CompetitorId> {
        if self.is_bye() {
            vec![self.white]
        } else {
            vec![self.white, self.black]
        }
    }
}
