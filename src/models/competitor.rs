//! Competitor and Color data structures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a competitor (used in matches and lookups).
pub type CompetitorId = Uuid;

/// Piece color held in one game.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

/// A competitor in the tournament.
///
/// `opponents` and `colors` hold one entry per non-bye round played, in round order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
    /// 0 when unrated.
    pub rating: u32,
    pub score: f64,
    pub buchholz: f64,
    pub sonneborn_berger: f64,
    pub wins: u32,
    pub opponents: Vec<CompetitorId>,
    pub colors: Vec<Color>,
    pub had_bye: bool,
    pub bye_round: Option<u32>,
}

impl Competitor {
    /// Create a new unrated competitor with the given name. Other fields start at zero/empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_rating(name, 0)
    }

    pub fn with_rating(name: impl Into<String>, rating: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            rating,
            score: 0.0,
            buchholz: 0.0,
            sonneborn_berger: 0.0,
            wins: 0,
            opponents: Vec::new(),
            colors: Vec::new(),
            had_bye: false,
            bye_round: None,
        }
    }

    /// Whether this competitor already faced `other` in any round.
    pub fn has_played(&self, other: CompetitorId) -> bool {
        self.opponents.contains(&other)
    }

    /// Color held in the most recent non-bye round.
    pub fn last_color(&self) -> Option<Color> {
        self.colors.last().copied()
    }

    pub fn color_count(&self, color: Color) -> i32 {
        self.colors.iter().filter(|&&c| c == color).count() as i32
    }

    /// Running balance: white games minus black games (positive = more whites).
    pub fn color_balance(&self) -> i32 {
        self.color_count(Color::White) - self.color_count(Color::Black)
    }

    /// Imbalance after taking one more game with `color`.
    pub fn imbalance_with(&self, color: Color) -> i32 {
        let delta = match color {
            Color::White => 1,
            Color::Black => -1,
        };
        (self.color_balance() + delta).abs()
    }

    /// Record a played pairing (called when a round is committed).
    pub fn record_pairing(&mut self, opponent: CompetitorId, color: Color) {
        self.opponents.push(opponent);
        self.colors.push(color);
    }

    /// Record that this competitor received the bye in `round`.
    pub fn record_bye(&mut self, round: u32) {
        self.had_bye = true;
        self.bye_round = Some(round);
    }
}
