//! Data structures for the Swiss tournament: competitors, matches, rounds, tournament state.

mod competitor;
mod game;
mod round;
mod settings;
mod tournament;

pub use competitor::{Color, Competitor, CompetitorId};
pub use game::{Match, MatchResult};
pub use round::{Round, RoundProgress};
pub use settings::{ByeValue, Round1Method, TournamentSettings};
pub use tournament::{
    Tournament, TournamentError, TournamentId, TournamentState, DEFAULT_BOARDS_PER_BATCH,
    DEFAULT_TOTAL_ROUNDS,
};
