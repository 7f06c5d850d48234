//! Swiss-system tournament web app: library with models and the pairing/ranking engine.

pub mod logic;
pub mod models;

pub use logic::{
    add_manual_pairing, assign_boards, check_advance, check_structure, find_competitor_in_round,
    generate_next_round, generate_pairings, rank_competitors, recalculate_all, record_result,
    standings, tournament_stats, validate_manual_pairing, validate_round_integrity, BoardInfo,
    ColorChoice, PairingResult, PairingViolation, PairingWarning, Severity, Standings,
    StructureIssue, TournamentStats,
};
pub use models::{
    ByeValue, Color, Competitor, CompetitorId, Match, MatchResult, Round, Round1Method,
    RoundProgress, Tournament, TournamentError, TournamentId, TournamentSettings, TournamentState,
    DEFAULT_BOARDS_PER_BATCH, DEFAULT_TOTAL_ROUNDS,
};
