//! Pairing and ranking engine: tie-breaks, round-1 and round-N pairing, boards, validation, round lifecycle.

mod boards;
mod colors;
mod pairing;
mod round_n;
mod round_one;
mod schedule;
mod tiebreaks;
mod validation;

pub use boards::{assign_boards, batches_required, next_slot};
pub use colors::allocate_colors;
pub use pairing::{generate_pairings, PairingResult, PairingWarning, Severity};
pub use round_n::pair_round;
pub use round_one::{pair_round_one, seed_for, seeding_order};
pub use schedule::{
    add_manual_pairing, generate_next_round, recalculate_tiebreaks, record_result, standings,
    tournament_stats, ColorChoice, TournamentStats,
};
pub use tiebreaks::{compare_standing, rank_competitors, recalculate_all, round2, Standings};
pub use validation::{
    check_advance, check_structure, duplicate_warnings, find_competitor_in_round,
    unknown_competitor_warnings, validate_manual_pairing, validate_round_integrity,
    validate_round_structure, BoardInfo, PairingViolation, StructureIssue,
};
