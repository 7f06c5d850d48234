//! Round lifecycle: generate the next round, record results, manual pairings, standings.

use crate::logic::boards::{assign_boards, batches_required, next_slot};
use crate::logic::colors::allocate_colors;
use crate::logic::pairing::{generate_pairings, PairingResult};
use crate::logic::tiebreaks::{rank_competitors, recalculate_all, Standings};
use crate::logic::validation::{check_advance, validate_manual_pairing, validate_round_structure};
use crate::models::{Color, CompetitorId, Match, MatchResult, Round, Tournament, TournamentError};
use serde::{Deserialize, Serialize};

/// Generate, validate and commit the next round.
///
/// Refused while the latest round has pending results or once all rounds exist. Hard pairing
/// warnings abort without touching `tournament`; policy and info warnings come back in the result
/// with the committed matches (boards assigned, bye match appended last).
pub fn generate_next_round(tournament: &mut Tournament) -> Result<PairingResult, TournamentError> {
    if let Err(e) = check_advance(tournament) {
        log::warn!("Refusing to generate round {}: {}", tournament.current_round + 1, e);
        return Err(e);
    }
    let mut result = generate_pairings(tournament)?;
    if result.has_hard_warnings() {
        return Err(TournamentError::IntegrityViolation(result.hard_warnings()));
    }

    let number = tournament.current_round + 1;
    assign_boards(&mut result.matches, tournament.boards_per_batch);
    let mut matches = result.matches.clone();
    matches.extend(result.bye.map(Match::bye));
    validate_round_structure(&matches, &tournament.competitors)?;

    let mut competitors = tournament.competitors.clone();
    for m in &matches {
        if m.is_bye() {
            if let Some(c) = competitors.iter_mut().find(|c| c.id == m.white) {
                c.record_bye(number);
            }
            continue;
        }
        for (id, opponent, color) in [(m.white, m.black, Color::White), (m.black, m.white, Color::Black)] {
            if let Some(c) = competitors.iter_mut().find(|c| c.id == id) {
                c.record_pairing(opponent, color);
            }
        }
    }

    for w in &result.warnings {
        log::warn!("Round {}: {}", number, w);
    }
    log::info!(
        "Committing round {} of {}: {} match(es), bye: {}",
        number,
        tournament.name,
        result.matches.len(),
        result.bye.is_some()
    );

    tournament.competitors = competitors;
    tournament.rounds.push(Round::new(number, matches));
    tournament.current_round = number;
    recalculate_tiebreaks(tournament);
    Ok(result)
}

/// Enter or correct the result of match `index` in round `round`. Recomputes every tie-break.
pub fn record_result(
    tournament: &mut Tournament,
    round: u32,
    index: usize,
    result: MatchResult,
) -> Result<(), TournamentError> {
    if matches!(result, MatchResult::Pending | MatchResult::Bye) {
        return Err(TournamentError::InvalidResult);
    }
    let r = tournament
        .round_mut(round)
        .ok_or(TournamentError::RoundNotFound(round))?;
    let m = r
        .matches
        .get_mut(index)
        .ok_or(TournamentError::MatchNotFound { round, index })?;
    if m.is_bye() {
        return Err(TournamentError::ByeNotEditable);
    }
    m.result = result;
    r.refresh_completion();
    if r.is_complete {
        log::info!("Round {} complete", round);
    }
    recalculate_tiebreaks(tournament);
    Ok(())
}

/// Color choice for a manual pairing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorChoice {
    /// Same allocation as generated rounds.
    #[default]
    Auto,
    FirstWhite,
    FirstBlack,
}

/// Add an administrator pairing of `first` and `second` to an incomplete round.
pub fn add_manual_pairing(
    tournament: &mut Tournament,
    round: u32,
    first: CompetitorId,
    second: CompetitorId,
    choice: ColorChoice,
) -> Result<(), TournamentError> {
    let r = tournament.round(round).ok_or(TournamentError::RoundNotFound(round))?;
    if r.is_complete {
        return Err(TournamentError::RoundAlreadyComplete(round));
    }
    let violations = validate_manual_pairing(tournament, r, first, second);
    if !violations.is_empty() {
        return Err(TournamentError::InvalidPairing(violations));
    }

    let (white, black) = match choice {
        ColorChoice::FirstWhite => (first, second),
        ColorChoice::FirstBlack => (second, first),
        ColorChoice::Auto => {
            let a = tournament
                .competitor(first)
                .ok_or(TournamentError::CompetitorNotFound(first))?;
            let b = tournament
                .competitor(second)
                .ok_or(TournamentError::CompetitorNotFound(second))?;
            let mut ignored = Vec::new();
            let (w, bl) = allocate_colors(a, b, tournament.settings.max_color_imbalance(), &mut ignored);
            (w.id, bl.id)
        }
    };

    let (batch, board) = next_slot(&r.matches, tournament.boards_per_batch);
    let mut m = Match::new(white, black);
    m.batch = batch;
    m.board = board;

    if let Some(c) = tournament.competitor_mut(white) {
        c.record_pairing(black, Color::White);
    }
    if let Some(c) = tournament.competitor_mut(black) {
        c.record_pairing(white, Color::Black);
    }
    if let Some(r) = tournament.round_mut(round) {
        r.matches.push(m);
        r.refresh_completion();
    }
    log::info!("Manual pairing added to round {} (batch {}, board {})", round, batch, board);
    recalculate_tiebreaks(tournament);
    Ok(())
}

/// Recompute score and tie-breaks for every competitor from the full match history.
pub fn recalculate_tiebreaks(tournament: &mut Tournament) {
    let matches = tournament.all_matches();
    tournament.competitors = recalculate_all(&tournament.competitors, &matches, tournament.settings.bye_value);
    tournament.touch();
}

pub fn standings(tournament: &Tournament) -> Standings {
    rank_competitors(&tournament.competitors)
}

/// Round-size figures for a tournament.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct TournamentStats {
    pub competitors: usize,
    pub matches_per_round: usize,
    pub batches_per_round: u32,
}

pub fn tournament_stats(tournament: &Tournament) -> TournamentStats {
    let competitors = tournament.competitors.len();
    let matches_per_round = competitors / 2;
    TournamentStats {
        competitors,
        matches_per_round,
        batches_per_round: batches_required(matches_per_round, tournament.boards_per_batch),
    }
}
