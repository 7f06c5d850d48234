//! Round integrity checks: double booking, manual pairings, round-advance eligibility.

use crate::logic::pairing::PairingWarning;
use crate::models::{Color, Competitor, CompetitorId, Match, Round, Tournament, TournamentError};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// One `DuplicateCompetitor` per identity that occupies more than one match (byes count).
pub fn duplicate_warnings(matches: &[Match]) -> Vec<PairingWarning> {
    let mut order: Vec<CompetitorId> = Vec::new();
    let mut appearances: HashMap<CompetitorId, usize> = HashMap::new();
    for id in matches.iter().flat_map(Match::participants) {
        let count = appearances.entry(id).or_insert(0);
        if *count == 0 {
            order.push(id);
        }
        *count += 1;
    }
    order
        .into_iter()
        .filter_map(|id| {
            let n = appearances[&id];
            (n > 1).then_some(PairingWarning::DuplicateCompetitor {
                competitor: id,
                appearances: n,
            })
        })
        .collect()
}

/// `UnknownCompetitor` for every match side missing from `competitors`.
pub fn unknown_competitor_warnings(matches: &[Match], competitors: &[Competitor]) -> Vec<PairingWarning> {
    let known: HashSet<CompetitorId> = competitors.iter().map(|c| c.id).collect();
    let mut reported = HashSet::new();
    matches
        .iter()
        .flat_map(Match::participants)
        .filter(|id| !known.contains(id) && reported.insert(*id))
        .map(|competitor| PairingWarning::UnknownCompetitor { competitor })
        .collect()
}

/// Hard failure if any competitor recurs in `matches`.
pub fn validate_round_integrity(matches: &[Match]) -> Result<(), TournamentError> {
    let duplicates = duplicate_warnings(matches);
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(TournamentError::IntegrityViolation(duplicates))
    }
}

/// Hard failure on double booking or on references to unknown competitors.
pub fn validate_round_structure(matches: &[Match], competitors: &[Competitor]) -> Result<(), TournamentError> {
    let mut problems = duplicate_warnings(matches);
    problems.extend(unknown_competitor_warnings(matches, competitors));
    if problems.is_empty() {
        Ok(())
    } else {
        Err(TournamentError::IntegrityViolation(problems))
    }
}

/// Why a manual pairing was refused.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PairingViolation {
    SameCompetitor,
    UnknownCompetitor { competitor: CompetitorId },
    AlreadyScheduled { competitor: CompetitorId },
    AlreadyPlayed,
}

impl std::fmt::Display for PairingViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PairingViolation::SameCompetitor => write!(f, "Cannot pair a competitor with themselves"),
            PairingViolation::UnknownCompetitor { competitor } => {
                write!(f, "Competitor {} not found", competitor)
            }
            PairingViolation::AlreadyScheduled { competitor } => {
                write!(f, "Competitor {} already has a match in this round", competitor)
            }
            PairingViolation::AlreadyPlayed => write!(f, "Competitors already played each other"),
        }
    }
}

/// Check a manual pairing of `a` and `b` into `round`. Empty means the pairing is allowed.
pub fn validate_manual_pairing(
    tournament: &Tournament,
    round: &Round,
    a: CompetitorId,
    b: CompetitorId,
) -> Vec<PairingViolation> {
    let mut violations = Vec::new();
    if a == b {
        violations.push(PairingViolation::SameCompetitor);
    }
    for id in dedup_pair(a, b) {
        if tournament.competitor(id).is_none() {
            violations.push(PairingViolation::UnknownCompetitor { competitor: id });
        }
    }
    for id in dedup_pair(a, b) {
        if round.matches.iter().any(|m| m.involves(id)) {
            violations.push(PairingViolation::AlreadyScheduled { competitor: id });
        }
    }
    let played = a != b
        && (tournament.competitor(a).map_or(false, |c| c.has_played(b))
            || tournament
                .rounds
                .iter()
                .flat_map(|r| r.matches.iter())
                .any(|m| !m.is_bye() && m.involves(a) && m.involves(b)));
    if played {
        violations.push(PairingViolation::AlreadyPlayed);
    }
    violations
}

fn dedup_pair(a: CompetitorId, b: CompetitorId) -> Vec<CompetitorId> {
    if a == b {
        vec![a]
    } else {
        vec![a, b]
    }
}

/// The next round may be generated: rounds remain, the latest round is fully scored and intact.
pub fn check_advance(tournament: &Tournament) -> Result<(), TournamentError> {
    if tournament.current_round >= tournament.total_rounds {
        return Err(TournamentError::RoundsExhausted {
            total: tournament.total_rounds,
        });
    }
    if let Some(round) = tournament.latest_round() {
        let pending = round.pending_count();
        if pending > 0 {
            return Err(TournamentError::IncompleteResults { pending });
        }
        validate_round_integrity(&round.matches)?;
    }
    Ok(())
}

/// Where a competitor plays in a round.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoardInfo {
    pub competitor: CompetitorId,
    pub batch: u32,
    pub board: u32,
    /// None for a bye.
    pub color: Option<Color>,
    pub opponent: Option<String>,
}

/// Find the first competitor whose name contains `query` (case-insensitive) and their board.
///
/// A competitor without a match in the round comes back with batch 0 and no color.
pub fn find_competitor_in_round(tournament: &Tournament, round: &Round, query: &str) -> Option<BoardInfo> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    let competitor = tournament
        .competitors
        .iter()
        .find(|c| c.name.to_lowercase().contains(&needle))?;
    let info = match round.matches.iter().find(|m| m.involves(competitor.id)) {
        Some(m) => BoardInfo {
            competitor: competitor.id,
            batch: m.batch,
            board: m.board,
            color: m.color_of(competitor.id),
            opponent: m
                .opponent_of(competitor.id)
                .map(|id| tournament.competitor(id).map_or_else(|| "Unknown".to_string(), |o| o.name.clone())),
        },
        None => BoardInfo {
            competitor: competitor.id,
            batch: 0,
            board: 0,
            color: None,
            opponent: None,
        },
    };
    Some(info)
}

/// Problems in the stored round sequence.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructureIssue {
    RoundNumbering { index: usize, found: u32 },
    CurrentRoundMismatch { current_round: u32, rounds: usize },
    TooManyRounds { rounds: usize, total_rounds: u32 },
}

/// Round numbers are 1..=n in order and `current_round` matches the committed rounds.
pub fn check_structure(tournament: &Tournament) -> Vec<StructureIssue> {
    let mut issues: Vec<StructureIssue> = tournament
        .rounds
        .iter()
        .enumerate()
        .filter(|(i, r)| r.number as usize != i + 1)
        .map(|(index, r)| StructureIssue::RoundNumbering {
            index,
            found: r.number,
        })
        .collect();
    if tournament.current_round as usize != tournament.rounds.len() {
        issues.push(StructureIssue::CurrentRoundMismatch {
            current_round: tournament.current_round,
            rounds: tournament.rounds.len(),
        });
    }
    if tournament.rounds.len() > tournament.total_rounds as usize {
        issues.push(StructureIssue::TooManyRounds {
            rounds: tournament.rounds.len(),
            total_rounds: tournament.total_rounds,
        });
    }
    issues
}
