//! Pairing output types and the round-1 / round-N dispatcher.

use crate::logic::{round_n, round_one};
use crate::models::{CompetitorId, Match, Tournament, TournamentError};
use serde::Serialize;

/// How seriously the caller must take a warning.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Structural violation: the generation must be treated as failed.
    Hard,
    /// Policy exception: pairing proceeds, a competitor may need manual handling.
    Policy,
    /// Informational only.
    Info,
}

/// Structured pairing outcome reported alongside the matches.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PairingWarning {
    /// Competitor occupies more than one match of the round.
    DuplicateCompetitor { competitor: CompetitorId, appearances: usize },
    /// Match references an identity that is not in the tournament.
    UnknownCompetitor { competitor: CompetitorId },
    /// No opponent left that this competitor has not already played.
    RematchUnavoidable { competitor: CompetitorId },
    /// Left over in its score group while floating is disabled.
    FloatingDisabled { competitor: CompetitorId },
    /// Would be the bye recipient but already had a bye.
    ByeAlreadyReceived { competitor: CompetitorId },
    /// Color limit still exceeded after the swap.
    ColorImbalance { competitor: CompetitorId, imbalance: i32 },
}

impl PairingWarning {
    pub fn severity(&self) -> Severity {
        match self {
            PairingWarning::DuplicateCompetitor { .. } | PairingWarning::UnknownCompetitor { .. } => {
                Severity::Hard
            }
            PairingWarning::RematchUnavoidable { .. }
            | PairingWarning::FloatingDisabled { .. }
            | PairingWarning::ByeAlreadyReceived { .. } => Severity::Policy,
            PairingWarning::ColorImbalance { .. } => Severity::Info,
        }
    }

    pub fn is_hard(&self) -> bool {
        self.severity() == Severity::Hard
    }

    pub fn competitor(&self) -> CompetitorId {
        match *self {
            PairingWarning::DuplicateCompetitor { competitor, .. }
            | PairingWarning::UnknownCompetitor { competitor }
            | PairingWarning::RematchUnavoidable { competitor }
            | PairingWarning::FloatingDisabled { competitor }
            | PairingWarning::ByeAlreadyReceived { competitor }
            | PairingWarning::ColorImbalance { competitor, .. } => competitor,
        }
    }
}

impl std::fmt::Display for PairingWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PairingWarning::DuplicateCompetitor { competitor, appearances } => {
                write!(f, "Competitor {} appears {} times in round", competitor, appearances)
            }
            PairingWarning::UnknownCompetitor { competitor } => {
                write!(f, "Competitor {} is not part of the tournament", competitor)
            }
            PairingWarning::RematchUnavoidable { competitor } => {
                write!(f, "Competitor {} cannot be paired without a rematch", competitor)
            }
            PairingWarning::FloatingDisabled { competitor } => {
                write!(f, "Competitor {} left unpaired: floating is disabled", competitor)
            }
            PairingWarning::ByeAlreadyReceived { competitor } => {
                write!(f, "Cannot assign bye to {}: already had a bye", competitor)
            }
            PairingWarning::ColorImbalance { competitor, imbalance } => {
                write!(f, "Competitor {} ends with color imbalance {}", competitor, imbalance)
            }
        }
    }
}

/// Raw pairing for one round: matches have no board yet, the bye is not a match yet.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PairingResult {
    pub matches: Vec<Match>,
    pub bye: Option<CompetitorId>,
    pub warnings: Vec<PairingWarning>,
}

impl PairingResult {
    pub fn hard_warnings(&self) -> Vec<PairingWarning> {
        self.warnings.iter().filter(|w| w.is_hard()).cloned().collect()
    }

    pub fn has_hard_warnings(&self) -> bool {
        self.warnings.iter().any(PairingWarning::is_hard)
    }
}

/// Pair the next round of `tournament` without modifying it.
pub fn generate_pairings(tournament: &Tournament) -> Result<PairingResult, TournamentError> {
    let next = tournament.current_round + 1;
    if next > tournament.total_rounds {
        return Err(TournamentError::RoundsExhausted {
            total: tournament.total_rounds,
        });
    }
    if tournament.competitors.len() < 2 {
        return Err(TournamentError::NotEnoughCompetitors);
    }
    let result = if next == 1 {
        round_one::pair_round_one(&tournament.competitors, tournament.settings.round1_pairing_method)
    } else {
        round_n::pair_round(&tournament.competitors, next, &tournament.settings)
    };
    Ok(result)
}
