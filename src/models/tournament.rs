//! Tournament, TournamentState and TournamentError.

use crate::logic::{PairingViolation, PairingWarning};
use crate::models::competitor::{Competitor, CompetitorId};
use crate::models::game::Match;
use crate::models::round::Round;
use crate::models::settings::TournamentSettings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default number of rounds for a new tournament.
pub const DEFAULT_TOTAL_ROUNDS: u32 = 6;
/// Default number of physical boards played at once.
pub const DEFAULT_BOARDS_PER_BATCH: u32 = 6;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, PartialEq)]
pub enum TournamentError {
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// Competitor not found in the tournament.
    CompetitorNotFound(CompetitorId),
    /// A competitor with this name already exists (names are unique, case-insensitive).
    DuplicateCompetitorName,
    /// Competitor name is empty after trimming.
    EmptyName,
    /// Need at least 2 competitors to pair.
    NotEnoughCompetitors,
    /// All configured rounds have been generated.
    RoundsExhausted { total: u32 },
    /// The current round still has matches without a result.
    IncompleteResults { pending: usize },
    RoundNotFound(u32),
    MatchNotFound { round: u32, index: usize },
    /// Bye matches carry a fixed result.
    ByeNotEditable,
    /// `Pending` and `Bye` cannot be entered as results.
    InvalidResult,
    /// Round is already complete; no matches can be added.
    RoundAlreadyComplete(u32),
    /// Boards per batch must be at least 1.
    InvalidBoardCount,
    /// Total rounds must be at least 1.
    InvalidRoundCount,
    /// Generated or stored round breaks a structural invariant.
    IntegrityViolation(Vec<PairingWarning>),
    /// Manual pairing rejected.
    InvalidPairing(Vec<PairingViolation>),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::CompetitorNotFound(id) => write!(f, "Competitor {} not found", id),
            TournamentError::DuplicateCompetitorName => {
                write!(f, "A competitor with this name already exists")
            }
            TournamentError::EmptyName => write!(f, "Competitor name must not be empty"),
            TournamentError::NotEnoughCompetitors => {
                write!(f, "Need at least 2 competitors to generate pairings")
            }
            TournamentError::RoundsExhausted { total } => {
                write!(f, "All {} rounds have already been generated", total)
            }
            TournamentError::IncompleteResults { pending } => {
                let plural = if *pending == 1 { "" } else { "es" };
                write!(f, "{} match{} missing a result", pending, plural)
            }
            TournamentError::RoundNotFound(n) => write!(f, "Round {} not found", n),
            TournamentError::MatchNotFound { round, index } => {
                write!(f, "Match {} not found in round {}", index, round)
            }
            TournamentError::ByeNotEditable => write!(f, "A bye has a fixed result"),
            TournamentError::InvalidResult => write!(f, "Result must be a win, loss or draw"),
            TournamentError::RoundAlreadyComplete(n) => write!(f, "Round {} is already complete", n),
            TournamentError::InvalidBoardCount => write!(f, "Boards per batch must be at least 1"),
            TournamentError::InvalidRoundCount => write!(f, "Total rounds must be at least 1"),
            TournamentError::IntegrityViolation(warnings) => {
                write!(f, "Round integrity violated: ")?;
                write_joined(f, warnings)
            }
            TournamentError::InvalidPairing(violations) => {
                write!(f, "Invalid pairing: ")?;
                write_joined(f, violations)
            }
        }
    }
}

impl std::error::Error for TournamentError {}

fn write_joined<T: std::fmt::Display>(
    f: &mut std::fmt::Formatter<'_>,
    items: &[T],
) -> std::fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Lifecycle phase, derived from the committed rounds.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    /// Adding competitors and changing settings; no rounds yet.
    #[default]
    Setup,
    /// At least one round committed, final round not yet finished.
    InProgress,
    /// Final round committed and fully scored.
    Completed,
}

/// Full tournament state: competitors, committed rounds and settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub competitors: Vec<Competitor>,
    pub rounds: Vec<Round>,
    pub settings: TournamentSettings,
    pub total_rounds: u32,
    pub boards_per_batch: u32,
    /// Number of committed rounds (0 = none generated yet).
    pub current_round: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new tournament in Setup with no competitors and default settings.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            competitors: Vec::new(),
            rounds: Vec::new(),
            settings: TournamentSettings::default(),
            total_rounds: DEFAULT_TOTAL_ROUNDS,
            boards_per_batch: DEFAULT_BOARDS_PER_BATCH,
            current_round: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a tournament with a custom round and board count. Still in Setup.
    pub fn with_format(
        name: impl Into<String>,
        total_rounds: u32,
        boards_per_batch: u32,
    ) -> Result<Self, TournamentError> {
        let mut t = Self::new(name);
        t.set_format(total_rounds, boards_per_batch)?;
        Ok(t)
    }

    /// Create a tournament with initial competitors (e.g. from an import). Still in Setup.
    pub fn with_competitors(name: impl Into<String>, competitors: Vec<Competitor>) -> Self {
        Self {
            competitors,
            ..Self::new(name)
        }
    }

    pub fn state(&self) -> TournamentState {
        if self.rounds.is_empty() {
            TournamentState::Setup
        } else if self.is_complete() {
            TournamentState::Completed
        } else {
            TournamentState::InProgress
        }
    }

    /// Final round committed and complete.
    pub fn is_complete(&self) -> bool {
        self.current_round >= self.total_rounds
            && self.rounds.last().map_or(false, |r| r.is_complete)
    }

    pub fn competitor(&self, id: CompetitorId) -> Option<&Competitor> {
        self.competitors.iter().find(|c| c.id == id)
    }

    pub fn competitor_mut(&mut self, id: CompetitorId) -> Option<&mut Competitor> {
        self.competitors.iter_mut().find(|c| c.id == id)
    }

    /// Round by 1-based number.
    pub fn round(&self, number: u32) -> Option<&Round> {
        self.rounds.iter().find(|r| r.number == number)
    }

    pub fn round_mut(&mut self, number: u32) -> Option<&mut Round> {
        self.rounds.iter_mut().find(|r| r.number == number)
    }

    /// Most recently committed round.
    pub fn latest_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    /// Every match of every committed round, in round order.
    pub fn all_matches(&self) -> Vec<Match> {
        self.rounds.iter().flat_map(|r| r.matches.iter().cloned()).collect()
    }

    /// Add a competitor (Setup only). Names must be unique (case-insensitive).
    pub fn add_competitor(
        &mut self,
        name: impl Into<String>,
        rating: u32,
    ) -> Result<CompetitorId, TournamentError> {
        if self.state() != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        let folded = name_trimmed.to_lowercase();
        let is_duplicate = self
            .competitors
            .iter()
            .any(|c| c.name.to_lowercase() == folded);
        if is_duplicate {
            return Err(TournamentError::DuplicateCompetitorName);
        }
        let competitor = Competitor::with_rating(name_trimmed, rating);
        let id = competitor.id;
        self.competitors.push(competitor);
        self.touch();
        Ok(id)
    }

    /// Append already-built competitor records (Setup only). Field provenance is the importer's job.
    pub fn import_competitors(&mut self, competitors: Vec<Competitor>) -> Result<(), TournamentError> {
        if self.state() != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        log::info!("Importing {} competitor(s) into {}", competitors.len(), self.name);
        self.competitors.extend(competitors);
        self.touch();
        Ok(())
    }

    /// Remove a competitor by id (Setup only).
    pub fn remove_competitor(&mut self, id: CompetitorId) -> Result<(), TournamentError> {
        if self.state() != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        let idx = self
            .competitors
            .iter()
            .position(|c| c.id == id)
            .ok_or(TournamentError::CompetitorNotFound(id))?;
        self.competitors.remove(idx);
        self.touch();
        Ok(())
    }

    /// Replace pairing settings (Setup only).
    pub fn set_settings(&mut self, settings: TournamentSettings) -> Result<(), TournamentError> {
        if self.state() != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        self.settings = settings;
        self.touch();
        Ok(())
    }

    /// Set total rounds and boards per batch (Setup only).
    pub fn set_format(&mut self, total_rounds: u32, boards_per_batch: u32) -> Result<(), TournamentError> {
        if self.state() != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        if total_rounds == 0 {
            return Err(TournamentError::InvalidRoundCount);
        }
        if boards_per_batch == 0 {
            return Err(TournamentError::InvalidBoardCount);
        }
        self.total_rounds = total_rounds;
        self.boards_per_batch = boards_per_batch;
        self.touch();
        Ok(())
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
