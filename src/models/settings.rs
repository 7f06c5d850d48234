//! Tournament settings: bye value, color policy, floating, round-1 method.

use serde::{Deserialize, Serialize};

/// Points awarded for a bye.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByeValue {
    Half,
    #[default]
    Full,
}

impl ByeValue {
    pub fn points(self) -> f64 {
        match self {
            ByeValue::Half => 0.5,
            ByeValue::Full => 1.0,
        }
    }
}

/// Round-1 ordering used when nobody is rated.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Round1Method {
    #[default]
    Random,
    Alphabetical,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentSettings {
    pub bye_value: ByeValue,
    pub color_balance_strict: bool,
    pub floating_enabled: bool,
    pub round1_pairing_method: Round1Method,
}

impl Default for TournamentSettings {
    fn default() -> Self {
        Self {
            bye_value: ByeValue::Full,
            color_balance_strict: false,
            floating_enabled: true,
            round1_pairing_method: Round1Method::Random,
        }
    }
}

impl TournamentSettings {
    /// Largest tolerated |whites - blacks| for any competitor.
    pub fn max_color_imbalance(&self) -> i32 {
        if self.color_balance_strict {
            1
        } else {
            2
        }
    }
}
