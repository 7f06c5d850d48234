//! Score and tie-break computation (Buchholz, Sonneborn-Berger) and the ranking comparator.

use crate::models::{ByeValue, Competitor, CompetitorId, Match, MatchResult};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Recompute score, wins, Buchholz and Sonneborn-Berger for every competitor from scratch.
///
/// Scores are summed first so that both tie-breaks see every opponent's current score.
/// Input records are left untouched; the updated copies are returned in the same order.
pub fn recalculate_all(competitors: &[Competitor], matches: &[Match], bye_value: ByeValue) -> Vec<Competitor> {
    let mut updated: Vec<Competitor> = competitors
        .iter()
        .map(|c| {
            let mut score = 0.0;
            let mut wins = 0;
            for m in matches.iter().filter(|m| !m.is_bye() && !m.result.is_pending()) {
                if let Some(color) = m.color_of(c.id) {
                    let points = m.result.points_for(color);
                    if points == 1.0 {
                        wins += 1;
                    }
                    score += points;
                }
            }
            if c.had_bye {
                score += bye_value.points();
            }
            Competitor {
                score: round2(score),
                wins,
                ..c.clone()
            }
        })
        .collect();

    let scores: HashMap<CompetitorId, f64> = updated.iter().map(|c| (c.id, c.score)).collect();
    for c in &mut updated {
        c.buchholz = buchholz(c, &scores);
        c.sonneborn_berger = sonneborn_berger(c.id, matches, &scores);
    }
    updated
}

/// Sum of every faced opponent's score.
fn buchholz(competitor: &Competitor, scores: &HashMap<CompetitorId, f64>) -> f64 {
    let total: f64 = competitor
        .opponents
        .iter()
        .filter_map(|id| scores.get(id))
        .sum();
    round2(total)
}

/// Sum of defeated opponents' scores plus half of drawn opponents' scores.
fn sonneborn_berger(id: CompetitorId, matches: &[Match], scores: &HashMap<CompetitorId, f64>) -> f64 {
    let mut sb = 0.0;
    for m in matches {
        let (Some(color), Some(opponent)) = (m.color_of(id), m.opponent_of(id)) else {
            continue;
        };
        let Some(&opp_score) = scores.get(&opponent) else {
            continue;
        };
        match m.result {
            MatchResult::Draw => sb += opp_score * 0.5,
            r if r.points_for(color) == 1.0 => sb += opp_score,
            _ => {}
        }
    }
    round2(sb)
}

/// Standing order: score, Buchholz, Sonneborn-Berger, wins, rating (all descending).
///
/// Returns `Equal` for full ties; callers rely on a stable sort to keep list position.
pub fn compare_standing(a: &Competitor, b: &Competitor) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.buchholz.total_cmp(&a.buchholz))
        .then_with(|| b.sonneborn_berger.total_cmp(&a.sonneborn_berger))
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| b.rating.cmp(&a.rating))
}

/// Ranked competitors plus 1-based rank per competitor.
#[derive(Clone, Debug, Serialize)]
pub struct Standings {
    pub ranked: Vec<Competitor>,
    pub ranks: HashMap<CompetitorId, usize>,
}

impl Standings {
    pub fn rank_of(&self, id: CompetitorId) -> Option<usize> {
        self.ranks.get(&id).copied()
    }
}

/// Rank competitors; residual ties keep input list order.
pub fn rank_competitors(competitors: &[Competitor]) -> Standings {
    let mut ranked = competitors.to_vec();
    ranked.sort_by(compare_standing);
    let ranks = ranked
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id, i + 1))
        .collect();
    Standings { ranked, ranks }
}
