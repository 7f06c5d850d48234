//! Rounds 2+: score groups, adjacent pairing with transposition, floats, bye and colors.

use crate::logic::colors::allocate_colors;
use crate::logic::pairing::{PairingResult, PairingWarning};
use crate::logic::tiebreaks::compare_standing;
use crate::logic::validation::duplicate_warnings;
use crate::models::{Competitor, Match, TournamentSettings};
use std::collections::BTreeMap;

/// Score group key: score in hundredths, so equal 2-decimal scores land together.
fn score_key(score: f64) -> i64 {
    (score * 100.0).round() as i64
}

/// Pair a pool of arena indices in order, adjacent first.
///
/// When the next competitor is a rematch, the nearest later one not yet played is moved up
/// (transposition). A competitor with no legal opponent left is skipped and returned as a
/// leftover. `pool` is a working copy; the arena is never touched.
pub(crate) fn pair_pool(
    arena: &[&Competitor],
    pool: &[usize],
    pairs: &mut Vec<(usize, usize)>,
) -> Vec<usize> {
    let mut working = pool.to_vec();
    let mut leftovers = Vec::new();
    let mut i = 0;
    while i < working.len() {
        let first = working[i];
        let partner = (i + 1..working.len()).find(|&j| !arena[first].has_played(arena[working[j]].id));
        match partner {
            Some(j) => {
                if j != i + 1 {
                    log::debug!(
                        "Transposing {} ahead for {}",
                        arena[working[j]].name,
                        arena[first].name
                    );
                    working.swap(i + 1, j);
                }
                pairs.push((first, working[i + 1]));
                i += 2;
            }
            None => {
                leftovers.push(first);
                i += 1;
            }
        }
    }
    leftovers
}

/// Give the bye to someone in an existing pair so that `stuck` (who already had one) can play.
///
/// Pairs are tried from the lowest score group up, the lower-ranked side first. Returns the new
/// bye recipient, or None when every swap would be a rematch or a second bye.
fn reassign_bye(arena: &[&Competitor], pairs: &mut [(usize, usize)], stuck: usize) -> Option<usize> {
    for pair in pairs.iter_mut().rev() {
        let (a, b) = *pair;
        for (out, stay) in [(b, a), (a, b)] {
            if arena[out].had_bye || arena[stuck].has_played(arena[stay].id) {
                continue;
            }
            *pair = if compare_standing(arena[stay], arena[stuck]).is_le() {
                (stay, stuck)
            } else {
                (stuck, stay)
            };
            log::debug!("Bye moved from {} to {}", arena[stuck].name, arena[out].name);
            return Some(out);
        }
    }
    None
}

/// Upper bound on search steps for [`search_pairing`].
const SEARCH_BUDGET: usize = 100_000;

/// Pair the whole field without rematches, backtracking where the greedy pass got stuck.
///
/// `order` is the field in standing order. With an odd count one competitor without a previous
/// bye sits out, tried from the bottom up. Returns None when no such pairing exists or the step
/// budget runs out.
fn search_pairing(arena: &[&Competitor], order: &[usize]) -> Option<(Vec<(usize, usize)>, Option<usize>)> {
    let mut budget = SEARCH_BUDGET;
    if order.len() % 2 == 0 {
        return search_pool(arena, order, &mut budget).map(|pairs| (pairs, None));
    }
    for (k, &candidate) in order.iter().enumerate().rev() {
        if arena[candidate].had_bye {
            continue;
        }
        let rest: Vec<usize> = order[..k].iter().chain(&order[k + 1..]).copied().collect();
        if let Some(pairs) = search_pool(arena, &rest, &mut budget) {
            return Some((pairs, Some(candidate)));
        }
        if budget == 0 {
            break;
        }
    }
    None
}

fn search_pool(arena: &[&Competitor], pool: &[usize], budget: &mut usize) -> Option<Vec<(usize, usize)>> {
    if *budget == 0 {
        return None;
    }
    *budget -= 1;
    let Some((&first, rest)) = pool.split_first() else {
        return Some(Vec::new());
    };
    for (j, &partner) in rest.iter().enumerate() {
        if arena[first].has_played(arena[partner].id) {
            continue;
        }
        let others: Vec<usize> = rest[..j].iter().chain(&rest[j + 1..]).copied().collect();
        if let Some(mut pairs) = search_pool(arena, &others, budget) {
            pairs.insert(0, (first, partner));
            return Some(pairs);
        }
    }
    None
}

/// Pair round `round_number` (> 1) from current scores and histories.
///
/// 1. Group by exact score, highest first; order each group by the standing comparator.
/// 2. With floating enabled, a group's leftovers drop into the next lower group ahead of its
///    members, and that combined pool is paired with [`pair_pool`].
/// 3. With floating disabled, every group is paired on its own and leftovers stay unpaired.
/// 4. If that leaves anyone unseated and floating is enabled, search the whole field in standing
///    order for a pairing that seats everyone (see [`search_pairing`]).
/// 5. Otherwise a single remaining competitor gets the bye; if they already had one, the bye is
///    moved to an eligible competitor from an existing pair when that creates no rematch. With
///    several left over and floating enabled, the last eligible one gets the bye.
/// 6. Allocate colors, then check that nobody appears twice.
pub fn pair_round(competitors: &[Competitor], round_number: u32, settings: &TournamentSettings) -> PairingResult {
    let arena: Vec<&Competitor> = competitors.iter().collect();

    let mut groups: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (idx, c) in arena.iter().enumerate() {
        groups.entry(score_key(c.score)).or_default().push(idx);
    }

    let mut pairs: Vec<(usize, usize)> = Vec::new();
    let mut remaining: Vec<usize> = Vec::new();
    let mut order: Vec<usize> = Vec::with_capacity(arena.len());
    for (key, mut group) in groups.into_iter().rev() {
        // Stable sort keeps list position for full ties.
        group.sort_by(|&a, &b| compare_standing(arena[a], arena[b]));
        order.extend_from_slice(&group);
        let pool: Vec<usize> = if settings.floating_enabled {
            remaining.drain(..).chain(group).collect()
        } else {
            group
        };
        let leftovers = pair_pool(&arena, &pool, &mut pairs);
        if !leftovers.is_empty() {
            log::debug!(
                "Round {}: {} leftover(s) in score group {:.2}",
                round_number,
                leftovers.len(),
                key as f64 / 100.0
            );
        }
        remaining.extend(leftovers);
    }

    let mut warnings = Vec::new();
    let mut bye = None;
    let seated = match remaining.as_slice() {
        [] => true,
        [single] => !arena[*single].had_bye,
        _ => false,
    };
    if !seated && settings.floating_enabled {
        if let Some((full, sits_out)) = search_pairing(&arena, &order) {
            log::debug!(
                "Round {}: {} left after adjacent pairing, search seated everyone",
                round_number,
                remaining.len()
            );
            pairs = full;
            remaining = sits_out.into_iter().collect();
        }
    }
    match remaining.as_slice() {
        [] => {}
        [single] => {
            let c = arena[*single];
            if !c.had_bye {
                bye = Some(c.id);
            } else if let Some(out) = reassign_bye(&arena, &mut pairs, *single) {
                bye = Some(arena[out].id);
            } else {
                log::warn!("Round {}: {} already had a bye", round_number, c.name);
                warnings.push(PairingWarning::ByeAlreadyReceived { competitor: c.id });
            }
        }
        many if !settings.floating_enabled => {
            for &idx in many {
                let c = arena[idx];
                log::warn!("Round {}: {} left unpaired", round_number, c.name);
                warnings.push(PairingWarning::FloatingDisabled { competitor: c.id });
            }
        }
        many => {
            let bye_idx = many.iter().rev().copied().find(|&idx| !arena[idx].had_bye);
            bye = bye_idx.map(|idx| arena[idx].id);
            for &idx in many.iter().filter(|&&idx| Some(idx) != bye_idx) {
                let c = arena[idx];
                log::warn!("Round {}: {} left unpaired", round_number, c.name);
                warnings.push(PairingWarning::RematchUnavoidable { competitor: c.id });
            }
        }
    }

    let max_imbalance = settings.max_color_imbalance();
    let matches: Vec<Match> = pairs
        .iter()
        .map(|&(a, b)| {
            let (white, black) = allocate_colors(arena[a], arena[b], max_imbalance, &mut warnings);
            Match::new(white.id, black.id)
        })
        .collect();

    let mut all = matches.clone();
    all.extend(bye.map(Match::bye));
    warnings.extend(duplicate_warnings(&all));

    PairingResult {
        matches,
        bye,
        warnings,
    }
}
