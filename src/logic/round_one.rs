//! Round 1: order competitors (rating, name, or seeded shuffle) and fold top half against bottom half.

use crate::logic::pairing::PairingResult;
use crate::logic::validation::duplicate_warnings;
use crate::models::{Competitor, CompetitorId, Match, Round1Method};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Seed for the random method: checksum of the competitor identities (order-independent).
pub fn seed_for(competitors: &[Competitor]) -> u64 {
    competitors.iter().fold(0u64, |acc, c| {
        let raw = c.id.as_u128();
        acc.wrapping_add((raw as u64) ^ ((raw >> 64) as u64))
    })
}

/// Round-1 order. Rated fields sort by rating; otherwise by `method`.
pub fn seeding_order(competitors: &[Competitor], method: Round1Method) -> Vec<Competitor> {
    let mut ordered = competitors.to_vec();
    if competitors.iter().any(|c| c.rating > 0) {
        ordered.sort_by(|a, b| b.rating.cmp(&a.rating));
        return ordered;
    }
    match method {
        Round1Method::Alphabetical => {
            ordered.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.name.cmp(&b.name))
            });
        }
        Round1Method::Random => {
            // Sort by id first so the shuffle only depends on who is entered.
            ordered.sort_by_key(|c| c.id);
            let mut rng = StdRng::seed_from_u64(seed_for(competitors));
            ordered.shuffle(&mut rng);
        }
    }
    ordered
}

/// Pair round 1.
///
/// 1. Order competitors (see [`seeding_order`]).
/// 2. Odd count: the last one gets the bye.
/// 3. Top half meets the reversed bottom half; every other board swaps colors.
pub fn pair_round_one(competitors: &[Competitor], method: Round1Method) -> PairingResult {
    let mut ordered: Vec<CompetitorId> = seeding_order(competitors, method)
        .into_iter()
        .map(|c| c.id)
        .collect();

    let bye = if ordered.len() % 2 == 1 { ordered.pop() } else { None };

    let half = ordered.len() / 2;
    let (top, bottom) = ordered.split_at(half);
    let matches: Vec<Match> = top
        .iter()
        .zip(bottom.iter().rev())
        .enumerate()
        .map(|(i, (&upper, &lower))| {
            if i % 2 == 1 {
                Match::new(lower, upper)
            } else {
                Match::new(upper, lower)
            }
        })
        .collect();

    log::debug!("Round 1: {} match(es), bye: {:?}", matches.len(), bye);

    let mut all = matches.clone();
    all.extend(bye.map(Match::bye));
    let warnings = duplicate_warnings(&all);

    PairingResult {
        matches,
        bye,
        warnings,
    }
}
