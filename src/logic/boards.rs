//! Board and batch assignment for a round's matches.

use crate::models::Match;

/// Fill batch 1 boards 1..=n in list order, then batch 2, and so on. Byes keep board/batch 0.
pub fn assign_boards(matches: &mut [Match], boards_per_batch: u32) {
    let per_batch = boards_per_batch.max(1);
    for (index, m) in matches.iter_mut().filter(|m| !m.is_bye()).enumerate() {
        let index = index as u32;
        m.batch = index / per_batch + 1;
        m.board = index % per_batch + 1;
    }
}

/// Next free `(batch, board)` after the matches already placed (used for manual pairings).
pub fn next_slot(matches: &[Match], boards_per_batch: u32) -> (u32, u32) {
    let per_batch = boards_per_batch.max(1);
    let Some(last_batch) = matches.iter().filter(|m| !m.is_bye() && m.batch > 0).map(|m| m.batch).max() else {
        return (1, 1);
    };
    let last_board = matches
        .iter()
        .filter(|m| !m.is_bye() && m.batch == last_batch)
        .map(|m| m.board)
        .max()
        .unwrap_or(0);
    if last_board >= per_batch {
        (last_batch + 1, 1)
    } else {
        (last_batch, last_board + 1)
    }
}

/// Number of batches needed for `matches` games.
pub fn batches_required(matches: usize, boards_per_batch: u32) -> u32 {
    let per_batch = boards_per_batch.max(1) as usize;
    matches.div_ceil(per_batch) as u32
}
