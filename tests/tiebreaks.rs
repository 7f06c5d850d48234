//! Integration tests for score/tie-break recomputation and ranking.

use swiss_pairing_web::{
    rank_competitors, recalculate_all, ByeValue, Color, Competitor, Match, MatchResult,
};

fn played(white: &mut Competitor, black: &mut Competitor, result: MatchResult) -> Match {
    white.record_pairing(black.id, Color::White);
    black.record_pairing(white.id, Color::Black);
    let mut m = Match::new(white.id, black.id);
    m.result = result;
    m
}

/// A beats B, C draws D.
fn one_round() -> (Vec<Competitor>, Vec<Match>) {
    let mut a = Competitor::new("A");
    let mut b = Competitor::new("B");
    let mut c = Competitor::new("C");
    let mut d = Competitor::new("D");
    let matches = vec![
        played(&mut a, &mut b, MatchResult::WhiteWin),
        played(&mut c, &mut d, MatchResult::Draw),
    ];
    (vec![a, b, c, d], matches)
}

#[test]
fn scores_wins_and_tiebreaks_from_history() {
    let (competitors, matches) = one_round();
    let updated = recalculate_all(&competitors, &matches, ByeValue::Full);

    let a = &updated[0];
    assert_eq!(a.score, 1.0);
    assert_eq!(a.wins, 1);
    assert_eq!(a.buchholz, 0.0);
    assert_eq!(a.sonneborn_berger, 0.0);

    let b = &updated[1];
    assert_eq!(b.score, 0.0);
    assert_eq!(b.buchholz, 1.0);

    let c = &updated[2];
    assert_eq!(c.score, 0.5);
    assert_eq!(c.wins, 0);
    assert_eq!(c.buchholz, 0.5);
    assert_eq!(c.sonneborn_berger, 0.25);
}

#[test]
fn tiebreaks_use_opponents_current_scores() {
    let mut a = Competitor::new("A");
    let mut b = Competitor::new("B");
    let mut c = Competitor::new("C");
    // Round 1: A beats B. Round 2: B beats C.
    let matches = vec![
        played(&mut a, &mut b, MatchResult::WhiteWin),
        played(&mut b, &mut c, MatchResult::WhiteWin),
    ];
    let updated = recalculate_all(&[a, b, c], &matches, ByeValue::Full);
    // B now has 1 point, which A's Buchholz and SB must reflect.
    assert_eq!(updated[0].buchholz, 1.0);
    assert_eq!(updated[0].sonneborn_berger, 1.0);
    assert_eq!(updated[1].buchholz, 1.0);
}

#[test]
fn pending_games_score_nothing() {
    let mut a = Competitor::new("A");
    let mut b = Competitor::new("B");
    let matches = vec![played(&mut a, &mut b, MatchResult::Pending)];
    let updated = recalculate_all(&[a, b], &matches, ByeValue::Full);
    assert_eq!(updated[0].score, 0.0);
    assert_eq!(updated[1].score, 0.0);
}

#[test]
fn bye_adds_configured_value() {
    let mut e = Competitor::new("E");
    e.record_bye(1);
    let full = recalculate_all(&[e.clone()], &[Match::bye(e.id)], ByeValue::Full);
    assert_eq!(full[0].score, 1.0);
    assert_eq!(full[0].wins, 0);
    let half = recalculate_all(&[e.clone()], &[Match::bye(e.id)], ByeValue::Half);
    assert_eq!(half[0].score, 0.5);
}

#[test]
fn recalculation_is_idempotent() {
    let (competitors, matches) = one_round();
    let once = recalculate_all(&competitors, &matches, ByeValue::Full);
    let twice = recalculate_all(&once, &matches, ByeValue::Full);
    assert_eq!(once, twice);
}

#[test]
fn ranking_orders_by_score_then_tiebreaks_then_position() {
    let (competitors, matches) = one_round();
    let updated = recalculate_all(&competitors, &matches, ByeValue::Full);
    let standings = rank_competitors(&updated);
    let names: Vec<&str> = standings.ranked.iter().map(|c| c.name.as_str()).collect();
    // C and D are fully tied and keep list order.
    assert_eq!(names, vec!["A", "C", "D", "B"]);
    assert_eq!(standings.rank_of(updated[0].id), Some(1));
    assert_eq!(standings.rank_of(updated[1].id), Some(4));
}

#[test]
fn ranking_with_distinct_tuples_ignores_input_order() {
    let mut competitors: Vec<Competitor> = (0..5)
        .map(|i| {
            let mut c = Competitor::with_rating(format!("P{i}"), 1500 + i as u32);
            c.score = (i % 3) as f64;
            c.buchholz = i as f64 * 0.5;
            c
        })
        .collect();
    let forward: Vec<_> = rank_competitors(&competitors).ranked.iter().map(|c| c.id).collect();
    competitors.reverse();
    let backward: Vec<_> = rank_competitors(&competitors).ranked.iter().map(|c| c.id).collect();
    assert_eq!(forward, backward);
}

#[test]
fn rating_breaks_remaining_ties() {
    let low = Competitor::with_rating("Low", 1200);
    let high = Competitor::with_rating("High", 1800);
    let standings = rank_competitors(&[low, high]);
    assert_eq!(standings.ranked[0].name, "High");
}
