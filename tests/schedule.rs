//! Integration tests for the round lifecycle: generation, results, manual pairings, completion.

use std::collections::HashSet;
use swiss_pairing_web::{
    add_manual_pairing, check_structure, generate_next_round, record_result, standings,
    tournament_stats, ColorChoice, Competitor, CompetitorId, Match, MatchResult, PairingViolation,
    Round, Round1Method, Tournament, TournamentError, TournamentSettings, TournamentState,
};

fn tournament_with(n: usize) -> Tournament {
    let mut t = Tournament::new("Club Swiss");
    for i in 0..n {
        t.add_competitor(format!("Player {i}"), 0).unwrap();
    }
    t
}

fn result_for(i: usize) -> MatchResult {
    match i % 3 {
        0 => MatchResult::WhiteWin,
        1 => MatchResult::BlackWin,
        _ => MatchResult::Draw,
    }
}

fn finish_round(t: &mut Tournament) {
    let number = t.current_round;
    let pending: Vec<usize> = t
        .round(number)
        .unwrap()
        .matches
        .iter()
        .enumerate()
        .filter(|(_, m)| m.result.is_pending())
        .map(|(i, _)| i)
        .collect();
    for i in pending {
        record_result(t, number, i, result_for(i)).unwrap();
    }
}

#[test]
fn first_round_commits_matches_and_bye() {
    let mut t = tournament_with(5);
    assert_eq!(t.state(), TournamentState::Setup);

    let result = generate_next_round(&mut t).unwrap();
    assert_eq!(t.current_round, 1);
    assert_eq!(t.state(), TournamentState::InProgress);
    assert_eq!(result.matches.len(), 2);

    let round = t.round(1).unwrap();
    assert_eq!(round.matches.len(), 3);
    let bye = round.matches.iter().find(|m| m.is_bye()).unwrap();
    assert_eq!((bye.batch, bye.board), (0, 0));

    let bye_id = result.bye.unwrap();
    let recipient = t.competitor(bye_id).unwrap();
    assert!(recipient.had_bye);
    assert_eq!(recipient.bye_round, Some(1));
    assert!(recipient.opponents.is_empty());
    // Bye value is counted straight away.
    assert_eq!(recipient.score, 1.0);

    for c in t.competitors.iter().filter(|c| c.id != bye_id) {
        assert_eq!(c.opponents.len(), 1);
        assert_eq!(c.colors.len(), 1);
    }
}

#[test]
fn competitor_list_is_locked_after_first_round() {
    let mut t = tournament_with(4);
    generate_next_round(&mut t).unwrap();
    assert_eq!(t.add_competitor("Late", 0), Err(TournamentError::InvalidState));
    let first = t.competitors[0].id;
    assert_eq!(t.remove_competitor(first), Err(TournamentError::InvalidState));
}

#[test]
fn competitor_names_are_unique_ignoring_case() {
    let mut t = Tournament::new("Open");
    t.add_competitor("Émile", 0).unwrap();
    assert_eq!(
        t.add_competitor("émile", 0),
        Err(TournamentError::DuplicateCompetitorName)
    );
    assert_eq!(
        t.add_competitor("  ÉMILE ", 1500),
        Err(TournamentError::DuplicateCompetitorName)
    );
    assert_eq!(t.competitors.len(), 1);
}

#[test]
fn premature_advance_is_refused_with_pending_count() {
    let mut t = tournament_with(4);
    generate_next_round(&mut t).unwrap();

    let err = generate_next_round(&mut t).unwrap_err();
    assert_eq!(err, TournamentError::IncompleteResults { pending: 2 });

    record_result(&mut t, 1, 0, MatchResult::Draw).unwrap();
    let err = generate_next_round(&mut t).unwrap_err();
    assert_eq!(err, TournamentError::IncompleteResults { pending: 1 });
    assert_eq!(err.to_string(), "1 match missing a result");
    assert_eq!(t.rounds.len(), 1);
    assert!(!t.round(1).unwrap().is_complete);
}

#[test]
fn completing_a_round_flips_flag_and_batches() {
    let mut t = tournament_with(6);
    t.set_format(3, 2).unwrap();
    generate_next_round(&mut t).unwrap();
    record_result(&mut t, 1, 0, MatchResult::WhiteWin).unwrap();
    record_result(&mut t, 1, 1, MatchResult::BlackWin).unwrap();
    {
        let round = t.round(1).unwrap();
        assert!(round.completed_batches.contains(&1));
        assert!(!round.completed_batches.contains(&2));
        assert_eq!(round.progress().completed, 2);
    }
    record_result(&mut t, 1, 2, MatchResult::Draw).unwrap();
    let round = t.round(1).unwrap();
    assert!(round.is_complete);
    assert!(round.completed_at.is_some());
    assert_eq!(round.progress().percentage, 100);
}

#[test]
fn result_entry_rules() {
    let mut t = tournament_with(3);
    generate_next_round(&mut t).unwrap();
    let bye_index = t.round(1).unwrap().matches.iter().position(Match::is_bye).unwrap();

    assert_eq!(
        record_result(&mut t, 1, bye_index, MatchResult::WhiteWin),
        Err(TournamentError::ByeNotEditable)
    );
    assert_eq!(
        record_result(&mut t, 1, 0, MatchResult::Pending),
        Err(TournamentError::InvalidResult)
    );
    assert_eq!(
        record_result(&mut t, 1, 9, MatchResult::Draw),
        Err(TournamentError::MatchNotFound { round: 1, index: 9 })
    );
    assert_eq!(
        record_result(&mut t, 2, 0, MatchResult::Draw),
        Err(TournamentError::RoundNotFound(2))
    );
}

#[test]
fn results_update_scores_immediately() {
    let mut t = tournament_with(2);
    generate_next_round(&mut t).unwrap();
    let m = t.round(1).unwrap().matches[0].clone();
    record_result(&mut t, 1, 0, MatchResult::WhiteWin).unwrap();
    assert_eq!(t.competitor(m.white).unwrap().score, 1.0);
    assert_eq!(t.competitor(m.black).unwrap().buchholz, 1.0);

    // Corrections are allowed and recomputed from scratch.
    record_result(&mut t, 1, 0, MatchResult::Draw).unwrap();
    assert_eq!(t.competitor(m.white).unwrap().score, 0.5);
    assert_eq!(t.competitor(m.white).unwrap().wins, 0);
}

#[test]
fn full_tournament_keeps_every_invariant() {
    let mut t = tournament_with(10);
    t.set_format(5, 3).unwrap();

    for round in 1..=5u32 {
        let before = t.competitors.clone();
        generate_next_round(&mut t).unwrap();
        let committed = t.round(round).unwrap();

        let mut seen = HashSet::new();
        for m in &committed.matches {
            for id in m.participants() {
                assert!(seen.insert(id), "double booking in round {round}");
            }
            if !m.is_bye() {
                let white = before.iter().find(|c| c.id == m.white).unwrap();
                assert!(!white.has_played(m.black), "rematch in round {round}");
                assert!(m.board >= 1 && m.board <= 3);
            }
        }
        assert_eq!(t.current_round as usize, t.rounds.len());
        finish_round(&mut t);
    }

    assert_eq!(t.state(), TournamentState::Completed);
    assert!(t.is_complete());
    assert!(check_structure(&t).is_empty());
    assert_eq!(
        generate_next_round(&mut t).unwrap_err(),
        TournamentError::RoundsExhausted { total: 5 }
    );

    for c in &t.competitors {
        let byes = t
            .all_matches()
            .iter()
            .filter(|m| m.is_bye() && m.white == c.id)
            .count();
        assert!(byes <= 1);
        assert_eq!(c.opponents.len(), c.colors.len());
    }

    let table = standings(&t);
    assert_eq!(table.ranked.len(), 10);
    for pair in table.ranked.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn odd_field_seats_everyone_every_round() {
    let mut t = tournament_with(7);
    t.set_format(5, 3).unwrap();
    t.set_settings(TournamentSettings {
        round1_pairing_method: Round1Method::Alphabetical,
        ..TournamentSettings::default()
    })
    .unwrap();
    let mut everyone: Vec<CompetitorId> = t.competitors.iter().map(|c| c.id).collect();
    everyone.sort();

    let mut bye_holders = HashSet::new();
    for round in 1..=5u32 {
        let before = t.competitors.clone();
        let result = generate_next_round(&mut t).unwrap();
        assert!(!result.has_hard_warnings());

        let bye = result.bye.expect("odd field hands out a bye every round");
        assert!(bye_holders.insert(bye), "second bye in round {round}");

        let committed = t.round(round).unwrap();
        let mut seated: Vec<CompetitorId> = committed.matches.iter().flat_map(Match::participants).collect();
        seated.sort();
        assert_eq!(seated, everyone, "someone unseated in round {round}");

        for m in committed.matches.iter().filter(|m| !m.is_bye()) {
            let white = before.iter().find(|c| c.id == m.white).unwrap();
            assert!(!white.has_played(m.black), "rematch in round {round}");
        }
        finish_round(&mut t);
    }

    assert_eq!(bye_holders.len(), 5);
    for c in &t.competitors {
        assert_eq!(c.had_bye, bye_holders.contains(&c.id));
    }
    assert!(check_structure(&t).is_empty());
    assert_eq!(t.state(), TournamentState::Completed);
}

#[test]
fn generation_is_deterministic_for_identical_snapshots() {
    let mut t = tournament_with(7);
    generate_next_round(&mut t).unwrap();
    finish_round(&mut t);

    let mut a = t.clone();
    let mut b = t.clone();
    let ra = generate_next_round(&mut a).unwrap();
    let rb = generate_next_round(&mut b).unwrap();
    assert_eq!(ra, rb);
    assert_eq!(a.round(2).unwrap().matches, b.round(2).unwrap().matches);
}

#[test]
fn too_few_competitors_is_refused() {
    let mut t = tournament_with(1);
    assert_eq!(
        generate_next_round(&mut t),
        Err(TournamentError::NotEnoughCompetitors)
    );
    assert_eq!(t.current_round, 0);
}

/// Round 1 with A-B played and C, D left for the administrator.
fn tournament_with_open_round() -> Tournament {
    let competitors: Vec<Competitor> = ["A", "B", "C", "D"].iter().map(|n| Competitor::new(*n)).collect();
    let mut t = Tournament::with_competitors("Manual", competitors);
    let (a, b) = (t.competitors[0].id, t.competitors[1].id);
    let mut m = Match::new(a, b);
    m.batch = 1;
    m.board = 1;
    t.rounds.push(Round::new(1, vec![m]));
    t.current_round = 1;
    t.competitors[0].record_pairing(b, swiss_pairing_web::Color::White);
    t.competitors[1].record_pairing(a, swiss_pairing_web::Color::Black);
    t
}

#[test]
fn manual_pairing_takes_next_board() {
    let mut t = tournament_with_open_round();
    let (c, d) = (t.competitors[2].id, t.competitors[3].id);
    add_manual_pairing(&mut t, 1, c, d, ColorChoice::FirstWhite).unwrap();

    let added = t.round(1).unwrap().matches.last().unwrap().clone();
    assert_eq!((added.white, added.black), (c, d));
    assert_eq!((added.batch, added.board), (1, 2));
    assert_eq!(t.competitor(c).unwrap().opponents, vec![d]);
}

#[test]
fn manual_pairing_reopens_a_scored_batch() {
    let competitors: Vec<Competitor> = ["A", "B", "C", "D", "E", "F"]
        .iter()
        .map(|n| Competitor::new(*n))
        .collect();
    let mut t = Tournament::with_competitors("Batches", competitors);
    let ids: Vec<CompetitorId> = t.competitors.iter().map(|c| c.id).collect();
    let mut first = Match::new(ids[0], ids[1]);
    (first.batch, first.board) = (1, 1);
    let mut second = Match::new(ids[2], ids[3]);
    (second.batch, second.board) = (2, 1);
    second.result = MatchResult::Draw;
    t.rounds.push(Round::new(1, vec![first, second]));
    t.current_round = 1;
    assert!(t.round(1).unwrap().completed_batches.contains(&2));

    add_manual_pairing(&mut t, 1, ids[4], ids[5], ColorChoice::FirstWhite).unwrap();
    let round = t.round(1).unwrap();
    let added = round.matches.last().unwrap();
    assert_eq!((added.batch, added.board), (2, 2));
    assert!(round.completed_batches.is_empty());

    record_result(&mut t, 1, 2, MatchResult::WhiteWin).unwrap();
    let round = t.round(1).unwrap();
    assert_eq!(round.completed_batches.iter().copied().collect::<Vec<_>>(), vec![2]);
    assert!(!round.is_complete);
}

#[test]
fn manual_pairing_rejects_conflicts() {
    let mut t = tournament_with_open_round();
    let (a, b, c) = (t.competitors[0].id, t.competitors[1].id, t.competitors[2].id);

    let err = add_manual_pairing(&mut t, 1, a, b, ColorChoice::Auto).unwrap_err();
    assert_eq!(
        err,
        TournamentError::InvalidPairing(vec![
            PairingViolation::AlreadyScheduled { competitor: a },
            PairingViolation::AlreadyScheduled { competitor: b },
            PairingViolation::AlreadyPlayed,
        ])
    );

    let err = add_manual_pairing(&mut t, 1, c, c, ColorChoice::Auto).unwrap_err();
    assert_eq!(
        err,
        TournamentError::InvalidPairing(vec![PairingViolation::SameCompetitor])
    );
    assert_eq!(t.round(1).unwrap().matches.len(), 1);
}

#[test]
fn manual_pairing_refused_on_complete_round() {
    let mut t = tournament_with_open_round();
    record_result(&mut t, 1, 0, MatchResult::Draw).unwrap();
    let (c, d) = (t.competitors[2].id, t.competitors[3].id);
    assert_eq!(
        add_manual_pairing(&mut t, 1, c, d, ColorChoice::Auto),
        Err(TournamentError::RoundAlreadyComplete(1))
    );
}

#[test]
fn stats_report_batches_per_round() {
    let mut t = tournament_with(15);
    t.set_format(4, 4).unwrap();
    let stats = tournament_stats(&t);
    assert_eq!(stats.competitors, 15);
    assert_eq!(stats.matches_per_round, 7);
    assert_eq!(stats.batches_per_round, 2);
}
