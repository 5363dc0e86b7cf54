//! Seeded randomized checks over both engines.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use fpl_live::engine::{allocate, apply_auto_subs, FormationRules, PlayerPerformanceScore, SquadPlayer};
use fpl_live::position::PositionCode;

const ROUNDS: usize = 500;

fn random_scores(rng: &mut StdRng) -> Vec<PlayerPerformanceScore> {
    let count = rng.gen_range(0..30);
    (0..count)
        .map(|i| PlayerPerformanceScore {
            player_id: i as u32 + 1,
            // Narrow range so ties are common.
            raw_score: rng.gen_range(-2..12),
            minutes_played: if rng.gen_bool(0.8) { rng.gen_range(1..=90) } else { 0 },
            team_id: rng.gen_range(1..=3),
        })
        .collect()
}

#[test]
fn test_allocate_ignores_input_order() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..ROUNDS {
        let mut scores = random_scores(&mut rng);
        let expected = allocate(1, 1, 2, &scores);
        scores.shuffle(&mut rng);
        assert_eq!(allocate(1, 1, 2, &scores), expected);
    }
}

#[test]
fn test_allocate_ranking_invariants() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..ROUNDS {
        let scores = random_scores(&mut rng);
        let result = allocate(1, 1, 2, &scores);

        let eligible = scores
            .iter()
            .filter(|s| s.minutes_played > 0 && s.team_id != 3)
            .count();
        assert_eq!(result.bonuses.len(), eligible);

        for pair in result.bonuses.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.bps >= b.bps);
            assert!(a.predicted_bonus >= b.predicted_bonus);
            if a.bps == b.bps {
                assert!(a.player_id < b.player_id);
                assert_eq!(a.rank, b.rank);
                assert_eq!(a.predicted_bonus, b.predicted_bonus);
            } else {
                assert!(b.rank > a.rank);
            }
        }
        for (i, award) in result.bonuses.iter().enumerate() {
            assert!(award.rank <= i + 1);
            assert!(award.predicted_bonus <= 3);
        }
    }
}

#[test]
fn test_nothing_paid_below_large_top_tie() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..ROUNDS {
        let tied = rng.gen_range(3..8);
        let mut scores: Vec<PlayerPerformanceScore> = (0..tied)
            .map(|i| PlayerPerformanceScore { player_id: i + 1, raw_score: 50, minutes_played: 90, team_id: 1 })
            .collect();
        let below = rng.gen_range(0..10);
        scores.extend((0..below).map(|i| PlayerPerformanceScore {
            player_id: 100 + i,
            raw_score: rng.gen_range(0..50),
            minutes_played: 90,
            team_id: 2,
        }));

        let result = allocate(1, 1, 2, &scores);
        for award in &result.bonuses {
            if award.bps == 50 {
                assert_eq!(award.predicted_bonus, 1);
            } else {
                assert_eq!(award.predicted_bonus, 0);
            }
        }
    }
}

const FORMATIONS: [(usize, usize, usize); 8] =
    [(3, 4, 3), (3, 5, 2), (4, 4, 2), (4, 3, 3), (4, 5, 1), (5, 3, 2), (5, 4, 1), (5, 2, 3)];

/// A legal 2-5-5-3 squad with a random starting formation and random live state.
fn random_squad(rng: &mut StdRng) -> Vec<SquadPlayer> {
    let (def, mid, fwd) = FORMATIONS[rng.gen_range(0..FORMATIONS.len())];
    let mut next_id = 1u32;
    let mut starters = Vec::new();
    let mut bench = Vec::new();
    for (position, total, starting) in [
        (PositionCode::Goalkeeper, 2, 1),
        (PositionCode::Defender, 5, def),
        (PositionCode::Midfielder, 5, mid),
        (PositionCode::Forward, 3, fwd),
    ] {
        for n in 0..total {
            let minutes_played = if rng.gen_bool(0.3) { 0 } else { rng.gen_range(1..=90) };
            let player = SquadPlayer {
                id: next_id,
                position,
                is_starter: n < starting,
                bench_order: None,
                minutes_played,
                fixture_finished: rng.gen_bool(0.7),
                points: if minutes_played == 0 { 0 } else { rng.gen_range(-2..15) },
                multiplier: 1,
            };
            next_id += 1;
            if player.is_starter {
                starters.push(player);
            } else {
                bench.push(player);
            }
        }
    }
    starters.shuffle(rng);
    starters[0].multiplier = 2;

    let mut outfield: Vec<&mut SquadPlayer> =
        bench.iter_mut().filter(|p| !p.position.is_goalkeeper()).collect();
    outfield.shuffle(rng);
    for (order, player) in outfield.into_iter().enumerate() {
        player.bench_order = Some(order as u8 + 1);
    }

    starters.extend(bench);
    starters
}

#[test]
fn test_auto_subs_keep_formation_legal() {
    let rules = FormationRules::default();
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..ROUNDS {
        let squad = random_squad(&mut rng);
        let result = apply_auto_subs(&squad);

        assert_eq!(result.applied_team.len(), 11);
        assert!(rules.is_legal(result.applied_team.iter().map(|p| p.position)));

        let mut ids: Vec<u32> = result.applied_team.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 11, "no player appears twice");

        for sub in &result.subs_applied {
            let out = squad.iter().find(|p| p.id == sub.out_id).unwrap();
            let incoming = squad.iter().find(|p| p.id == sub.in_id).unwrap();
            assert!(out.is_starter && out.did_not_play());
            assert!(!incoming.is_starter && incoming.minutes_played > 0);
            assert_eq!(out.position.is_goalkeeper(), incoming.position.is_goalkeeper());
        }

        let expected_total: i32 = result.applied_team.iter().map(|p| p.points * p.multiplier as i32).sum();
        assert_eq!(result.total_points, expected_total);

        let dnp = squad.iter().filter(|p| p.is_starter && p.did_not_play()).count();
        assert_eq!(result.explanations.len(), dnp);
    }
}

#[test]
fn test_pending_starters_never_substituted() {
    let mut rng = StdRng::seed_from_u64(19);
    for _ in 0..ROUNDS {
        let squad = random_squad(&mut rng);
        let result = apply_auto_subs(&squad);
        for player in squad.iter().filter(|p| p.is_starter && !p.fixture_finished) {
            assert!(result.applied_team.iter().any(|p| p.id == player.id));
        }
    }
}

#[test]
fn test_auto_subs_repeatable() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..ROUNDS {
        let squad = random_squad(&mut rng);
        assert_eq!(apply_auto_subs(&squad), apply_auto_subs(&squad));
    }
}
