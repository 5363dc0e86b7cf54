//! Automatic substitutions for starters who did not play.

use serde::{Deserialize, Serialize};

use super::formation::FormationRules;
use crate::position::PositionCode;
use crate::PlayerId;

/// One of the 15 players in a fantasy squad for a gameweek.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadPlayer {
    pub id: PlayerId,
    pub position: PositionCode,
    pub is_starter: bool,
    /// 1..=3 for outfield bench players; `None` for starters and the bench GK.
    pub bench_order: Option<u8>,
    pub minutes_played: u32,
    /// The player's own fixture (all of them, in a double gameweek) is over.
    pub fixture_finished: bool,
    pub points: i32,
    pub multiplier: u8,
}

impl SquadPlayer {
    /// Zero minutes with nothing left to play.
    pub fn did_not_play(&self) -> bool {
        self.minutes_played == 0 && self.fixture_finished
    }

    pub fn effective_points(&self) -> i32 {
        self.points * self.multiplier as i32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubRecord {
    pub out_id: PlayerId,
    pub in_id: PlayerId,
    pub position_out: PositionCode,
    pub position_in: PositionCode,
    pub bench_order: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoSubResult {
    pub applied_team: Vec<SquadPlayer>,
    pub total_points: i32,
    pub subs_applied: Vec<SubRecord>,
    pub explanations: Vec<String>,
}

/// Team state threaded through the substitution pass.
struct SubState {
    team: Vec<SquadPlayer>,
    used: Vec<PlayerId>,
    subs: Vec<SubRecord>,
    explanations: Vec<String>,
}

impl SubState {
    fn is_used(&self, id: PlayerId) -> bool {
        self.used.contains(&id)
    }

    fn swap_in(&mut self, slot: usize, bench_player: &SquadPlayer) {
        let mut incoming = bench_player.clone();
        incoming.is_starter = true;
        incoming.bench_order = None;
        let outgoing = std::mem::replace(&mut self.team[slot], incoming);

        tracing::debug!(
            out_id = outgoing.id,
            in_id = bench_player.id,
            position = %bench_player.position,
            "auto-sub applied"
        );
        self.used.push(bench_player.id);
        self.subs.push(SubRecord {
            out_id: outgoing.id,
            in_id: bench_player.id,
            position_out: outgoing.position,
            position_in: bench_player.position,
            bench_order: bench_player.bench_order,
        });
    }
}

#[derive(Debug, Clone, Default)]
pub struct AutoSubEngine {
    rules: FormationRules,
}

impl AutoSubEngine {
    pub fn new(rules: FormationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &FormationRules {
        &self.rules
    }

    /// Work out the effective starting eleven for `squad`.
    ///
    /// Starters who did not play are handled in starting-list order, each one
    /// seeing the team as left by earlier swaps. Slots with no valid
    /// replacement stay as they are and are explained instead.
    pub fn apply(&self, squad: &[SquadPlayer]) -> AutoSubResult {
        let starters: Vec<SquadPlayer> = squad.iter().filter(|p| p.is_starter).cloned().collect();
        let bench: Vec<&SquadPlayer> = squad.iter().filter(|p| !p.is_starter).collect();

        let bench_gk = bench.iter().copied().find(|p| p.position.is_goalkeeper());
        if bench_gk.is_none() {
            tracing::warn!("squad has no bench goalkeeper");
        }
        let mut bench_outfield: Vec<&SquadPlayer> = bench
            .iter()
            .copied()
            .filter(|p| !p.position.is_goalkeeper())
            .collect();
        bench_outfield.sort_by_key(|p| p.bench_order.unwrap_or(u8::MAX));

        let dnp_slots: Vec<usize> = starters
            .iter()
            .enumerate()
            .filter(|(_, p)| p.did_not_play())
            .map(|(slot, _)| slot)
            .collect();

        let initial = SubState {
            team: starters,
            used: Vec::new(),
            subs: Vec::new(),
            explanations: Vec::new(),
        };
        let state = dnp_slots.into_iter().fold(initial, |state, slot| {
            if state.team[slot].position.is_goalkeeper() {
                self.resolve_goalkeeper(state, slot, bench_gk)
            } else {
                self.resolve_outfield(state, slot, &bench_outfield)
            }
        });

        let total_points = state.team.iter().map(SquadPlayer::effective_points).sum();
        AutoSubResult {
            applied_team: state.team,
            total_points,
            subs_applied: state.subs,
            explanations: state.explanations,
        }
    }

    fn resolve_goalkeeper(
        &self,
        mut state: SubState,
        slot: usize,
        bench_gk: Option<&SquadPlayer>,
    ) -> SubState {
        let out_id = state.team[slot].id;
        let note = match bench_gk {
            Some(gk) if gk.minutes_played > 0 && !state.is_used(gk.id) => {
                state.swap_in(slot, gk);
                format!("GK {} did not play; bench GK {} came on", out_id, gk.id)
            }
            Some(gk) => format!(
                "GK {} did not play; bench GK {} did not play either, slot left unfilled",
                out_id, gk.id
            ),
            None => format!(
                "GK {} did not play; no bench goalkeeper, slot left unfilled",
                out_id
            ),
        };
        state.explanations.push(note);
        state
    }

    fn resolve_outfield(
        &self,
        mut state: SubState,
        slot: usize,
        bench_outfield: &[&SquadPlayer],
    ) -> SubState {
        let out_id = state.team[slot].id;
        let out_position = state.team[slot].position;

        for &candidate in bench_outfield {
            if candidate.minutes_played == 0 || state.is_used(candidate.id) {
                continue;
            }
            let positions = state.team.iter().enumerate().map(|(i, p)| {
                if i == slot {
                    candidate.position
                } else {
                    p.position
                }
            });
            if !self.rules.is_legal(positions) {
                tracing::trace!(
                    out_id,
                    candidate = candidate.id,
                    position = %candidate.position,
                    "bench candidate skipped: formation"
                );
                continue;
            }

            state.swap_in(slot, candidate);
            state.explanations.push(format!(
                "{} {} did not play; replaced by {} {} (bench {})",
                out_position,
                out_id,
                candidate.position,
                candidate.id,
                candidate.bench_order.map_or_else(|| "-".to_string(), |o| o.to_string())
            ));
            return state;
        }

        state.explanations.push(format!(
            "{} {} did not play; no legal bench replacement, slot left unfilled",
            out_position, out_id
        ));
        state
    }
}

/// `AutoSubEngine::apply` with the standard formation rules.
pub fn apply_auto_subs(squad: &[SquadPlayer]) -> AutoSubResult {
    AutoSubEngine::default().apply(squad)
}
