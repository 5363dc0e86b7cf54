use serde::{Deserialize, Serialize};

use super::bonus::FixtureBonusResult;
use crate::PlayerId;

/// A player picked in a fantasy squad, as far as bonus aggregation cares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub player_id: PlayerId,
    /// 0 for bench picks, 2 for captain, 3 for triple captain.
    pub multiplier: u8,
    pub is_captain: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionBonus {
    pub player_id: PlayerId,
    pub is_captain: bool,
    /// Predicted bonus across every fixture result, before the multiplier.
    pub bonus: u32,
    pub weighted: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SquadBonus {
    pub total: u32,
    pub players: Vec<SelectionBonus>,
}

/// Sum a squad's predicted bonus over the supplied fixture results.
/// A player appearing in two results (double gameweek) collects both.
pub fn squad_predicted_bonus(
    selections: &[Selection],
    results: &[FixtureBonusResult],
) -> SquadBonus {
    let players: Vec<SelectionBonus> = selections
        .iter()
        .map(|s| {
            let bonus: u32 = results
                .iter()
                .filter_map(|r| r.award_for(s.player_id))
                .map(|a| a.predicted_bonus as u32)
                .sum();
            SelectionBonus {
                player_id: s.player_id,
                is_captain: s.is_captain,
                bonus,
                weighted: bonus * s.multiplier as u32,
            }
        })
        .collect();

    SquadBonus {
        total: players.iter().map(|p| p.weighted).sum(),
        players,
    }
}
