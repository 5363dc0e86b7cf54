//! Provisional bonus points from live BPS.
//!
//! Eligible players are grouped by equal BPS, best first. Each group consumes
//! as many tiers from the front of the remaining tier list as it has members
//! (capped by what is left) and every member is paid the last tier consumed.
//! With the default `[3, 2, 1]`:
//!
//! - single leader: 3, then the next group starts from `[2, 1]`
//! - two-way tie at the top: 2 each, then `[1]` remains
//! - three or more at the top: 1 each, nothing remains
//! - the group that reaches the final tier is paid in full, however large

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::BonusConfig;
use crate::{FixtureId, PlayerId, TeamId};

/// One player's live performance in one fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPerformanceScore {
    pub player_id: PlayerId,
    /// BPS; can be negative early in a match.
    pub raw_score: i32,
    pub minutes_played: u32,
    pub team_id: TeamId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusAward {
    pub player_id: PlayerId,
    pub bps: i32,
    /// 1-based, shared by equal scores, with gaps after ties.
    pub rank: usize,
    pub predicted_bonus: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureBonusResult {
    pub fixture_id: FixtureId,
    pub team_h_id: TeamId,
    pub team_a_id: TeamId,
    /// Every eligible player, including those paid nothing.
    pub bonuses: Vec<BonusAward>,
}

impl FixtureBonusResult {
    pub fn award_for(&self, player_id: PlayerId) -> Option<&BonusAward> {
        self.bonuses.iter().find(|b| b.player_id == player_id)
    }

    pub fn total_awarded(&self) -> u32 {
        self.bonuses.iter().map(|b| b.predicted_bonus as u32).sum()
    }
}

/// Match state needed to decide whether a fixture gets a prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureState {
    pub id: FixtureId,
    pub team_h: TeamId,
    pub team_a: TeamId,
    pub started: bool,
    pub finished: bool,
}

impl FixtureState {
    pub fn is_in_play(&self) -> bool {
        self.started && !self.finished
    }
}

#[derive(Debug, Clone)]
pub struct BonusAllocator {
    tiers: Vec<u8>,
}

impl Default for BonusAllocator {
    fn default() -> Self {
        Self::new(&BonusConfig::default())
    }
}

impl BonusAllocator {
    pub fn new(config: &BonusConfig) -> Self {
        Self {
            tiers: config.tiers.clone(),
        }
    }

    /// Rank one fixture's eligible players and predict their bonus.
    ///
    /// Players with zero minutes or from neither team are dropped. Equal BPS
    /// is ordered by ascending player id for display only.
    pub fn allocate(
        &self,
        fixture_id: FixtureId,
        team_h_id: TeamId,
        team_a_id: TeamId,
        scores: &[PlayerPerformanceScore],
    ) -> FixtureBonusResult {
        let mut eligible: Vec<&PlayerPerformanceScore> = scores
            .iter()
            .filter(|s| s.minutes_played > 0)
            .filter(|s| s.team_id == team_h_id || s.team_id == team_a_id)
            .collect();
        eligible.sort_by(|a, b| {
            b.raw_score
                .cmp(&a.raw_score)
                .then_with(|| a.player_id.cmp(&b.player_id))
        });

        let mut remaining: &[u8] = &self.tiers;
        let mut bonuses = Vec::with_capacity(eligible.len());
        let mut start = 0;
        while start < eligible.len() {
            let bps = eligible[start].raw_score;
            let group_len = eligible[start..]
                .iter()
                .take_while(|s| s.raw_score == bps)
                .count();
            let award = pay_group(&mut remaining, group_len);
            for score in &eligible[start..start + group_len] {
                bonuses.push(BonusAward {
                    player_id: score.player_id,
                    bps,
                    rank: start + 1,
                    predicted_bonus: award,
                });
            }
            start += group_len;
        }

        tracing::debug!(
            fixture_id,
            eligible = bonuses.len(),
            dropped = scores.len() - bonuses.len(),
            "bonus allocated"
        );

        FixtureBonusResult {
            fixture_id,
            team_h_id,
            team_a_id,
            bonuses,
        }
    }

    /// Allocate every fixture that has started but is not yet finished.
    /// Fixtures are independent; results keep the order of `fixtures`.
    pub fn allocate_in_play(
        &self,
        fixtures: &[FixtureState],
        scores: &BTreeMap<FixtureId, Vec<PlayerPerformanceScore>>,
    ) -> Vec<FixtureBonusResult> {
        fixtures
            .iter()
            .filter(|f| f.is_in_play())
            .map(|f| {
                let fixture_scores = scores.get(&f.id).map(Vec::as_slice).unwrap_or(&[]);
                self.allocate(f.id, f.team_h, f.team_a, fixture_scores)
            })
            .collect()
    }
}

/// Consume tiers for a group of `group_len` tied players and return what each is paid.
fn pay_group(remaining: &mut &[u8], group_len: usize) -> u8 {
    if remaining.is_empty() || group_len == 0 {
        return 0;
    }
    let consumed = group_len.min(remaining.len());
    let award = remaining[consumed - 1];
    *remaining = &remaining[consumed..];
    award
}

/// `BonusAllocator::allocate` with the standard 3/2/1 tiers.
pub fn allocate(
    fixture_id: FixtureId,
    team_h_id: TeamId,
    team_a_id: TeamId,
    scores: &[PlayerPerformanceScore],
) -> FixtureBonusResult {
    BonusAllocator::default().allocate(fixture_id, team_h_id, team_a_id, scores)
}
