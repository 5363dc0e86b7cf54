//! Official FPL payloads and their conversion into engine inputs.
//!
//! Fetching is left to the caller; everything here works on JSON text
//! already in hand.

pub mod types;

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::engine::autosub::{AutoSubEngine, AutoSubResult, SquadPlayer};
use crate::engine::bonus::{FixtureBonusResult, FixtureState, PlayerPerformanceScore};
use crate::engine::squad_bonus::Selection;
use crate::position::PositionCode;
use crate::{FixtureId, PlayerId, TeamId};
use types::{Bootstrap, Element, EntryPicks, Fixture, LiveElement, LiveEvent};

/// `active_chip` value for Bench Boost.
pub const BENCH_BOOST: &str = "bboost";

pub fn parse_bootstrap(json: &str) -> Result<Bootstrap> {
    serde_json::from_str(json).context("Failed to parse bootstrap-static payload")
}

pub fn parse_fixtures(json: &str) -> Result<Vec<Fixture>> {
    serde_json::from_str(json).context("Failed to parse fixtures payload")
}

pub fn parse_live(json: &str) -> Result<LiveEvent> {
    serde_json::from_str(json).context("Failed to parse live event payload")
}

pub fn parse_picks(json: &str) -> Result<EntryPicks> {
    serde_json::from_str(json).context("Failed to parse picks payload")
}

impl Fixture {
    pub fn state(&self) -> FixtureState {
        FixtureState {
            id: self.id,
            team_h: self.team_h,
            team_a: self.team_a,
            started: self.started,
            finished: self.finished,
        }
    }

    /// Final whistle has gone, whether or not bonus is confirmed.
    pub fn is_over(&self) -> bool {
        self.finished || self.finished_provisional
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.team_h == team || self.team_a == team
    }

    /// Player BPS from the `"bps"` stat table; empty before the feed fills it.
    pub fn bps_table(&self) -> HashMap<PlayerId, i32> {
        self.stats
            .iter()
            .find(|s| s.identifier == "bps")
            .map(|s| s.entries().map(|e| (e.element, e.value)).collect())
            .unwrap_or_default()
    }
}

impl EntryPicks {
    pub fn bench_boost(&self) -> bool {
        self.active_chip.as_deref() == Some(BENCH_BOOST)
    }
}

impl Bootstrap {
    pub fn element(&self, id: PlayerId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_index(&self) -> HashMap<PlayerId, &Element> {
        self.elements.iter().map(|e| (e.id, e)).collect()
    }

    pub fn team_name(&self, id: TeamId) -> Option<&str> {
        self.teams
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.short_name.as_str())
    }
}

impl LiveEvent {
    pub fn element(&self, id: PlayerId) -> Option<&LiveElement> {
        self.elements.iter().find(|e| e.id == id)
    }
}

/// Per-fixture BPS and minutes for every player in the live payload.
///
/// Minutes come from the player's explain block for the fixture. BPS comes
/// from the fixture's own `"bps"` stat table; when the table has no entry
/// for the player and they featured in a single fixture, their gameweek
/// `stats.bps` is the same number and is used instead. Players unknown to
/// bootstrap are skipped since their team cannot be resolved.
pub fn fixture_scores(
    live: &LiveEvent,
    bootstrap: &Bootstrap,
    fixtures: &[Fixture],
) -> BTreeMap<FixtureId, Vec<PlayerPerformanceScore>> {
    let index = bootstrap.element_index();
    let bps_tables: HashMap<FixtureId, HashMap<PlayerId, i32>> =
        fixtures.iter().map(|f| (f.id, f.bps_table())).collect();
    let mut out: BTreeMap<FixtureId, Vec<PlayerPerformanceScore>> = BTreeMap::new();

    for live_element in &live.elements {
        let Some(element) = index.get(&live_element.id) else {
            tracing::warn!(player_id = live_element.id, "live element missing from bootstrap");
            continue;
        };
        let single_fixture = live_element.explain.len() == 1;
        for block in &live_element.explain {
            let minutes = block.stat("minutes").unwrap_or(0).max(0) as u32;
            let from_table = bps_tables
                .get(&block.fixture)
                .and_then(|table| table.get(&live_element.id))
                .copied();
            let bps = match from_table {
                Some(bps) => bps,
                None if single_fixture => live_element.stats.bps,
                None => {
                    if minutes > 0 {
                        tracing::warn!(
                            player_id = live_element.id,
                            fixture_id = block.fixture,
                            "no per-fixture bps for double-gameweek player"
                        );
                    }
                    0
                }
            };
            out.entry(block.fixture).or_default().push(PlayerPerformanceScore {
                player_id: live_element.id,
                raw_score: bps,
                minutes_played: minutes,
                team_id: element.team,
            });
        }
    }
    out
}

pub fn selections(picks: &EntryPicks) -> Vec<Selection> {
    picks
        .picks
        .iter()
        .map(|p| Selection {
            player_id: p.element,
            multiplier: p.multiplier,
            is_captain: p.is_captain,
        })
        .collect()
}

/// Bonus for `fixture_id` already shows in the player's live explain block.
fn bonus_confirmed(live_element: Option<&LiveElement>, fixture_id: FixtureId) -> bool {
    live_element
        .and_then(|e| e.explain.iter().find(|b| b.fixture == fixture_id))
        .and_then(|b| b.stat("bonus"))
        .is_some_and(|bonus| bonus > 0)
}

/// Build the 15-man squad for the auto-sub engine.
///
/// `fixtures` should be the gameweek's fixtures. A team with none of them
/// (blank gameweek) counts as finished. Predicted bonus from `bonus` is added
/// per fixture, skipping fixtures whose bonus the live feed already includes.
pub fn build_squad(
    picks: &EntryPicks,
    live: &LiveEvent,
    bootstrap: &Bootstrap,
    fixtures: &[Fixture],
    bonus: &[FixtureBonusResult],
) -> Vec<SquadPlayer> {
    let index = bootstrap.element_index();
    let mut ordered: Vec<_> = picks.picks.iter().collect();
    ordered.sort_by_key(|p| p.position);

    let mut next_bench_order = 1u8;
    let mut squad = Vec::with_capacity(ordered.len());
    for pick in ordered {
        let Some(element) = index.get(&pick.element) else {
            tracing::warn!(player_id = pick.element, "picked player missing from bootstrap");
            continue;
        };
        let Some(position) = PositionCode::from_element_type(element.element_type) else {
            tracing::warn!(
                player_id = pick.element,
                element_type = element.element_type,
                "picked element has no squad position"
            );
            continue;
        };

        let is_starter = pick.position <= 11;
        let bench_order = if is_starter || position.is_goalkeeper() {
            None
        } else {
            let order = next_bench_order;
            next_bench_order += 1;
            Some(order)
        };

        let live_element = live.element(pick.element);
        let stats = live_element.map(|e| e.stats.clone()).unwrap_or_default();
        let predicted: i32 = bonus
            .iter()
            .filter(|r| !bonus_confirmed(live_element, r.fixture_id))
            .filter_map(|r| r.award_for(pick.element))
            .map(|a| a.predicted_bonus as i32)
            .sum();

        let fixture_finished = fixtures
            .iter()
            .filter(|f| f.involves(element.team))
            .all(Fixture::is_over);

        squad.push(SquadPlayer {
            id: pick.element,
            position,
            is_starter,
            bench_order,
            minutes_played: stats.minutes,
            fixture_finished,
            points: stats.total_points + predicted,
            // Bench picks carry 0 until they come on.
            multiplier: pick.multiplier.max(1),
        });
    }
    squad
}

/// Resolve the scoring team for a built squad, honouring the active chip.
///
/// Under Bench Boost all fifteen players score and nobody is substituted;
/// otherwise the auto-sub engine decides the eleven.
pub fn evaluate_squad(
    picks: &EntryPicks,
    squad: &[SquadPlayer],
    engine: &AutoSubEngine,
) -> AutoSubResult {
    if !picks.bench_boost() {
        return engine.apply(squad);
    }

    tracing::info!(players = squad.len(), "bench boost active, skipping auto-subs");
    let applied_team: Vec<SquadPlayer> = squad
        .iter()
        .cloned()
        .map(|mut p| {
            p.is_starter = true;
            p.bench_order = None;
            p
        })
        .collect();
    AutoSubResult {
        total_points: applied_team.iter().map(SquadPlayer::effective_points).sum(),
        applied_team,
        subs_applied: Vec::new(),
        explanations: vec!["bench boost active; all squad players score".to_string()],
    }
}

/// The four payloads needed to evaluate one squad for one gameweek.
#[derive(Debug, Clone)]
pub struct GameweekSnapshot {
    pub bootstrap: Bootstrap,
    pub fixtures: Vec<Fixture>,
    pub live: LiveEvent,
    pub picks: EntryPicks,
}

impl GameweekSnapshot {
    /// Read `bootstrap-static.json`, `fixtures.json`, `live.json` and
    /// `picks.json` from `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let read = |name: &str| -> Result<String> {
            let path = dir.join(name);
            std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))
        };
        let snapshot = Self {
            bootstrap: parse_bootstrap(&read("bootstrap-static.json")?)?,
            fixtures: parse_fixtures(&read("fixtures.json")?)?,
            live: parse_live(&read("live.json")?)?,
            picks: parse_picks(&read("picks.json")?)?,
        };
        tracing::info!(
            dir = %dir.display(),
            fixtures = snapshot.fixtures.len(),
            players = snapshot.live.elements.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    pub fn gameweek(&self) -> Option<u32> {
        self.picks.entry_history.as_ref().map(|h| h.event)
    }

    /// Fixtures of the picks' gameweek; all fixtures when it is unknown.
    pub fn gameweek_fixtures(&self) -> Vec<Fixture> {
        match self.gameweek() {
            Some(gw) => self
                .fixtures
                .iter()
                .filter(|f| f.event == Some(gw))
                .cloned()
                .collect(),
            None => self.fixtures.clone(),
        }
    }

    pub fn fixture_states(&self) -> Vec<FixtureState> {
        self.gameweek_fixtures().iter().map(Fixture::state).collect()
    }
}
