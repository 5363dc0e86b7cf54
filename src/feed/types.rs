use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{FixtureId, PlayerId, TeamId};

// ── bootstrap-static ─────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct Bootstrap {
    pub elements: Vec<Element>,
    #[serde(default)]
    pub teams: Vec<Team>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Element {
    pub id: PlayerId,
    #[serde(default)]
    pub web_name: String,
    pub element_type: u8,
    pub team: TeamId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub short_name: String,
}

// ── fixtures ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    /// Gameweek; null for fixtures not yet scheduled.
    #[serde(default)]
    pub event: Option<u32>,
    pub team_h: TeamId,
    pub team_a: TeamId,
    #[serde(default)]
    pub started: bool,
    /// Set once bonus is confirmed.
    #[serde(default)]
    pub finished: bool,
    /// Set at the final whistle.
    #[serde(default)]
    pub finished_provisional: bool,
    #[serde(default)]
    pub kickoff_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub team_h_score: Option<u32>,
    #[serde(default)]
    pub team_a_score: Option<u32>,
    /// Per-side stat tables; BPS lives here under `"bps"`.
    #[serde(default)]
    pub stats: Vec<FixtureStat>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureStat {
    pub identifier: String,
    #[serde(default)]
    pub h: Vec<FixtureStatEntry>,
    #[serde(default)]
    pub a: Vec<FixtureStatEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureStatEntry {
    pub value: i32,
    pub element: PlayerId,
}

impl FixtureStat {
    /// Both sides' entries, home first.
    pub fn entries(&self) -> impl Iterator<Item = &FixtureStatEntry> {
        self.h.iter().chain(self.a.iter())
    }
}

// ── event/{gw}/live ──────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct LiveEvent {
    pub elements: Vec<LiveElement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiveElement {
    pub id: PlayerId,
    pub stats: LiveStats,
    /// One block per fixture the player featured in. Only point-scoring
    /// stats (minutes, goals, bonus...) appear here, never BPS.
    #[serde(default)]
    pub explain: Vec<ExplainBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiveStats {
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub bps: i32,
    #[serde(default)]
    pub bonus: i32,
    #[serde(default)]
    pub total_points: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExplainBlock {
    pub fixture: FixtureId,
    #[serde(default)]
    pub stats: Vec<ExplainStat>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExplainStat {
    pub identifier: String,
    #[serde(default)]
    pub value: i32,
}

impl ExplainBlock {
    pub fn stat(&self, identifier: &str) -> Option<i32> {
        self.stats
            .iter()
            .find(|s| s.identifier == identifier)
            .map(|s| s.value)
    }
}

// ── entry/{id}/event/{gw}/picks ──────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct EntryPicks {
    /// `"bboost"`, `"3xc"`, `"freehit"`, `"wildcard"` or null.
    #[serde(default)]
    pub active_chip: Option<String>,
    pub picks: Vec<Pick>,
    #[serde(default)]
    pub entry_history: Option<EntryHistory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pick {
    pub element: PlayerId,
    /// 1..=11 starting, 12..=15 bench in priority order.
    pub position: u8,
    pub multiplier: u8,
    #[serde(default)]
    pub is_captain: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntryHistory {
    pub event: u32,
}
