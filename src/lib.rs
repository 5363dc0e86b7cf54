//! Live FPL bonus prediction and automatic substitutions.
pub mod config;
pub mod engine;
pub mod feed;
pub mod position;

pub type PlayerId = u32;
pub type TeamId = u32;
pub type FixtureId = u32;
