pub mod autosub;
pub mod bonus;
pub mod formation;
pub mod squad_bonus;

pub use autosub::{apply_auto_subs, AutoSubEngine, AutoSubResult, SquadPlayer, SubRecord};
pub use bonus::{allocate, BonusAllocator, BonusAward, FixtureBonusResult, FixtureState, PlayerPerformanceScore};
pub use formation::FormationRules;
pub use squad_bonus::{squad_predicted_bonus, Selection, SquadBonus};
