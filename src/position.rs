use serde::{Deserialize, Serialize};
use std::fmt;

/// Squad position of a player for the gameweek.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PositionCode {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "DEF")]
    Defender,
    #[serde(rename = "MID")]
    Midfielder,
    #[serde(rename = "FWD")]
    Forward,
}

impl PositionCode {
    /// Map an FPL `element_type` (1 = GK, 2 = DEF, 3 = MID, 4 = FWD).
    /// Anything else (e.g. the assistant-manager type) has no squad position.
    pub fn from_element_type(element_type: u8) -> Option<Self> {
        match element_type {
            1 => Some(Self::Goalkeeper),
            2 => Some(Self::Defender),
            3 => Some(Self::Midfielder),
            4 => Some(Self::Forward),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Goalkeeper => "GK",
            Self::Defender => "DEF",
            Self::Midfielder => "MID",
            Self::Forward => "FWD",
        }
    }

    pub fn is_goalkeeper(self) -> bool {
        self == Self::Goalkeeper
    }
}

impl fmt::Display for PositionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
