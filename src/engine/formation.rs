//! Formation legality for a fantasy starting eleven.

use serde::Deserialize;

use crate::position::PositionCode;

/// Position counts of a candidate line-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionCounts {
    pub goalkeepers: usize,
    pub defenders: usize,
    pub midfielders: usize,
    pub forwards: usize,
}

impl PositionCounts {
    pub fn from_positions<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = PositionCode>,
    {
        let mut counts = Self::default();
        for position in positions {
            match position {
                PositionCode::Goalkeeper => counts.goalkeepers += 1,
                PositionCode::Defender => counts.defenders += 1,
                PositionCode::Midfielder => counts.midfielders += 1,
                PositionCode::Forward => counts.forwards += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.goalkeepers + self.defenders + self.midfielders + self.forwards
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct FormationRules {
    pub team_size: usize,
    /// Exact number of goalkeepers, not a minimum.
    pub goalkeepers: usize,
    pub min_defenders: usize,
    pub min_midfielders: usize,
    pub min_forwards: usize,
}

impl Default for FormationRules {
    fn default() -> Self {
        Self {
            team_size: 11,
            goalkeepers: 1,
            min_defenders: 3,
            min_midfielders: 2,
            min_forwards: 1,
        }
    }
}

impl FormationRules {
    pub fn accepts(&self, counts: &PositionCounts) -> bool {
        counts.total() == self.team_size
            && counts.goalkeepers == self.goalkeepers
            && counts.defenders >= self.min_defenders
            && counts.midfielders >= self.min_midfielders
            && counts.forwards >= self.min_forwards
    }

    pub fn is_legal<I>(&self, positions: I) -> bool
    where
        I: IntoIterator<Item = PositionCode>,
    {
        self.accepts(&PositionCounts::from_positions(positions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PositionCode::*;

    fn lineup(def: usize, mid: usize, fwd: usize) -> Vec<PositionCode> {
        let mut out = vec![Goalkeeper];
        out.extend(std::iter::repeat(Defender).take(def));
        out.extend(std::iter::repeat(Midfielder).take(mid));
        out.extend(std::iter::repeat(Forward).take(fwd));
        out
    }

    #[test]
    fn test_standard_formations_are_legal() {
        let rules = FormationRules::default();
        for (d, m, f) in [(3, 4, 3), (3, 5, 2), (4, 4, 2), (4, 3, 3), (4, 5, 1), (5, 3, 2), (5, 4, 1), (5, 2, 3)] {
            assert!(rules.is_legal(lineup(d, m, f)), "{}-{}-{} should be legal", d, m, f);
        }
    }

    #[test]
    fn test_too_few_defenders() {
        assert!(!FormationRules::default().is_legal(lineup(2, 5, 3)));
    }

    #[test]
    fn test_too_few_midfielders() {
        assert!(!FormationRules::default().is_legal(lineup(5, 1, 4)));
    }

    #[test]
    fn test_no_forward() {
        assert!(!FormationRules::default().is_legal(lineup(5, 5, 0)));
    }

    #[test]
    fn test_two_goalkeepers_rejected() {
        let mut positions = lineup(4, 4, 1);
        positions.push(Goalkeeper);
        assert_eq!(positions.len(), 11);
        assert!(!FormationRules::default().is_legal(positions));
    }

    #[test]
    fn test_wrong_team_size() {
        let rules = FormationRules::default();
        assert!(!rules.is_legal(lineup(4, 4, 1)));
        assert!(!rules.is_legal(lineup(4, 4, 3)));
    }

    #[test]
    fn test_counts() {
        let counts = PositionCounts::from_positions(lineup(4, 4, 2));
        assert_eq!(
            counts,
            PositionCounts { goalkeepers: 1, defenders: 4, midfielders: 4, forwards: 2 }
        );
        assert_eq!(counts.total(), 11);
    }
}
