use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::engine::formation::FormationRules;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub bonus: BonusConfig,
    #[serde(default)]
    pub formation: FormationRules,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BonusConfig {
    /// Bonus paid per distinct BPS group, best first.
    #[serde(default = "default_tiers")]
    pub tiers: Vec<u8>,
}

fn default_tiers() -> Vec<u8> {
    vec![3, 2, 1]
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).with_context(|| "Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject tier lists and formation minima that the engines cannot honour.
    pub fn validate(&self) -> Result<()> {
        let tiers = &self.bonus.tiers;
        if tiers.is_empty() {
            anyhow::bail!("bonus.tiers cannot be empty");
        }
        if tiers.iter().any(|&t| t == 0) {
            anyhow::bail!("bonus.tiers must all be positive: {:?}", tiers);
        }
        if tiers.windows(2).any(|w| w[0] <= w[1]) {
            anyhow::bail!("bonus.tiers must be strictly decreasing: {:?}", tiers);
        }

        let f = &self.formation;
        if f.goalkeepers == 0 {
            anyhow::bail!("formation.goalkeepers must be at least 1");
        }
        let minimum = f.goalkeepers + f.min_defenders + f.min_midfielders + f.min_forwards;
        if minimum > f.team_size {
            anyhow::bail!(
                "formation minima need {} players but team_size is {}",
                minimum,
                f.team_size
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses() {
        let config = Config::load(Path::new("config.toml")).unwrap();
        assert_eq!(config.bonus.tiers, vec![3, 2, 1]);
        assert_eq!(config.formation.team_size, 11);
        assert_eq!(config.formation.min_defenders, 3);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml("[formation]\nmin_forwards = 2\n").unwrap();
        assert_eq!(config.bonus.tiers, vec![3, 2, 1]);
        assert_eq!(config.formation.min_forwards, 2);
        assert_eq!(config.formation.min_midfielders, 2);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_rejects_empty_tiers() {
        let err = Config::from_toml("[bonus]\ntiers = []\n").unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_rejects_non_decreasing_tiers() {
        assert!(Config::from_toml("[bonus]\ntiers = [3, 3, 1]\n").is_err());
        assert!(Config::from_toml("[bonus]\ntiers = [1, 2, 3]\n").is_err());
        assert!(Config::from_toml("[bonus]\ntiers = [2, 1, 0]\n").is_err());
    }

    #[test]
    fn test_rejects_impossible_formation() {
        let err = Config::from_toml("[formation]\nmin_defenders = 8\nmin_midfielders = 3\n")
            .unwrap_err();
        assert!(err.to_string().contains("team_size"));
    }

    #[test]
    fn test_rejects_zero_goalkeepers() {
        assert!(Config::from_toml("[formation]\ngoalkeepers = 0\n").is_err());
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = Config::load(Path::new("does-not-exist.toml")).unwrap_err();
        assert!(format!("{:#}", err).contains("does-not-exist.toml"));
    }
}
