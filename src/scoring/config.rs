use anyhow::{Context, Result};
use serde::Deserialize;

use crate::scoring::types::ScoreThresholds;

/// Optional threshold overrides.
///
/// Stored as a plain JSON object on disk; any key may be omitted:
/// ```json
/// {
///   "average_route": 450,
///   "burned_fuel": 230,
///   "capacity": 20
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    pub average_route: Option<f64>,
    pub burned_fuel: Option<f64>,
    pub capacity: Option<i64>,
}

impl ScoringConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scoring config {path}"))?;
        Self::from_json(&content).with_context(|| format!("invalid scoring config {path}"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Layers `overrides` on top of `self`; set fields in `overrides` win.
    pub fn merge(self, overrides: ScoringConfig) -> Self {
        Self {
            average_route: overrides.average_route.or(self.average_route),
            burned_fuel: overrides.burned_fuel.or(self.burned_fuel),
            capacity: overrides.capacity.or(self.capacity),
        }
    }

    /// Resolves unset fields from [`ScoreThresholds::default`].
    pub fn thresholds(&self) -> ScoreThresholds {
        let defaults = ScoreThresholds::default();
        ScoreThresholds {
            average_route: self.average_route.unwrap_or(defaults.average_route),
            burned_fuel: self.burned_fuel.unwrap_or(defaults.burned_fuel),
            capacity: self.capacity.unwrap_or(defaults.capacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ScoringConfig::from_json("{}").unwrap();
        assert_eq!(config.thresholds(), ScoreThresholds::default());
    }

    #[test]
    fn test_partial_config() {
        let config = ScoringConfig::from_json(r#"{"capacity": 30}"#).unwrap();
        let t = config.thresholds();
        assert_eq!(t.capacity, 30);
        assert_eq!(t.average_route, 450.0);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(ScoringConfig::from_json(r#"{"capacty": 30}"#).is_err());
    }

    #[test]
    fn test_cli_overrides_win() {
        let file = ScoringConfig {
            average_route: Some(500.0),
            burned_fuel: Some(200.0),
            capacity: None,
        };
        let cli = ScoringConfig {
            burned_fuel: Some(250.0),
            ..Default::default()
        };

        let t = file.merge(cli).thresholds();

        assert_eq!(t.average_route, 500.0);
        assert_eq!(t.burned_fuel, 250.0);
        assert_eq!(t.capacity, 20);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(ScoringConfig::load("/nonexistent/scoring.json").is_err());
    }
}
