//! Configuration types for the simulation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Arena configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Largest valid x coordinate (inclusive)
    pub max_x: i32,
    /// Largest valid y coordinate (inclusive)
    pub max_y: i32,
    /// Number of players placed by a new game
    pub population: usize,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Threats farther than this are ignored in favour of the nearest prey
    pub far_threat_distance: i64,
    /// A fleeing player on the chaser's line sidesteps with odds 1 in this, per direction
    pub flee_nudge_odds: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            max_x: 38,
            max_y: 18,
            population: 40,
            seed: 0,
            far_threat_distance: 10,
            flee_nudge_odds: 9,
        }
    }
}

impl ArenaConfig {
    /// Number of cells in the inclusive `[0, max_x] x [0, max_y]` rectangle
    pub fn capacity(&self) -> usize {
        cell_count(self.max_x, self.max_y)
    }

    pub fn validate(&self) -> Result<()> {
        validate_bounds(self.max_x, self.max_y)?;

        if self.population > self.capacity() {
            return Err(Error::BoardFull {
                requested: self.population,
                capacity: self.capacity(),
            });
        }

        // Two outcomes (sidestep each way) are drawn from this range.
        if self.flee_nudge_odds < 2 {
            return Err(Error::InvalidState(format!(
                "flee_nudge_odds must be at least 2, got {}",
                self.flee_nudge_odds
            )));
        }

        Ok(())
    }
}

/// Reject bounds that describe no cells at all.
pub fn validate_bounds(max_x: i32, max_y: i32) -> Result<()> {
    if max_x < 0 || max_y < 0 {
        return Err(Error::InvalidBounds { max_x, max_y });
    }
    Ok(())
}

pub fn cell_count(max_x: i32, max_y: i32) -> usize {
    if max_x < 0 || max_y < 0 {
        return 0;
    }
    (max_x as usize + 1) * (max_y as usize + 1)
}

/// Round interval presets, slowest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Turtle,
    Slow,
    #[default]
    Normal,
    Fast,
    Lightning,
}

impl Speed {
    pub fn all() -> [Speed; 5] {
        [
            Speed::Turtle,
            Speed::Slow,
            Speed::Normal,
            Speed::Fast,
            Speed::Lightning,
        ]
    }

    pub fn interval(self) -> Duration {
        let ms = match self {
            Speed::Turtle => 1000,
            Speed::Slow => 250,
            Speed::Normal => 125,
            Speed::Fast => 75,
            Speed::Lightning => 20,
        };
        Duration::from_millis(ms)
    }

    /// Next faster preset; saturates at `Lightning`.
    pub fn faster(self) -> Self {
        match self {
            Speed::Turtle => Speed::Slow,
            Speed::Slow => Speed::Normal,
            Speed::Normal => Speed::Fast,
            Speed::Fast | Speed::Lightning => Speed::Lightning,
        }
    }

    /// Next slower preset; saturates at `Turtle`.
    pub fn slower(self) -> Self {
        match self {
            Speed::Lightning => Speed::Fast,
            Speed::Fast => Speed::Normal,
            Speed::Normal => Speed::Slow,
            Speed::Slow | Speed::Turtle => Speed::Turtle,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Speed::Turtle => "turtle",
            Speed::Slow => "slow",
            Speed::Normal => "normal",
            Speed::Fast => "fast",
            Speed::Lightning => "lightning",
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Arena configuration
    pub arena: ArenaConfig,
    /// Speed preset at start-up
    pub speed: Speed,
    /// Write a text frame to stdout after every round
    pub render_frames: bool,
    /// Emit logs as JSON instead of human-readable lines
    pub json_logs: bool,
    /// Smallest playable extent on either axis
    pub min_extent: i32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            speed: Speed::default(),
            render_frames: true,
            json_logs: false,
            min_extent: 5,
        }
    }
}

impl RunnerConfig {
    /// Load a config from a JSON file; missing fields fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: RunnerConfig = serde_json::from_str(&text)?;
        config.arena.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let arena = ArenaConfig::default();
        assert_eq!(arena.population, 40);
        assert_eq!(arena.far_threat_distance, 10);
        assert!(arena.validate().is_ok());

        let runner = RunnerConfig::default();
        assert_eq!(runner.speed, Speed::Normal);
        assert_eq!(runner.min_extent, 5);
    }

    #[test]
    fn test_capacity() {
        let config = ArenaConfig {
            max_x: 2,
            max_y: 3,
            ..Default::default()
        };
        assert_eq!(config.capacity(), 12);
        assert_eq!(cell_count(-1, 4), 0);
    }

    #[test]
    fn test_validate_rejects_bad_arena() {
        let negative = ArenaConfig {
            max_x: -1,
            ..Default::default()
        };
        assert!(matches!(negative.validate(), Err(Error::InvalidBounds { .. })));

        let crowded = ArenaConfig {
            max_x: 1,
            max_y: 1,
            population: 5,
            ..Default::default()
        };
        assert!(matches!(
            crowded.validate(),
            Err(Error::BoardFull {
                requested: 5,
                capacity: 4
            })
        ));

        let full = ArenaConfig {
            max_x: 1,
            max_y: 1,
            population: 4,
            ..Default::default()
        };
        assert!(full.validate().is_ok());
    }

    #[test]
    fn test_speed_presets() {
        assert_eq!(Speed::Turtle.interval(), Duration::from_millis(1000));
        assert_eq!(Speed::Lightning.interval(), Duration::from_millis(20));
        assert_eq!(Speed::Lightning.faster(), Speed::Lightning);
        assert_eq!(Speed::Turtle.slower(), Speed::Turtle);
        assert_eq!(Speed::Normal.faster().slower(), Speed::Normal);

        let intervals: Vec<_> = Speed::all().iter().map(|s| s.interval()).collect();
        assert!(intervals.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_runner_config_partial_json() {
        let config: RunnerConfig =
            serde_json::from_str(r#"{"speed": "fast", "arena": {"max_x": 10}}"#).unwrap();
        assert_eq!(config.speed, Speed::Fast);
        assert_eq!(config.arena.max_x, 10);
        assert_eq!(config.arena.max_y, ArenaConfig::default().max_y);
        assert!(config.render_frames);
    }
}
