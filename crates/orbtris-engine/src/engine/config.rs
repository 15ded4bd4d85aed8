use serde::{Deserialize, Serialize};

use super::{orb::ORB_SPAWN_TOP_ROWS, seed::GameSeed};

/// Columns a piece needs at its spawn anchor.
const MIN_COLS: usize = 7;

/// Settings a [`GameSession`](super::GameSession) is created from.
///
/// Every field has a default, so a JSON config only needs the keys it
/// overrides:
///
/// ```
/// use orbtris_engine::SessionConfig;
///
/// let config: SessionConfig = serde_json::from_str(r#"{ "fps": 30 }"#).unwrap();
/// assert_eq!(config.fps, 30);
/// assert_eq!(config.rows, 20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub rows: usize,
    pub cols: usize,
    /// Logical ticks per second.
    pub fps: u32,
    /// Probability that spawning a piece also spawns orbs.
    pub orb_spawn_chance: f64,
    /// Fixed RNG seed; a random one is drawn when absent.
    pub seed: Option<GameSeed>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 10,
            fps: 60,
            orb_spawn_chance: 0.3,
            seed: None,
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum ConfigError {
    #[display("board needs more than 4 rows, got {_0}")]
    TooFewRows(#[error(not(source))] usize),
    #[display("board needs at least 7 columns, got {_0}")]
    TooFewCols(#[error(not(source))] usize),
    #[display("fps must be positive")]
    ZeroFps,
    #[display("orb spawn chance must be within 0..=1, got {_0}")]
    InvalidSpawnChance(#[error(not(source))] f64),
}

impl SessionConfig {
    /// Checks that the board can hold spawned pieces and orbs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows <= ORB_SPAWN_TOP_ROWS {
            return Err(ConfigError::TooFewRows(self.rows));
        }
        if self.cols < MIN_COLS {
            return Err(ConfigError::TooFewCols(self.cols));
        }
        if self.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        if !(0.0..=1.0).contains(&self.orb_spawn_chance) {
            return Err(ConfigError::InvalidSpawnChance(self.orb_spawn_chance));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_small_boards() {
        let config = SessionConfig {
            rows: 4,
            ..SessionConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::TooFewRows(4)));

        let config = SessionConfig {
            rows: 5,
            cols: 6,
            ..SessionConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::TooFewCols(6)));
    }

    #[test]
    fn test_rejects_bad_rates() {
        let config = SessionConfig {
            fps: 0,
            ..SessionConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroFps));

        let config = SessionConfig {
            orb_spawn_chance: 1.5,
            ..SessionConfig::default()
        };
        assert!(config.validate().unwrap_err().is_invalid_spawn_chance());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<SessionConfig, _> = serde_json::from_str(r#"{ "colums": 12 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_seed_from_json() {
        let config: SessionConfig =
            serde_json::from_str(r#"{ "seed": "00000000000000000000000000000001" }"#).unwrap();
        assert_eq!(
            config.seed,
            Some(GameSeed::from_bytes([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]))
        );
    }
}
