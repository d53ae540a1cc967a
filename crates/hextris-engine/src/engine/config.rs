use serde::{Deserialize, Serialize};

use crate::core::Severity;

/// Static parameters of a game, passed to the engine at construction.
///
/// Unknown or missing fields fall back to the defaults, so old config
/// files keep loading after new fields appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_width: usize,
    pub board_height: usize,
    pub preview_size: usize,
    pub severity: Severity,
    pub start_level: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 15,
            board_height: 27,
            preview_size: 6,
            severity: Severity::Medium,
            start_level: 1,
        }
    }
}

/// Persistence port for the configuration. The engine only ever consumes
/// a [`GameConfig`] value; loading and saving is driven by the
/// application shell through this trait.
pub trait ConfigStore {
    type Error;

    fn load(&self) -> Result<GameConfig, Self::Error>;
    fn save(&self, config: &GameConfig) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"severity":"expert"}"#).unwrap();
        assert_eq!(config.severity, Severity::Expert);
        assert_eq!(config.board_width, 15);
        assert_eq!(config.start_level, 1);
    }

    #[test]
    fn round_trips_through_json() {
        let config = GameConfig {
            severity: Severity::Beginner,
            start_level: 5,
            ..GameConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<GameConfig>(&json).unwrap(), config);
    }
}
