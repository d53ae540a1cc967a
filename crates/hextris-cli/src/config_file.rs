use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use crossterm::event::KeyCode;
use hextris_engine::engine::{ConfigStore, GameConfig};
use serde::{Deserialize, Serialize};

/// Directory under the user's home that holds all persisted state.
pub const APP_DIR: &str = ".hextris";
const CONFIG_FILE: &str = "hextris.json";

/// Key bindings for the six game actions.
///
/// Defaults follow the arrow-key scheme of the desktop original: arrows
/// translate, `Up` rotates, `r` rotates the other way and `Space` drops
/// the stone to the bottom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub move_left: KeyCode,
    pub move_right: KeyCode,
    pub rotate_left: KeyCode,
    pub rotate_right: KeyCode,
    pub move_down: KeyCode,
    pub fall_down: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: KeyCode::Left,
            move_right: KeyCode::Right,
            rotate_left: KeyCode::Up,
            rotate_right: KeyCode::Char('r'),
            move_down: KeyCode::Down,
            fall_down: KeyCode::Char(' '),
        }
    }
}

/// Everything the config file stores: engine parameters plus the key
/// bindings the engine never sees.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub keys: KeyBindings,
}

/// JSON config store at `~/.hextris/hextris.json`. A missing file loads
/// as the default configuration.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn default_location() -> anyhow::Result<Self> {
        let home = std::env::var_os("HOME").context("HOME is not set")?;
        Ok(Self::with_path(
            Path::new(&home).join(APP_DIR).join(CONFIG_FILE),
        ))
    }

    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load_app(&self) -> anyhow::Result<AppConfig> {
        if !self.path.exists() {
            return Ok(AppConfig::default());
        }
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("malformed config file {}", self.path.display()))
    }

    pub fn save_app(&self, config: &AppConfig) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

impl ConfigStore for FileConfigStore {
    type Error = anyhow::Error;

    fn load(&self) -> Result<GameConfig, Self::Error> {
        Ok(self.load_app()?.game)
    }

    fn save(&self, config: &GameConfig) -> Result<(), Self::Error> {
        let mut app = self.load_app()?;
        app.game = config.clone();
        self.save_app(&app)
    }
}
