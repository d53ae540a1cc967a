use clap::ValueEnum;
use hextris_engine::{
    core::Severity,
    engine::{ConfigStore as _, Game, GameWorker, NewGameOptions},
};
use hextris_planner::AutoplayPlanner;

use crate::{
    config_file::{AppConfig, FileConfigStore},
    high_score::HighScoreFile,
    ui::GameApp,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SeverityArg {
    Beginner,
    Medium,
    Expert,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Beginner => Self::Beginner,
            SeverityArg::Medium => Self::Medium,
            SeverityArg::Expert => Self::Expert,
        }
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Shape-set difficulty; overrides the config file
    #[clap(long)]
    severity: Option<SeverityArg>,
    /// Starting level (1-10); overrides the config file
    #[clap(long)]
    start_level: Option<u32>,
}

pub(crate) fn run_play(arg: &PlayArg) -> anyhow::Result<()> {
    let store = FileConfigStore::default_location()?;
    let app_config = load_or_create(&store)?;

    let mut game_config = store.load()?;
    if let Some(severity) = arg.severity {
        game_config.severity = severity.into();
    }
    if let Some(start_level) = arg.start_level {
        game_config.start_level = start_level;
    }

    let options = NewGameOptions::standard(game_config.severity, game_config.start_level);
    run_session(game_config, app_config, options)
}

pub(crate) fn run_demo() -> anyhow::Result<()> {
    let store = FileConfigStore::default_location()?;
    let app_config = load_or_create(&store)?;
    let game_config = app_config.game.clone();
    run_session(game_config, app_config, NewGameOptions::demo())
}

/// First run writes the default config so it is there to edit.
fn load_or_create(store: &FileConfigStore) -> anyhow::Result<AppConfig> {
    let config = store.load_app()?;
    if !store.exists() {
        store.save_app(&config)?;
    }
    Ok(config)
}

fn run_session(
    game_config: hextris_engine::engine::GameConfig,
    app_config: AppConfig,
    options: NewGameOptions,
) -> anyhow::Result<()> {
    let scores = HighScoreFile::default_location()?;
    let game = Game::new(game_config).with_planner(Box::new(AutoplayPlanner::default()));
    let worker = GameWorker::spawn(game);
    worker.new_game(options);

    let mut app = GameApp::new(worker, app_config.keys, scores, options);
    ratatui::run(|terminal| app.run(terminal))?;
    Ok(())
}
