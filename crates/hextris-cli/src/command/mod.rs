use clap::{Parser, Subcommand};

use crate::command::play::PlayArg;

mod play;
mod scores;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Hexagonal falling-block puzzle", long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play an interactive game (the default)
    Play(#[clap(flatten)] PlayArg),
    /// Watch the autoplay planner play a demo game
    Demo,
    /// Print the high-score table
    Scores,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run_play(&arg)?,
        Mode::Demo => play::run_demo()?,
        Mode::Scores => scores::run()?,
    }
    Ok(())
}
