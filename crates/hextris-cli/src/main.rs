mod command;
mod config_file;
mod high_score;
mod ui;

fn main() -> anyhow::Result<()> {
    command::run()
}
