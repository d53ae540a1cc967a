use crate::high_score::HighScoreFile;

pub(crate) fn run() -> anyhow::Result<()> {
    let table = HighScoreFile::default_location()?.load()?;
    if table.entries().is_empty() {
        println!("no high scores yet");
        return Ok(());
    }
    println!("{:>4}  {:<16} {:>6}  {}", "#", "name", "lines", "date");
    for (rank, entry) in table.entries().iter().enumerate() {
        println!(
            "{:>4}  {:<16} {:>6}  {}",
            rank + 1,
            entry.name,
            entry.lines,
            entry.date.format("%Y-%m-%d"),
        );
    }
    Ok(())
}
