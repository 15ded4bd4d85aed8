use std::{
    io::{self, Write as _},
    path::PathBuf,
};

use anyhow::Context as _;

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct LeaderboardArg {
    /// Path to the leaderboard file
    #[clap(long, default_value = super::play::DEFAULT_LEADERBOARD_PATH)]
    leaderboard: PathBuf,
}

pub(crate) fn run(arg: &LeaderboardArg) -> anyhow::Result<()> {
    let leaderboard = util::read_leaderboard_file(&arg.leaderboard)?;
    let mut stdout = io::stdout().lock();
    for (i, entry) in leaderboard.entries().iter().enumerate() {
        writeln!(stdout, "{:>2}. {:<4}{:>10}", i + 1, entry.initials, entry.score)
            .context("Failed to write to stdout")?;
    }
    Ok(())
}
