use std::path::PathBuf;

use orbtris_engine::{GameSeed, GameSession, SessionConfig};

use crate::{tui::Runtime, util};

use self::app::PlayApp;

mod app;

pub(crate) const DEFAULT_LEADERBOARD_PATH: &str = "./data/leaderboard.json";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Session config file (JSON); flags below override its values
    #[clap(long)]
    config: Option<PathBuf>,
    /// Board height in rows
    #[clap(long)]
    rows: Option<usize>,
    /// Board width in columns
    #[clap(long)]
    cols: Option<usize>,
    /// Game ticks per second
    #[clap(long)]
    fps: Option<u32>,
    /// Seed for a reproducible game (32 hex digits)
    #[clap(long)]
    seed: Option<GameSeed>,
    /// Path to the leaderboard file
    #[clap(long, default_value = DEFAULT_LEADERBOARD_PATH)]
    leaderboard: PathBuf,
    /// Write log records to this file
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            config: None,
            rows: None,
            cols: None,
            fps: None,
            seed: None,
            leaderboard: PathBuf::from(DEFAULT_LEADERBOARD_PATH),
            log_file: None,
        }
    }
}

impl PlayArg {
    pub(crate) fn session_config(&self) -> anyhow::Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_config_file(path)?,
            None => SessionConfig::default(),
        };
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        Ok(config)
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    util::init_logger(arg.log_file.as_ref())?;

    let config = arg.session_config()?;
    let session = GameSession::new(config)?;
    let leaderboard = util::read_leaderboard_file(&arg.leaderboard)?;

    let mut app = PlayApp::new(session, leaderboard);
    Runtime::new().run(&mut app)?;

    if app.is_leaderboard_changed() {
        util::write_leaderboard_file(&arg.leaderboard, app.leaderboard())?;
        log::info!("saved leaderboard to {}", arg.leaderboard.display());
    }
    Ok(())
}
