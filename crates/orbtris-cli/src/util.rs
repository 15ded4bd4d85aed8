use std::{
    fs::{self, File},
    io::{self, BufWriter, Write as _},
    path::Path,
};

use anyhow::Context;
use orbtris_engine::{Leaderboard, SessionConfig};

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Writes `value` as pretty JSON, creating parent directories as needed.
pub fn write_json_file<T, P>(file_kind: &str, path: P, value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create {} file: {}", file_kind, path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write {} JSON to {}", file_kind, path.display()))?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to flush {} file: {}", file_kind, path.display()))?;
    Ok(())
}

pub fn read_config_file<P>(path: P) -> anyhow::Result<SessionConfig>
where
    P: AsRef<Path>,
{
    read_json_file("config", path)
}

/// Loads the leaderboard, starting a fresh one if the file does not exist yet.
pub fn read_leaderboard_file<P>(path: P) -> anyhow::Result<Leaderboard>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        log::info!("no leaderboard at {}, starting empty", path.display());
        return Ok(Leaderboard::default());
    }
    read_json_file("leaderboard", path)
}

pub fn write_leaderboard_file<P>(path: P, leaderboard: &Leaderboard) -> anyhow::Result<()>
where
    P: AsRef<Path>,
{
    write_json_file("leaderboard", path, leaderboard)
}

/// Sends log records to `path`.
///
/// The terminal belongs to the UI while playing, so logging stays off unless
/// a file is given. `RUST_LOG` overrides the default `info` filter.
pub fn init_logger<P>(path: Option<P>) -> anyhow::Result<()>
where
    P: AsRef<Path>,
{
    let Some(path) = path else {
        return Ok(());
    };
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("Failed to install logger")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{env, path::PathBuf, process};

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir()
            .join(format!("orbtris-test-{}", process::id()))
            .join(name)
    }

    #[test]
    fn test_leaderboard_file_round_trip() {
        let path = temp_path("scores/leaderboard.json");
        let mut leaderboard = Leaderboard::default();
        leaderboard.insert("abc", 420);

        write_leaderboard_file(&path, &leaderboard).unwrap();
        let loaded = read_leaderboard_file(&path).unwrap();
        assert_eq!(loaded, leaderboard);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_leaderboard_is_default() {
        let loaded = read_leaderboard_file(temp_path("missing.json")).unwrap();
        assert_eq!(loaded, Leaderboard::default());
    }

    #[test]
    fn test_bad_config_reports_path() {
        let path = temp_path("bad-config.json");
        write_json_file("config", &path, &serde_json::json!({ "rows": "many" })).unwrap();
        let err = read_config_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("bad-config.json"));
        fs::remove_file(&path).unwrap();
    }
}
