//! Runtime configuration resolved from the command line and environment.

use std::path::PathBuf;

use crate::cli::Cli;

pub const APP_NAME: &str = "taskdeck";
const LOG_FILE: &str = "taskdeck.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding one JSON file per storage slot.
    pub data_dir: PathBuf,
    /// `tracing` filter directive, e.g. `warn` or `taskdeck=debug`.
    pub log_level: String,
}

impl Config {
    /// `--dir` / `TASKDECK_DIR` wins over the platform data directory.
    pub fn from_cli(cli: &Cli) -> Self {
        Config {
            data_dir: cli.dir.clone().unwrap_or_else(default_data_dir),
            log_level: cli.log_level.clone(),
        }
    }

    /// Where the interactive UI sends its logs.
    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

/// Platform data directory, then `$HOME/.taskdeck`, then `./.taskdeck`.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_NAME))
        .or_else(|| dirs::home_dir().map(|h| h.join(format!(".{APP_NAME}"))))
        .unwrap_or_else(|| PathBuf::from(format!(".{APP_NAME}")))
}
