use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// File-backed to-do list.
/// Storage defaults to the platform data directory or a path passed via --dir.
#[derive(Parser)]
#[command(name = "taskdeck", version, about = "Daily to-do list manager")]
pub struct Cli {
    /// Directory holding the task list and theme files.
    #[arg(long, global = true, env = "TASKDECK_DIR")]
    pub dir: Option<PathBuf>,

    /// Log filter: error | warn | info | debug | trace, or a tracing directive.
    #[arg(long, global = true, env = "TASKDECK_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}
