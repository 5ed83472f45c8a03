use std::{env, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use log_notify::{
    config::{DEFAULT_LOG_DIR, LOG_DIR},
    logs::{find_log_files, render_log_digest, LogDate},
};

#[derive(Parser, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default)]
#[command(author, version, about)]
/// Prints the log digest `log_notify --log` would send, without sending anything
struct Cli {
    /// Date of the log files to include, defaults to today
    #[arg(value_name = "YYYY-MM-DD")]
    date: Option<String>,

    /// Directory to search
    ///
    /// If not specified uses LOG_DIR (from the environment or `.env`) then /var/log
    #[arg(long, short, value_name = "PATH")]
    dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_dir = match cli.dir {
        Some(dir) => dir,
        None => {
            let _ = dotenvy::dotenv();
            env::var_os(LOG_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))
        }
    };
    let date = LogDate::parse(cli.date.as_deref())?;
    let files = find_log_files(&log_dir, &date)
        .with_context(|| format!("Failed to find log files for {date} in {log_dir:?}"))?;
    println!("\n----- digest -----");
    println!("{}", render_log_digest(&files));
    Ok(())
}
