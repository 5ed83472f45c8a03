use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::debug;
use log_notify::{init_logging, run, Cli};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.log_level.into()).context("Failed to start logging")?;
    let result = match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) if cli.fail_on_send_error => ExitCode::from(2),
        // A failed send has already been reported, exit status stays 0 unless asked otherwise
        Ok(false) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{e:?}");
            println!("Error: {e}");
            for hint in e.hints() {
                println!("{hint}");
            }
            ExitCode::from(1)
        }
    };
    Ok(result)
}
