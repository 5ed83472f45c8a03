mod cli;
pub mod config;
pub mod error;
mod logging;
pub mod logs;
pub mod notification;
mod units;
mod utils;

pub use cli::{Cli, LogLevel, Mode};
pub use config::Config;
pub use error::{AppError, SendError};
pub use logging::init_logging;
pub use notification::{Email, Notification};
pub use units::Seconds;

use log::debug;

use crate::logs::{find_log_files, render_log_digest, LogDate};

/// Name used in usage text
pub const PROGRAM_NAME: &str = env!("CARGO_PKG_NAME");

/// Runs one invocation, the result is whether the email was accepted by the server
///
/// Arguments are checked before the configuration and nothing is sent unless both are valid.
pub fn run(cli: &Cli) -> Result<bool, AppError> {
    let mode = cli.mode().ok_or(AppError::NoArguments)?;
    let config = Config::load(cli.env_file.as_deref())?;
    let notification = build_notification(&mode, &config)?;
    debug!("Sending {:?}", notification.subject);
    Ok(Email::new(&config).send(&notification))
}

/// Turns the requested mode into the notification to send, reading log files if needed
pub fn build_notification(mode: &Mode, config: &Config) -> Result<Notification, AppError> {
    match mode {
        Mode::Plain(words) => Ok(Notification::plain_message(words)),
        Mode::Log(date) => {
            let date = LogDate::parse(date.as_deref())?;
            let files = find_log_files(&config.log_dir, &date)?;
            Ok(Notification::log_digest(&date, render_log_digest(&files)))
        }
    }
}
