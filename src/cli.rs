use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::{debug, LevelFilter};

#[derive(Parser, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default)]
#[command(
    author,
    version,
    about,
    long_about = "Sends a notification email with either the given message or the day's log files.\n\n\
                  SMTP settings are read from the environment (or a .env file): SMTP_SERVER, \
                  SMTP_PORT, SMTP_USERNAME, SMTP_PASSWORD, EMAIL_SENDER, EMAIL_RECEIVERS, \
                  LOG_DIR and SMTP_TIMEOUT."
)]
pub struct Cli {
    /// Message to send, words are joined with spaces
    ///
    /// Words are ignored in log mode.
    #[arg(value_name = "MESSAGE", trailing_var_arg = true, allow_hyphen_values = true)]
    pub message: Vec<String>,

    /// Send the log files for a date instead of a message
    ///
    /// Matches `*<date>*.log` in LOG_DIR. If no date is given today's date is used.
    #[arg(long, value_name = "YYYY-MM-DD", num_args = 0..=1)]
    pub log: Option<Option<String>>,

    /// Specify the environment file to load
    ///
    /// If not specified uses `.env` in the working directory when present
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Exit with status 2 when the email could not be sent
    ///
    /// Without this a failed send is reported but the exit status is still 0
    #[arg(long)]
    pub fail_on_send_error: bool,

    /// Set logging level to use for diagnostics on stderr
    #[arg(long, short, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,
}

/// What the invocation asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Send these words as the message body
    Plain(Vec<String>),

    /// Send the log digest for this date (today if not given)
    Log(Option<String>),
}

impl Cli {
    /// None if neither a message nor `--log` was given
    pub fn mode(&self) -> Option<Mode> {
        match (&self.log, self.message.is_empty()) {
            (Some(date), empty) => {
                if !empty {
                    debug!("Ignoring words after --log: {:?}", self.message);
                }
                Some(Mode::Log(date.clone()))
            }
            (None, false) => Some(Mode::Plain(self.message.clone())),
            (None, true) => None,
        }
    }
}

/// Exists to provide better help messages variants copied from LevelFilter as
/// that's the type that is actually needed
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum LogLevel {
    /// Nothing emitted in this mode
    #[default]
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("log_notify").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_has_no_mode() {
        assert_eq!(parse(&[]).mode(), None);
    }

    #[test]
    fn words_are_plain_mode() {
        assert_eq!(
            parse(&["hello", "world"]).mode(),
            Some(Mode::Plain(vec!["hello".to_string(), "world".to_string()]))
        );
    }

    #[rstest]
    #[case(&["--log"], None)]
    #[case(&["--log", "2024-03-20"], Some("2024-03-20"))]
    fn log_mode(#[case] args: &[&str], #[case] date: Option<&str>) {
        assert_eq!(
            parse(args).mode(),
            Some(Mode::Log(date.map(str::to_string)))
        );
    }

    #[test]
    fn leading_hyphen_word_is_plain_mode() {
        assert_eq!(
            parse(&["-5C", "outside"]).mode(),
            Some(Mode::Plain(vec!["-5C".to_string(), "outside".to_string()]))
        );
    }

    #[test]
    fn known_flag_before_message_still_parsed() {
        let cli = parse(&["-l", "debug", "-5C", "outside"]);
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(
            cli.mode(),
            Some(Mode::Plain(vec!["-5C".to_string(), "outside".to_string()]))
        );
    }

    #[test]
    fn extra_words_in_log_mode_ignored() {
        assert_eq!(
            parse(&["--log", "2024-03-20", "extra", "words"]).mode(),
            Some(Mode::Log(Some("2024-03-20".to_string())))
        );
    }

    #[test]
    fn log_after_message_is_part_of_message() {
        assert_eq!(
            parse(&["disk", "--log", "full"]).mode(),
            Some(Mode::Plain(vec![
                "disk".to_string(),
                "--log".to_string(),
                "full".to_string()
            ]))
        );
    }

    #[test]
    fn options_parsed() {
        let cli = parse(&["--env-file", "/etc/notify.env", "--fail-on-send-error", "-l", "debug", "hi"]);
        assert_eq!(cli.env_file, Some(PathBuf::from("/etc/notify.env")));
        assert!(cli.fail_on_send_error);
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.mode(), Some(Mode::Plain(vec!["hi".to_string()])));
    }

    #[test]
    fn default_log_level_is_warn() {
        assert_eq!(parse(&["hi"]).log_level, LogLevel::Warn);
        assert!(!parse(&["hi"]).fail_on_send_error);
    }
}
