//! Error types.
//!
//! [`AppError`] covers everything that stops the program before or instead of
//! sending, [`SendError`] covers a failed SMTP exchange.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::KNOWN_VARIABLES;

/// Fatal configuration and input errors. `main` prints these and exits with 1.
#[derive(Debug, Error)]
pub enum AppError {
    /// One or more required environment variables are absent or empty.
    #[error("missing required configuration: {}", .0.join(", "))]
    MissingConfig(Vec<&'static str>),

    #[error("SMTP_PORT is not a valid port number: {0:?}")]
    InvalidPort(String),

    #[error("SMTP_TIMEOUT is not a valid number of seconds (1-255): {0:?}")]
    InvalidTimeout(String),

    /// The explicitly requested dotenv file could not be loaded.
    #[error("failed to load environment file {path:?}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("no message or --log given")]
    NoArguments,

    #[error("date format is incorrect: {0:?}")]
    InvalidDate(String),

    #[error("log directory {0:?} does not exist")]
    LogDirMissing(PathBuf),

    #[error("failed to list log directory {path:?}: {source}")]
    LogDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no log files found for {date}")]
    NoMatchingLogs { date: String, pattern: String },

    #[error("invalid search pattern {pattern:?}: {source}")]
    BadPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl AppError {
    /// Remediation lines to show the operator after the error itself
    pub fn hints(&self) -> Vec<String> {
        match self {
            AppError::MissingConfig(_) => {
                let mut result =
                    vec!["Make sure the following variables are set (e.g. in .env):".to_string()];
                result.extend(KNOWN_VARIABLES.iter().map(|(name, note)| match note {
                    Some(note) => format!("- {name} ({note})"),
                    None => format!("- {name}"),
                }));
                result
            }
            AppError::InvalidDate(_) => {
                vec!["Expected YYYY-MM-DD, for example: 2024-03-20".to_string()]
            }
            AppError::NoArguments => vec![
                format!("Usage: {} <message>", crate::PROGRAM_NAME),
                format!("   or: {} --log [YYYY-MM-DD]", crate::PROGRAM_NAME),
            ],
            AppError::LogDirMissing(_) => {
                vec!["Check LOG_DIR points at an existing directory".to_string()]
            }
            AppError::NoMatchingLogs { date, pattern } => vec![
                format!("Searched with pattern: {pattern}"),
                "Please confirm:".to_string(),
                format!("1. The log file name contains the date {date}"),
                "2. The log file extension is .log".to_string(),
                "3. You have permission to access the directory and files".to_string(),
            ],
            AppError::InvalidPort(_)
            | AppError::InvalidTimeout(_)
            | AppError::EnvFile { .. }
            | AppError::LogDirUnreadable { .. }
            | AppError::BadPattern { .. } => vec![],
        }
    }
}

/// Why a single send attempt failed. Never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    #[error("authentication failed, please check the username and password")]
    AuthenticationFailed,

    /// The server answered but refused or misunderstood a command
    #[error("SMTP error: {0}")]
    ProtocolFailure(String),

    /// Network, TLS or timeout problem talking to the server
    #[error("connection error: {0}")]
    ConnectionFailure(String),

    /// The message could not be built (usually an invalid address)
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_lists_names() {
        let err = AppError::MissingConfig(vec!["SMTP_SERVER", "EMAIL_RECEIVERS"]);
        assert_eq!(
            err.to_string(),
            "missing required configuration: SMTP_SERVER, EMAIL_RECEIVERS"
        );
    }

    #[test]
    fn missing_config_hints_cover_all_variables() {
        let hints = AppError::MissingConfig(vec!["SMTP_SERVER"]).hints();
        for (name, _) in KNOWN_VARIABLES {
            assert!(hints.iter().any(|h| h.contains(name)), "no hint for {name}");
        }
    }

    #[test]
    fn no_matching_logs_hints() {
        let hints = AppError::NoMatchingLogs {
            date: "2024-03-20".to_string(),
            pattern: "/var/log/*2024-03-20*.log".to_string(),
        }
        .hints();
        assert!(hints.iter().any(|h| h.contains("2024-03-20")));
        assert!(hints.iter().any(|h| h.contains(".log")));
        assert!(hints.iter().any(|h| h.contains("permission")));
    }

    #[test]
    fn auth_failure_is_distinct() {
        let auth = SendError::AuthenticationFailed.to_string();
        let other = SendError::ProtocolFailure("550 nope".to_string()).to_string();
        assert!(auth.contains("authentication failed"));
        assert!(!other.contains("authentication failed"));
    }
}
