use std::{
    env, fmt,
    path::{Path, PathBuf},
};

use log::debug;

use crate::{error::AppError, Seconds};

pub const SMTP_SERVER: &str = "SMTP_SERVER";
pub const SMTP_PORT: &str = "SMTP_PORT";
pub const SMTP_USERNAME: &str = "SMTP_USERNAME";
pub const SMTP_PASSWORD: &str = "SMTP_PASSWORD";
pub const SMTP_TIMEOUT: &str = "SMTP_TIMEOUT";
pub const EMAIL_SENDER: &str = "EMAIL_SENDER";
pub const EMAIL_RECEIVERS: &str = "EMAIL_RECEIVERS";
pub const LOG_DIR: &str = "LOG_DIR";

pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_LOG_DIR: &str = "/var/log";
pub const DEFAULT_CONNECT_TIMEOUT: u8 = 10;

/// Every variable read, with a note for the optional ones. Used for remediation text.
pub const KNOWN_VARIABLES: [(&str, Option<&str>); 8] = [
    (SMTP_SERVER, None),
    (SMTP_PORT, Some("optional, default 587")),
    (SMTP_USERNAME, None),
    (SMTP_PASSWORD, None),
    (EMAIL_SENDER, None),
    (EMAIL_RECEIVERS, Some("comma separated")),
    (LOG_DIR, Some("optional, default /var/log")),
    (SMTP_TIMEOUT, Some("optional, seconds, default 10")),
];

#[derive(Debug, Clone)]
pub struct Config {
    pub smtp_server: String,

    pub smtp_port: u16,

    pub username: String,

    pub password: Password,

    /// Address used in the From header
    pub sender: String,

    /// Recipients in the order they were configured
    pub receivers: Vec<String>,

    /// Directory searched in log mode
    pub log_dir: PathBuf,

    /// Limit on establishing the connection, also used as the read/write timeout of every later command
    pub connect_timeout: Seconds,
}

impl Config {
    /// Loads the dotenv file (if any) into the process environment then reads the config from it
    ///
    /// Without `env_file` a `.env` in the working directory is used if present. An explicitly
    /// requested file must exist. Variables already set in the environment take precedence.
    pub fn load(env_file: Option<&Path>) -> Result<Config, AppError> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(|source| AppError::EnvFile {
                    path: path.to_path_buf(),
                    source,
                })?;
                debug!("Loaded environment from {path:?}");
            }
            None => match dotenvy::dotenv() {
                Ok(path) => debug!("Loaded environment from {path:?}"),
                Err(e) => debug!("No .env file loaded: {e}"),
            },
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config using `lookup` to resolve variable names
    pub fn from_lookup<F>(lookup: F) -> Result<Config, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut missing = vec![];
        let mut required = |key: &'static str| {
            get(key).unwrap_or_else(|| {
                missing.push(key);
                String::new()
            })
        };

        let smtp_server = required(SMTP_SERVER).trim().to_string();
        let username = required(SMTP_USERNAME);
        let password = Password(required(SMTP_PASSWORD));
        let sender = required(EMAIL_SENDER).trim().to_string();
        let receivers = split_receivers(&required(EMAIL_RECEIVERS));
        if receivers.is_empty() && !missing.contains(&EMAIL_RECEIVERS) {
            // Only separators were given
            missing.push(EMAIL_RECEIVERS);
        }
        if !missing.is_empty() {
            return Err(AppError::MissingConfig(missing));
        }

        let smtp_port = match get(SMTP_PORT) {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::InvalidPort(port))?,
            None => DEFAULT_SMTP_PORT,
        };
        let connect_timeout = match get(SMTP_TIMEOUT) {
            Some(secs) => Seconds::try_from(secs.as_str())?,
            None => DEFAULT_CONNECT_TIMEOUT.into(),
        };
        let log_dir = get(LOG_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));

        let result = Config {
            smtp_server,
            smtp_port,
            username,
            password,
            sender,
            receivers,
            log_dir,
            connect_timeout,
        };
        debug!("Config loaded: {result:?}");
        Ok(result)
    }
}

fn split_receivers(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Keeps the SMTP password out of debug output
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Password {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Password(***)")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use rstest::rstest;

    fn full_env() -> HashMap<&'static str, String> {
        HashMap::from([
            (SMTP_SERVER, "smtp.example.com".to_string()),
            (SMTP_USERNAME, "robot".to_string()),
            (SMTP_PASSWORD, "hunter2".to_string()),
            (EMAIL_SENDER, "robot@example.com".to_string()),
            (EMAIL_RECEIVERS, "a@x.com,b@x.com".to_string()),
        ])
    }

    fn load(env: &HashMap<&'static str, String>) -> Result<Config, AppError> {
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_applied() {
        let config = load(&full_env()).unwrap();
        assert_eq!(config.smtp_port, 587);
        assert_eq!(config.log_dir, PathBuf::from("/var/log"));
        assert_eq!(config.connect_timeout, Seconds::from(10));
        assert_eq!(config.receivers, vec!["a@x.com", "b@x.com"]);
    }

    #[test]
    fn optional_values_override_defaults() {
        let mut env = full_env();
        env.insert(SMTP_PORT, "2525".to_string());
        env.insert(LOG_DIR, "/srv/app/logs".to_string());
        env.insert(SMTP_TIMEOUT, "3".to_string());
        let config = load(&env).unwrap();
        assert_eq!(config.smtp_port, 2525);
        assert_eq!(config.log_dir, PathBuf::from("/srv/app/logs"));
        assert_eq!(config.connect_timeout, Seconds::from(3));
    }

    #[rstest]
    #[case(SMTP_SERVER)]
    #[case(SMTP_USERNAME)]
    #[case(SMTP_PASSWORD)]
    #[case(EMAIL_SENDER)]
    #[case(EMAIL_RECEIVERS)]
    fn missing_required(#[case] key: &'static str) {
        let mut env = full_env();
        env.remove(key);
        match load(&env) {
            Err(AppError::MissingConfig(missing)) => assert_eq!(missing, vec![key]),
            other => panic!("expected MissingConfig for {key}, got {other:?}"),
        }
    }

    #[rstest]
    #[case(SMTP_SERVER)]
    #[case(SMTP_PASSWORD)]
    #[case(EMAIL_RECEIVERS)]
    fn empty_counts_as_missing(#[case] key: &'static str) {
        let mut env = full_env();
        env.insert(key, "  ".to_string());
        assert!(matches!(load(&env), Err(AppError::MissingConfig(_))));
    }

    #[test]
    fn receivers_of_only_separators_is_missing() {
        let mut env = full_env();
        env.insert(EMAIL_RECEIVERS, " , ,".to_string());
        match load(&env) {
            Err(AppError::MissingConfig(missing)) => assert_eq!(missing, vec![EMAIL_RECEIVERS]),
            other => panic!("expected MissingConfig, got {other:?}"),
        }
    }

    #[test]
    fn all_missing_reported_together() {
        match load(&HashMap::new()) {
            Err(AppError::MissingConfig(missing)) => assert_eq!(missing.len(), 5),
            other => panic!("expected MissingConfig, got {other:?}"),
        }
    }

    #[test]
    fn bad_port_rejected() {
        let mut env = full_env();
        env.insert(SMTP_PORT, "smtp".to_string());
        assert!(matches!(load(&env), Err(AppError::InvalidPort(p)) if p == "smtp"));
    }

    #[test]
    fn receivers_trimmed_and_ordered() {
        assert_eq!(
            split_receivers(" b@x.com , a@x.com,,c@x.com "),
            vec!["b@x.com", "a@x.com", "c@x.com"]
        );
    }

    #[test]
    fn password_not_in_debug() {
        let config = load(&full_env()).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert_eq!(config.password.expose(), "hunter2");
    }
}
