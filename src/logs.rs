//! Finding a day's log files and turning them into the HTML digest that gets mailed.

use std::{
    fmt::Display,
    fs,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDate};
use glob::Pattern;
use log::{debug, warn};

use crate::error::AppError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Body used when none of the located files could be read
pub const EMPTY_DIGEST: &str = "Log content is empty";

/// A `YYYY-MM-DD` date as typed by the operator (or today's date)
///
/// Kept exactly as typed, file names and the subject use this text rather than a re-formatted date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDate(String);

impl LogDate {
    /// Validates `date` or falls back to today (local time) if not given
    pub fn parse(date: Option<&str>) -> Result<Self, AppError> {
        match date {
            Some(date) => {
                NaiveDate::parse_from_str(date, DATE_FORMAT)
                    .map_err(|_| AppError::InvalidDate(date.to_string()))?;
                Ok(Self(date.to_string()))
            }
            None => Ok(Self::today()),
        }
    }

    pub fn today() -> Self {
        Self(Local::now().format(DATE_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for LogDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Glob matching any `.log` file in `log_dir` whose name contains `date`
pub fn search_pattern(log_dir: &Path, date: &LogDate) -> String {
    let escaped_dir = Pattern::escape(&log_dir.to_string_lossy());
    Path::new(&escaped_dir)
        .join(format!("*{date}*.log"))
        .to_string_lossy()
        .into_owned()
}

/// Finds the log files for `date` in `log_dir`
///
/// Prints the directory contents along the way to help the operator work out why a file was
/// not picked up. Never returns an empty list.
pub fn find_log_files(log_dir: &Path, date: &LogDate) -> Result<Vec<PathBuf>, AppError> {
    let pattern = search_pattern(log_dir, date);
    println!("Searching for log files...");
    println!("Log directory: {}", log_dir.display());
    println!("Search pattern: {pattern}");

    if !log_dir.is_dir() {
        return Err(AppError::LogDirMissing(log_dir.to_path_buf()));
    }

    println!("\nFiles in directory:");
    let entries = fs::read_dir(log_dir).map_err(|source| AppError::LogDirUnreadable {
        path: log_dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        match entry {
            Ok(entry) => println!("- {}", entry.file_name().to_string_lossy()),
            Err(e) => warn!("Failed to read an entry of {log_dir:?}: {e}"),
        }
    }

    let paths = glob::glob(&pattern).map_err(|source| AppError::BadPattern {
        pattern: pattern.clone(),
        source,
    })?;
    let mut result = vec![];
    for path in paths {
        match path {
            Ok(path) => result.push(path),
            Err(e) => warn!("Skipping path that could not be checked: {e}"),
        }
    }
    debug!("Matched log files: {result:?}");

    if result.is_empty() {
        println!();
        return Err(AppError::NoMatchingLogs {
            date: date.to_string(),
            pattern,
        });
    }
    Ok(result)
}

/// Renders each readable file as a heading plus a `<pre>` block, in the order given
///
/// File contents are inserted without HTML escaping. Files that cannot be read are reported
/// and skipped.
pub fn render_log_digest(paths: &[PathBuf]) -> String {
    let mut content = vec![];
    for path in paths {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                println!("Error reading log file {}: {e}", path.display());
                debug!("Skipped {path:?}: {e:?}");
                continue;
            }
        };
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        content.push(format!("<h3>{name}</h3>"));
        content.push("<pre>".to_string());
        content.push(text.trim().to_string());
        content.push("</pre>".to_string());
    }

    if content.is_empty() {
        EMPTY_DIGEST.to_string()
    } else {
        content.join("\n")
    }
}
