mod email;

pub use email::{build_message, Email, SENDER_DISPLAY_NAME};

use lettre::message::header::ContentType;

use crate::logs::LogDate;

/// Subject used for plain messages
pub const PLAIN_SUBJECT: &str = "System notification";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentKind {
    #[default]
    Html,
    Plain,
}

impl From<ContentKind> for ContentType {
    fn from(value: ContentKind) -> Self {
        match value {
            ContentKind::Html => ContentType::TEXT_HTML,
            ContentKind::Plain => ContentType::TEXT_PLAIN,
        }
    }
}

/// What is about to be sent, independent of who it goes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
    pub content_type: ContentKind,
}

impl Notification {
    /// Words are joined with single spaces. Sent as HTML like every other notification.
    pub fn plain_message<S: AsRef<str>>(words: &[S]) -> Self {
        let body = words
            .iter()
            .map(|word| word.as_ref())
            .collect::<Vec<&str>>()
            .join(" ");
        Self {
            subject: PLAIN_SUBJECT.to_string(),
            body,
            content_type: ContentKind::Html,
        }
    }

    pub fn log_digest(date: &LogDate, digest: String) -> Self {
        Self {
            subject: format!("Log notification - {date}"),
            body: digest,
            content_type: ContentKind::Html,
        }
    }
}
