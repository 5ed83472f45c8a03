use lettre::{
    message::{Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        self,
        authentication::{Credentials, Mechanism},
        client::{SmtpConnection, TlsParameters},
        extension::ClientId,
    },
    Address, Message,
};
use log::{debug, warn};

use super::Notification;
use crate::{config::Config, error::SendError, utils::make_single_line};

/// Display name shown in the From header
pub const SENDER_DISPLAY_NAME: &str = "Log Notifier";

const AUTH_MECHANISMS: [Mechanism; 2] = [Mechanism::Plain, Mechanism::Login];

/// Sends notifications over SMTP, one connection per send
pub struct Email<'a> {
    config: &'a Config,
}

impl<'a> Email<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Sends `notification` to every configured receiver, reporting progress on stdout
    ///
    /// Returns true only if the server accepted the message. Failures are not retried.
    pub fn send(&self, notification: &Notification) -> bool {
        match self.try_send(notification) {
            Ok(()) => {
                println!("✓ Email sent successfully!");
                true
            }
            Err(e) => {
                debug!("Failed to send {:?}: {e:?}", notification.subject);
                println!("Error: failed to send email");
                println!("Reason: {e}");
                false
            }
        }
    }

    pub fn try_send(&self, notification: &Notification) -> Result<(), SendError> {
        let mut session = SmtpSession::open(self.config)?;
        let message = build_message(self.config, notification)?;
        session.deliver(&message)
    }
}

/// Builds the message with the sender, every receiver (in order) and a single body part
pub fn build_message(config: &Config, notification: &Notification) -> Result<Message, SendError> {
    let sender: Address = config.sender.parse().map_err(|e| {
        SendError::InvalidMessage(format!("sender address {:?}: {e}", config.sender))
    })?;
    let mut builder = Message::builder()
        .from(Mailbox::new(Some(SENDER_DISPLAY_NAME.to_string()), sender))
        .subject(notification.subject.as_str());
    for receiver in &config.receivers {
        let mailbox: Mailbox = receiver.parse().map_err(|e| {
            SendError::InvalidMessage(format!("receiver address {receiver:?}: {e}"))
        })?;
        builder = builder.to(mailbox);
    }

    let body = SinglePart::builder()
        .header(lettre::message::header::ContentType::from(
            notification.content_type,
        ))
        .body(notification.body.clone());
    builder
        .multipart(MultiPart::mixed().singlepart(body))
        .map_err(|e| SendError::InvalidMessage(e.to_string()))
}

/// Open, authenticated SMTP connection. QUIT is sent when dropped.
struct SmtpSession {
    conn: SmtpConnection,
}

impl SmtpSession {
    /// Connects, upgrades with STARTTLS when offered and logs in
    fn open(config: &Config) -> Result<Self, SendError> {
        let hello_name = ClientId::default();
        let addr = (config.smtp_server.as_str(), config.smtp_port);
        debug!(
            "Connecting to {}:{} with timeout {}s",
            config.smtp_server, config.smtp_port, config.connect_timeout
        );
        let conn = SmtpConnection::connect(
            addr,
            Some(config.connect_timeout.into()),
            &hello_name,
            None,
            None,
        )
        .map_err(|e| classify(&e))?;
        // From here on the guard owns the connection so every exit path closes it
        let mut session = Self { conn };
        println!("✓ Connected to SMTP server");

        if session.conn.can_starttls() {
            let tls = TlsParameters::new(config.smtp_server.clone()).map_err(|e| {
                SendError::ConnectionFailure(make_single_line(&e.to_string()).into_owned())
            })?;
            session
                .conn
                .starttls(&tls, &hello_name)
                .map_err(|e| classify(&e))?;
            debug!("Connection upgraded with STARTTLS");
        } else {
            warn!(
                "{} does not offer STARTTLS, continuing unencrypted",
                config.smtp_server
            );
        }
        println!("✓ Mail server: {}", config.smtp_server);
        debug!("Server info: {}", session.conn.server_info());

        let credentials =
            Credentials::new(config.username.clone(), config.password.expose().to_string());
        session
            .conn
            .auth(&AUTH_MECHANISMS, &credentials)
            .map_err(|e| {
                if e.is_permanent() {
                    SendError::AuthenticationFailed
                } else {
                    classify(&e)
                }
            })?;
        debug!("Logged in as {}", config.username);
        Ok(session)
    }

    fn deliver(&mut self, message: &Message) -> Result<(), SendError> {
        let response = self
            .conn
            .send(message.envelope(), &message.formatted())
            .map_err(|e| classify(&e))?;
        debug!("Message accepted: {response:?}");
        Ok(())
    }
}

impl Drop for SmtpSession {
    fn drop(&mut self) {
        match self.conn.quit() {
            Ok(_) => debug!("SMTP session closed"),
            Err(e) => {
                debug!("QUIT failed, dropping connection: {e}");
                self.conn.abort();
            }
        }
    }
}

/// Server replies become protocol failures, everything else is treated as a connection problem
fn classify(err: &smtp::Error) -> SendError {
    let msg = make_single_line(&err.to_string()).into_owned();
    if err.is_permanent() || err.is_transient() || err.is_response() || err.is_client() {
        SendError::ProtocolFailure(msg)
    } else {
        SendError::ConnectionFailure(msg)
    }
}
