//! Mail delivery abstraction.
//!
//! [`MailTransport`] is the seam between composing a message and putting it
//! on the wire. [`SmtpMailTransport`] submits over SMTP with STARTTLS and
//! username/password authentication.

use std::future::Future;

use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::config::NotifierConfig;
use crate::error::NotifierError;

/// Delivers a composed message.
///
/// # Implementations
/// - [`SmtpMailTransport`]: real SMTP submission
/// - test transports that record messages instead of sending them
pub trait MailTransport: Send + Sync + 'static {
    /// Submit `message` to its recipients.
    fn send(&self, message: Message) -> impl Future<Output = Result<(), NotifierError>> + Send;
}

/// SMTP submission with STARTTLS.
pub struct SmtpMailTransport {
    inner: AsyncSmtpTransport<Tokio1Executor>,
    endpoint: String,
}

impl SmtpMailTransport {
    /// Build a transport for `config`, authenticating with `password`.
    ///
    /// No connection is opened until the first message is sent.
    pub fn new(config: &NotifierConfig, password: String) -> Result<Self, NotifierError> {
        let credentials = Credentials::new(config.username.clone(), password);
        let inner = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| NotifierError::Config {
                field: "smtp_host".to_owned(),
                reason: e.to_string(),
            })?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            inner,
            endpoint: format!("{}:{}", config.smtp_host, config.smtp_port),
        })
    }

    /// Build a transport reading the password from the configured
    /// environment variable.
    pub fn from_env(config: &NotifierConfig) -> Result<Self, NotifierError> {
        let password = config.password()?;
        Self::new(config, password)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl MailTransport for SmtpMailTransport {
    async fn send(&self, message: Message) -> Result<(), NotifierError> {
        debug!(endpoint = %self.endpoint, "submitting email over SMTP");
        let response = self
            .inner
            .send(message)
            .await
            .map_err(|e| NotifierError::Transport(e.to_string()))?;
        debug!(code = %response.code(), "SMTP server accepted message");
        Ok(())
    }
}

/// Transport that records messages, optionally failing every send.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingTransport {
    sent: std::sync::Mutex<Vec<Message>>,
    fail_with: Option<String>,
}

#[cfg(test)]
impl RecordingTransport {
    pub fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_owned()),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().expect("sent lock").clone()
    }
}

#[cfg(test)]
impl MailTransport for RecordingTransport {
    async fn send(&self, message: Message) -> Result<(), NotifierError> {
        if let Some(reason) = &self.fail_with {
            return Err(NotifierError::Transport(reason.clone()));
        }
        self.sent.lock().expect("sent lock").push(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NotifierConfig {
        NotifierConfig {
            sender: "scanner@example.com".to_owned(),
            recipient: "security@example.com".to_owned(),
            username: "scanner@example.com".to_owned(),
            ..NotifierConfig::default()
        }
    }

    #[tokio::test]
    async fn smtp_transport_builds_without_connecting() {
        let transport = SmtpMailTransport::new(&config(), "secret".to_owned()).unwrap();
        assert_eq!(transport.endpoint(), "smtp.gmail.com:587");
    }

    #[test]
    fn from_env_without_password_fails() {
        let config = NotifierConfig {
            password_env: "CXFLOW_TEST_TRANSPORT_PASSWORD_UNSET".to_owned(),
            ..config()
        };
        let err = SmtpMailTransport::from_env(&config).err().unwrap();
        assert!(matches!(err, NotifierError::Config { .. }));
    }

    #[tokio::test]
    async fn recording_transport_fails_on_demand() {
        let transport = RecordingTransport::failing("535 authentication failed");
        let message = Message::builder()
            .from("a@example.com".parse().unwrap())
            .to("b@example.com".parse().unwrap())
            .subject("s")
            .body(String::from("b"))
            .unwrap();
        let err = transport.send(message).await.unwrap_err();
        assert!(err.to_string().contains("535"));
        assert!(transport.sent().is_empty());
    }
}
