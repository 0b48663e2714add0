//! Notifier configuration.
//!
//! [`NotifierConfig`] is built from the `[email]` section of
//! [`CxflowConfig`](cxflow_core::config::CxflowConfig). The SMTP password is
//! never part of it; [`NotifierConfig::password`] reads it from the
//! environment variable the section names.

use cxflow_core::config::EmailConfig;
use lettre::message::Mailbox;

use crate::error::NotifierError;

/// Placeholder substituted with the project name in the subject template.
const PROJECT_PLACEHOLDER: &str = "{project}";

/// SMTP and message settings for report emails.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub sender: String,
    pub recipient: String,
    /// SMTP login; the sender address when empty.
    pub username: String,
    /// Name of the environment variable holding the SMTP password.
    pub password_env: String,
    /// Subject template, `{project}` is replaced.
    pub subject: String,
    pub body: String,
}

impl NotifierConfig {
    /// Build from the core `[email]` section.
    pub fn from_core(email: &EmailConfig) -> Self {
        Self {
            smtp_host: email.smtp_host.clone(),
            smtp_port: email.smtp_port,
            sender: email.sender.clone(),
            recipient: email.recipient.clone(),
            username: email.login().to_owned(),
            password_env: email.password_env.clone(),
            subject: email.subject.clone(),
            body: email.body.clone(),
        }
    }

    /// Check the settings needed to send.
    ///
    /// Addresses must parse as mailboxes; the password variable is not read
    /// here.
    pub fn validate(&self) -> Result<(), NotifierError> {
        if self.smtp_host.is_empty() {
            return Err(NotifierError::Config {
                field: "smtp_host".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if self.smtp_port == 0 {
            return Err(NotifierError::Config {
                field: "smtp_port".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        if self.password_env.is_empty() {
            return Err(NotifierError::Config {
                field: "password_env".to_owned(),
                reason: "must name an environment variable".to_owned(),
            });
        }

        self.sender_mailbox()?;
        self.recipient_mailbox()?;
        Ok(())
    }

    /// SMTP password from the configured environment variable.
    pub fn password(&self) -> Result<String, NotifierError> {
        match std::env::var(&self.password_env) {
            Ok(value) if !value.is_empty() => Ok(value),
            _ => Err(NotifierError::Config {
                field: "password_env".to_owned(),
                reason: format!("environment variable {} is not set", self.password_env),
            }),
        }
    }

    /// Subject line for `project`.
    pub fn subject_for(&self, project: &str) -> String {
        self.subject.replace(PROJECT_PLACEHOLDER, project)
    }

    pub fn sender_mailbox(&self) -> Result<Mailbox, NotifierError> {
        parse_mailbox(&self.sender)
    }

    pub fn recipient_mailbox(&self) -> Result<Mailbox, NotifierError> {
        parse_mailbox(&self.recipient)
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self::from_core(&EmailConfig::default())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifierError> {
    address.parse::<Mailbox>().map_err(|e| NotifierError::Address {
        address: address.to_owned(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn valid() -> NotifierConfig {
        NotifierConfig {
            sender: "scanner@example.com".to_owned(),
            recipient: "security@example.com".to_owned(),
            ..NotifierConfig::default()
        }
    }

    #[test]
    fn from_core_uses_sender_as_login_when_username_empty() {
        let email = EmailConfig {
            sender: "scanner@example.com".to_owned(),
            ..EmailConfig::default()
        };
        let config = NotifierConfig::from_core(&email);
        assert_eq!(config.username, "scanner@example.com");
        assert_eq!(config.smtp_port, 587);
    }

    #[test]
    fn subject_substitutes_project() {
        let config = NotifierConfig::default();
        assert_eq!(
            config.subject_for("payments"),
            "Checkmarx Scan Report for payments"
        );
    }

    #[test]
    fn validate_accepts_complete_settings() {
        valid().validate().unwrap();
    }

    #[test]
    fn validate_rejects_malformed_recipient() {
        let config = NotifierConfig {
            recipient: "not an address".to_owned(),
            ..valid()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, NotifierError::Address { ref address, .. } if address == "not an address"));
    }

    #[test]
    fn validate_rejects_zero_port() {
        let config = NotifierConfig {
            smtp_port: 0,
            ..valid()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            NotifierError::Config { ref field, .. } if field == "smtp_port"
        ));
    }

    #[test]
    #[serial]
    fn password_reads_named_variable() {
        let config = NotifierConfig {
            password_env: "CXFLOW_TEST_SMTP_PASSWORD".to_owned(),
            ..valid()
        };

        // SAFETY: #[serial] keeps env-mutating tests from running concurrently.
        unsafe { std::env::set_var("CXFLOW_TEST_SMTP_PASSWORD", "hunter2") };
        let result = config.password();
        unsafe { std::env::remove_var("CXFLOW_TEST_SMTP_PASSWORD") };

        assert_eq!(result.unwrap(), "hunter2");
    }

    #[test]
    #[serial]
    fn password_missing_variable_is_config_error() {
        let config = NotifierConfig {
            password_env: "CXFLOW_TEST_SMTP_PASSWORD_UNSET".to_owned(),
            ..valid()
        };
        let err = config.password().unwrap_err();
        assert!(err.to_string().contains("CXFLOW_TEST_SMTP_PASSWORD_UNSET"));
    }
}
