//! Notifier error types.

/// Errors raised while composing or delivering a report email.
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    /// Missing or invalid email setting.
    #[error("email config error: {field}: {reason}")]
    Config { field: String, reason: String },

    /// Sender or recipient is not a valid mailbox.
    #[error("invalid email address '{address}': {reason}")]
    Address { address: String, reason: String },

    /// A report file could not be read for attachment.
    #[error("failed to read attachment {path}: {reason}")]
    Attachment { path: String, reason: String },

    /// MIME message could not be built.
    #[error("failed to compose email: {0}")]
    Compose(String),

    /// SMTP connection, authentication or submission failed.
    #[error("failed to send email: {0}")]
    Transport(String),
}
