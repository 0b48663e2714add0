#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`NotifierError`)
//! - [`config`]: Settings derived from `EmailConfig` (`NotifierConfig`)
//! - [`message`]: Message model and MIME composition (`EmailMessage`, `EmailAttachment`)
//! - [`transport`]: Delivery abstraction (`MailTransport` trait, `SmtpMailTransport`)
//! - [`notifier`]: Report mailing entry point (`Notifier`)

pub mod config;
pub mod error;
pub mod message;
pub mod notifier;
pub mod transport;

// --- Public API Re-exports ---

pub use config::NotifierConfig;
pub use error::NotifierError;
pub use message::{EmailAttachment, EmailMessage};
pub use notifier::Notifier;
pub use transport::{MailTransport, SmtpMailTransport};

// Re-exported so transport implementors need no direct lettre dependency.
pub use lettre::Message;
