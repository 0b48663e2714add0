//! Report email model and MIME composition.
//!
//! An [`EmailMessage`] is a subject, a plain-text body and zero or more
//! attachments. [`EmailMessage::compose`] turns it into a `multipart/mixed`
//! message in which every attachment is base64 encoded and typed
//! `application/octet-stream`, regardless of the report format.

use cxflow_core::types::ReportFile;
use lettre::Message;
use lettre::message::header::{ContentTransferEncoding, ContentType};
use lettre::message::{Attachment, Body, Mailbox, MultiPart, SinglePart};

use crate::error::NotifierError;

const ATTACHMENT_CONTENT_TYPE: &str = "application/octet-stream";

/// One attached file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAttachment {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl EmailAttachment {
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content,
        }
    }

    /// Read a report file from disk. The attachment is named after the
    /// file's base name.
    pub async fn read(report: &ReportFile) -> Result<Self, NotifierError> {
        let content = tokio::fs::read(&report.path)
            .await
            .map_err(|e| NotifierError::Attachment {
                path: report.path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self::new(report.file_name(), content))
    }
}

/// A report email before MIME encoding.
#[derive(Debug, Clone, Default)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
    pub attachments: Vec<EmailAttachment>,
}

impl EmailMessage {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            attachments: Vec::new(),
        }
    }

    pub fn attach(mut self, attachment: EmailAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Encode as a `multipart/mixed` message from `from` to `to`.
    pub fn compose(&self, from: Mailbox, to: Mailbox) -> Result<Message, NotifierError> {
        let content_type = ContentType::parse(ATTACHMENT_CONTENT_TYPE)
            .map_err(|e| NotifierError::Compose(e.to_string()))?;

        let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(self.body.clone()));
        for attachment in &self.attachments {
            let body = Body::new_with_encoding(attachment.content.clone(), ContentTransferEncoding::Base64)
                .map_err(|_| {
                    NotifierError::Compose(format!(
                        "cannot base64 encode attachment {}",
                        attachment.file_name
                    ))
                })?;
            parts = parts.singlepart(
                Attachment::new(attachment.file_name.clone()).body(body, content_type.clone()),
            );
        }

        Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject.clone())
            .multipart(parts)
            .map_err(|e| NotifierError::Compose(e.to_string()))
    }
}
