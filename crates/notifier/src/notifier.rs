//! Report mailing.

use cxflow_core::types::ReportFile;
use tracing::info;

use crate::config::NotifierConfig;
use crate::error::NotifierError;
use crate::message::{EmailAttachment, EmailMessage};
use crate::transport::MailTransport;

/// Sends scan reports to the configured recipient.
pub struct Notifier<T> {
    transport: T,
    config: NotifierConfig,
}

impl<T: MailTransport> Notifier<T> {
    pub fn new(transport: T, config: NotifierConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Read every report, attach it, and send one email for `project`.
    ///
    /// Reports are attached in the given order. Any unreadable report
    /// aborts before anything is sent.
    pub async fn send_reports(
        &self,
        project: &str,
        reports: &[ReportFile],
    ) -> Result<(), NotifierError> {
        let mut message = EmailMessage::new(self.config.subject_for(project), &self.config.body);
        for report in reports {
            message = message.attach(EmailAttachment::read(report).await?);
        }

        let composed = message.compose(
            self.config.sender_mailbox()?,
            self.config.recipient_mailbox()?,
        )?;

        info!(
            recipient = %self.config.recipient,
            attachments = reports.len(),
            "sending report email"
        );
        self.transport.send(composed).await?;
        info!(recipient = %self.config.recipient, "report email sent");
        Ok(())
    }
}
