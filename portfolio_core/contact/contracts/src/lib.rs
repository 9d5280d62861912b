use std::future::Future;

use portfolio_models::contact::{ContactMessage, ContactMessageReceipt};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Forward a validated contact message to the site owner.
    ///
    /// Exactly one attempt is made to hand the message over to the email
    /// provider.
    fn send_message(
        &self,
        message: ContactMessage,
    ) -> impl Future<Output = Result<ContactMessageReceipt, ContactSendMessageError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactSendMessageError {
    #[error("Failed to send email")]
    Send,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_send_message(
        mut self,
        message: ContactMessage,
        result: Result<ContactMessageReceipt, ContactSendMessageError>,
    ) -> Self {
        self.expect_send_message()
            .once()
            .with(mockall::predicate::eq(message))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
