use std::future::Future;

use portfolio_models::{
    email::EmailId,
    email_address::{EmailAddress, EmailAddressWithName},
};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait EmailService: Send + Sync + 'static {
    /// Hand the email over to the provider and return the id it assigned.
    fn send(&self, email: Email) -> impl Future<Output = Result<EmailId, EmailSendError>> + Send;

    /// Check whether the provider's api is reachable.
    fn ping(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub recipient: EmailAddressWithName,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
    pub reply_to: Option<EmailAddress>,
}

#[derive(Debug, Error)]
pub enum EmailSendError {
    /// The provider answered, but refused to accept the email.
    #[error("The email provider rejected the email: {0}")]
    Rejected(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockEmailService {
    pub fn with_send(mut self, email: Email, result: Result<EmailId, EmailSendError>) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }

    pub fn with_ping(mut self, result: bool) -> Self {
        self.expect_ping().once().return_once(move || {
            Box::pin(std::future::ready(
                result
                    .then_some(())
                    .ok_or_else(|| anyhow::anyhow!("Failed to reach email provider")),
            ))
        });
        self
    }
}
