use std::future::Future;

use portfolio_models::{contact::ContactDraft, email::EmailId};
use thiserror::Error;

/// Client of the contact relay endpoint.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactRelayApiService: Send + Sync + 'static {
    fn send_message(
        &self,
        draft: ContactDraft,
    ) -> impl Future<Output = Result<ContactRelayResponse, ContactRelayError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRelayResponse {
    pub message: String,
    pub id: EmailId,
}

#[derive(Debug, Error)]
pub enum ContactRelayError {
    /// The relay answered with an error response.
    #[error("The relay rejected the message ({status}): {error}")]
    Rejected { status: u16, error: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactRelayApiService {
    pub fn with_send_message(
        mut self,
        draft: ContactDraft,
        result: Result<ContactRelayResponse, ContactRelayError>,
    ) -> Self {
        self.expect_send_message()
            .once()
            .with(mockall::predicate::eq(draft))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
