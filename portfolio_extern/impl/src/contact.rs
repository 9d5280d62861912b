use std::sync::Arc;

use anyhow::Context;
use portfolio_di::Build;
use portfolio_extern_contracts::contact::{
    ContactRelayApiService, ContactRelayError, ContactRelayResponse,
};
use portfolio_models::contact::ContactDraft;
use portfolio_utils::{http::HttpClient, trace_instrument};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Build)]
pub struct ContactRelayApiServiceImpl {
    config: ContactRelayApiServiceConfig,
    #[state]
    client: HttpClient,
}

#[derive(Debug, Clone)]
pub struct ContactRelayApiServiceConfig {
    relay_url: Arc<Url>,
}

impl ContactRelayApiServiceConfig {
    pub fn new(relay_url: Url) -> Self {
        Self {
            relay_url: relay_url.into(),
        }
    }
}

impl ContactRelayApiService for ContactRelayApiServiceImpl {
    #[trace_instrument(skip(self))]
    async fn send_message(
        &self,
        draft: ContactDraft,
    ) -> Result<ContactRelayResponse, ContactRelayError> {
        let response = self
            .client
            .post((*self.config.relay_url).clone())
            .json(&draft)
            .send()
            .await
            .context("Failed to send request to contact relay")?;

        let status = response.status();
        if !status.is_success() {
            let error = response
                .json::<ErrorResponse>()
                .await
                .map(|x| x.error)
                .unwrap_or_else(|_| status.to_string());
            return Err(ContactRelayError::Rejected {
                status: status.as_u16(),
                error,
            });
        }

        response
            .json::<SuccessResponse>()
            .await
            .map(|x| ContactRelayResponse {
                message: x.message,
                id: x.id.into(),
            })
            .context("Failed to parse response of contact relay")
            .map_err(Into::into)
    }
}

#[derive(Deserialize)]
struct SuccessResponse {
    message: String,
    id: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}
