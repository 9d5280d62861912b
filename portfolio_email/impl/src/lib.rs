use std::sync::Arc;

use anyhow::Context;
use portfolio_di::Build;
use portfolio_email_contracts::{Email, EmailSendError, EmailService};
use portfolio_models::{email::EmailId, email_address::EmailAddressWithName, Sensitive};
use portfolio_utils::{http::HttpClient, trace_instrument};
use serde::{Deserialize, Serialize};
use url::Url;

const SEND_ENDPOINT: &str = "emails";

#[derive(Debug, Clone, Build)]
pub struct EmailServiceImpl {
    config: EmailServiceConfig,
    #[state]
    client: HttpClient,
}

#[derive(Debug, Clone)]
pub struct EmailServiceConfig {
    api_url: Arc<Url>,
    api_key: Sensitive<Arc<str>>,
    from: Arc<EmailAddressWithName>,
}

impl EmailServiceConfig {
    /// `api_url` is treated as a directory, a missing trailing slash is added
    /// so that endpoints are resolved below its last path segment.
    pub fn new(mut api_url: Url, api_key: &str, from: EmailAddressWithName) -> Self {
        if !api_url.path().ends_with('/') {
            api_url.set_path(&format!("{}/", api_url.path()));
        }

        Self {
            api_url: api_url.into(),
            api_key: Sensitive(api_key.into()),
            from: from.into(),
        }
    }
}

impl EmailService for EmailServiceImpl {
    #[trace_instrument(skip(self))]
    async fn send(&self, email: Email) -> Result<EmailId, EmailSendError> {
        let endpoint = self
            .config
            .api_url
            .join(SEND_ENDPOINT)
            .context("Failed to build email endpoint url")?;

        let request = SendRequest {
            from: self.config.from.to_string(),
            to: vec![email.recipient.to_string()],
            subject: email.subject,
            html: email.html,
            text: email.text,
            reply_to: email.reply_to.map(|x| x.to_string()),
        };

        let response = self
            .client
            .post(endpoint)
            .bearer_auth(&*self.config.api_key.0)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to email provider")?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|x| x.message)
                .unwrap_or_else(|| status.to_string());
            return Err(EmailSendError::Rejected(message));
        }

        response
            .json::<SendResponse>()
            .await
            .map(|x| x.id.into())
            .context("Failed to parse response of email provider")
            .map_err(Into::into)
    }

    #[trace_instrument(skip(self))]
    async fn ping(&self) -> anyhow::Result<()> {
        self.client
            .get((*self.config.api_url).clone())
            .send()
            .await
            .map(|_| ())
            .context("Failed to reach email provider")
    }
}

#[derive(Debug, Serialize)]
struct SendRequest {
    from: String,
    to: Vec<String>,
    subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<String>,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<String>,
}

#[derive(Deserialize)]
struct SendResponse {
    id: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn endpoint_below_api_url() {
        for (api_url, expected) in [
            ("https://api.example.com", "https://api.example.com/emails"),
            ("https://api.example.com/v1", "https://api.example.com/v1/emails"),
            ("https://api.example.com/v1/", "https://api.example.com/v1/emails"),
        ] {
            // Act
            let config = EmailServiceConfig::new(
                api_url.parse().unwrap(),
                "re_test",
                "Portfolio <onboarding@resend.dev>".parse().unwrap(),
            );

            // Assert
            assert_eq!(
                config.api_url.join(SEND_ENDPOINT).unwrap().as_str(),
                expected
            );
        }
    }
}
