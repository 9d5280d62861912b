use std::sync::Arc;

use portfolio_core_contact_contracts::{ContactFeatureService, ContactSendMessageError};
use portfolio_di::Build;
use portfolio_email_contracts::{Email, EmailService};
use portfolio_models::{
    contact::{ContactMessage, ContactMessageReceipt},
    email_address::EmailAddressWithName,
};
use portfolio_templates_contracts::{
    ContactMessageHtmlTemplate, ContactMessageTextTemplate, TemplateService,
};
use tracing::error;

#[derive(Debug, Clone, Build)]
pub struct ContactFeatureServiceImpl<Email, Template> {
    email: Email,
    template: Template,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// The site owner's address.
    pub recipient: Arc<EmailAddressWithName>,
}

impl<EmailS, Template> ContactFeatureService for ContactFeatureServiceImpl<EmailS, Template>
where
    EmailS: EmailService,
    Template: TemplateService,
{
    async fn send_message(
        &self,
        message: ContactMessage,
    ) -> Result<ContactMessageReceipt, ContactSendMessageError> {
        let name = message.author.name.into_inner();
        let email = message.author.email.into_inner();
        let content = message.content.into_inner();

        let html = self.template.render(&ContactMessageHtmlTemplate {
            name: name.clone(),
            email: email.clone(),
            message: content.clone(),
        })?;
        let text = self.template.render(&ContactMessageTextTemplate {
            name: name.clone(),
            email: email.clone(),
            message: content,
        })?;

        let email = Email {
            recipient: (*self.config.recipient).clone(),
            subject: format!("New Contact Form Message from {name}"),
            text,
            html: Some(html),
            reply_to: email.parse().ok(),
        };

        match self.email.send(email).await {
            Ok(id) => Ok(ContactMessageReceipt { id }),
            Err(err) => {
                error!("Failed to send contact message: {err}");
                Err(ContactSendMessageError::Send)
            }
        }
    }
}
