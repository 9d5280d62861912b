use anyhow::ensure;
use clap::Subcommand;
use portfolio_client::{ContactFormField, ContactFormService, SubmissionStatus};
use portfolio_config::Config;
use portfolio_di::Provide;

use crate::environment::{types::ContactForm, Provider};

#[derive(Debug, Subcommand)]
pub enum ContactCommand {
    /// Submit a message through the contact form client
    Send {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },
}

impl ContactCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            ContactCommand::Send {
                name,
                email,
                message,
            } => send(&config, name, email, message).await,
        }
    }
}

async fn send(config: &Config, name: String, email: String, message: String) -> anyhow::Result<()> {
    let mut provider = Provider::new(config);
    let form: ContactForm = provider.provide();

    form.update_field(ContactFormField::Name, name)?;
    form.update_field(ContactFormField::Email, email)?;
    form.update_field(ContactFormField::Message, message)?;

    let status = form.submit().await?;
    if let Some(banner) = status.banner() {
        println!("{banner}");
    }

    ensure!(
        status == SubmissionStatus::Success,
        "The contact message could not be delivered"
    );

    Ok(())
}
