use clap::Subcommand;
use portfolio_config::Config;
use portfolio_di::Provide;
use portfolio_email_contracts::{Email, EmailService};
use portfolio_models::email_address::EmailAddressWithName;

use crate::environment::{types, Provider};

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability
    Test { recipient: EmailAddressWithName },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => test(&config, recipient).await,
        }
    }
}

async fn test(config: &Config, recipient: EmailAddressWithName) -> anyhow::Result<()> {
    let mut provider = Provider::new(config);
    let email_service: types::Email = provider.provide();

    let id = email_service
        .send(Email {
            recipient,
            subject: "Email Deliverability Test".into(),
            text: "Email deliverability seems to be working!".into(),
            html: Some("<p>Email deliverability seems to be working!</p>".into()),
            reply_to: None,
        })
        .await?;

    println!("{id}");

    Ok(())
}
