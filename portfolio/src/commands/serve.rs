use portfolio_config::Config;
use portfolio_di::Provide;
use portfolio_email_contracts::EmailService;
use tracing::{info, warn};

use crate::environment::{
    types::{Email, RestServer},
    Provider,
};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let mut provider = Provider::new(&config);

    info!("Checking connection to email provider");
    let email: Email = provider.provide();
    if let Err(err) = email.ping().await {
        warn!("Email provider is not reachable: {err:#}");
    }

    let server: RestServer = provider.provide();
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}
