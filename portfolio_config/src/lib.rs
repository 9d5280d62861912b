use std::{net::IpAddr, path::PathBuf};

use anyhow::Context;
use config::{File, FileFormat};
use portfolio_models::{email_address::EmailAddressWithName, Sensitive};
use serde::Deserialize;
use url::Url;

pub use duration::Duration;

mod duration;

/// The default configuration, which is always loaded first.
pub const DEFAULT_CONFIG: &str = include_str!("../../config.toml");

/// Colon separated list of additional config files overriding the defaults.
pub const CONFIG_PATH_ENV: &str = "PORTFOLIO_CONFIG";

/// Environment variable holding the api key of the email provider.
pub const EMAIL_API_KEY_ENV: &str = "RESEND_API_KEY";

/// Load the configuration from the default config, the given config files
/// (later files take precedence) and the `RESEND_API_KEY` environment variable.
pub fn load(paths: &[PathBuf]) -> anyhow::Result<Config> {
    let overrides = paths
        .iter()
        .filter(|path| !path.as_os_str().is_empty())
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    load_with_overrides(&overrides, std::env::var(EMAIL_API_KEY_ENV).ok())
}

/// Load the default config with the given toml snippets applied on top.
pub fn load_with_overrides(
    overrides: &[impl AsRef<str>],
    email_api_key: Option<String>,
) -> anyhow::Result<Config> {
    overrides
        .iter()
        .fold(
            config::Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)),
            |builder, source| {
                builder.add_source(File::from_str(source.as_ref(), FileFormat::Toml))
            },
        )
        .set_override_option("email.api_key", email_api_key)?
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
    pub health: HealthConfig,
    pub client: ClientConfig,
    pub sentry: Option<SentryConfig>,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Origins allowed to call the api from a browser.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    /// Base url of the transactional email provider's api.
    pub api_url: Url,
    /// Fixed sender identity of all outgoing emails.
    pub from: EmailAddressWithName,
    /// Usually provided via the `RESEND_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Sensitive<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    /// The site owner's address, which receives all contact messages.
    pub recipient: EmailAddressWithName,
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Deserialize)]
pub struct ClientConfig {
    /// Url of the relay endpoint used by the contact form client.
    pub relay_url: Url,
    /// Delay after which a finished submission returns to idle.
    pub status_reset_delay: Duration,
}

#[derive(Debug, Deserialize)]
pub struct SentryConfig {
    pub dsn: Url,
}
