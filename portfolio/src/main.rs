use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use portfolio::commands::{contact::ContactCommand, email::EmailCommand, serve::serve};
use portfolio_config::{Config, CONFIG_PATH_ENV};
use portfolio_utils::portfolio_version;
use sentry::{integrations::tracing::EventFilter, ClientInitGuard};
use tracing::{level_filters::LevelFilter, Level, Metadata};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli { config, command } = Cli::parse();

    if let Command::Completion { shell } = command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, env!("CARGO_BIN_NAME"), &mut std::io::stdout());
        return Ok(());
    }

    init_tracing();

    let config = portfolio_config::load(&config).context("Failed to load config")?;
    let _sentry_guard = init_sentry(&config);

    command.invoke(config).await
}

#[derive(Debug, Parser)]
#[command(version = portfolio_version(), about = "Contact form mail relay")]
struct Cli {
    /// Config files applied on top of the defaults, later files win
    #[arg(
        short,
        long,
        global = true,
        env = CONFIG_PATH_ENV,
        value_delimiter = ':',
    )]
    config: Vec<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the REST API server relaying contact form messages
    #[command(aliases(["run", "start", "r", "s"]))]
    Serve,
    /// Test email deliverability
    #[command(aliases(["e"]))]
    Email {
        #[command(subcommand)]
        command: EmailCommand,
    },
    /// Submit messages like the portfolio's contact form does
    #[command(aliases(["c"]))]
    Contact {
        #[command(subcommand)]
        command: ContactCommand,
    },
    /// Load the configuration and report whether it is valid
    CheckConfig {
        /// Print the loaded config
        #[arg(short, long)]
        verbose: bool,
    },
    /// Generate shell completions
    Completion {
        #[clap(value_enum)]
        shell: Shell,
    },
}

impl Command {
    async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            Self::Serve => serve(config).await,
            Self::Email { command } => command.invoke(config).await,
            Self::Contact { command } => command.invoke(config).await,
            Self::CheckConfig { verbose } => {
                if verbose {
                    println!("{config:#?}");
                }
                Ok(())
            }
            Self::Completion { .. } => unreachable!("handled before loading the config"),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    #[cfg(tracing_pretty)]
    let fmt_layer = fmt_layer.pretty();

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .with(sentry::integrations::tracing::layer().event_filter(sentry_event_filter))
        .init();
}

fn sentry_event_filter(meta: &Metadata<'_>) -> EventFilter {
    match *meta.level() {
        Level::ERROR => EventFilter::Exception,
        Level::WARN => EventFilter::Event,
        Level::INFO | Level::DEBUG => EventFilter::Breadcrumb,
        Level::TRACE => EventFilter::Ignore,
    }
}

fn init_sentry(config: &Config) -> Option<ClientInitGuard> {
    let dsn = config.sentry.as_ref()?.dsn.as_str();
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: Some(portfolio_version().into()),
            attach_stacktrace: true,
            ..Default::default()
        },
    )))
}
