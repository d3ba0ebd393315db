mod assets;
mod briefing;
mod chat;
mod history;
mod news;
mod profile;
mod signal;
mod sources;
mod symbol;
mod watchlist;

use std::time::Instant;

use serde_json::Value;
use signalcast_core::{
    AnalystClient, AssetCatalog, ClassifiedError, ClientConfig, Envelope, EnvelopeError,
    EnvelopeMeta,
};
use uuid::Uuid;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::library::Library;
use crate::store::{resolve_data_dir, JsonStore};

#[derive(Debug)]
pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Acquisition failure: no data, one user-facing error.
    pub fn failed(error: &ClassifiedError) -> Self {
        Self {
            data: Value::Null,
            warnings: Vec::new(),
            errors: vec![EnvelopeError::from(error)],
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let library = Library::new(JsonStore::open(resolve_data_dir(cli.data_dir.as_deref())));
    let catalog = AssetCatalog::default();
    let name = command_name(&cli.command);
    tracing::info!(command = name, "running command");

    let started = Instant::now();
    let command_result = match &cli.command {
        Command::Briefing => briefing::run(&client(cli)?).await?,
        Command::Signal(args) => signal::run(args, &client(cli)?, &library).await?,
        Command::News(args) => news::run(args, &client(cli)?).await?,
        Command::Chat(args) => chat::run(args, &client(cli)?, &library).await?,
        Command::History(args) => history::run(args, &library)?,
        Command::Watchlist(args) => watchlist::run(args, &library, &catalog)?,
        Command::Profile(args) => profile::run(args, &library)?,
        Command::Assets(args) => assets::run(args, &catalog)?,
        Command::Symbol(args) => symbol::run(args, &catalog)?,
        Command::Sources => sources::run(&library)?,
    };
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let CommandResult {
        data,
        warnings,
        errors,
    } = command_result;

    let mut meta = EnvelopeMeta::new(Uuid::new_v4().to_string(), name, latency_ms)?;
    for warning in warnings {
        meta.push_warning(warning);
    }

    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

/// Client from the environment with command-line overrides applied.
fn client(cli: &Cli) -> Result<AnalystClient, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(max_retries) = cli.max_retries {
        config = config.with_max_retries(max_retries);
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }
    Ok(AnalystClient::from_config(&config))
}

const fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Briefing => "briefing",
        Command::Signal(_) => "signal",
        Command::News(_) => "news",
        Command::Chat(_) => "chat",
        Command::History(_) => "history",
        Command::Watchlist(_) => "watchlist",
        Command::Profile(_) => "profile",
        Command::Assets(_) => "assets",
        Command::Symbol(_) => "symbol",
        Command::Sources => "sources",
    }
}
