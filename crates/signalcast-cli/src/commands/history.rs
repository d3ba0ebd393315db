use serde::Serialize;
use signalcast_core::UtcDateTime;

use crate::cli::HistoryArgs;
use crate::error::CliError;
use crate::library::{Library, SavedSignal};

use super::CommandResult;

#[derive(Debug, Serialize)]
struct HistoryResponseData {
    total: usize,
    signals: Vec<SavedSignal>,
}

pub fn run(args: &HistoryArgs, library: &Library) -> Result<CommandResult, CliError> {
    let mut signals = library.history(UtcDateTime::now())?;
    let total = signals.len();
    if let Some(limit) = args.limit {
        signals.truncate(limit);
    }

    let data = serde_json::to_value(HistoryResponseData { total, signals })?;
    Ok(CommandResult::ok(data))
}
