use serde::Serialize;
use signalcast_core::{AnalystClient, ChatTurn, UtcDateTime};

use crate::cli::ChatArgs;
use crate::error::CliError;
use crate::library::Library;

use super::CommandResult;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatResponseData {
    signal_id: String,
    asset_name: String,
    reply: ChatTurn,
    transcript_length: usize,
}

pub async fn run(
    args: &ChatArgs,
    client: &AnalystClient,
    library: &Library,
) -> Result<CommandResult, CliError> {
    let saved = library
        .find_signal(&args.signal, UtcDateTime::now())?
        .ok_or_else(|| CliError::Command(format!("no saved signal matches '{}'", args.signal)))?;

    let mut transcript = library.transcript(&saved.id)?;
    let reply = match client
        .request_chat_reply(&transcript, &args.message, &saved.signal)
        .await
    {
        Ok(reply) => reply,
        Err(error) => return Ok(CommandResult::failed(&error)),
    };

    // Only completed exchanges are persisted.
    transcript.push(ChatTurn::user(args.message.as_str()));
    transcript.push(reply.clone());
    library.set_transcript(&saved.id, &transcript)?;

    let data = serde_json::to_value(ChatResponseData {
        signal_id: saved.id,
        asset_name: saved.signal.asset_name,
        reply,
        transcript_length: transcript.len(),
    })?;
    Ok(CommandResult::ok(data))
}
