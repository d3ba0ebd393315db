use signalcast_core::AnalystClient;

use crate::cli::SignalArgs;
use crate::error::CliError;
use crate::library::Library;

use super::CommandResult;

pub async fn run(
    args: &SignalArgs,
    client: &AnalystClient,
    library: &Library,
) -> Result<CommandResult, CliError> {
    let profile = library.profile()?;
    let uncatalogued = client.catalog().find(args.asset.trim()).is_none();

    let mut result = match client.request_signal(&args.asset, &profile).await {
        Ok(signal) if args.no_save => CommandResult::ok(serde_json::to_value(&signal)?),
        Ok(signal) => {
            let saved = library.save_signal(signal)?;
            tracing::info!(id = %saved.id, asset = %saved.signal.asset_name, "saved signal");
            CommandResult::ok(serde_json::to_value(&saved)?)
        }
        Err(error) => CommandResult::failed(&error),
    };

    if uncatalogued && !args.asset.trim().is_empty() {
        result = result.with_warning(format!(
            "'{}' is not in the asset catalog; prompt carries no market category",
            args.asset.trim()
        ));
    }
    Ok(result.with_warning("informational only, not financial advice"))
}
