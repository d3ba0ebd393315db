use serde::Serialize;
use signalcast_core::{AssetCatalog, ValidationError};

use crate::cli::SymbolArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct SymbolResponseData<'a> {
    asset: &'a str,
    symbol: String,
}

pub fn run(args: &SymbolArgs, catalog: &AssetCatalog) -> Result<CommandResult, CliError> {
    let asset = args.asset.trim();
    if asset.is_empty() {
        return Err(ValidationError::EmptyAssetName.into());
    }

    let data = serde_json::to_value(SymbolResponseData {
        asset,
        symbol: catalog.chart_symbol(asset),
    })?;

    let result = CommandResult::ok(data);
    if catalog.find(asset).is_none() {
        return Ok(result.with_warning("asset is not in the catalog; symbol derived from its name"));
    }
    Ok(result)
}
