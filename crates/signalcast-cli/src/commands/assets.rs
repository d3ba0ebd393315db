use serde::Serialize;
use signalcast_core::{Asset, AssetCatalog, AssetCategory};

use crate::cli::AssetsArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct AssetEntry<'a> {
    name: &'a str,
    category: AssetCategory,
    symbol: String,
}

#[derive(Debug, Serialize)]
struct AssetsResponseData<'a> {
    assets: Vec<AssetEntry<'a>>,
}

pub fn run(args: &AssetsArgs, catalog: &AssetCatalog) -> Result<CommandResult, CliError> {
    let category = args
        .category
        .as_deref()
        .map(str::parse::<AssetCategory>)
        .transpose()?;

    let selected: Vec<&Asset> = match category {
        Some(category) => catalog.in_category(category).collect(),
        None => catalog.assets().iter().collect(),
    };

    let assets = selected
        .into_iter()
        .map(|asset| AssetEntry {
            name: &asset.name,
            category: asset.category,
            symbol: catalog.chart_symbol(&asset.name),
        })
        .collect();

    let data = serde_json::to_value(AssetsResponseData { assets })?;
    Ok(CommandResult::ok(data))
}
