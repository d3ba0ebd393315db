use serde::Serialize;
use signalcast_core::{AssetCatalog, ValidationError};

use crate::cli::{WatchlistAction, WatchlistArgs};
use crate::error::CliError;
use crate::library::Library;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct WatchlistResponseData {
    assets: Vec<String>,
}

pub fn run(
    args: &WatchlistArgs,
    library: &Library,
    catalog: &AssetCatalog,
) -> Result<CommandResult, CliError> {
    let mut warnings = Vec::new();

    let assets = match &args.action {
        None | Some(WatchlistAction::List) => library.watchlist()?,
        Some(WatchlistAction::Add { asset }) => {
            let asset = non_blank(asset)?;
            if catalog.find(asset).is_none() {
                warnings.push(format!("'{asset}' is not in the asset catalog"));
            }
            library.add_to_watchlist(asset)?
        }
        Some(WatchlistAction::Remove { asset }) => library.remove_from_watchlist(non_blank(asset)?)?,
    };

    let mut result = CommandResult::ok(serde_json::to_value(WatchlistResponseData { assets })?);
    for warning in warnings {
        result = result.with_warning(warning);
    }
    Ok(result)
}

fn non_blank(asset: &str) -> Result<&str, ValidationError> {
    let asset = asset.trim();
    if asset.is_empty() {
        return Err(ValidationError::EmptyAssetName);
    }
    Ok(asset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::temp_library;
    use crate::library::DEFAULT_WATCHLIST;

    fn action(action: Option<WatchlistAction>) -> WatchlistArgs {
        WatchlistArgs { action }
    }

    #[test]
    fn add_and_remove_update_the_stored_list() {
        let (_dir, library) = temp_library();
        let catalog = AssetCatalog::default();

        let added = run(
            &action(Some(WatchlistAction::Add {
                asset: String::from(" Tesla (TSLA) "),
            })),
            &library,
            &catalog,
        )
        .expect("add");
        assert!(added.warnings.is_empty());
        assert_eq!(
            added.data["assets"].as_array().map(Vec::len),
            Some(DEFAULT_WATCHLIST.len() + 1)
        );

        run(
            &action(Some(WatchlistAction::Remove {
                asset: String::from("Tesla (TSLA)"),
            })),
            &library,
            &catalog,
        )
        .expect("remove");
        let listed = run(&action(None), &library, &catalog).expect("list");
        assert_eq!(
            listed.data["assets"].as_array().map(Vec::len),
            Some(DEFAULT_WATCHLIST.len())
        );
    }

    #[test]
    fn uncatalogued_asset_is_added_with_warning() {
        let (_dir, library) = temp_library();

        let result = run(
            &action(Some(WatchlistAction::Add {
                asset: String::from("Cardano (ADAUSDT)"),
            })),
            &library,
            &AssetCatalog::default(),
        )
        .expect("add");

        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn blank_asset_is_rejected() {
        let (_dir, library) = temp_library();

        let err = run(
            &action(Some(WatchlistAction::Add {
                asset: String::from("  "),
            })),
            &library,
            &AssetCatalog::default(),
        )
        .expect_err("must fail");

        assert_eq!(err.exit_code(), 2);
    }
}
