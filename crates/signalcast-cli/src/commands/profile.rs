use signalcast_core::{RiskTolerance, TradingStyle};

use crate::cli::ProfileArgs;
use crate::error::CliError;
use crate::library::Library;

use super::CommandResult;

/// Shows the profile, updating whichever fields were given first.
pub fn run(args: &ProfileArgs, library: &Library) -> Result<CommandResult, CliError> {
    let mut profile = library.profile()?;

    if args.style.is_some() || args.risk.is_some() {
        if let Some(style) = &args.style {
            profile.trading_style = style.parse::<TradingStyle>()?;
        }
        if let Some(risk) = &args.risk {
            profile.risk_tolerance = risk.parse::<RiskTolerance>()?;
        }
        library.set_profile(&profile)?;
        tracing::info!(style = %profile.trading_style, risk = %profile.risk_tolerance, "updated profile");
    }

    Ok(CommandResult::ok(serde_json::to_value(profile)?))
}
