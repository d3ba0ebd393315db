use serde::Serialize;

use crate::error::CliError;
use crate::library::{FeaturedSite, Library};

use super::CommandResult;

#[derive(Debug, Serialize)]
struct SourcesResponseData {
    sites: Vec<FeaturedSite>,
}

pub fn run(library: &Library) -> Result<CommandResult, CliError> {
    let sites = library.featured_sites()?;
    let data = serde_json::to_value(SourcesResponseData { sites })?;
    Ok(CommandResult::ok(data))
}

#[cfg(test)]
mod tests {
    use signalcast_core::normalize::signal::{normalize_signal, RawSignal};
    use signalcast_core::{GroundingChunk, UtcDateTime};

    use super::*;
    use crate::commands::test_support::temp_library;

    #[test]
    fn lists_sites_collected_from_saved_signals() {
        let (_dir, library) = temp_library();
        let raw: RawSignal =
            serde_json::from_str(r#"{"direction":"BUY","confidence":50}"#).expect("raw signal");
        let grounding = vec![GroundingChunk {
            uri: Some(String::from("https://www.kitco.com/news/gold")),
            title: Some(String::from("Kitco")),
        }];
        library
            .save_signal(normalize_signal(raw, "Gold (XAU/USD)", &grounding, UtcDateTime::now()))
            .expect("save");

        let result = run(&library).expect("sources");

        assert_eq!(result.data["sites"][0]["name"], "Kitco");
        assert_eq!(result.data["sites"][0]["url"], "https://www.kitco.com/news/gold");
    }
}
