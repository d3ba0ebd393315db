//! Locates and decodes the structured payload embedded in free-form model text.
//!
//! Models routinely wrap JSON in prose or markdown fences, so extraction does
//! not assume a wrapper: it takes everything from the first opening `{`/`[` to
//! the last closing `}`/`]`, strips trailing commas and decodes the slice.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use thiserror::Error;

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("trailing comma pattern is valid"));

/// Why no structured payload could be taken from a reply.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no JSON object or array found in AI response")]
    NoStructure,

    #[error("malformed JSON object found in AI response")]
    Unbalanced,

    #[error("failed to parse JSON from AI response: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },
}

/// Extracts, repairs and deserializes the payload embedded in `raw`.
pub fn extract_structured<T: DeserializeOwned>(raw: &str) -> Result<T, ExtractionError> {
    let candidate = locate_payload(raw)?;
    let repaired = strip_trailing_commas(candidate);

    serde_json::from_str(&repaired).map_err(|source| {
        tracing::error!(payload = %repaired, error = %source, "failed to parse extracted payload");
        ExtractionError::Parse { source }
    })
}

/// Slice from the first opening bracket to the last closing bracket, inclusive.
fn locate_payload(raw: &str) -> Result<&str, ExtractionError> {
    let start = [raw.find('{'), raw.find('[')]
        .into_iter()
        .flatten()
        .min()
        .ok_or(ExtractionError::NoStructure)?;

    let end = [raw.rfind('}'), raw.rfind(']')]
        .into_iter()
        .flatten()
        .max()
        .filter(|end| *end >= start)
        .ok_or(ExtractionError::Unbalanced)?;

    Ok(&raw[start..=end])
}

fn strip_trailing_commas(payload: &str) -> String {
    TRAILING_COMMA.replace_all(payload, "$1").into_owned()
}
