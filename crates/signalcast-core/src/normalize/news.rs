use serde::Deserialize;
use serde_json::Value;

use super::lenient_text;
use crate::error::AcquisitionError;
use crate::extract::ExtractionError;
use crate::{NewsArticle, Sentiment};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawArticle {
    #[serde(deserialize_with = "lenient_text")]
    title: String,
    #[serde(deserialize_with = "lenient_text")]
    snippet: String,
    #[serde(deserialize_with = "lenient_text")]
    url: String,
    #[serde(deserialize_with = "lenient_text")]
    source_name: String,
    #[serde(deserialize_with = "lenient_text")]
    sentiment: String,
    #[serde(deserialize_with = "lenient_text")]
    impact_summary: String,
}

/// Reads the `articles` array of an extracted news payload.
///
/// A payload without an `articles` array is rejected with
/// [`AcquisitionError::MissingField`]; an element that is not an object is a
/// malformed payload.
pub fn normalize_news(payload: Value) -> Result<Vec<NewsArticle>, AcquisitionError> {
    let Value::Object(mut root) = payload else {
        return Err(AcquisitionError::MissingField { field: "articles" });
    };
    let Some(Value::Array(articles)) = root.remove("articles") else {
        return Err(AcquisitionError::MissingField { field: "articles" });
    };

    articles
        .into_iter()
        .map(|article| {
            serde_json::from_value::<RawArticle>(article)
                .map(normalize_article)
                .map_err(|source| AcquisitionError::Extraction(ExtractionError::Parse { source }))
        })
        .collect()
}

fn normalize_article(raw: RawArticle) -> NewsArticle {
    let sentiment = Sentiment::from_label(&raw.sentiment).unwrap_or_else(|| {
        tracing::warn!(sentiment = %raw.sentiment, "unknown news sentiment; using Neutral");
        Sentiment::Neutral
    });

    NewsArticle {
        title: raw.title,
        snippet: raw.snippet,
        url: raw.url,
        source_name: raw.source_name,
        sentiment,
        impact_summary: raw.impact_summary,
    }
}
