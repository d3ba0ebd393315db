use serde::Serialize;
use signalcast_core::{AnalystClient, NewsArticle, NewsCategory};

use crate::cli::NewsArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct NewsResponseData {
    topic: &'static str,
    articles: Vec<NewsArticle>,
}

pub async fn run(args: &NewsArgs, client: &AnalystClient) -> Result<CommandResult, CliError> {
    let category: NewsCategory = args.category.parse()?;

    match client.request_news_batch(category).await {
        Ok(articles) => {
            let empty = articles.is_empty();
            let data = serde_json::to_value(NewsResponseData {
                topic: category.topic(),
                articles,
            })?;
            let result = CommandResult::ok(data);
            Ok(if empty {
                result.with_warning("no articles were returned")
            } else {
                result
            })
        }
        Err(error) => Ok(CommandResult::failed(&error)),
    }
}
