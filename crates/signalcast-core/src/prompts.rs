//! Outbound prompt text. Only the request content depends on these; the
//! acquisition control flow never inspects them.

use crate::{AssetCategory, NewsCategory, TradingSignal, UserProfile};

/// Number of articles requested per news batch.
pub const NEWS_BATCH_SIZE: usize = 5;

pub fn briefing_prompt() -> String {
    String::from(
        "Summarize global financial market sentiment and the key events of the last 12 hours.\n\
         Base the summary on live web data.\n\
         Cover the major equity indices (for example the S&P 500 and Nasdaq), \
         leading cryptocurrencies (for example Bitcoin) and key commodities (for example gold and crude oil).\n\
         Name the drivers: central bank signals, major economic releases and geopolitical events.\n\
         Keep a professional, analytical and neutral tone. The summary is for information and education only.\n\n\
         Reply with plain text only: no title, no headings, no markdown, no commentary around it.",
    )
}

pub fn signal_prompt(
    asset_name: &str,
    category: Option<AssetCategory>,
    profile: &UserProfile,
) -> String {
    let market = category
        .map(|category| format!(" ({category} market)"))
        .unwrap_or_default();

    format!(
        "Produce an in-depth, multi-dimensional trading analysis for {asset_name}{market}.\n\
         Tailor every part of it to this trader profile:\n\
         - Trading style: {style}\n\
         - Risk tolerance: {risk}\n\
         A low risk tolerance calls for tighter stops and conservative targets; \
         a scalper cares about very short-term moves.\n\n\
         First search the web for the current market price of the asset. \
         entryPrice, tp1, tp2 and sl must be anchored to that price, and entryPrice must sit very close to it.\n\
         Combine several reliable financial sources no older than 12 hours.\n\
         The result is a hypothetical analysis for education only and is not financial advice.\n\n\
         Reply with exactly one JSON object and nothing else. Use double quotes for keys and strings, \
         escape inner double quotes, use \\n for line breaks, no trailing commas, no comments.\n\n\
         {schema}",
        style = profile.trading_style,
        risk = profile.risk_tolerance,
        schema = SIGNAL_SCHEMA,
    )
}

const SIGNAL_SCHEMA: &str = r#"{
  "direction": "BUY or SELL, uppercase",
  "confidence": "integer between 70 and 95",
  "entryPrice": "string, e.g. '3320.1'",
  "tp1": "string, first take-profit",
  "tp2": "string, second take-profit",
  "sl": "string, stop-loss",
  "pivotPoints": {"r2": "string", "r1": "string", "pivot": "string", "s1": "string", "s2": "string"},
  "rsi": {"value": "number, 14-period RSI", "interpretation": "exactly one of Overbought, Oversold, Neutral"},
  "sma": {"sma20": "string", "sma50": "string", "sma100": "string"},
  "strategyDescription": "3-4 paragraphs, cite sources with markers like [1] or [2, 3] in grounding order",
  "riskTip": "1-2 paragraphs on risks to watch, with citation markers where relevant"
}"#;

pub fn news_prompt(category: NewsCategory) -> String {
    format!(
        "Act as a financial news analyst. Find {NEWS_BATCH_SIZE} recent, relevant news articles about {topic}, \
         using live web data no older than 24 hours.\n\
         For each article give the headline, a 1-2 sentence snippet, the source URL, the source name, \
         a sentiment of exactly Bullish, Bearish or Neutral for the affected market, \
         and a one-sentence summary of the likely market impact.\n\
         This is for information and education only.\n\n\
         Reply with exactly one JSON object and nothing else. Its root key is \"articles\", an array of objects \
         shaped like {{\"title\", \"snippet\", \"url\", \"sourceName\", \"sentiment\", \"impactSummary\"}}, all strings. \
         Escape inner double quotes and do not use trailing commas.",
        topic = category.topic(),
    )
}

/// System instruction situating a follow-up conversation on `signal`.
pub fn chat_instruction(signal: &TradingSignal) -> String {
    format!(
        "You are a helpful trading analyst. The user generated this signal analysis for {asset}:\n\n\
         - Direction: {direction}\n\
         - Strategy: {strategy}\n\
         - Risk tip: {risk}\n\n\
         Answer the user's follow-up questions about this analysis. Be concise and stay on topic. \
         Do not give financial advice. Search the web when a question concerns recent events for the asset.",
        asset = signal.asset_name,
        direction = signal.direction,
        strategy = signal.strategy_description,
        risk = signal.risk_tip,
    )
}
