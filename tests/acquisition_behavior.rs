//! Behavior-driven tests for the acquisition façade
//!
//! These tests drive `AnalystClient` through the real Gemini wire format over a
//! scripted transport, so retries, extraction and normalization run end to end.

use std::sync::Arc;
use std::time::Duration;

use signalcast_core::{
    AnalystClient, Asset, AssetCatalog, AssetCategory, ChatRole, ChatTurn, Direction,
    ErrorCategory, FixedJitter, GeminiBackend, HttpError, HttpResponse, NewsCategory,
    RecordingPause, RetryConfig, RsiInterpretation, ScriptedHttpClient, Sentiment, SignalStatus,
    UserProfile, UtcDateTime,
};

fn reply(text: &str) -> Result<HttpResponse, HttpError> {
    let body = serde_json::json!({
        "candidates": [{"content": {"parts": [{"text": text}]}}]
    });
    Ok(HttpResponse::ok_json(body.to_string()))
}

fn grounded_reply(text: &str, chunks: serde_json::Value) -> Result<HttpResponse, HttpError> {
    let body = serde_json::json!({
        "candidates": [{
            "content": {"parts": [{"text": text}]},
            "groundingMetadata": {"groundingChunks": chunks}
        }]
    });
    Ok(HttpResponse::ok_json(body.to_string()))
}

fn rate_limited() -> Result<HttpResponse, HttpError> {
    Ok(HttpResponse::with_status(
        429,
        r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#,
    ))
}

struct Harness {
    transport: Arc<ScriptedHttpClient>,
    pause: Arc<RecordingPause>,
    client: AnalystClient,
}

fn harness(max_retries: u32, script: Vec<Result<HttpResponse, HttpError>>) -> Harness {
    let transport = Arc::new(ScriptedHttpClient::new(script));
    let pause = Arc::new(RecordingPause::default());
    let retry = RetryConfig::exponential(max_retries, Duration::from_millis(1_000))
        .with_jitter(Arc::new(FixedJitter(Duration::from_millis(250))))
        .with_pause(pause.clone());
    let backend = GeminiBackend::new(transport.clone(), "test-key")
        .with_endpoint("https://generative.test/v1beta");
    let client = AnalystClient::new(Arc::new(backend)).with_retry_config(retry);

    Harness {
        transport,
        pause,
        client,
    }
}

// =============================================================================
// Signal acquisition
// =============================================================================

#[tokio::test]
async fn when_model_wraps_signal_in_prose_and_fences_system_still_normalizes_it() {
    // Given: A model reply with chatter around a fenced, trailing-comma payload
    let text = r#"Sure, here is the analysis you asked for.
```json
{
  "direction": "buy",
  "confidence": 91,
  "entryPrice": "1.0842",
  "tp1": "1.0870",
  "tp2": "1.0905",
  "sl": "1.0815",
  "pivotPoints": {"r2": "1.0910", "r1": "1.0875", "pivot": "1.0840", "s1": "1.0810", "s2": "1.0780",},
  "rsi": {"value": 28.4, "interpretation": "Oversold"},
  "sma": {"sma20": "1.0830", "sma50": "1.0855", "sma100": "1.0890"},
  "strategyDescription": "Mean reversion from support [1].",
  "riskTip": "ECB speakers today [2].",
}
```
Let me know if you need anything else."#;
    let h = harness(0, vec![reply(text)]);
    let before = UtcDateTime::now();

    // When: A signal is requested
    let signal = h
        .client
        .request_signal("EUR/USD", &UserProfile::default())
        .await
        .expect("signal should normalize");

    // Then: Every field is carried into the canonical record
    assert_eq!(signal.asset_name, "EUR/USD");
    assert_eq!(signal.direction, Direction::Buy);
    assert_eq!(signal.confidence, 91);
    assert_eq!(signal.entry_price, "1.0842");
    assert_eq!(signal.pivot_points.s2, "1.0780");
    assert_eq!(signal.rsi.interpretation, RsiInterpretation::Oversold);
    assert_eq!(signal.sma.sma50, "1.0855");
    assert_eq!(signal.risk_tip, "ECB speakers today [2].");
    assert_eq!(signal.status, SignalStatus::Live);
    assert!(signal.update_time >= before, "capture time must be fresh");
}

#[tokio::test]
async fn when_model_returns_lowercase_sell_system_reports_sell() {
    // Given: A fenced payload with a lowercase direction
    let h = harness(
        0,
        vec![reply("```json\n{\"direction\":\"sell\",\"confidence\":80}\n```")],
    );

    // When: A signal is requested
    let signal = h
        .client
        .request_signal("Gold (XAU/USD)", &UserProfile::default())
        .await
        .expect("signal should normalize");

    // Then: Direction is SELL and the caller's asset name is kept
    assert_eq!(signal.direction, Direction::Sell);
    assert_eq!(signal.confidence, 80);
    assert_eq!(signal.asset_name, "Gold (XAU/USD)");
}

#[tokio::test]
async fn when_model_invents_a_direction_system_falls_back_to_buy() {
    // Given: A direction outside BUY/SELL
    let h = harness(0, vec![reply(r#"{"direction":"HOLD","confidence":70}"#)]);

    // When: A signal is requested
    let signal = h
        .client
        .request_signal("Apple (AAPL)", &UserProfile::default())
        .await
        .expect("signal should normalize");

    // Then: The pipeline does not fail and the direction is BUY
    assert_eq!(signal.direction, Direction::Buy);
}

#[tokio::test]
async fn when_grounding_has_a_chunk_without_uri_system_drops_only_that_chunk() {
    // Given: Two grounding chunks, one of them lacking a URI
    let h = harness(
        0,
        vec![grounded_reply(
            r#"{"direction":"BUY","confidence":75}"#,
            serde_json::json!([
                {"web": {"title": "Orphan"}},
                {"web": {"uri": "https://markets.test/eurusd", "title": "Markets Daily"}}
            ]),
        )],
    );

    // When: A signal is requested
    let signal = h
        .client
        .request_signal("EUR/USD", &UserProfile::default())
        .await
        .expect("signal should normalize");

    // Then: Exactly the chunk with a URI becomes a source
    assert_eq!(signal.sources.len(), 1);
    assert_eq!(signal.sources[0].title, "Markets Daily");
    assert_eq!(signal.sources[0].uri, "https://markets.test/eurusd");
}

#[tokio::test]
async fn when_client_carries_a_custom_catalog_prompt_names_that_market() {
    // Given: A client whose catalog lists an asset the default catalog lacks
    let h = harness(0, vec![reply(r#"{"direction":"BUY","confidence":64}"#)]);
    let catalog = AssetCatalog::new(vec![Asset::new("Foo (FOO)", AssetCategory::Crypto)]);
    let client = h.client.with_catalog(Arc::new(catalog));

    // When: A signal is requested for that asset
    let signal = client
        .request_signal("Foo (FOO)", &UserProfile::default())
        .await
        .expect("signal should normalize");

    // Then: The outbound prompt places the asset in its catalog market
    assert_eq!(signal.asset_name, "Foo (FOO)");
    let body: serde_json::Value =
        serde_json::from_str(&h.transport.requests()[0].body).expect("json body");
    let prompt = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .expect("prompt text");
    assert!(prompt.contains("Foo (FOO) (Crypto market)"));
}

// =============================================================================
// Retry behavior
// =============================================================================

#[tokio::test]
async fn when_first_three_attempts_are_rate_limited_fourth_attempt_succeeds() {
    // Given: Three 429 replies followed by a valid signal, with three retries allowed
    let h = harness(
        3,
        vec![
            rate_limited(),
            rate_limited(),
            rate_limited(),
            reply(r#"{"direction":"SELL","confidence":85}"#),
        ],
    );

    // When: A signal is requested
    let signal = h
        .client
        .request_signal("Bitcoin (BTC/USD)", &UserProfile::default())
        .await
        .expect("fourth attempt should succeed");

    // Then: The caller sees only the success, after three growing pauses
    assert_eq!(signal.direction, Direction::Sell);
    assert_eq!(h.transport.requests().len(), 4);
    assert_eq!(
        h.pause.delays(),
        vec![
            Duration::from_millis(1_250),
            Duration::from_millis(2_250),
            Duration::from_millis(4_250),
        ]
    );
}

#[tokio::test]
async fn when_transport_keeps_failing_system_makes_exactly_max_retries_plus_one_attempts() {
    // Given: A transport that always fails and two retries allowed
    let h = harness(
        2,
        vec![
            Err(HttpError::new("connection reset")),
            Err(HttpError::new("connection reset")),
            Err(HttpError::new("connection reset")),
            reply("never reached"),
        ],
    );

    // When: The briefing is requested
    let err = h.client.request_briefing().await.expect_err("must fail");

    // Then: Three attempts were made and the failure is generic
    assert_eq!(h.transport.requests().len(), 3);
    assert_eq!(h.pause.delays().len(), 2);
    assert_eq!(err.category(), ErrorCategory::Unknown);
}

// =============================================================================
// Briefing, news and chat
// =============================================================================

#[tokio::test]
async fn when_briefing_is_requested_system_enables_web_grounding_and_trims_text() {
    // Given: A plain-text briefing with surrounding whitespace
    let h = harness(0, vec![reply("\n\nEquities drifted higher overnight.\n")]);

    // When: The briefing is requested
    let briefing = h.client.request_briefing().await.expect("briefing");

    // Then: Text is trimmed and the outbound call asked for web search
    assert_eq!(briefing, "Equities drifted higher overnight.");
    let body: serde_json::Value =
        serde_json::from_str(&h.transport.requests()[0].body).expect("json body");
    assert!(body["tools"][0]["googleSearch"].is_object());
}

#[tokio::test]
async fn when_news_batch_is_requested_system_returns_articles_in_model_order() {
    // Given: A news payload with three articles
    let h = harness(
        0,
        vec![reply(
            r#"{"articles":[
                {"title":"A","snippet":"a","url":"https://n.test/a","sourceName":"Wire","sentiment":"Bullish","impactSummary":"up"},
                {"title":"B","snippet":"b","url":"https://n.test/b","sourceName":"Wire","sentiment":"Bearish","impactSummary":"down"},
                {"title":"C","snippet":"c","url":"https://n.test/c","sourceName":"Wire","sentiment":"Neutral","impactSummary":"flat"}
            ]}"#,
        )],
    );

    // When: Crypto news is requested
    let articles = h
        .client
        .request_news_batch("Crypto".parse::<NewsCategory>().expect("category"))
        .await
        .expect("news");

    // Then: Order and sentiment are preserved
    let titles: Vec<&str> = articles.iter().map(|article| article.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B", "C"]);
    assert_eq!(articles[1].sentiment, Sentiment::Bearish);
    assert!(h.transport.requests()[0].body.contains("Crypto"));
}

#[tokio::test]
async fn when_news_payload_has_empty_articles_system_returns_empty_batch() {
    // Given: A valid but empty news payload
    let h = harness(0, vec![reply(r#"{"articles": []}"#)]);

    // When: News is requested
    let articles = h
        .client
        .request_news_batch(NewsCategory::All)
        .await
        .expect("empty batch is a success");

    // Then: The batch is empty
    assert!(articles.is_empty());
}

#[tokio::test]
async fn when_chat_reply_is_requested_history_is_sent_but_not_mutated() {
    // Given: A saved signal and a two-turn history
    let h = harness(
        1,
        vec![
            reply(r#"{"direction":"BUY","confidence":77,"strategyDescription":"Trend intact.","riskTip":"Thin liquidity."}"#),
            reply("  Consider scaling in near the pivot.  "),
        ],
    );
    let signal = h
        .client
        .request_signal("Ethereum (ETH/USD)", &UserProfile::default())
        .await
        .expect("signal");
    let history = vec![ChatTurn::user("Is the trend strong?"), ChatTurn::model("Yes.")];

    // When: A follow-up question is asked
    let turn = h
        .client
        .request_chat_reply(&history, "How should I enter?", &signal)
        .await
        .expect("reply");

    // Then: The reply is a trimmed model turn and the history is untouched
    assert_eq!(turn.role, ChatRole::Model);
    assert_eq!(turn.text, "Consider scaling in near the pivot.");
    assert_eq!(history.len(), 2);

    let body: serde_json::Value =
        serde_json::from_str(&h.transport.requests()[1].body).expect("json body");
    let contents = body["contents"].as_array().expect("contents array");
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[1]["role"], "model");
    assert_eq!(contents[2]["role"], "user");
    assert_eq!(contents[2]["parts"][0]["text"], "How should I enter?");
    let instruction = body["systemInstruction"]["parts"][0]["text"]
        .as_str()
        .expect("system instruction");
    assert!(instruction.contains("Ethereum (ETH/USD)"));
    assert!(instruction.contains("Trend intact."));
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
    // Given: One client shared by two concurrent calls
    let h = harness(
        0,
        vec![
            reply(r#"{"direction":"SELL","confidence":80}"#),
            reply(r#"{"direction":"SELL","confidence":80}"#),
        ],
    );
    let left = h.client.clone();
    let right = h.client.clone();
    let profile = UserProfile::default();

    // When: Both are awaited together
    let (a, b) = tokio::join!(
        left.request_signal("Gold (XAU/USD)", &profile),
        right.request_signal("Silver (XAG/USD)", &profile),
    );

    // Then: Each call gets its own record
    assert_eq!(a.expect("left").asset_name, "Gold (XAU/USD)");
    assert_eq!(b.expect("right").asset_name, "Silver (XAG/USD)");
    assert_eq!(h.transport.requests().len(), 2);
}
