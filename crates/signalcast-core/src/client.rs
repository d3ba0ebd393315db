//! Acquisition façade: the four entry points used by callers.
//!
//! Each entry point is a linear composition of retry, extraction,
//! normalization and, on failure, classification. Classification happens
//! here and nowhere else.

use std::sync::Arc;

use serde_json::Value;

use crate::backend::{GeminiBackend, GenerateRequest, GenerateResponse, GenerativeBackend};
use crate::classify::{classify, ClassifiedError, Surface};
use crate::config::{ClientConfig, DEFAULT_ANALYSIS_MODEL, DEFAULT_SIGNAL_MODEL};
use crate::error::{AcquisitionError, ValidationError};
use crate::extract::extract_structured;
use crate::normalize::chat::{normalize_chat_reply, reply_text};
use crate::normalize::news::normalize_news;
use crate::normalize::signal::{normalize_signal, RawSignal};
use crate::prompts;
use crate::retry::{execute_with_retry, RetryConfig};
use crate::{AssetCatalog, ChatTurn, NewsArticle, NewsCategory, TradingSignal, UserProfile, UtcDateTime};

/// Client for AI briefings, signals, news and chat replies.
///
/// Cheap to clone; clones share the backend and catalog. Calls are
/// independent of each other and hold no state between invocations.
#[derive(Clone)]
pub struct AnalystClient {
    backend: Arc<dyn GenerativeBackend>,
    retry: RetryConfig,
    catalog: Arc<AssetCatalog>,
    signal_model: String,
    analysis_model: String,
}

impl AnalystClient {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            backend,
            retry: RetryConfig::default(),
            catalog: Arc::new(AssetCatalog::default()),
            signal_model: String::from(DEFAULT_SIGNAL_MODEL),
            analysis_model: String::from(DEFAULT_ANALYSIS_MODEL),
        }
    }

    /// Gemini-backed client using the models and retry schedule of `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(Arc::new(GeminiBackend::from_config(config)))
            .with_retry_config(config.retry_config())
            .with_models(config.signal_model.clone(), config.analysis_model.clone())
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_catalog(mut self, catalog: Arc<AssetCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_models(
        mut self,
        signal_model: impl Into<String>,
        analysis_model: impl Into<String>,
    ) -> Self {
        self.signal_model = signal_model.into();
        self.analysis_model = analysis_model.into();
        self
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    /// Plain-text market briefing grounded on live web data.
    pub async fn request_briefing(&self) -> Result<String, ClassifiedError> {
        let request = GenerateRequest::new(&self.analysis_model)
            .with_prompt(prompts::briefing_prompt())
            .with_web_grounding();

        let outcome = match self.call(&request).await {
            Ok(response) => reply_text(&response),
            Err(error) => Err(error),
        };
        outcome.map_err(|error| fail(&error, Surface::Briefing))
    }

    /// Trading signal for `asset_name`, tailored to `profile`.
    pub async fn request_signal(
        &self,
        asset_name: &str,
        profile: &UserProfile,
    ) -> Result<TradingSignal, ClassifiedError> {
        self.acquire_signal(asset_name, profile)
            .await
            .map_err(|error| fail(&error, Surface::Signal))
    }

    /// Ordered, possibly empty, batch of sentiment-tagged articles.
    pub async fn request_news_batch(
        &self,
        category: NewsCategory,
    ) -> Result<Vec<NewsArticle>, ClassifiedError> {
        self.acquire_news(category)
            .await
            .map_err(|error| fail(&error, Surface::News))
    }

    /// Model reply to `new_message` in the conversation about `signal_context`.
    ///
    /// `history` is only read; the outbound contents are a copy with the new
    /// user turn appended.
    pub async fn request_chat_reply(
        &self,
        history: &[ChatTurn],
        new_message: &str,
        signal_context: &TradingSignal,
    ) -> Result<ChatTurn, ClassifiedError> {
        self.acquire_chat_reply(history, new_message, signal_context)
            .await
            .map_err(|error| fail(&error, Surface::Chat))
    }

    async fn acquire_signal(
        &self,
        asset_name: &str,
        profile: &UserProfile,
    ) -> Result<TradingSignal, AcquisitionError> {
        let asset_name = asset_name.trim();
        if asset_name.is_empty() {
            return Err(ValidationError::EmptyAssetName.into());
        }

        let category = self.catalog.find(asset_name).map(|asset| asset.category);
        let request = GenerateRequest::new(&self.signal_model)
            .with_prompt(prompts::signal_prompt(asset_name, category, profile))
            .with_web_grounding();

        let response = self.call(&request).await?;
        let text = response.text().ok_or(AcquisitionError::EmptyResponse)?;
        let raw: RawSignal = extract_structured(text)?;

        Ok(normalize_signal(
            raw,
            asset_name,
            &response.grounding,
            UtcDateTime::now(),
        ))
    }

    async fn acquire_news(
        &self,
        category: NewsCategory,
    ) -> Result<Vec<NewsArticle>, AcquisitionError> {
        let request = GenerateRequest::new(&self.analysis_model)
            .with_prompt(prompts::news_prompt(category))
            .with_web_grounding();

        let response = self.call(&request).await?;
        let text = response.text().ok_or(AcquisitionError::EmptyResponse)?;
        let payload: Value = extract_structured(text)?;

        normalize_news(payload)
    }

    async fn acquire_chat_reply(
        &self,
        history: &[ChatTurn],
        new_message: &str,
        signal_context: &TradingSignal,
    ) -> Result<ChatTurn, AcquisitionError> {
        if new_message.trim().is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }

        let mut contents = history.to_vec();
        contents.push(ChatTurn::user(new_message));

        let request = GenerateRequest::new(&self.analysis_model)
            .with_contents(contents)
            .with_system_instruction(prompts::chat_instruction(signal_context))
            .with_web_grounding();

        let response = self.call(&request).await?;
        normalize_chat_reply(&response)
    }

    async fn call(&self, request: &GenerateRequest) -> Result<GenerateResponse, AcquisitionError> {
        let backend = self.backend.as_ref();
        execute_with_retry(&self.retry, || backend.generate(request))
            .await
            .map_err(AcquisitionError::from)
    }
}

fn fail(error: &AcquisitionError, surface: Surface) -> ClassifiedError {
    let classified = classify(error, surface);
    tracing::error!(
        surface = ?surface,
        code = classified.code(),
        error = %error,
        "acquisition failed"
    );
    classified
}
