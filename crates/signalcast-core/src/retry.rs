//! Retry logic with exponential backoff and jitter.

use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::backend::{BackendError, GenerateResponse};

/// Backoff strategy for retrying failed requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Uses an exponential delay between retries.
    ///
    /// The delay is calculated as `base * (factor ^ attempt) + jitter`, where
    /// jitter is drawn uniformly from `0..=max_jitter`.
    Exponential {
        /// The initial backoff duration.
        base: Duration,
        /// The multiplicative factor for each subsequent retry.
        factor: f64,
        /// Upper bound of the random delay added on top.
        max_jitter: Duration,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(1_000),
            factor: 2.0,
            max_jitter: Duration::from_millis(1_000),
        }
    }
}

impl Backoff {
    /// Calculate the delay for a given retry attempt (0-based).
    pub fn delay(self, attempt: u32, jitter: &dyn JitterSource) -> Duration {
        match self {
            Self::Exponential {
                base,
                factor,
                max_jitter,
            } => {
                let scale = factor.powi(i32::try_from(attempt).unwrap_or(i32::MAX));
                let exponential = Duration::from_nanos((base.as_nanos() as f64 * scale).round() as u64);
                exponential + jitter.jitter(max_jitter).min(max_jitter)
            }
        }
    }
}

/// Source of the random part of a backoff delay.
pub trait JitterSource: Send + Sync {
    /// A duration in `0..=max`.
    fn jitter(&self, max: Duration) -> Duration;
}

/// Uniform jitter backed by `fastrand`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FastrandJitter;

impl JitterSource for FastrandJitter {
    fn jitter(&self, max: Duration) -> Duration {
        let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(fastrand::u64(0..=max_ms))
    }
}

/// Constant jitter for deterministic schedules.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedJitter(pub Duration);

impl JitterSource for FixedJitter {
    fn jitter(&self, _max: Duration) -> Duration {
        self.0
    }
}

/// Suspends the caller between attempts.
pub trait Pause: Send + Sync {
    fn pause<'a>(&'a self, delay: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

/// Suspends on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPause;

impl Pause for TokioPause {
    fn pause<'a>(&'a self, delay: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(tokio::time::sleep(delay))
    }
}

/// Records requested delays and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingPause {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingPause {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays
            .lock()
            .map(|delays| delays.clone())
            .unwrap_or_default()
    }
}

impl Pause for RecordingPause {
    fn pause<'a>(&'a self, delay: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        if let Ok(mut delays) = self.delays.lock() {
            delays.push(delay);
        }
        Box::pin(std::future::ready(()))
    }
}

/// Configuration for the automatic retry mechanism.
#[derive(Clone)]
pub struct RetryConfig {
    /// The maximum number of retries to attempt.
    /// Total attempts = `max_retries + 1`.
    pub max_retries: u32,
    /// The backoff strategy to use between retries.
    pub backoff: Backoff,
    jitter: Arc<dyn JitterSource>,
    pause: Arc<dyn Pause>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::exponential(3, Duration::from_millis(1_000))
    }
}

impl Debug for RetryConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryConfig")
            .field("max_retries", &self.max_retries)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

impl RetryConfig {
    /// Exponential backoff doubling from `base_delay` with up to one second of jitter.
    pub fn exponential(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            backoff: Backoff::Exponential {
                base: base_delay,
                factor: 2.0,
                max_jitter: Duration::from_millis(1_000),
            },
            jitter: Arc::new(FastrandJitter),
            pause: Arc::new(TokioPause),
        }
    }

    /// Disable retries.
    pub fn no_retry() -> Self {
        Self::exponential(0, Duration::ZERO)
    }

    pub fn with_jitter(mut self, jitter: Arc<dyn JitterSource>) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_pause(mut self, pause: Arc<dyn Pause>) -> Self {
        self.pause = pause;
        self
    }

    /// Calculate the delay for a given retry attempt.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt, self.jitter.as_ref())
    }
}

/// Runs `operation` up to `max_retries + 1` times.
///
/// A reply with no text and no candidates counts as a failed attempt. After
/// the last attempt the last error is returned unchanged.
pub async fn execute_with_retry<F, Fut>(
    config: &RetryConfig,
    mut operation: F,
) -> Result<GenerateResponse, BackendError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<GenerateResponse, BackendError>>,
{
    let attempts = config.max_retries.saturating_add(1);
    let mut last_error = None;

    for attempt in 0..attempts {
        let outcome = match operation().await {
            Ok(response) if response.is_empty() => Err(BackendError::empty_response()),
            other => other,
        };

        let error = match outcome {
            Ok(response) => return Ok(response),
            Err(error) => error,
        };

        let rate_limited = error.mentions_rate_limit();
        tracing::warn!(
            attempt = attempt + 1,
            attempts,
            rate_limited,
            error = %error,
            "generative call attempt failed"
        );

        if attempt + 1 < attempts {
            let delay = config.delay_for_attempt(attempt);
            tracing::warn!(
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                rate_limited,
                "retrying after backoff"
            );
            config.pause.pause(delay).await;
        }

        last_error = Some(error);
    }

    Err(last_error.unwrap_or_else(|| BackendError::transport("no attempt was made")))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn deterministic(max_retries: u32, pause: Arc<RecordingPause>) -> RetryConfig {
        RetryConfig::exponential(max_retries, Duration::from_millis(100))
            .with_jitter(Arc::new(FixedJitter(Duration::from_millis(7))))
            .with_pause(pause)
    }

    #[test]
    fn test_exponential_backoff_adds_jitter() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(100),
            factor: 2.0,
            max_jitter: Duration::from_millis(1_000),
        };
        let jitter = FixedJitter(Duration::from_millis(250));

        assert_eq!(backoff.delay(0, &jitter), Duration::from_millis(350));
        assert_eq!(backoff.delay(1, &jitter), Duration::from_millis(450));
        assert_eq!(backoff.delay(3, &jitter), Duration::from_millis(1_050));
    }

    #[test]
    fn test_exponential_backoff_never_shrinks_for_huge_attempts() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(100),
            factor: 2.0,
            max_jitter: Duration::ZERO,
        };
        let jitter = FixedJitter(Duration::ZERO);

        let huge = backoff.delay(u32::MAX, &jitter);
        assert!(huge >= backoff.delay(30, &jitter), "delay={huge:?}");
        assert!(huge > Duration::from_millis(100));
    }

    #[test]
    fn test_random_jitter_stays_within_bound() {
        let config = RetryConfig::exponential(3, Duration::from_millis(1_000));
        for _ in 0..20 {
            for attempt in 0..3 {
                let delay = config.delay_for_attempt(attempt).as_millis();
                let floor = 1_000 * 2_u128.pow(attempt);
                assert!(delay >= floor, "attempt={attempt}, delay={delay}");
                assert!(delay <= floor + 1_000, "attempt={attempt}, delay={delay}");
            }
        }
    }

    #[test]
    fn test_retry_config_no_retry() {
        let config = RetryConfig::no_retry();
        assert_eq!(config.max_retries, 0);
    }

    #[tokio::test]
    async fn succeeds_after_k_failures_with_k_increasing_delays() {
        let pause = Arc::new(RecordingPause::default());
        let config = deterministic(3, pause.clone());
        let calls = AtomicU32::new(0);

        let response = execute_with_retry(&config, || {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if call < 2 {
                    Err(BackendError::status(503, "upstream returned 503 UNAVAILABLE"))
                } else {
                    Ok(GenerateResponse::from_text(format!("attempt {call}")))
                }
            }
        })
        .await
        .expect("third attempt succeeds");

        assert_eq!(response.text(), Some("attempt 2"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            pause.delays(),
            vec![Duration::from_millis(107), Duration::from_millis(207)]
        );
    }

    #[tokio::test]
    async fn returns_last_error_unchanged_after_exhaustion() {
        let pause = Arc::new(RecordingPause::default());
        let config = deterministic(2, pause.clone());
        let calls = AtomicU32::new(0);

        let error = execute_with_retry(&config, || {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(BackendError::transport(format!("connection reset #{call}"))) }
        })
        .await
        .expect_err("all attempts fail");

        assert_eq!(error, BackendError::transport("connection reset #2"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(pause.delays().len(), 2);
    }

    #[tokio::test]
    async fn empty_reply_is_retried() {
        let pause = Arc::new(RecordingPause::default());
        let config = deterministic(1, pause.clone());
        let calls = AtomicU32::new(0);

        let response = execute_with_retry(&config, || {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if call == 0 {
                    Ok(GenerateResponse::default())
                } else {
                    Ok(GenerateResponse::from_text("filled"))
                }
            }
        })
        .await
        .expect("second attempt succeeds");

        assert_eq!(response.text(), Some("filled"));
        assert_eq!(pause.delays().len(), 1);
    }

    #[tokio::test]
    async fn zero_retries_makes_a_single_attempt() {
        let pause = Arc::new(RecordingPause::default());
        let config = deterministic(0, pause.clone());

        let error = execute_with_retry(&config, || async { Ok(GenerateResponse::default()) })
            .await
            .expect_err("empty reply fails");

        assert_eq!(error, BackendError::empty_response());
        assert!(pause.delays().is_empty());
    }
}
