//! Completion backend abstraction and retry handling.
//!
//! The synthesizer talks to a text-generation backend through the
//! `CompletionBackend` trait so tests can script responses and the hosting
//! application owns the client lifecycle.

use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

pub mod error;
pub mod model_family;
pub mod openai_api;

pub use error::CompletionError;
pub use openai_api::OpenAiBackend;

/// One role/content message in a chat completion request.
#[derive(Debug, Clone)]
pub struct Message {
    pub role: &'static str,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// A single size-bounded generation request.
///
/// `max_output_tokens` is mapped to the wire parameter name appropriate for
/// the model family by the backend; `temperature` is dropped for families
/// that reject it.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_output_tokens: usize,
    pub temperature: Option<f32>,
}

#[async_trait]
pub trait CompletionBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the backend is usable at all (e.g. a credential is present).
    fn is_available(&self) -> bool;

    /// Issue one completion round-trip and return the generated text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

/// Bounded exponential backoff schedule, kept as data so tests can run the
/// retry loop without real sleeps.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Zero-delay policy for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before the given retry (1-based attempt that just failed):
    /// base * 2^(attempt-1), capped.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = self
            .base_delay
            .saturating_mul(1u32 << attempt.saturating_sub(1).min(16));
        exp.min(self.max_delay)
    }
}

/// Run a completion with bounded retries for transient failures.
///
/// Fatal errors (auth, connectivity) propagate on the first occurrence
/// without consuming the retry budget.
pub async fn complete_with_retry(
    backend: &dyn CompletionBackend,
    request: &CompletionRequest,
    policy: &RetryPolicy,
) -> Result<String, CompletionError> {
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match backend.complete(request).await {
            Ok(content) => return Ok(content),
            Err(err) if err.is_transient() && attempt < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                warn!(
                    "Completion attempt {}/{} failed ({}), retrying in {:?}",
                    attempt, policy.max_attempts, err, delay
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FlakyBackend {
        calls: AtomicU32,
        succeed_on: u32,
    }

    #[async_trait]
    impl CompletionBackend for FlakyBackend {
        fn name(&self) -> &'static str {
            "flaky"
        }

        fn is_available(&self) -> bool {
            true
        }

        async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= self.succeed_on {
                Ok("ok".to_string())
            } else {
                Err(CompletionError::Malformed("not yet".to_string()))
            }
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o".to_string(),
            messages: vec![Message::user("hi")],
            max_output_tokens: 10,
            temperature: Some(0.3),
        }
    }

    #[tokio::test]
    async fn retries_transient_failures_until_success() {
        let backend = FlakyBackend {
            calls: AtomicU32::new(0),
            succeed_on: 3,
        };
        let result =
            complete_with_retry(&backend, &request(), &RetryPolicy::immediate(3)).await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let backend = FlakyBackend {
            calls: AtomicU32::new(0),
            succeed_on: 10,
        };
        let result =
            complete_with_retry(&backend, &request(), &RetryPolicy::immediate(3)).await;
        assert!(result.is_err());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn fatal_errors_do_not_retry() {
        struct AuthFail(AtomicU32);

        #[async_trait]
        impl CompletionBackend for AuthFail {
            fn name(&self) -> &'static str {
                "auth-fail"
            }

            fn is_available(&self) -> bool {
                true
            }

            async fn complete(
                &self,
                _request: &CompletionRequest,
            ) -> Result<String, CompletionError> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Err(CompletionError::Api {
                    status: 401,
                    message: "invalid api key".to_string(),
                })
            }
        }

        let backend = AuthFail(AtomicU32::new(0));
        let result =
            complete_with_retry(&backend, &request(), &RetryPolicy::immediate(3)).await;
        assert!(result.is_err());
        assert_eq!(backend.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn backoff_schedule_starts_at_base_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3), Duration::from_secs(8));
        assert_eq!(policy.delay_for(10), Duration::from_secs(30));
    }
}
