use crate::error::RecipeError;
use crate::gateway::CompletionGateway;
use crate::model::PromptBundle;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::sleep;

/// Wraps a gateway and re-issues requests that failed for transient reasons.
///
/// Only transport errors and 429/5xx statuses are retried; every other
/// failure is returned as soon as it happens.
pub struct RetryGateway<G> {
    inner: G,
    attempts: u32,
    delay_ms: u64,
}

impl<G: CompletionGateway> RetryGateway<G> {
    pub fn new(inner: G, attempts: u32, delay_ms: u64) -> Self {
        RetryGateway {
            inner,
            attempts: attempts.max(1),
            delay_ms,
        }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Linear backoff: the wait grows with each failed attempt
    fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.delay_ms.saturating_mul(u64::from(attempt)))
    }
}

/// Whether a failed attempt is worth repeating
fn is_transient(err: &RecipeError) -> bool {
    match err {
        RecipeError::Transport(_) => true,
        RecipeError::UpstreamStatus { code, .. } => *code == 429 || *code >= 500,
        _ => false,
    }
}

#[async_trait]
impl<G: CompletionGateway> CompletionGateway for RetryGateway<G> {
    fn provider_name(&self) -> &str {
        "retry"
    }

    async fn complete(&self, prompts: &PromptBundle) -> Result<String, RecipeError> {
        let mut attempt = 1;
        loop {
            debug!(
                "Requesting completion with {} (attempt {}/{})",
                self.inner.provider_name(),
                attempt,
                self.attempts
            );

            match self.inner.complete(prompts).await {
                Ok(text) => {
                    if attempt > 1 {
                        info!("Completion succeeded on attempt {}", attempt);
                    }
                    return Ok(text);
                }
                Err(err) if attempt < self.attempts && is_transient(&err) => {
                    warn!(
                        "{} failed (attempt {}/{}): {}",
                        self.inner.provider_name(),
                        attempt,
                        self.attempts,
                        err
                    );
                    let delay = self.backoff(attempt);
                    debug!("Waiting {:?} before retry", delay);
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RecipeOptions, RecipeRequest};
    use crate::prompt;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Replays canned outcomes, one per call
    struct ScriptedGateway {
        outcomes: Mutex<VecDeque<Result<String, RecipeError>>>,
        calls: AtomicU32,
    }

    impl ScriptedGateway {
        fn new(outcomes: Vec<Result<String, RecipeError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl CompletionGateway for ScriptedGateway {
        fn provider_name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, _prompts: &PromptBundle) -> Result<String, RecipeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(RecipeError::EmptyCompletion))
        }
    }

    fn prompts() -> PromptBundle {
        prompt::assemble(&RecipeRequest::new(
            "oats, banana",
            "High-Carb",
            "Endurance",
            RecipeOptions::default(),
        ))
    }

    fn server_error() -> RecipeError {
        RecipeError::UpstreamStatus {
            code: 503,
            message: "API error: 503 - Service Unavailable".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_failures() {
        let gateway = RetryGateway::new(
            ScriptedGateway::new(vec![
                Err(RecipeError::Transport("connection reset".to_string())),
                Err(server_error()),
                Ok("<div>recipe</div>".to_string()),
            ]),
            3,
            100,
        );

        let result = gateway.complete(&prompts()).await.unwrap();
        assert_eq!(result, "<div>recipe</div>");
        assert_eq!(gateway.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_last_attempt() {
        let gateway = RetryGateway::new(
            ScriptedGateway::new(vec![Err(server_error()), Err(server_error())]),
            2,
            100,
        );

        let err = gateway.complete(&prompts()).await.unwrap_err();
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(gateway.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_backoff_grows_and_saturates() {
        let gateway = RetryGateway::new(ScriptedGateway::new(vec![]), 3, 250);
        assert_eq!(gateway.backoff(1), Duration::from_millis(250));
        assert_eq!(gateway.backoff(2), Duration::from_millis(500));

        let gateway = RetryGateway::new(ScriptedGateway::new(vec![]), 3, u64::MAX);
        assert_eq!(gateway.backoff(2), Duration::from_millis(u64::MAX));
    }

    #[tokio::test]
    async fn test_terminal_errors_are_not_retried() {
        let gateway = RetryGateway::new(
            ScriptedGateway::new(vec![
                Err(RecipeError::UpstreamStatus {
                    code: 401,
                    message: "API error: 401 - Unauthorized".to_string(),
                }),
                Ok("unreachable".to_string()),
            ]),
            3,
            0,
        );

        let err = gateway.complete(&prompts()).await.unwrap_err();
        assert_eq!(err.status_code(), Some(401));
        assert_eq!(gateway.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_completion_is_terminal() {
        let gateway = RetryGateway::new(
            ScriptedGateway::new(vec![Err(RecipeError::EmptyCompletion)]),
            5,
            0,
        );
        assert!(matches!(
            gateway.complete(&prompts()).await,
            Err(RecipeError::EmptyCompletion)
        ));
        assert_eq!(gateway.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zero_attempts_means_one() {
        let gateway = RetryGateway::new(ScriptedGateway::new(vec![]), 0, 0);
        assert_eq!(gateway.attempts, 1);
    }
}
