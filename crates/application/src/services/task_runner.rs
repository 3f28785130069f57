use futures::future::join_all;
use std::future::Future;
use std::time::Duration;
use subrecon_domain::DomainError;
use tokio::sync::Semaphore;
use tracing::debug;

/// Bounded-parallelism executor with per-task retry and exponential backoff.
///
/// Every task gets a slot in the output at its input position, holding either
/// its value or the last error after retries ran out.
#[derive(Debug, Clone, Copy)]
pub struct TaskRunner {
    concurrency: usize,
    retries: u32,
    backoff: Duration,
}

impl TaskRunner {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            retries: 3,
            backoff: Duration::from_millis(200),
        }
    }

    /// Additional attempts after the first failure.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub async fn run_all<T, F, Fut>(&self, tasks: Vec<F>) -> Vec<Result<T, DomainError>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let semaphore = Semaphore::new(self.concurrency);
        let semaphore = &semaphore;

        let runs = tasks.into_iter().enumerate().map(|(index, task)| async move {
            let _permit = semaphore
                .acquire()
                .await
                .map_err(|e| DomainError::TaskFailed(e.to_string()))?;
            self.run_with_retry(index, &task).await
        });

        join_all(runs).await
    }

    async fn run_with_retry<T, F, Fut>(&self, index: usize, task: &F) -> Result<T, DomainError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            match task().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.retries {
                        return Err(e);
                    }
                    let delay = backoff_delay(self.backoff, attempt);
                    debug!(
                        task = index,
                        attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying task after error"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

/// `base * 2^(attempt - 1)`, saturating.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(20);
    base.saturating_mul(1u32 << exp)
}
