use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use super::policy::RetryPolicy;

/// Run `op` up to `policy.max_attempts()` times.
///
/// The sleep between attempts is injected so tests can record delays
/// instead of waiting them out. Returns the first success immediately;
/// after the final failed attempt, returns the last observed error
/// without sleeping again.
pub async fn retry<T, E, Op, Fut, Sleep, SleepFut>(
    policy: &RetryPolicy,
    mut op: Op,
    sleep: Sleep,
) -> Result<T, E>
where
    E: Display,
    Op: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    Sleep: Fn(Duration) -> SleepFut,
    SleepFut: Future<Output = ()>,
{
    let mut attempt = 1u32;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempt >= policy.max_attempts() {
                    return Err(error);
                }
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts = policy.max_attempts(),
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "attempt failed, backing off"
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// [`retry`] with tokio's timer as the sleeper.
pub async fn retry_with_backoff<T, E, Op, Fut>(policy: &RetryPolicy, op: Op) -> Result<T, E>
where
    E: Display,
    Op: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    retry(policy, op, tokio::time::sleep).await
}
