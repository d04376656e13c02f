//! Retry with exponential backoff for transient database failures.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// SQLSTATE codes worth retrying: serialization failure, deadlock,
/// too many connections, admin shutdown, cannot connect now.
const RETRIABLE_SQLSTATES: &[&str] = &["40001", "40P01", "53300", "57P01", "57P03"];

/// Backoff settings for `execute_with_retry`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `attempt` (1-based), capped at `max_backoff`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt.saturating_sub(1));
        self.base_backoff.saturating_mul(factor).min(self.max_backoff)
    }
}

/// Execute a database operation, retrying transient failures.
///
/// # Example
/// ```ignore
/// let rows = execute_with_retry(
///     || async { Ok(sqlx::query("SELECT 1").execute(&pool).await?) },
///     &RetryPolicy::default(),
/// ).await?;
/// ```
pub async fn execute_with_retry<F, Fut, T>(mut f: F, policy: &RetryPolicy) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt < policy.max_attempts && is_retriable_error(&e) => {
                let backoff = policy.backoff(attempt);
                warn!(
                    "Database operation failed (attempt {}/{}): {}. Retrying in {}ms",
                    attempt,
                    policy.max_attempts,
                    e,
                    backoff.as_millis()
                );
                tokio::time::sleep(backoff).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Check if a database error is retriable
fn is_retriable_error(e: &anyhow::Error) -> bool {
    if let Some(sqlx_err) = e.downcast_ref::<sqlx::Error>() {
        return match sqlx_err {
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::Tls(_) => true,
            sqlx::Error::Database(db_err) => db_err
                .code()
                .map(|code| RETRIABLE_SQLSTATES.contains(&code.as_ref()))
                .unwrap_or(false),
            _ => false,
        };
    }

    let err_str = e.to_string().to_lowercase();

    // Connection-related errors that are likely transient
    err_str.contains("connection")
        || err_str.contains("timeout")
        || err_str.contains("timed out")
        || err_str.contains("broken pipe")
        || err_str.contains("could not serialize")
        || err_str.contains("deadlock detected")
        || err_str.contains("too many clients")
        || err_str.contains("server closed the connection")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_is_retriable_error() {
        assert!(is_retriable_error(&anyhow::anyhow!("connection refused")));
        assert!(is_retriable_error(&anyhow::anyhow!("deadlock detected")));
        assert!(is_retriable_error(&anyhow::anyhow!("too many clients already")));
        assert!(is_retriable_error(&anyhow::Error::new(sqlx::Error::PoolTimedOut)));

        assert!(!is_retriable_error(&anyhow::anyhow!("unique constraint violation")));
        assert!(!is_retriable_error(&anyhow::anyhow!("column does not exist")));
        assert!(!is_retriable_error(&anyhow::Error::new(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(400));
        assert_eq!(policy.backoff(20), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_retry_succeeds_eventually() {
        let attempts = Arc::new(AtomicU32::new(0));

        let result: Result<i32> = execute_with_retry(
            || {
                let attempts = attempts.clone();
                async move {
                    if attempts.fetch_add(1, Ordering::SeqCst) + 1 < 3 {
                        Err(anyhow::anyhow!("connection reset by peer"))
                    } else {
                        Ok(42)
                    }
                }
            },
            &fast_policy(),
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_fails_after_max_attempts() {
        let attempts = Arc::new(AtomicU32::new(0));

        let result: Result<i32> = execute_with_retry(
            || {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(anyhow::anyhow!("connection timeout"))
                }
            },
            &fast_policy(),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_no_retry_on_non_retriable_error() {
        let attempts = Arc::new(AtomicU32::new(0));

        let result: Result<i32> = execute_with_retry(
            || {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(anyhow::anyhow!("unique constraint violation"))
                }
            },
            &fast_policy(),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
