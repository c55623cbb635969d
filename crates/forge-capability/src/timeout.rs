//! Deadline guard for capability calls
//!
//! No stage may wait unboundedly on an external capability; every call
//! runs under this guard and resolves to a typed timeout on overrun.

use crate::error::CapabilityError;
use std::future::Future;
use std::time::Duration;

/// Run a capability call under a deadline
///
/// A call that exceeds `limit` resolves to [`CapabilityError::TimedOut`]
/// so the owning stage can apply its fallback instead of suspending.
pub async fn call_with_timeout<T, F>(limit: Duration, call: F) -> Result<T, CapabilityError>
where
    F: Future<Output = Result<T, CapabilityError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(CapabilityError::TimedOut { limit }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fast_call_passes_through() {
        let result = call_with_timeout(Duration::from_secs(1), async { Ok(42u32) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn slow_call_resolves_to_timeout() {
        let result: Result<u32, _> = call_with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(42)
        })
        .await;
        assert!(matches!(result, Err(CapabilityError::TimedOut { .. })));
    }

    #[tokio::test]
    async fn inner_error_passes_through() {
        let result: Result<u32, _> = call_with_timeout(Duration::from_secs(1), async {
            Err(CapabilityError::unavailable("offline"))
        })
        .await;
        assert!(matches!(result, Err(CapabilityError::Unavailable(_))));
    }
}
