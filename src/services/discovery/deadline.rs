use std::future::Future;
use std::time::Duration;

use super::DiscoveryError;

/// Run a whole logical request under one deadline.
///
/// On expiry `work` is dropped, which abandons every upstream call still in
/// flight; late responses are never observed.
pub async fn with_deadline<T, F>(deadline: Duration, work: F) -> Result<T, DiscoveryError>
where
    F: Future<Output = Result<T, DiscoveryError>>,
{
    match tokio::time::timeout(deadline, work).await {
        Ok(result) => result,
        Err(_) => Err(DiscoveryError::DeadlineExceeded(deadline)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::upstream::UpstreamError;

    #[tokio::test]
    async fn test_completes_within_deadline() {
        let result = with_deadline(Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_expired_deadline() {
        let result: Result<u32, _> = with_deadline(Duration::from_millis(20), async {
            futures::future::pending::<()>().await;
            Ok(1)
        })
        .await;
        assert!(matches!(result, Err(DiscoveryError::DeadlineExceeded(_))));
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result: Result<u32, _> = with_deadline(Duration::from_secs(1), async {
            Err(DiscoveryError::Upstream(UpstreamError::unavailable("down")))
        })
        .await;
        assert!(matches!(result, Err(DiscoveryError::Upstream(_))));
    }
}
