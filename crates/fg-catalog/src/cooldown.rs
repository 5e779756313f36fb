//! Rate-limit cool-down

use std::future::Future;
use std::time::Duration;

use crate::error::{CatalogError, CatalogResult};

/// Run `request`, sleeping `cooldown` and retrying the same request for as
/// long as the catalog answers with [`CatalogError::RateLimited`].
///
/// Every other outcome, success or failure, is returned as-is.
pub async fn retry_rate_limited<T, F, Fut>(cooldown: Duration, mut request: F) -> CatalogResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CatalogResult<T>>,
{
    loop {
        match request().await {
            Err(CatalogError::RateLimited) => {
                log::warn!(
                    "[Catalog] Rate limited; sleeping for {}s",
                    cooldown.as_secs()
                );
                tokio::time::sleep(cooldown).await;
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success() {
        let calls = Cell::new(0u32);
        let started = tokio::time::Instant::now();

        let result = retry_rate_limited(Duration::from_secs(60), || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n < 3 {
                    Err(CatalogError::RateLimited)
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.get(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(120));
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_errors_are_not_retried() {
        let calls = Cell::new(0u32);
        let started = tokio::time::Instant::now();

        let result: CatalogResult<()> = retry_rate_limited(Duration::from_secs(60), || {
            calls.set(calls.get() + 1);
            async {
                Err(CatalogError::Http {
                    status: 500,
                    body: String::new(),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(CatalogError::Http { status: 500, .. })));
        assert_eq!(calls.get(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
