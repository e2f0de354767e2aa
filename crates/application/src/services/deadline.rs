//! Deadline applied to every outbound backend call

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::ApplicationError;

/// Default upper bound for a single backend call
pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Run `future`, failing with `ExternalService` once `limit` has elapsed
pub(crate) async fn within<T, F>(
    limit: Duration,
    operation: &'static str,
    future: F,
) -> Result<T, ApplicationError>
where
    F: Future<Output = Result<T, ApplicationError>>,
{
    if let Ok(result) = tokio::time::timeout(limit, future).await {
        result
    } else {
        #[allow(clippy::cast_possible_truncation)]
        let timeout_ms = limit.as_millis() as u64;
        warn!(operation, timeout_ms, "Backend call timed out");
        Err(ApplicationError::ExternalService(format!(
            "{operation} timed out after {timeout_ms}ms"
        )))
    }
}
