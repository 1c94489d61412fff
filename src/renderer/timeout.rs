//! Timeout wrapper for browser operations

use std::future::Future;
use std::time::Duration;

use super::RenderError;

/// Run `operation` under a `timeout_secs` deadline.
///
/// The operation's own error is passed through; hitting the deadline becomes
/// [`RenderError::Timeout`] naming `operation_name`.
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout_secs: u64,
    operation_name: &str,
) -> Result<T, RenderError>
where
    F: Future<Output = Result<T, RenderError>>,
{
    match tokio::time::timeout(Duration::from_secs(timeout_secs), operation).await {
        Ok(result) => result,
        Err(_) => Err(RenderError::Timeout {
            operation: operation_name.to_string(),
            secs: timeout_secs,
        }),
    }
}
