use std::future::Future;
use std::time::Duration;

use error_stack::Report;

use kernel::KernelError;

pub use self::{memory::*, postgres::*};

mod memory;
mod postgres;

/// Runs `future` under `limit`. Expiry is reported as `StorageUnavailable`.
pub(crate) async fn timed<T, F>(limit: Duration, future: F) -> error_stack::Result<T, KernelError>
where
    F: Future<Output = error_stack::Result<T, KernelError>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(elapsed) => Err(Report::new(elapsed)
            .change_context(KernelError::StorageUnavailable)
            .attach_printable(format!("store call exceeded {}ms", limit.as_millis()))),
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use kernel::KernelError;

    use crate::database::timed;

    #[tokio::test]
    async fn slow_store_call_is_retryable() {
        let report = timed(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(())
        })
        .await
        .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::StorageUnavailable);
        assert!(report.current_context().is_retryable());
    }

    #[tokio::test]
    async fn fast_store_call_passes_through() {
        let value = timed(Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(value.ok(), Some(7));
    }
}
