use std::process::{ExitCode, Termination};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use error_stack::Report;
use serde_json::json;

use kernel::KernelError;

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

impl ErrorStatus {
    fn status(&self) -> (StatusCode, &'static str) {
        match self.0.current_context() {
            KernelError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            KernelError::Validation => (StatusCode::BAD_REQUEST, "VALIDATION"),
            KernelError::Authorization => (StatusCode::FORBIDDEN, "AUTHORIZATION"),
            KernelError::InvalidState => (StatusCode::CONFLICT, "INVALID_STATE"),
            KernelError::InvalidTransition => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
            KernelError::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            KernelError::Concurrency => (StatusCode::CONFLICT, "CONCURRENCY"),
            KernelError::StorageUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_UNAVAILABLE")
            }
            KernelError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        }
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> Response {
        let (status, code) = self.status();
        if status.is_server_error() {
            tracing::error!("{:?}", self.0);
        } else {
            tracing::debug!("{:?}", self.0);
        }
        let body = json!({
            "error": code,
            "message": self.0.current_context().to_string(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use error_stack::Report;

    use kernel::KernelError;

    use crate::error::ErrorStatus;

    fn status_of(error: KernelError) -> StatusCode {
        ErrorStatus::from(Report::new(error)).into_response().status()
    }

    #[test]
    fn kernel_errors_map_to_http_status() {
        assert_eq!(status_of(KernelError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(KernelError::Validation), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(KernelError::Authorization), StatusCode::FORBIDDEN);
        assert_eq!(status_of(KernelError::InvalidState), StatusCode::CONFLICT);
        assert_eq!(status_of(KernelError::InvalidTransition), StatusCode::CONFLICT);
        assert_eq!(status_of(KernelError::Conflict), StatusCode::CONFLICT);
        assert_eq!(status_of(KernelError::Concurrency), StatusCode::CONFLICT);
        assert_eq!(
            status_of(KernelError::StorageUnavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(KernelError::Internal),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
